use std::collections::VecDeque;

use enum_map::Enum;
use enum_map::EnumMap;

use crate::containers::KeyedVec;
use crate::gourd_asserts::gourd_assert_moderate;
use crate::propagation::Priority;
use crate::propagation::PropagatorId;

/// One FIFO queue per [`Priority`]; a propagator is in at most one queue at a time.
#[derive(Debug, Default, Clone)]
pub(crate) struct PropagatorQueue {
    queues: EnumMap<Priority, VecDeque<PropagatorId>>,
    is_enqueued: KeyedVec<PropagatorId, bool>,
    /// Bit `i` is set when the queue of priority `i` is not empty.
    not_empty: u8,
}

impl PropagatorQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.not_empty == 0
    }

    /// Enqueues the propagator unless it is already enqueued; returns whether it was added.
    pub(crate) fn enqueue_propagator(
        &mut self,
        propagator_id: PropagatorId,
        priority: Priority,
    ) -> bool {
        if self.is_propagator_enqueued(propagator_id) {
            return false;
        }

        self.is_enqueued.accomodate(propagator_id, false);
        self.is_enqueued[propagator_id] = true;
        self.queues[priority].push_back(propagator_id);
        self.not_empty |= 1 << priority.into_usize();
        true
    }

    /// Pops the oldest propagator from the most urgent non-empty queue.
    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        if self.not_empty == 0 {
            return None;
        }

        let priority = Priority::from_usize(self.not_empty.trailing_zeros() as usize);
        let queue = &mut self.queues[priority];
        gourd_assert_moderate!(!queue.is_empty());

        let propagator_id = queue.pop_front()?;
        if queue.is_empty() {
            self.not_empty &= !(1 << priority.into_usize());
        }
        self.is_enqueued[propagator_id] = false;

        Some(propagator_id)
    }

    /// Removes the propagator from its queue, if it is enqueued.
    pub(crate) fn remove(&mut self, propagator_id: PropagatorId, priority: Priority) {
        if !self.is_propagator_enqueued(propagator_id) {
            return;
        }

        let queue = &mut self.queues[priority];
        queue.retain(|&enqueued| enqueued != propagator_id);
        if queue.is_empty() {
            self.not_empty &= !(1 << priority.into_usize());
        }
        self.is_enqueued[propagator_id] = false;
    }

    pub(crate) fn clear(&mut self) {
        for (_, queue) in self.queues.iter_mut() {
            for propagator_id in queue.drain(..) {
                self.is_enqueued[propagator_id] = false;
            }
        }
        self.not_empty = 0;
    }

    pub(crate) fn is_propagator_enqueued(&self, propagator_id: PropagatorId) -> bool {
        self.is_enqueued
            .get(propagator_id)
            .copied()
            .unwrap_or_default()
    }
}
