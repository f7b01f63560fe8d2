use std::collections::VecDeque;

use enumset::EnumSet;

use crate::propagation::LocalId;
use crate::variables::IntEvent;

/// The events a propagator which reacts to fine events has not handled yet, per variable of its
/// scope.
///
/// Events on the same variable are merged; variables are handed out in the order in which they
/// first received an event.
#[derive(Debug, Default, Clone)]
pub(crate) struct FineEvents {
    masks: Vec<EnumSet<IntEvent>>,
    pending: VecDeque<LocalId>,
}

impl FineEvents {
    pub(crate) fn add(&mut self, local_id: LocalId, events: EnumSet<IntEvent>) {
        if events.is_empty() {
            return;
        }
        if local_id.index() >= self.masks.len() {
            self.masks.resize(local_id.index() + 1, EnumSet::empty());
        }

        if self.masks[local_id.index()].is_empty() {
            self.pending.push_back(local_id);
        }
        self.masks[local_id.index()] |= events;
    }

    pub(crate) fn pop(&mut self) -> Option<(LocalId, EnumSet<IntEvent>)> {
        let local_id = self.pending.pop_front()?;
        let events = std::mem::take(&mut self.masks[local_id.index()]);
        Some((local_id, events))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        while self.pop().is_some() {}
    }
}
