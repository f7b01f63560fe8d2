use std::fmt::Debug;
use std::fmt::Formatter;
use std::marker::PhantomData;

use super::Priority;
use super::Propagator;
use super::PropagatorId;
use crate::containers::KeyedVec;
use crate::environment::Environment;
use crate::environment::StoredInt;
use crate::variables::VarId;

/// Where a propagator is in its life cycle. Stored in the environment, so every transition is
/// undone on backtrack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub(crate) enum PropagatorState {
    /// Added but not yet activated; not scheduled on events.
    New = 0,
    Active = 1,
    /// Its constraint is known to hold for the rest of the current world.
    Passive = 2,
}

impl PropagatorState {
    pub(crate) fn read(cell: StoredInt, environment: &Environment) -> PropagatorState {
        match cell.get(environment) {
            0 => PropagatorState::New,
            1 => PropagatorState::Active,
            _ => PropagatorState::Passive,
        }
    }

    pub(crate) fn write(self, cell: StoredInt, environment: &mut Environment) {
        cell.set(environment, self as i32)
    }
}

pub(crate) struct PropagatorEntry {
    pub(crate) propagator: Box<dyn Propagator>,
    pub(crate) scope: Vec<VarId>,
    pub(crate) priority: Priority,
    pub(crate) reacts_to_fine_events: bool,
    pub(crate) state: StoredInt,
}

impl Debug for PropagatorEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropagatorEntry")
            .field("propagator", &self.propagator.name())
            .field("scope", &self.scope)
            .field("priority", &self.priority)
            .field("reacts_to_fine_events", &self.reacts_to_fine_events)
            .finish()
    }
}

/// A central store for propagators.
///
/// Deleted propagators leave an empty slot behind, so ids of the remaining propagators stay
/// valid.
#[derive(Debug, Default)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, Option<PropagatorEntry>>,
}

impl PropagatorStore {
    pub(crate) fn next_id(&self) -> PropagatorId {
        PropagatorId(self.propagators.len() as u32)
    }

    pub(crate) fn push(&mut self, entry: PropagatorEntry) -> PropagatorId {
        self.propagators.push(Some(entry))
    }

    /// The number of propagators which are not deleted.
    pub(crate) fn num_propagators(&self) -> usize {
        self.propagators.iter().flatten().count()
    }

    pub(crate) fn contains(&self, propagator: PropagatorId) -> bool {
        self.get(propagator).is_some()
    }

    pub(crate) fn get(&self, propagator: PropagatorId) -> Option<&PropagatorEntry> {
        self.propagators.get(propagator).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, propagator: PropagatorId) -> Option<&mut PropagatorEntry> {
        self.propagators.get_mut(propagator).and_then(Option::as_mut)
    }

    pub(crate) fn remove(&mut self, propagator: PropagatorId) -> Option<PropagatorEntry> {
        self.propagators.get_mut(propagator).and_then(Option::take)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (PropagatorId, &PropagatorEntry)> + '_ {
        self.propagators
            .keys()
            .zip(self.propagators.iter())
            .filter_map(|(id, entry)| entry.as_ref().map(|entry| (id, entry)))
    }

    pub(crate) fn state(&self, propagator: PropagatorId, environment: &Environment) -> Option<PropagatorState> {
        self.get(propagator)
            .map(|entry| PropagatorState::read(entry.state, environment))
    }

    pub(crate) fn is_active(&self, propagator: PropagatorId, environment: &Environment) -> bool {
        self.state(propagator, environment) == Some(PropagatorState::Active)
    }

    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.get(handle.id)?.propagator.downcast_ref()
    }

    pub(crate) fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self.get_mut(handle.id)?.propagator.downcast_mut()
    }
}

/// A typed wrapper around a [`PropagatorId`] which allows retrieving the concrete propagator
/// from the [`State`](crate::State).
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PropagatorHandle<P> {
    id: PropagatorId,
    propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    pub(crate) fn new(id: PropagatorId) -> Self {
        PropagatorHandle {
            id,
            propagator: PhantomData,
        }
    }

    /// The type-erased id of the propagator.
    pub fn propagator_id(self) -> PropagatorId {
        self.id
    }
}

impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}
