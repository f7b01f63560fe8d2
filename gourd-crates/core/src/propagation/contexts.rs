use std::borrow::Cow;

use super::Domains;
use super::PropagatorEventType;
use super::PropagatorId;
use super::ReadDomains;
use super::store::PropagatorState;
use crate::basic_types::Contradiction;
use crate::environment::Environment;
use crate::environment::StoredInt;
#[cfg(doc)]
use crate::propagation::Propagator;
use crate::variables::Cause;
use crate::variables::VarId;
use crate::variables::Variables;

/// Provided to a propagator while it filters.
///
/// Domains can be read through the implementation of [`ReadDomains`]; every domain update made
/// through the context is attributed to the propagator, so it is not scheduled again by its own
/// changes.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    pub(crate) environment: &'a mut Environment,
    pub(crate) variables: &'a mut Variables,
    pub(crate) propagator_id: PropagatorId,
    pub(crate) propagator_state: StoredInt,
    pub(crate) delayed: &'a mut Option<PropagatorEventType>,
}

impl ReadDomains for PropagationContext<'_> {
    fn domains(&self) -> Domains<'_> {
        Domains::new(self.environment, self.variables)
    }
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        environment: &'a mut Environment,
        variables: &'a mut Variables,
        propagator_id: PropagatorId,
        propagator_state: StoredInt,
        delayed: &'a mut Option<PropagatorEventType>,
    ) -> Self {
        PropagationContext {
            environment,
            variables,
            propagator_id,
            propagator_state,
            delayed,
        }
    }

    pub fn reborrow(&mut self) -> PropagationContext<'_> {
        PropagationContext {
            environment: self.environment,
            variables: self.variables,
            propagator_id: self.propagator_id,
            propagator_state: self.propagator_state,
            delayed: self.delayed,
        }
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    fn cause(&self) -> Cause {
        Cause::Propagator(self.propagator_id)
    }

    /// The environment, for reading the propagator's own backtrackable state.
    pub fn environment(&self) -> &Environment {
        self.environment
    }

    /// The environment, for maintaining the propagator's own backtrackable state.
    pub fn environment_mut(&mut self) -> &mut Environment {
        self.environment
    }

    /// Removes every value below `value`; returns whether the domain changed.
    pub fn update_lower_bound(&mut self, variable: VarId, value: i32) -> Result<bool, Contradiction> {
        let cause = self.cause();
        self.variables
            .update_lower_bound(self.environment, variable, value, cause)
    }

    /// Removes every value above `value`; returns whether the domain changed.
    pub fn update_upper_bound(&mut self, variable: VarId, value: i32) -> Result<bool, Contradiction> {
        let cause = self.cause();
        self.variables
            .update_upper_bound(self.environment, variable, value, cause)
    }

    /// Removes `value`; returns whether the domain changed.
    ///
    /// Removing a value strictly between the bounds of an interval domain has no effect.
    pub fn remove_value(&mut self, variable: VarId, value: i32) -> Result<bool, Contradiction> {
        let cause = self.cause();
        self.variables
            .remove_value(self.environment, variable, value, cause)
    }

    /// Reduces the domain to `value`; returns whether the domain changed.
    pub fn instantiate_to(&mut self, variable: VarId, value: i32) -> Result<bool, Contradiction> {
        let cause = self.cause();
        self.variables
            .instantiate_to(self.environment, variable, value, cause)
    }

    /// Requests a propagation of the given type once the current call returns.
    ///
    /// Meant for propagators reacting to fine events: the cheap per-event work is done in
    /// [`Propagator::propagate_fine`], the expensive work once all events were handled. Several
    /// requests are merged, a [`PropagatorEventType::Full`] request wins over a custom one.
    pub fn force_propagate(&mut self, event_type: PropagatorEventType) {
        *self.delayed = match (*self.delayed, event_type) {
            (Some(PropagatorEventType::Full), _) | (_, PropagatorEventType::Full) => {
                Some(PropagatorEventType::Full)
            }
            _ => Some(PropagatorEventType::Custom),
        };
    }

    /// Marks the propagator as entailed for the rest of the current world: it is no longer
    /// scheduled and its remaining events are dropped. Undone on backtrack.
    pub fn set_passive(&mut self) {
        log::trace!("{} becomes passive", self.propagator_id);
        PropagatorState::Passive.write(self.propagator_state, self.environment);
    }

    pub fn is_passive(&self) -> bool {
        PropagatorState::read(self.propagator_state, self.environment) == PropagatorState::Passive
    }

    /// A contradiction raised by this propagator, to be returned from the filtering call.
    pub fn contradiction(&self, reason: impl Into<Cow<'static, str>>) -> Contradiction {
        Contradiction::Propagator {
            propagator: self.propagator_id,
            reason: reason.into(),
        }
    }
}
