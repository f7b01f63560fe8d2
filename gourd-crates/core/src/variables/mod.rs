//! Integer variables: backtrackable domains, the propagators subscribed to them, and the events
//! they produce.
mod domain;
mod events;
mod var_id;
mod variable_names;

use std::collections::VecDeque;

use enumset::EnumSet;
pub use events::Cause;
pub use events::IntEvent;
pub use var_id::VarId;

use self::domain::IntDomain;
use self::variable_names::VariableNames;
use crate::basic_types::Contradiction;
use crate::basic_types::EmptyDomain;
use crate::containers::KeyedVec;
use crate::environment::Environment;
use crate::propagation::LocalId;
use crate::propagation::PropagatorId;

/// A propagator which wants to be notified about events on a variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Subscriber {
    pub(crate) propagator: PropagatorId,
    /// The events the propagator reacts to.
    pub(crate) mask: EnumSet<IntEvent>,
    /// The position of the variable in the scope of the propagator.
    pub(crate) local_id: LocalId,
}

#[derive(Debug, Clone)]
struct VariableData {
    domain: IntDomain,
    subscribers: Vec<Subscriber>,
    /// The events which happened since the engine last looked at this variable.
    pending_events: EnumSet<IntEvent>,
    pending_cause: Cause,
}

/// A pending notification taken from the event queue of [`Variables`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct VariableEvent {
    pub(crate) variable: VarId,
    pub(crate) events: EnumSet<IntEvent>,
    pub(crate) cause: Cause,
}

/// The arena of all integer variables.
///
/// Variables are referenced by [`VarId`] everywhere; domains live in the [`Environment`] and are
/// passed in explicitly. Every domain change is recorded as a pending event, and a variable is
/// put in the event queue the first time it gets a pending event.
#[derive(Debug, Default)]
pub struct Variables {
    variables: KeyedVec<VarId, VariableData>,
    event_queue: VecDeque<VarId>,
    names: VariableNames,
}

impl Variables {
    fn push(&mut self, domain: IntDomain, name: Option<String>) -> VarId {
        let variable = self.variables.push(VariableData {
            domain,
            subscribers: vec![],
            pending_events: EnumSet::empty(),
            pending_cause: Cause::Null,
        });
        if let Some(name) = name {
            self.names.add(variable, name);
        }
        variable
    }

    /// Creates a variable with domain `lb..=ub` of which only the bounds are kept.
    pub fn new_interval_variable(
        &mut self,
        environment: &mut Environment,
        lb: i32,
        ub: i32,
        name: Option<String>,
    ) -> VarId {
        let domain = IntDomain::interval(environment, lb, ub);
        self.push(domain, name)
    }

    /// Creates a variable whose domain is exactly `values`, holes included.
    pub fn new_enumerated_variable(
        &mut self,
        environment: &mut Environment,
        values: &[i32],
        name: Option<String>,
    ) -> VarId {
        let domain = IntDomain::enumerated(environment, values);
        self.push(domain, name)
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = VarId> + '_ {
        self.variables.keys()
    }

    pub fn name(&self, variable: VarId) -> Option<&str> {
        self.names.get_name(variable)
    }

    pub fn variable_by_name(&self, name: &str) -> Option<VarId> {
        self.names.get_variable_by_name(name)
    }

    pub fn lower_bound(&self, environment: &Environment, variable: VarId) -> i32 {
        self.variables[variable].domain.lower_bound(environment)
    }

    pub fn upper_bound(&self, environment: &Environment, variable: VarId) -> i32 {
        self.variables[variable].domain.upper_bound(environment)
    }

    pub fn size(&self, environment: &Environment, variable: VarId) -> u64 {
        self.variables[variable].domain.size(environment)
    }

    pub fn contains(&self, environment: &Environment, variable: VarId, value: i32) -> bool {
        self.variables[variable].domain.contains(environment, value)
    }

    pub fn is_fixed(&self, environment: &Environment, variable: VarId) -> bool {
        self.variables[variable].domain.is_fixed(environment)
    }

    /// The value of `variable` if its domain is a singleton.
    pub fn fixed_value(&self, environment: &Environment, variable: VarId) -> Option<i32> {
        let domain = &self.variables[variable].domain;
        domain
            .is_fixed(environment)
            .then(|| domain.lower_bound(environment))
    }

    pub fn next_value(&self, environment: &Environment, variable: VarId, value: i32) -> Option<i32> {
        self.variables[variable]
            .domain
            .next_value(environment, value)
    }

    pub fn previous_value(
        &self,
        environment: &Environment,
        variable: VarId,
        value: i32,
    ) -> Option<i32> {
        self.variables[variable]
            .domain
            .previous_value(environment, value)
    }

    /// The values in the domain of `variable` in increasing order.
    pub fn values<'a>(
        &'a self,
        environment: &'a Environment,
        variable: VarId,
    ) -> impl Iterator<Item = i32> + 'a {
        let domain = &self.variables[variable].domain;
        std::iter::successors(Some(domain.lower_bound(environment)), move |&value| {
            domain.next_value(environment, value)
        })
    }

    pub fn update_lower_bound(
        &mut self,
        environment: &mut Environment,
        variable: VarId,
        value: i32,
        cause: Cause,
    ) -> Result<bool, Contradiction> {
        let result = self.variables[variable]
            .domain
            .update_lower_bound(environment, value);
        self.record(variable, result, cause)
    }

    pub fn update_upper_bound(
        &mut self,
        environment: &mut Environment,
        variable: VarId,
        value: i32,
        cause: Cause,
    ) -> Result<bool, Contradiction> {
        let result = self.variables[variable]
            .domain
            .update_upper_bound(environment, value);
        self.record(variable, result, cause)
    }

    pub fn remove_value(
        &mut self,
        environment: &mut Environment,
        variable: VarId,
        value: i32,
        cause: Cause,
    ) -> Result<bool, Contradiction> {
        let result = self.variables[variable]
            .domain
            .remove_value(environment, value);
        self.record(variable, result, cause)
    }

    pub fn instantiate_to(
        &mut self,
        environment: &mut Environment,
        variable: VarId,
        value: i32,
        cause: Cause,
    ) -> Result<bool, Contradiction> {
        let result = self.variables[variable]
            .domain
            .instantiate_to(environment, value);
        self.record(variable, result, cause)
    }

    /// Turns the outcome of a domain operation into a pending event or a contradiction, and
    /// returns whether the domain changed.
    fn record(
        &mut self,
        variable: VarId,
        result: Result<EnumSet<IntEvent>, EmptyDomain>,
        cause: Cause,
    ) -> Result<bool, Contradiction> {
        let events = result.map_err(|empty| {
            log::debug!("The domain of {variable} became empty (cause {cause:?})");
            empty.into_contradiction(variable, cause)
        })?;
        if events.is_empty() {
            return Ok(false);
        }

        let data = &mut self.variables[variable];
        if data.pending_events.is_empty() {
            data.pending_cause = cause;
            self.event_queue.push_back(variable);
        } else {
            data.pending_cause = data.pending_cause.merge(cause);
        }
        data.pending_events |= events;

        Ok(true)
    }

    pub(crate) fn subscribe(&mut self, variable: VarId, subscriber: Subscriber) {
        self.variables[variable].subscribers.push(subscriber);
    }

    pub(crate) fn unsubscribe(&mut self, variable: VarId, propagator: PropagatorId) {
        self.variables[variable]
            .subscribers
            .retain(|subscriber| subscriber.propagator != propagator);
    }

    pub(crate) fn subscribers(&self, variable: VarId) -> &[Subscriber] {
        &self.variables[variable].subscribers
    }

    /// Takes the next variable with pending events, clearing its pending state.
    pub(crate) fn pop_event(&mut self) -> Option<VariableEvent> {
        let variable = self.event_queue.pop_front()?;
        let data = &mut self.variables[variable];

        let event = VariableEvent {
            variable,
            events: data.pending_events,
            cause: data.pending_cause,
        };
        data.pending_events = EnumSet::empty();
        data.pending_cause = Cause::Null;

        Some(event)
    }

    pub(crate) fn has_pending_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    /// Drops all pending events.
    pub(crate) fn clear_events(&mut self) {
        while self.pop_event().is_some() {}
    }
}
