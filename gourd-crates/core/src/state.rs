use enumset::EnumSet;

use crate::basic_types::Contradiction;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::engine::EngineOptions;
use crate::engine::PropagationEngine;
use crate::environment::Environment;
use crate::environment::EnvironmentOptions;
use crate::gourd_asserts::gourd_assert_eq_simple;
use crate::gourd_asserts::print_gourd_assert_warning_message;
use crate::propagation::store::PropagatorEntry;
use crate::propagation::store::PropagatorState;
use crate::propagation::store::PropagatorStore;
use crate::propagation::Domains;
use crate::propagation::LocalId;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::propagation::ReadDomains;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::StatisticLogger;
use crate::variables::Cause;
use crate::variables::Subscriber;
use crate::variables::VarId;
use crate::variables::Variables;

/// Options for creating a [`State`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StateOptions {
    pub environment: EnvironmentOptions,
    pub engine: EngineOptions,
}

/// The solver kernel: the backtrackable environment, the variables, the propagators and the
/// engine which propagates them.
///
/// Search drives the state as follows:
/// - [`State::world_push`] before trying a branch, followed by a decision such as
///   [`State::instantiate_to`];
/// - [`State::propagate`] after every decision and before reading any domain;
/// - on a [`Contradiction`], or when the branch is exhausted, [`State::world_pop`], which also
///   drops whatever the engine still had scheduled.
///
/// A contradiction from the first propagation at the root world means that the model has no
/// solution at all.
#[derive(Debug)]
pub struct State {
    environment: Environment,
    variables: Variables,
    propagators: PropagatorStore,
    engine: PropagationEngine,
}

impl Default for State {
    fn default() -> Self {
        State::new(StateOptions::default())
    }
}

impl ReadDomains for State {
    fn domains(&self) -> Domains<'_> {
        Domains::new(&self.environment, &self.variables)
    }
}

impl State {
    pub fn new(options: StateOptions) -> Self {
        print_gourd_assert_warning_message!();
        State {
            environment: Environment::new(options.environment),
            variables: Variables::default(),
            propagators: PropagatorStore::default(),
            engine: PropagationEngine::new(options.engine),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The environment, for creating and modifying backtrackable values outside of propagators.
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn new_interval_variable(&mut self, lb: i32, ub: i32, name: Option<&str>) -> VarId {
        self.variables.new_interval_variable(
            &mut self.environment,
            lb,
            ub,
            name.map(str::to_owned),
        )
    }

    pub fn new_enumerated_variable(&mut self, values: &[i32], name: Option<&str>) -> VarId {
        self.variables.new_enumerated_variable(
            &mut self.environment,
            values,
            name.map(str::to_owned),
        )
    }

    /// All values currently in the domain of `variable`, in increasing order.
    pub fn values(&self, variable: VarId) -> impl Iterator<Item = i32> + '_ {
        self.variables.values(&self.environment, variable)
    }
}

/// Operations for adding and removing propagators.
impl State {
    /// Adds a propagator.
    ///
    /// Before the first propagation at the root world the propagator is static: it is activated
    /// together with all other static propagators by the first call to [`State::propagate`].
    /// Afterwards this is a permanent [`State::dynamic_addition`].
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> PropagatorHandle<Constructor::PropagatorImpl>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        if self.engine.is_initialised() || self.environment.world_index() > 0 {
            return self.dynamic_addition(true, constructor);
        }

        let propagator = self.create_propagator(constructor);
        self.engine.add_static(propagator);
        PropagatorHandle::new(propagator)
    }

    /// Adds a propagator at run time, for instance a learned constraint.
    ///
    /// A permanent propagator survives backtracking and is activated again whenever search comes
    /// back to the world of its last activation or below it. A non-permanent propagator is
    /// activated once and deleted when the current world is popped.
    pub fn dynamic_addition<Constructor>(
        &mut self,
        permanent: bool,
        constructor: Constructor,
    ) -> PropagatorHandle<Constructor::PropagatorImpl>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        let propagator = self.create_propagator(constructor);
        self.engine
            .add_dynamic(propagator, permanent, self.environment.world_index());
        PropagatorHandle::new(propagator)
    }

    fn create_propagator<Constructor>(&mut self, constructor: Constructor) -> PropagatorId
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        let propagator_id = self.propagators.next_id();

        let mut scope = vec![];
        let context = PropagatorConstructorContext::new(
            &mut self.environment,
            &self.variables,
            propagator_id,
            &mut scope,
        );
        let propagator = constructor.create(context);

        for (index, &variable) in scope.iter().enumerate() {
            let local_id = LocalId::from(index as u32);
            let mask = propagator.propagation_conditions(local_id);
            if mask != EnumSet::empty() {
                self.variables.subscribe(
                    variable,
                    Subscriber {
                        propagator: propagator_id,
                        mask,
                        local_id,
                    },
                );
            }
        }

        let entry = PropagatorEntry {
            priority: propagator.priority(),
            reacts_to_fine_events: propagator.reacts_to_fine_events(),
            state: self.environment.make_int(PropagatorState::New as i32),
            propagator: Box::new(propagator),
            scope,
        };
        let id = self.propagators.push(entry);
        gourd_assert_eq_simple!(propagator_id, id);

        log::trace!("Created {id}");
        id
    }

    /// Removes the propagators from the engine and unsubscribes them from their variables.
    ///
    /// The ids of the remaining propagators do not change; deleted ids are never reused.
    pub fn dynamic_deletion(&mut self, propagators: &[PropagatorId]) {
        for &propagator in propagators {
            if !self.propagators.contains(propagator) {
                continue;
            }

            self.engine.remove(propagator, &self.propagators);
            if let Some(entry) = self.propagators.remove(propagator) {
                for &variable in &entry.scope {
                    self.variables.unsubscribe(variable, propagator);
                }
            }
        }
    }

    /// Makes the propagator run with a full propagation every time propagation resumes after a
    /// backtrack, independent of variable events.
    pub fn propagate_on_backtrack(&mut self, propagator: PropagatorId) {
        if self.propagators.contains(propagator) {
            self.engine.propagate_on_backtrack(propagator);
        }
    }

    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }

    pub fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self.propagators.get_propagator_mut(handle)
    }

    /// The number of propagators which have not been deleted.
    pub fn num_propagators(&self) -> usize {
        self.propagators.num_propagators()
    }

    /// Whether the propagator is currently scheduled on events; this is false before its
    /// activation and while it is passive.
    pub fn is_active(&self, propagator: PropagatorId) -> bool {
        self.propagators.is_active(propagator, &self.environment)
    }

    /// The propagator which ran last, for instance the one which raised a contradiction.
    pub fn last_propagator(&self) -> Option<PropagatorId> {
        self.engine.last_propagator()
    }
}

/// Operations for propagating and searching.
impl State {
    /// Propagates until no propagator has unprocessed events.
    ///
    /// After a contradiction the state must be brought back to a consistent world with
    /// [`State::world_pop`] (or explicitly [`State::flush`]ed) before propagating again.
    pub fn propagate(&mut self) -> PropagationStatus {
        self.engine.propagate(
            &mut self.environment,
            &mut self.variables,
            &mut self.propagators,
        )
    }

    /// Drops every scheduled propagator and pending event without running anything.
    pub fn flush(&mut self) {
        self.engine.flush(&mut self.variables);
    }

    pub fn world_index(&self) -> usize {
        self.environment.world_index()
    }

    pub fn timestamp(&self) -> u64 {
        self.environment.timestamp()
    }

    pub fn world_push(&mut self) {
        self.environment.world_push();
    }

    /// Restores the state from before the last [`State::world_push`], flushes the engine and
    /// deletes the non-permanent propagators which were added in the popped world.
    ///
    /// # Panics
    /// When called at the root world.
    pub fn world_pop(&mut self) {
        self.environment.world_pop();
        self.engine.flush(&mut self.variables);

        let temporaries = self
            .engine
            .temporaries_above(self.environment.world_index());
        self.dynamic_deletion(&temporaries);
    }

    pub fn world_pop_until(&mut self, world: usize) {
        while self.world_index() > world {
            self.world_pop();
        }
    }

    /// Merges the current world into the one below it, see [`Environment::world_commit`].
    pub fn world_commit(&mut self) {
        self.environment.world_commit();
        self.engine
            .commit_temporaries(self.environment.world_index());
    }

    /// Removes every value below `value` from the domain of `variable`, as a search decision.
    pub fn update_lower_bound(&mut self, variable: VarId, value: i32) -> Result<bool, Contradiction> {
        self.variables
            .update_lower_bound(&mut self.environment, variable, value, Cause::Null)
    }

    /// Removes every value above `value` from the domain of `variable`, as a search decision.
    pub fn update_upper_bound(&mut self, variable: VarId, value: i32) -> Result<bool, Contradiction> {
        self.variables
            .update_upper_bound(&mut self.environment, variable, value, Cause::Null)
    }

    /// Removes `value` from the domain of `variable`, as a search decision.
    pub fn remove_value(&mut self, variable: VarId, value: i32) -> Result<bool, Contradiction> {
        self.variables
            .remove_value(&mut self.environment, variable, value, Cause::Null)
    }

    /// Assigns `value` to `variable`, as a search decision.
    pub fn instantiate_to(&mut self, variable: VarId, value: i32) -> Result<bool, Contradiction> {
        self.variables
            .instantiate_to(&mut self.environment, variable, value, Cause::Null)
    }

    /// Whether every constraint holds in the current world.
    ///
    /// Passive propagators count as satisfied; any [`Entailment::False`] makes the result false,
    /// and the result is only true when every propagator reports [`Entailment::True`].
    pub fn is_satisfied(&self) -> Entailment {
        let domains = self.domains();
        self.propagators
            .iter()
            .map(|(_, entry)| {
                match PropagatorState::read(entry.state, &self.environment) {
                    PropagatorState::Passive => Entailment::True,
                    PropagatorState::New | PropagatorState::Active => {
                        entry.propagator.is_entailed(domains)
                    }
                }
            })
            .fold(Entailment::True, Entailment::and)
    }

    /// Writes the statistics of the environment, the engine and every propagator, if statistic
    /// logging is configured.
    pub fn log_statistics(&self) {
        if !should_log_statistics() {
            return;
        }

        self.environment
            .log_statistics(StatisticLogger::new(["environment"]));
        self.engine.log_statistics(StatisticLogger::new(["engine"]));
        for &propagator in self.engine.propagators() {
            if let Some(entry) = self.propagators.get(propagator) {
                entry.propagator.log_statistics(StatisticLogger::new([
                    entry.propagator.name().to_owned(),
                    propagator.to_string(),
                ]));
            }
        }
        log_statistic_postfix();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::Priority;
    use crate::propagation::PropagatorEventType;
    use crate::test_propagators::take_calls;
    use crate::test_propagators::Call;
    use crate::test_propagators::CallLog;
    use crate::test_propagators::LessThan;
    use crate::test_propagators::NotEqual;
    use crate::test_propagators::Recorder;
    use crate::variables::IntEvent;

    fn full(name: &'static str) -> Call {
        Call::Propagate {
            name,
            event_type: PropagatorEventType::Full,
        }
    }

    #[test]
    fn static_propagators_are_activated_by_the_first_propagation() {
        let mut state = State::default();
        let log = CallLog::default();
        let x = state.new_interval_variable(0, 10, None);
        let _ = state.add_propagator(Recorder::new("a", &[x], &log));
        let _ = state.add_propagator(Recorder::new("b", &[x], &log));
        assert!(take_calls(&log).is_empty());

        state.propagate().expect("no contradiction");
        assert_eq!(vec![full("a"), full("b")], take_calls(&log));
        assert!(state.is_active(PropagatorId(0)));

        state.propagate().expect("no contradiction");
        assert!(take_calls(&log).is_empty());
    }

    #[test]
    fn activation_order_follows_priority_unless_disabled() {
        for (sort, expected) in [
            (true, vec![full("unary"), full("slow")]),
            (false, vec![full("slow"), full("unary")]),
        ] {
            let mut state = State::new(StateOptions {
                engine: EngineOptions {
                    sort_activation_by_priority: sort,
                },
                ..Default::default()
            });
            let log = CallLog::default();
            let x = state.new_interval_variable(0, 10, None);
            let _ = state.add_propagator(Recorder::new("slow", &[x], &log));
            let _ = state.add_propagator(
                Recorder::new("unary", &[x], &log).with_priority(Priority::Unary),
            );

            state.propagate().expect("no contradiction");
            assert_eq!(expected, take_calls(&log));
        }
    }

    #[test]
    fn events_on_a_variable_are_merged_into_one_fine_call() {
        let mut state = State::default();
        let log = CallLog::default();
        let x = state.new_interval_variable(0, 10, None);
        let y = state.new_interval_variable(0, 10, None);
        let _ = state.add_propagator(Recorder::new("fine", &[x, y], &log).fine());
        state.propagate().expect("no contradiction");
        let _ = take_calls(&log);

        state.world_push();
        assert_eq!(Ok(true), state.update_lower_bound(x, 2));
        assert_eq!(Ok(true), state.update_upper_bound(x, 8));
        state.propagate().expect("no contradiction");

        assert_eq!(
            vec![Call::Fine {
                name: "fine",
                local_id: LocalId::from(0),
                events: IntEvent::Remove | IntEvent::IncLow | IntEvent::DecUpp,
            }],
            take_calls(&log)
        );
    }

    #[test]
    fn bound_subscribers_ignore_inner_removals() {
        let mut state = State::default();
        let log = CallLog::default();
        let x = state.new_enumerated_variable(&[1, 2, 3, 4, 5], None);
        let _ = state.add_propagator(
            Recorder::new("bounds", &[x], &log).with_conditions(IntEvent::BOUND),
        );
        state.propagate().expect("no contradiction");
        let _ = take_calls(&log);

        state.world_push();
        assert_eq!(Ok(true), state.remove_value(x, 3));
        state.propagate().expect("no contradiction");
        assert!(take_calls(&log).is_empty());

        assert_eq!(Ok(true), state.update_upper_bound(x, 4));
        state.propagate().expect("no contradiction");
        assert_eq!(vec![full("bounds")], take_calls(&log));
    }

    #[test]
    fn propagator_is_not_scheduled_by_its_own_changes() {
        let mut state = State::default();
        let log = CallLog::default();
        let x = state.new_interval_variable(0, 10, None);
        let _ = state.add_propagator(Recorder::new("raiser", &[x], &log).raising(x, 3));
        let _ = state.add_propagator(Recorder::new("watcher", &[x], &log));

        state.propagate().expect("no contradiction");
        // The watcher is not active yet when x changes, so the change does not schedule it.
        assert_eq!(vec![full("raiser"), full("watcher")], take_calls(&log));
        assert_eq!(3, state.lower_bound(x));
    }

    #[test]
    fn cheaper_propagators_run_first() {
        let mut state = State::default();
        let log = CallLog::default();
        let x = state.new_interval_variable(0, 10, None);
        let _ = state.add_propagator(
            Recorder::new("linear", &[x], &log).with_priority(Priority::Linear),
        );
        let _ = state.add_propagator(
            Recorder::new("unary", &[x], &log).with_priority(Priority::Unary),
        );
        state.propagate().expect("no contradiction");
        let _ = take_calls(&log);

        state.world_push();
        let _ = state.update_lower_bound(x, 1).expect("in domain");
        state.propagate().expect("no contradiction");
        assert_eq!(vec![full("unary"), full("linear")], take_calls(&log));
    }

    #[test]
    fn priority_decides_the_order_whatever_the_subscription_order() {
        let mut state = State::default();
        let log = CallLog::default();
        let v = state.new_enumerated_variable(&[1, 2, 3], None);
        let _ = state.add_propagator(
            Recorder::new("instantiate_cubic", &[v], &log)
                .with_priority(Priority::Cubic)
                .with_conditions(IntEvent::INSTANTIATE),
        );
        let _ = state.add_propagator(
            Recorder::new("bound_unary", &[v], &log)
                .with_priority(Priority::Unary)
                .with_conditions(IntEvent::BOUND),
        );
        state.propagate().expect("no contradiction");
        let _ = take_calls(&log);

        state.world_push();
        let _ = state.instantiate_to(v, 2).expect("in domain");
        state.propagate().expect("no contradiction");
        assert_eq!(
            vec![full("bound_unary"), full("instantiate_cubic")],
            take_calls(&log)
        );
    }

    #[test]
    fn static_propagators_activated_in_a_popped_world_are_activated_once_more() {
        let mut state = State::default();
        let log = CallLog::default();
        let x = state.new_interval_variable(0, 10, None);
        let late = state
            .add_propagator(Recorder::new("late", &[x], &log))
            .propagator_id();

        state.world_push();
        state.propagate().expect("no contradiction");
        assert_eq!(vec![full("late")], take_calls(&log));

        state.world_pop();
        assert!(!state.is_active(late));
        state.propagate().expect("no contradiction");
        assert_eq!(vec![full("late")], take_calls(&log));

        for _ in 0..3 {
            state.world_push();
            state.world_pop();
            state.propagate().expect("no contradiction");
        }
        assert!(take_calls(&log).is_empty());
        assert!(state.is_active(late));
    }

    #[test]
    fn contradiction_is_recovered_from_by_popping() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 4, Some("x"));
        let y = state.new_interval_variable(0, 4, Some("y"));
        let less_than = state.add_propagator(LessThan { x, y });
        state.propagate().expect("no contradiction");
        assert_eq!((0, 3), (state.lower_bound(x), state.upper_bound(x)));
        assert_eq!((1, 4), (state.lower_bound(y), state.upper_bound(y)));

        state.world_push();
        let _ = state.instantiate_to(x, 3).expect("in domain");
        let _ = state.update_upper_bound(y, 3).expect("in domain");
        let contradiction = state.propagate().expect_err("3 < 3 cannot hold");

        assert_eq!(Some(less_than.propagator_id()), contradiction.propagator());
        assert_eq!(Some(less_than.propagator_id()), state.last_propagator());

        state.world_pop();
        assert_eq!((0, 3), (state.lower_bound(x), state.upper_bound(x)));
        assert_eq!((1, 4), (state.lower_bound(y), state.upper_bound(y)));
        state.propagate().expect("the root is consistent");
    }

    #[test]
    fn contradiction_at_the_root_is_reported() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 1, None);
        let y = state.new_interval_variable(0, 1, None);
        let _ = state.add_propagator(LessThan { x, y });
        let _ = state.add_propagator(LessThan { x: y, y: x });

        assert!(state.propagate().is_err());
    }

    #[test]
    fn delayed_propagation_runs_once_after_the_fine_calls() {
        for delay in [PropagatorEventType::Custom, PropagatorEventType::Full] {
            let mut state = State::default();
            let log = CallLog::default();
            let x = state.new_interval_variable(0, 10, None);
            let y = state.new_interval_variable(0, 10, None);
            let _ = state.add_propagator(
                Recorder::new("delayed", &[x, y], &log)
                    .fine()
                    .delaying(delay),
            );
            state.propagate().expect("no contradiction");
            let _ = take_calls(&log);

            state.world_push();
            let _ = state.update_lower_bound(x, 1).expect("in domain");
            let _ = state.update_lower_bound(y, 1).expect("in domain");
            state.propagate().expect("no contradiction");

            assert_eq!(
                vec![
                    Call::Fine {
                        name: "delayed",
                        local_id: LocalId::from(0),
                        events: IntEvent::Remove | IntEvent::IncLow,
                    },
                    Call::Fine {
                        name: "delayed",
                        local_id: LocalId::from(1),
                        events: IntEvent::Remove | IntEvent::IncLow,
                    },
                    Call::Propagate {
                        name: "delayed",
                        event_type: delay,
                    },
                ],
                take_calls(&log)
            );
        }
    }

    #[test]
    fn passive_propagators_become_active_again_on_backtrack() {
        let mut state = State::default();
        let x = state.new_enumerated_variable(&[0, 1, 2], None);
        let y = state.new_enumerated_variable(&[0, 1, 2], None);
        let not_equal = state.add_propagator(NotEqual { x, y }).propagator_id();
        state.propagate().expect("no contradiction");
        assert!(state.is_active(not_equal));

        state.world_push();
        let _ = state.instantiate_to(x, 1).expect("in domain");
        state.propagate().expect("no contradiction");
        assert!(!state.contains(y, 1));
        assert!(!state.is_active(not_equal));

        state.world_pop();
        assert!(state.is_active(not_equal));
        assert!(state.contains(y, 1));
    }

    #[test]
    fn permanent_dynamic_propagators_are_activated_again_below_their_world() {
        let mut state = State::default();
        let log = CallLog::default();
        let x = state.new_interval_variable(0, 10, None);
        state.propagate().expect("no contradiction");

        state.world_push();
        let _ = state.dynamic_addition(true, Recorder::new("learned", &[x], &log));
        state.propagate().expect("no contradiction");
        assert_eq!(vec![full("learned")], take_calls(&log));
        state.propagate().expect("no contradiction");
        assert!(take_calls(&log).is_empty());

        state.world_pop();
        assert_eq!(1, state.num_propagators());
        state.propagate().expect("no contradiction");
        assert_eq!(vec![full("learned")], take_calls(&log));
        state.propagate().expect("no contradiction");
        assert!(take_calls(&log).is_empty());
    }

    #[test]
    fn temporary_propagators_are_deleted_with_their_world() {
        let mut state = State::default();
        let log = CallLog::default();
        let x = state.new_interval_variable(0, 10, None);
        state.propagate().expect("no contradiction");

        state.world_push();
        let cut = state.dynamic_addition(false, Recorder::new("cut", &[x], &log));
        state.propagate().expect("no contradiction");
        assert_eq!(vec![full("cut")], take_calls(&log));

        state.world_pop();
        assert_eq!(0, state.num_propagators());
        assert!(state.get_propagator(cut).is_none());
        state.propagate().expect("no contradiction");
        assert!(take_calls(&log).is_empty());
    }

    #[test]
    fn committed_temporaries_are_deleted_with_the_world_below() {
        let mut state = State::default();
        let log = CallLog::default();
        let x = state.new_interval_variable(0, 10, None);
        state.propagate().expect("no contradiction");

        state.world_push();
        state.world_push();
        let _ = state.dynamic_addition(false, Recorder::new("cut", &[x], &log));
        state.propagate().expect("no contradiction");

        state.world_commit();
        assert_eq!(1, state.world_index());
        assert_eq!(1, state.num_propagators());

        state.world_pop();
        assert_eq!(0, state.num_propagators());
    }

    #[test]
    fn propagate_on_backtrack_runs_after_every_backtrack() {
        let mut state = State::default();
        let log = CallLog::default();
        let x = state.new_interval_variable(0, 10, None);
        let restart = state
            .add_propagator(Recorder::new("restart", &[x], &log))
            .propagator_id();
        state.propagate().expect("no contradiction");
        assert_eq!(vec![full("restart")], take_calls(&log));

        state.propagate_on_backtrack(restart);
        state.propagate().expect("no contradiction");
        assert_eq!(vec![full("restart")], take_calls(&log));

        state.world_push();
        state.propagate().expect("no contradiction");
        assert!(take_calls(&log).is_empty());

        state.world_pop();
        state.propagate().expect("no contradiction");
        assert_eq!(vec![full("restart")], take_calls(&log));
    }

    #[test]
    fn flagging_a_static_propagator_before_the_first_propagation_moves_it_last() {
        let mut state = State::default();
        let log = CallLog::default();
        let x = state.new_interval_variable(0, 10, None);
        let first = state
            .add_propagator(Recorder::new("first", &[x], &log))
            .propagator_id();
        let second = state
            .add_propagator(Recorder::new("second", &[x], &log))
            .propagator_id();

        state.propagate_on_backtrack(first);
        state.propagate().expect("no contradiction");
        assert_eq!(vec![full("first"), full("second")], take_calls(&log));
        assert_eq!(&[second, first], state.engine.propagators());

        state.dynamic_deletion(&[first]);
        assert_eq!(&[second], state.engine.propagators());
    }

    #[test]
    fn deleted_propagators_are_no_longer_scheduled() {
        let mut state = State::default();
        let log = CallLog::default();
        let x = state.new_interval_variable(0, 10, None);
        let first = state.add_propagator(Recorder::new("first", &[x], &log));
        // Would fail the first propagation if it were not deleted before it.
        let second = state.add_propagator(LessThan { x, y: x });
        let third = state.add_propagator(Recorder::new("third", &[x], &log));
        state.dynamic_deletion(&[second.propagator_id()]);
        state.propagate().expect("no contradiction");
        let _ = take_calls(&log);

        state.dynamic_deletion(&[first.propagator_id()]);
        assert_eq!(1, state.num_propagators());
        assert!(state.get_propagator(first).is_none());
        assert!(state.get_propagator(third).is_some());

        state.world_push();
        let _ = state.update_lower_bound(x, 5).expect("in domain");
        state.propagate().expect("no contradiction");
        assert_eq!(vec![full("third")], take_calls(&log));
    }

    #[test]
    fn flush_drops_scheduled_propagators() {
        let mut state = State::default();
        let log = CallLog::default();
        let x = state.new_interval_variable(0, 10, None);
        let _ = state.add_propagator(Recorder::new("flushed", &[x], &log));
        state.propagate().expect("no contradiction");
        let _ = take_calls(&log);

        state.world_push();
        let _ = state.update_lower_bound(x, 5).expect("in domain");
        state.flush();
        state.propagate().expect("no contradiction");
        assert!(take_calls(&log).is_empty());
    }

    #[test]
    fn satisfaction_is_the_conjunction_of_entailments() {
        let mut state = State::default();
        let x = state.new_enumerated_variable(&[0, 1], None);
        let y = state.new_enumerated_variable(&[0, 1], None);
        let less_than = state.add_propagator(LessThan { x, y });
        let _ = state.add_propagator(NotEqual { x, y });
        assert_eq!(Entailment::Undefined, state.is_satisfied());

        state.world_push();
        let _ = state.instantiate_to(x, 0).expect("in domain");
        let _ = state.instantiate_to(y, 1).expect("in domain");
        assert_eq!(Entailment::True, state.is_satisfied());
        state.world_pop();

        state.world_push();
        let _ = state.instantiate_to(x, 1).expect("in domain");
        let _ = state.instantiate_to(y, 0).expect("in domain");
        assert_eq!(Entailment::False, state.is_satisfied());
        state.world_pop();

        assert_eq!(
            Some(y),
            state.get_propagator(less_than).map(|propagator| propagator.y)
        );
    }
}
