use std::collections::VecDeque;

use super::DynamicPropagators;
use super::EngineOptions;
use super::FineEvents;
use super::PropagatorQueue;
use crate::basic_types::Contradiction;
use crate::basic_types::PropagationStatus;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::create_statistics_struct;
use crate::environment::Environment;
use crate::gourd_asserts::gourd_assert_advanced;
use crate::gourd_asserts::gourd_assert_moderate;
use crate::propagation::store::PropagatorState;
use crate::propagation::store::PropagatorStore;
use crate::propagation::PropagationContext;
use crate::propagation::PropagatorEventType;
use crate::propagation::PropagatorId;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::variables::Cause;
use crate::variables::Variables;

create_statistics_struct!(
    /// Counters about the work done by the [`PropagationEngine`].
    EngineStatistics {
        /// The number of times a propagator was run by the activation phase.
        num_activations: u64,
        num_full_propagations: u64,
        num_fine_propagations: u64,
        num_delayed_propagations: u64,
        num_contradictions: u64,
        num_dynamic_additions: u64,
        num_dynamic_deletions: u64,
});

/// The scheduler which drives propagators to a fixpoint.
///
/// Domain changes are collected by [`Variables`] as pending events; the engine turns them into
/// scheduled propagators and runs the most urgent one until no event and no scheduled
/// propagator remains, or until a propagator reports a [`Contradiction`].
///
/// Besides the event-driven scheduling, the engine activates propagators: propagators added
/// before the first propagation and non-permanent dynamic ones are run once with a full
/// propagation, unless popping a world undoes their activation; permanent dynamic propagators
/// and those flagged by [`PropagationEngine::propagate_on_backtrack`] are run again whenever
/// search comes back to the world of their last activation or below it.
#[derive(Debug, Default)]
pub(crate) struct PropagationEngine {
    options: EngineOptions,
    queue: PropagatorQueue,
    fine_events: KeyedVec<PropagatorId, FineEvents>,
    /// Propagators waiting for their activation.
    awake: VecDeque<PropagatorId>,
    dynamic: DynamicPropagators,
    /// Every propagator known to the engine, in activation order.
    propagators: Vec<PropagatorId>,
    positions: HashMap<PropagatorId, usize>,
    /// Non-permanent dynamic propagators with the world they were added in.
    temporaries: Vec<(usize, PropagatorId)>,
    /// Static propagators activated above world 0, whose activation is undone by popping that
    /// world.
    undoable_activations: Vec<PropagatorId>,
    initialised: bool,
    last_propagator: Option<PropagatorId>,
    /// A propagation requested through [`PropagationContext::force_propagate`].
    delayed: Option<PropagatorEventType>,
    statistics: EngineStatistics,
}

impl PropagationEngine {
    pub(crate) fn new(options: EngineOptions) -> Self {
        PropagationEngine {
            options,
            ..Default::default()
        }
    }

    pub(crate) fn is_initialised(&self) -> bool {
        self.initialised
    }

    /// The propagator which was run last, unless it has been deleted since.
    pub(crate) fn last_propagator(&self) -> Option<PropagatorId> {
        self.last_propagator
    }

    /// The propagators in activation order.
    pub(crate) fn propagators(&self) -> &[PropagatorId] {
        &self.propagators
    }

    fn push_propagator(&mut self, propagator: PropagatorId) {
        let _ = self.positions.insert(propagator, self.propagators.len());
        self.propagators.push(propagator);
    }

    /// Removes the propagator from the ordered list, moving every later propagator one position
    /// down.
    fn shift_out(&mut self, propagator: PropagatorId) {
        let Some(position) = self.positions.remove(&propagator) else {
            return;
        };

        let _ = self.propagators.remove(position);
        for (index, &later) in self.propagators.iter().enumerate().skip(position) {
            let _ = self.positions.insert(later, index);
        }
    }

    /// Registers a propagator which is added before the first propagation. It is activated by
    /// the first call to [`PropagationEngine::propagate`].
    pub(crate) fn add_static(&mut self, propagator: PropagatorId) {
        gourd_assert_moderate!(!self.initialised);
        self.awake.push_back(propagator);
    }

    /// Registers a propagator which is added at run time.
    ///
    /// A permanent propagator is activated by the next propagation and again whenever search
    /// backtracks to or below the world of its last activation. A non-permanent one is
    /// activated once and deleted when `world` is popped.
    pub(crate) fn add_dynamic(&mut self, propagator: PropagatorId, permanent: bool, world: usize) {
        self.statistics.num_dynamic_additions += 1;
        self.push_propagator(propagator);

        if permanent {
            self.dynamic.add_or_update(propagator);
        } else {
            self.temporaries.push((world, propagator));
            self.awake.push_back(propagator);
        }
        log::debug!("Added {propagator} dynamically (permanent: {permanent})");
    }

    /// Makes the propagator run again after every backtrack, and moves it to the end of the
    /// ordered list of propagators.
    pub(crate) fn propagate_on_backtrack(&mut self, propagator: PropagatorId) {
        self.shift_out(propagator);
        self.push_propagator(propagator);
        self.dynamic.add_or_update(propagator);
    }

    /// Forgets everything about the propagator.
    pub(crate) fn remove(&mut self, propagator: PropagatorId, store: &PropagatorStore) {
        self.statistics.num_dynamic_deletions += 1;

        if let Some(entry) = store.get(propagator) {
            self.queue.remove(propagator, entry.priority);
        }
        if let Some(fine_events) = self.fine_events.get_mut(propagator) {
            fine_events.clear();
        }
        self.awake.retain(|&awake| awake != propagator);
        self.dynamic.remove(propagator);
        self.temporaries.retain(|&(_, temporary)| temporary != propagator);
        self.undoable_activations.retain(|&undoable| undoable != propagator);
        self.shift_out(propagator);

        if self.last_propagator == Some(propagator) {
            self.last_propagator = None;
        }
        log::debug!("Deleted {propagator}");
    }

    /// The non-permanent dynamic propagators which were added in a world above `world`.
    pub(crate) fn temporaries_above(&self, world: usize) -> Vec<PropagatorId> {
        self.temporaries
            .iter()
            .filter(|&&(added_in, _)| added_in > world)
            .map(|&(_, propagator)| propagator)
            .collect()
    }

    /// After a commit into `world`, the temporaries of the committed world belong to `world`.
    pub(crate) fn commit_temporaries(&mut self, world: usize) {
        for (added_in, _) in self.temporaries.iter_mut() {
            if *added_in > world {
                *added_in = world;
            }
        }
    }

    /// Drops all scheduled propagators and pending events without running anything.
    ///
    /// Propagators waiting for activation are kept.
    pub(crate) fn flush(&mut self, variables: &mut Variables) {
        self.queue.clear();
        variables.clear_events();
        for fine_events in self.fine_events.iter_mut() {
            fine_events.clear();
        }
        self.delayed = None;
    }

    /// Runs the activation phase and then propagates until no events are left.
    ///
    /// On a contradiction the engine stops immediately, leaving its queues as they are; the
    /// caller has to [`flush`](PropagationEngine::flush) before propagating again.
    pub(crate) fn propagate(
        &mut self,
        environment: &mut Environment,
        variables: &mut Variables,
        store: &mut PropagatorStore,
    ) -> PropagationStatus {
        self.activate_propagators(environment, variables, store)?;

        self.schedule_modifications(environment, variables, store);
        while let Some(propagator) = self.queue.pop() {
            self.last_propagator = Some(propagator);
            self.run(propagator, environment, variables, store)?;
            self.schedule_modifications(environment, variables, store);
        }

        gourd_assert_moderate!(!variables.has_pending_events() && self.queue.is_empty());
        gourd_assert_advanced!(self.fine_events.iter().all(FineEvents::is_empty));
        Ok(())
    }

    fn initialise(&mut self, store: &PropagatorStore) {
        self.initialised = true;

        if self.options.sort_activation_by_priority {
            self.awake.make_contiguous().sort_by_key(|&propagator| {
                store
                    .get(propagator)
                    .map(|entry| (entry.priority, entry.scope.len()))
            });
        }

        // Propagators flagged by `propagate_on_backtrack` before this point stay behind the
        // others.
        let flagged = std::mem::take(&mut self.propagators);
        self.positions.clear();
        let statics = self
            .awake
            .iter()
            .copied()
            .filter(|propagator| !flagged.contains(propagator))
            .collect::<Vec<_>>();
        for propagator in statics.into_iter().chain(flagged) {
            self.push_propagator(propagator);
        }
    }

    fn activate_propagators(
        &mut self,
        environment: &mut Environment,
        variables: &mut Variables,
        store: &mut PropagatorStore,
    ) -> PropagationStatus {
        if !self.initialised {
            self.initialise(store);
        }

        let world = environment.world_index();
        let timestamp = environment.timestamp();
        let awake = &mut self.awake;
        self.dynamic.descending(world, timestamp, |propagator| {
            if !awake.contains(&propagator) {
                awake.push_back(propagator);
            }
        });
        self.undoable_activations.retain(|&propagator| {
            let Some(entry) = store.get(propagator) else {
                return false;
            };
            if PropagatorState::read(entry.state, environment) == PropagatorState::New
                && !awake.contains(&propagator)
            {
                awake.push_back(propagator);
            }
            // An activation at world 0 is never undone.
            world > 0
        });

        while let Some(propagator) = self.awake.pop_front() {
            self.activate(propagator, environment, variables, store)?;
            self.schedule_modifications(environment, variables, store);
        }

        Ok(())
    }

    /// Makes a new propagator active and runs a full propagation of it.
    fn activate(
        &mut self,
        propagator: PropagatorId,
        environment: &mut Environment,
        variables: &mut Variables,
        store: &mut PropagatorStore,
    ) -> PropagationStatus {
        let Some(entry) = store.get_mut(propagator) else {
            return Ok(());
        };

        let world = environment.world_index();
        if PropagatorState::read(entry.state, environment) == PropagatorState::New {
            PropagatorState::Active.write(entry.state, environment);

            // The activation is undone when this world is popped, after which the propagator
            // has to be activated again.
            let temporary = self
                .temporaries
                .iter()
                .any(|&(_, temporary)| temporary == propagator);
            if world > 0
                && !temporary
                && !self.dynamic.contains(propagator)
                && !self.undoable_activations.contains(&propagator)
            {
                self.undoable_activations.push(propagator);
            }
        }

        if PropagatorState::read(entry.state, environment) != PropagatorState::Active {
            return Ok(());
        }

        log::trace!("Activating {propagator} ({})", entry.propagator.name());
        self.statistics.num_activations += 1;
        self.statistics.num_full_propagations += 1;
        self.last_propagator = Some(propagator);

        let context = PropagationContext::new(
            environment,
            variables,
            propagator,
            entry.state,
            &mut self.delayed,
        );
        let result = entry
            .propagator
            .propagate(context, PropagatorEventType::Full);
        self.delayed = None;

        result.map_err(|contradiction| self.contradiction(contradiction))
    }

    /// Turns the pending variable events into scheduled propagators.
    fn schedule_modifications(
        &mut self,
        environment: &Environment,
        variables: &mut Variables,
        store: &PropagatorStore,
    ) {
        while let Some(event) = variables.pop_event() {
            for subscriber in variables.subscribers(event.variable) {
                let events = event.events & subscriber.mask;
                if events.is_empty() || event.cause == Cause::Propagator(subscriber.propagator) {
                    continue;
                }

                let Some(entry) = store.get(subscriber.propagator) else {
                    continue;
                };
                if PropagatorState::read(entry.state, environment) != PropagatorState::Active {
                    continue;
                }

                if entry.reacts_to_fine_events {
                    self.fine_events
                        .accomodate(subscriber.propagator, FineEvents::default());
                    self.fine_events[subscriber.propagator].add(subscriber.local_id, events);
                }

                if self
                    .queue
                    .enqueue_propagator(subscriber.propagator, entry.priority)
                {
                    log::trace!(
                        "Scheduled {} on {} of {}",
                        subscriber.propagator,
                        events.iter().map(|event| event.to_string()).collect::<String>(),
                        event.variable
                    );
                }
            }
        }
    }

    /// Runs a scheduled propagator.
    fn run(
        &mut self,
        propagator: PropagatorId,
        environment: &mut Environment,
        variables: &mut Variables,
        store: &mut PropagatorStore,
    ) -> PropagationStatus {
        let Some(entry) = store.get_mut(propagator) else {
            return Ok(());
        };
        let state = entry.state;
        let is_active = |environment: &Environment| {
            PropagatorState::read(state, environment) == PropagatorState::Active
        };

        self.delayed = None;

        if entry.reacts_to_fine_events {
            while let Some((local_id, events)) = self
                .fine_events
                .get_mut(propagator)
                .and_then(FineEvents::pop)
            {
                if !is_active(environment) {
                    if let Some(fine_events) = self.fine_events.get_mut(propagator) {
                        fine_events.clear();
                    }
                    break;
                }

                self.statistics.num_fine_propagations += 1;
                let context = PropagationContext::new(
                    environment,
                    variables,
                    propagator,
                    entry.state,
                    &mut self.delayed,
                );
                if let Err(contradiction) =
                    entry.propagator.propagate_fine(context, local_id, events)
                {
                    self.delayed = None;
                    return Err(self.contradiction(contradiction));
                }
            }
        } else if is_active(environment) {
            self.statistics.num_full_propagations += 1;
            let context = PropagationContext::new(
                environment,
                variables,
                propagator,
                entry.state,
                &mut self.delayed,
            );
            if let Err(contradiction) = entry
                .propagator
                .propagate(context, PropagatorEventType::Full)
            {
                self.delayed = None;
                return Err(self.contradiction(contradiction));
            }
        }

        if let Some(event_type) = self.delayed.take() {
            if is_active(environment) {
                self.statistics.num_delayed_propagations += 1;
                let context = PropagationContext::new(
                    environment,
                    variables,
                    propagator,
                    entry.state,
                    &mut self.delayed,
                );
                let result = entry.propagator.propagate(context, event_type);
                self.delayed = None;
                result.map_err(|contradiction| self.contradiction(contradiction))?;
            }
        }

        Ok(())
    }

    fn contradiction(&mut self, contradiction: Contradiction) -> Contradiction {
        self.statistics.num_contradictions += 1;
        log::debug!("Contradiction: {contradiction}");
        contradiction
    }

    pub(crate) fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}
