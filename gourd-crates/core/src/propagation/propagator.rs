use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
use enumset::EnumSet;

use super::Domains;
use super::LocalId;
use super::PropagationContext;
use super::Priority;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
#[cfg(doc)]
use crate::create_statistics_struct;
#[cfg(doc)]
use crate::propagation::PropagatorConstructorContext;
use crate::statistics::StatisticLogger;
use crate::variables::IntEvent;

// Allows retrieving the concrete propagator behind a `Box<dyn Propagator>` through a
// `PropagatorHandle`.
impl_downcast!(Propagator);

/// A propagator removes values from the domains of the variables in its scope which cannot be
/// part of any solution, or detects that no solution exists in the current world.
///
/// The required functions are [`Propagator::name`] and [`Propagator::propagate`]; all other
/// functions have default implementations.
///
/// A propagator never owns the variables it reads; its scope is the list of variables it
/// registered through [`PropagatorConstructorContext::register`], and it refers to them by
/// [`VarId`](crate::variables::VarId).
pub trait Propagator: Downcast {
    /// The name of the propagator, used for logging.
    fn name(&self) -> &str;

    /// The cost class of the propagator. See [`Priority`].
    ///
    /// The priority is read once, when the propagator is added.
    fn priority(&self) -> Priority {
        Priority::VerySlow
    }

    /// The events on the variable at `local_id` which schedule this propagator.
    ///
    /// Returning the empty set means the propagator is not subscribed to that variable at all.
    /// The conditions are read once, when the propagator is added.
    fn propagation_conditions(&self, _local_id: LocalId) -> EnumSet<IntEvent> {
        IntEvent::ALL
    }

    /// Whether the engine should call [`Propagator::propagate_fine`] with every individual
    /// event, rather than a single call to [`Propagator::propagate`] per scheduling.
    fn reacts_to_fine_events(&self) -> bool {
        false
    }

    /// Filters the domains of the scope.
    ///
    /// With [`PropagatorEventType::Full`] the propagator must not rely on anything it learned from
    /// earlier calls. The engine uses this on activation and for propagators which do not react
    /// to fine events.
    ///
    /// Returns an error when the current world is inconsistent, either because a domain update
    /// through the context emptied a domain or because the propagator detected it itself (see
    /// [`PropagationContext::contradiction`]).
    fn propagate(
        &mut self,
        context: PropagationContext,
        event_type: PropagatorEventType,
    ) -> PropagationStatus;

    /// Handles the events which happened on the variable at `local_id` since the propagator was
    /// last scheduled.
    ///
    /// `events` only contains events the propagator subscribed to, but possibly several of them
    /// merged together; an implementation must be correct for any such combination.
    ///
    /// Only called when [`Propagator::reacts_to_fine_events`] is `true`. By default this performs
    /// a [`PropagatorEventType::Custom`] propagation.
    fn propagate_fine(
        &mut self,
        context: PropagationContext,
        _local_id: LocalId,
        _events: EnumSet<IntEvent>,
    ) -> PropagationStatus {
        self.propagate(context, PropagatorEventType::Custom)
    }

    /// Whether the constraint is guaranteed to hold ([`Entailment::True`]), guaranteed to be
    /// violated ([`Entailment::False`]), or neither yet, given the current domains.
    fn is_entailed(&self, _domains: Domains) -> Entailment {
        Entailment::Undefined
    }

    /// Logs statistics of the propagator using the provided [`StatisticLogger`].
    ///
    /// It is recommended to create a struct through the [`create_statistics_struct!`] macro!
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// The kind of propagation requested from a propagator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropagatorEventType {
    /// Filter from scratch.
    Full,
    /// Filter using whatever the propagator maintains incrementally.
    Custom,
}
