use super::Domains;
use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use super::ReadDomains;
use crate::environment::Environment;
use crate::variables::VarId;
use crate::variables::Variables;

/// A propagator constructor creates a fully initialised instance of a [`Propagator`].
///
/// The constructor registers the scope of the propagator, and may allocate backtrackable state
/// in the environment.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator;

    /// Create the propagator instance from `Self`.
    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl;
}

/// Handed to a [`PropagatorConstructor`] while the propagator is being added.
///
/// After [`PropagatorConstructor::create`] returns, the propagator is subscribed to every
/// registered variable with the events given by
/// [`Propagator::propagation_conditions`](super::Propagator::propagation_conditions).
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    environment: &'a mut Environment,
    variables: &'a Variables,
    propagator_id: PropagatorId,
    scope: &'a mut Vec<VarId>,
}

impl ReadDomains for PropagatorConstructorContext<'_> {
    fn domains(&self) -> Domains<'_> {
        Domains::new(self.environment, self.variables)
    }
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        environment: &'a mut Environment,
        variables: &'a Variables,
        propagator_id: PropagatorId,
        scope: &'a mut Vec<VarId>,
    ) -> Self {
        PropagatorConstructorContext {
            environment,
            variables,
            propagator_id,
            scope,
        }
    }

    /// Adds `variable` to the scope of the propagator and returns its [`LocalId`].
    ///
    /// Registering the same variable twice gives it two local ids.
    pub fn register(&mut self, variable: VarId) -> LocalId {
        let local_id = LocalId::from(self.scope.len() as u32);
        self.scope.push(variable);
        local_id
    }

    /// The id the propagator will have once it is added.
    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// The environment, for allocating the propagator's backtrackable state.
    pub fn environment_mut(&mut self) -> &mut Environment {
        self.environment
    }
}
