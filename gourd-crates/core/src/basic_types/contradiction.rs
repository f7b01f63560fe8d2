use std::borrow::Cow;

use crate::propagation::PropagatorId;
use crate::variables::Cause;
use crate::variables::VarId;

/// The result of invoking a propagator. The propagation can either succeed or identify a
/// [`Contradiction`].
pub type PropagationStatus = Result<(), Contradiction>;

/// Signals that the current world is infeasible.
///
/// A contradiction is an expected outcome of propagation; it is recovered from by popping the
/// world in which it occurred (see [`State::world_pop`](crate::State::world_pop)).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Contradiction {
    /// A domain operation would have left a variable without any value.
    #[error("the domain of {variable} became empty")]
    EmptyDomain {
        /// The variable whose domain became empty.
        variable: VarId,
        /// Who attempted the domain operation.
        cause: Cause,
    },
    /// A propagator explicitly detected that its constraint cannot be satisfied.
    #[error("{propagator} failed: {reason}")]
    Propagator {
        propagator: PropagatorId,
        reason: Cow<'static, str>,
    },
}

impl Contradiction {
    /// The propagator which raised or caused the contradiction, if any.
    pub fn propagator(&self) -> Option<PropagatorId> {
        match self {
            Contradiction::EmptyDomain { cause, .. } => cause.propagator(),
            Contradiction::Propagator { propagator, .. } => Some(*propagator),
        }
    }
}

/// Returned by domain primitives when an operation would remove every value from a domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("the operation would empty the domain")]
pub struct EmptyDomain;

impl EmptyDomain {
    /// Attach the variable and the cause to obtain a [`Contradiction`].
    pub fn into_contradiction(self, variable: VarId, cause: Cause) -> Contradiction {
        Contradiction::EmptyDomain { variable, cause }
    }
}
