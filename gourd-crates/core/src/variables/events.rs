use std::fmt::Display;

use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

use crate::propagation::PropagatorId;

/// The kinds of modification a domain can undergo.
///
/// A single domain update usually produces several of them at once: every reduction carries
/// [`IntEvent::Remove`], a domain which becomes a singleton carries [`IntEvent::Instantiate`],
/// and moving a bound carries [`IntEvent::IncLow`] or [`IntEvent::DecUpp`].
#[derive(Debug, EnumSetType, Hash)]
pub enum IntEvent {
    /// The domain became a single value.
    Instantiate,
    /// The lower bound increased.
    IncLow,
    /// The upper bound decreased.
    DecUpp,
    /// At least one value was removed.
    Remove,
}

impl IntEvent {
    pub const INSTANTIATE: EnumSet<IntEvent> = enum_set!(IntEvent::Instantiate);
    pub const LOWER_BOUND: EnumSet<IntEvent> = enum_set!(IntEvent::Instantiate | IntEvent::IncLow);
    pub const UPPER_BOUND: EnumSet<IntEvent> = enum_set!(IntEvent::Instantiate | IntEvent::DecUpp);
    /// Any change to one of the bounds.
    pub const BOUND: EnumSet<IntEvent> =
        enum_set!(IntEvent::Instantiate | IntEvent::IncLow | IntEvent::DecUpp);
    pub const ALL: EnumSet<IntEvent> = EnumSet::all();
}

impl Display for IntEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntEvent::Instantiate => write!(f, "[Event:Instantiate]"),
            IntEvent::IncLow => write!(f, "[Event:IncLow]"),
            IntEvent::DecUpp => write!(f, "[Event:DecUpp]"),
            IntEvent::Remove => write!(f, "[Event:Remove]"),
        }
    }
}

/// Who modified a domain.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cause {
    /// A decision taken by search, or several causes merged together.
    #[default]
    Null,
    Propagator(PropagatorId),
}

impl Cause {
    pub fn propagator(self) -> Option<PropagatorId> {
        match self {
            Cause::Null => None,
            Cause::Propagator(propagator) => Some(propagator),
        }
    }

    /// The cause of two merged events; different causes merge into [`Cause::Null`].
    pub(crate) fn merge(self, other: Cause) -> Cause {
        if self == other {
            self
        } else {
            Cause::Null
        }
    }
}

impl From<PropagatorId> for Cause {
    fn from(propagator: PropagatorId) -> Self {
        Cause::Propagator(propagator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_contains_instantiation_but_not_removal() {
        assert!(IntEvent::BOUND.contains(IntEvent::Instantiate));
        assert!(!IntEvent::BOUND.contains(IntEvent::Remove));
        assert_eq!(4, IntEvent::ALL.len());
    }

    #[test]
    fn different_causes_merge_into_null() {
        let first = Cause::Propagator(PropagatorId(0));
        let second = Cause::Propagator(PropagatorId(1));

        assert_eq!(first, first.merge(first));
        assert_eq!(Cause::Null, first.merge(second));
        assert_eq!(Cause::Null, Cause::Null.merge(first));
    }
}
