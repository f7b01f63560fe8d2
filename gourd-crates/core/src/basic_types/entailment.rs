/// Whether a constraint is known to hold in every solution extending the current domains.
///
/// [`Entailment::Undefined`] is not an error: it states that the propagator can neither prove
/// satisfaction nor violation yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Entailment {
    True,
    False,
    #[default]
    Undefined,
}

impl Entailment {
    /// Combines the entailment of two constraints which should both hold.
    pub fn and(self, other: Entailment) -> Entailment {
        match (self, other) {
            (Entailment::False, _) | (_, Entailment::False) => Entailment::False,
            (Entailment::True, Entailment::True) => Entailment::True,
            _ => Entailment::Undefined,
        }
    }
}

impl From<bool> for Entailment {
    fn from(value: bool) -> Self {
        if value {
            Entailment::True
        } else {
            Entailment::False
        }
    }
}
