use crate::environment::Environment;

/// A backtrackable boolean stored as a single bit of the environment's shared bitset.
///
/// Created by [`Environment::make_shared_bool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SharedBool {
    index: usize,
}

impl SharedBool {
    pub(crate) fn new(index: usize) -> Self {
        SharedBool { index }
    }

    pub fn get(self, environment: &Environment) -> bool {
        environment
            .shared_booleans()
            .is_some_and(|bits| bits.get(environment, self.index))
    }

    pub fn set(self, environment: &mut Environment, value: bool) {
        let _ = environment.with_shared_booleans(|bits, environment| {
            if value {
                bits.set(environment, self.index)
            } else {
                bits.clear(environment, self.index)
            }
        });
    }
}
