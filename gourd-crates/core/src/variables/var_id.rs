use std::fmt::Display;
use std::fmt::Formatter;

use crate::containers::StorageKey;

/// Identifies an integer variable in the [`Variables`](super::Variables) arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId {
    pub(crate) id: u32,
}

impl VarId {
    pub(crate) fn new(id: u32) -> Self {
        VarId { id }
    }
}

impl StorageKey for VarId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        VarId::new(index as u32)
    }
}

impl Display for VarId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}
