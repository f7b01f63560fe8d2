use crate::environment::Environment;
use crate::environment::Stored;
use crate::environment::StoredInt;
use crate::environment::TrailedType;

/// A backtrackable stack of values.
///
/// The length is stored in the environment, so elements pushed in a world disappear when it is
/// popped. Cells are never released; a cell freed by backtracking or [`StoredVec::pop`] is reused
/// by the next push.
#[derive(Debug, Clone)]
pub struct StoredVec<T> {
    cells: Vec<Stored<T>>,
    len: StoredInt,
}

impl<T: TrailedType> StoredVec<T> {
    pub fn new(environment: &mut Environment) -> Self {
        StoredVec {
            cells: Vec::new(),
            len: environment.make_int(0),
        }
    }

    pub fn len(&self, environment: &Environment) -> usize {
        self.len.get(environment) as usize
    }

    pub fn is_empty(&self, environment: &Environment) -> bool {
        self.len(environment) == 0
    }

    pub fn push(&mut self, environment: &mut Environment, value: T) {
        let len = self.len(environment);
        if len < self.cells.len() {
            self.cells[len].set(environment, value);
        } else {
            self.cells.push(environment.make(value));
        }
        let _ = self.len.add(environment, 1);
    }

    pub fn pop(&self, environment: &mut Environment) -> Option<T> {
        let len = self.len(environment);
        if len == 0 {
            return None;
        }

        let _ = self.len.add(environment, -1);
        Some(self.cells[len - 1].get(environment))
    }

    /// # Panics
    /// When `index` is out of bounds.
    pub fn get(&self, environment: &Environment, index: usize) -> T {
        let len = self.len(environment);
        assert!(index < len, "Index {index} out of bounds for length {len}");
        self.cells[index].get(environment)
    }

    /// # Panics
    /// When `index` is out of bounds.
    pub fn set(&self, environment: &mut Environment, index: usize, value: T) {
        let len = self.len(environment);
        assert!(index < len, "Index {index} out of bounds for length {len}");
        self.cells[index].set(environment, value)
    }

    pub fn to_vec(&self, environment: &Environment) -> Vec<T> {
        self.cells[..self.len(environment)]
            .iter()
            .map(|cell| cell.get(environment))
            .collect()
    }
}
