use super::EnvironmentOptions;
use super::Stored;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;

/// The previous state of a cell, recorded the first time the cell is written in a world.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TrailedChange<T> {
    pub(crate) cell: Stored<T>,
    pub(crate) old_value: T,
    pub(crate) old_stamp: u64,
}

/// A cell holds its value together with the stamp of the world in which it was last trailed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CellState<T> {
    value: T,
    stamp: u64,
}

/// All cells of one scalar type together with the trail which restores them.
#[derive(Debug, Clone)]
pub(crate) struct TrailedCells<T> {
    trail: Trail<TrailedChange<T>>,
    cells: KeyedVec<Stored<T>, CellState<T>>,
}

impl<T: Copy + PartialEq> TrailedCells<T> {
    pub(crate) fn new(options: &EnvironmentOptions) -> Self {
        TrailedCells {
            trail: Trail::new(options),
            cells: KeyedVec::default(),
        }
    }

    pub(crate) fn grow(&mut self, initial_value: T) -> Stored<T> {
        self.cells.push(CellState {
            value: initial_value,
            stamp: 0,
        })
    }

    pub(crate) fn read(&self, cell: Stored<T>) -> T {
        self.cells[cell].value
    }

    /// Writes `value` into `cell`.
    ///
    /// `world_stamp` is the stamp of the current world, or [`None`] at the root world where
    /// nothing has to be trailed. The old state is only recorded when the cell was not yet
    /// trailed under this stamp.
    pub(crate) fn write(&mut self, cell: Stored<T>, value: T, world_stamp: Option<u64>) {
        let state = self.cells[cell];
        if state.value == value {
            return;
        }

        if let Some(stamp) = world_stamp {
            if state.stamp != stamp {
                self.trail.push(TrailedChange {
                    cell,
                    old_value: state.value,
                    old_stamp: state.stamp,
                });
                self.cells[cell].stamp = stamp;
            }
        }

        self.cells[cell].value = value;
    }

    pub(crate) fn new_world(&mut self) {
        self.trail.new_world()
    }

    pub(crate) fn synchronise(&mut self, new_world: usize) {
        self.trail.synchronise(new_world).for_each(|change| {
            self.cells[change.cell] = CellState {
                value: change.old_value,
                stamp: change.old_stamp,
            }
        })
    }

    pub(crate) fn commit(&mut self) {
        self.trail.commit()
    }

    pub(crate) fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn trail_len(&self) -> usize {
        self.trail.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_within_a_world_are_trailed_once() {
        let mut cells = TrailedCells::new(&EnvironmentOptions::default());
        let cell = cells.grow(0_i32);

        cells.new_world();
        for value in 1..=10 {
            cells.write(cell, value, Some(1));
        }

        assert_eq!(1, cells.trail_len());
        assert_eq!(10, cells.read(cell));

        cells.synchronise(0);
        assert_eq!(0, cells.read(cell));
    }

    #[test]
    fn writes_at_the_root_are_not_trailed() {
        let mut cells = TrailedCells::new(&EnvironmentOptions::default());
        let cell = cells.grow(true);

        cells.write(cell, false, None);

        assert_eq!(0, cells.trail_len());
        assert!(!cells.read(cell));
    }

    #[test]
    fn writing_the_current_value_does_nothing() {
        let mut cells = TrailedCells::new(&EnvironmentOptions::default());
        let cell = cells.grow(3_i64);

        cells.new_world();
        cells.write(cell, 3, Some(1));

        assert_eq!(0, cells.trail_len());
    }

    #[test]
    fn restoring_resets_the_stamp() {
        let mut cells = TrailedCells::new(&EnvironmentOptions::default());
        let cell = cells.grow(0_i32);

        cells.new_world();
        cells.write(cell, 1, Some(1));
        cells.synchronise(0);

        // A fresh world with a fresh stamp must trail the cell again.
        cells.new_world();
        cells.write(cell, 2, Some(2));
        assert_eq!(1, cells.trail_len());

        cells.synchronise(0);
        assert_eq!(0, cells.read(cell));
    }
}
