//! Backtrackable memory.
//!
//! The [`Environment`] owns every backtrackable value of a solver. Search marks a choice point
//! with [`Environment::world_push`]; every write performed afterwards is undone by the matching
//! [`Environment::world_pop`].
//!
//! ```rust
//! # use gourd_core::environment::Environment;
//! let mut environment = Environment::default();
//! let x = environment.make_int(5);
//!
//! environment.world_push();
//! x.set(&mut environment, 7);
//! environment.world_push();
//! x.set(&mut environment, 9);
//!
//! environment.world_pop();
//! assert_eq!(x.get(&environment), 7);
//! environment.world_pop();
//! assert_eq!(x.get(&environment), 5);
//! ```
mod operation;
mod options;
mod stored;
mod structures;
mod trailed_cells;

pub use operation::Operation;
pub use options::EnvironmentOptions;
pub use options::TrailStorageStrategy;
pub use stored::Stored;
pub use stored::StoredBool;
pub use stored::StoredDouble;
pub use stored::StoredInt;
pub use stored::StoredLong;
pub use stored::TrailedType;
pub use structures::SharedBool;
pub use structures::StoredBitSet;
pub use structures::StoredVec;
pub(crate) use trailed_cells::TrailedCells;

use crate::basic_types::Trail;
use crate::create_statistics_struct;
use crate::gourd_asserts::gourd_assert_simple;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(
    /// Counters about the worlds an [`Environment`] went through.
    EnvironmentStatistics {
        num_world_pushes: u64,
        num_world_pops: u64,
        num_world_commits: u64,
        peak_world: usize,
});

/// Owns all backtrackable cells and the trails which restore them.
#[derive(Debug)]
pub struct Environment {
    options: EnvironmentOptions,
    /// The stamp of every open world; the root world has stamp 0.
    ///
    /// A cell remembers the stamp under which it was last trailed, which makes every write after
    /// the first one in a world free of trailing.
    world_stamps: Vec<u64>,
    /// Incremented on every push, never decremented.
    timestamp: u64,
    bools: TrailedCells<bool>,
    ints: TrailedCells<i32>,
    longs: TrailedCells<i64>,
    doubles: TrailedCells<f64>,
    operations: Trail<Box<dyn Operation>>,
    shared_booleans: Option<StoredBitSet>,
    num_shared_booleans: usize,
    statistics: EnvironmentStatistics,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new(EnvironmentOptions::default())
    }
}

impl Environment {
    pub fn new(options: EnvironmentOptions) -> Self {
        Environment {
            world_stamps: vec![0],
            timestamp: 0,
            bools: TrailedCells::new(&options),
            ints: TrailedCells::new(&options),
            longs: TrailedCells::new(&options),
            doubles: TrailedCells::new(&options),
            operations: Trail::new(&options),
            shared_booleans: None,
            num_shared_booleans: 0,
            statistics: EnvironmentStatistics::default(),
            options,
        }
    }

    pub fn options(&self) -> &EnvironmentOptions {
        &self.options
    }

    /// The depth of the current world; the root world has index 0.
    pub fn world_index(&self) -> usize {
        self.world_stamps.len() - 1
    }

    /// The number of pushes performed so far.
    ///
    /// Unlike the world index this never decreases, which makes it suitable to detect that the
    /// search moved on since some value was recorded.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn make<T: TrailedType>(&mut self, initial_value: T) -> Stored<T> {
        T::cells_mut(self).grow(initial_value)
    }

    pub fn make_bool(&mut self, initial_value: bool) -> StoredBool {
        self.make(initial_value)
    }

    pub fn make_int(&mut self, initial_value: i32) -> StoredInt {
        self.make(initial_value)
    }

    pub fn make_long(&mut self, initial_value: i64) -> StoredLong {
        self.make(initial_value)
    }

    pub fn make_double(&mut self, initial_value: f64) -> StoredDouble {
        self.make(initial_value)
    }

    pub fn get<T: TrailedType>(&self, cell: Stored<T>) -> T {
        T::cells(self).read(cell)
    }

    pub fn set<T: TrailedType>(&mut self, cell: Stored<T>, value: T) {
        let world_stamp = self.trailing_stamp();
        T::cells_mut(self).write(cell, value, world_stamp)
    }

    /// The stamp under which writes are trailed, or [`None`] at the root world.
    fn trailing_stamp(&self) -> Option<u64> {
        if self.world_index() == 0 {
            None
        } else {
            self.world_stamps.last().copied()
        }
    }

    /// Records `operation` such that it is undone when the current world is popped.
    ///
    /// Nothing is ever popped from the root world, so there the operation is dropped.
    pub fn save(&mut self, operation: Box<dyn Operation>) {
        if self.world_index() > 0 {
            self.operations.push(operation);
        }
    }

    /// Opens a new world.
    pub fn world_push(&mut self) {
        self.timestamp += 1;
        self.world_stamps.push(self.timestamp);

        self.bools.new_world();
        self.ints.new_world();
        self.longs.new_world();
        self.doubles.new_world();
        self.operations.new_world();

        self.statistics.num_world_pushes += 1;
        self.statistics.peak_world = self.statistics.peak_world.max(self.world_index());
        log::trace!("Pushed world {}", self.world_index());
    }

    /// Closes the current world, restoring every cell to the value it had when the world was
    /// pushed and undoing the saved operations.
    ///
    /// # Panics
    /// When called at the root world.
    pub fn world_pop(&mut self) {
        assert!(self.world_index() > 0, "Cannot pop the root world");

        let new_world = self.world_index() - 1;
        self.bools.synchronise(new_world);
        self.ints.synchronise(new_world);
        self.longs.synchronise(new_world);
        self.doubles.synchronise(new_world);
        self.operations
            .synchronise(new_world)
            .for_each(|operation| operation.undo());

        let _ = self.world_stamps.pop();

        self.statistics.num_world_pops += 1;
        log::trace!("Popped to world {new_world}");
    }

    /// Pops worlds until the world index equals `world`.
    pub fn world_pop_until(&mut self, world: usize) {
        while self.world_index() > world {
            self.world_pop();
        }
    }

    /// Merges the current world into the one below it, keeping every value as it is.
    ///
    /// A later pop of the resulting world restores the values from before both worlds were
    /// pushed.
    ///
    /// # Panics
    /// When called at the root world.
    pub fn world_commit(&mut self) {
        assert!(self.world_index() > 0, "Cannot commit the root world");

        self.bools.commit();
        self.ints.commit();
        self.longs.commit();
        self.doubles.commit();
        self.operations.commit();

        let _ = self.world_stamps.pop();

        self.statistics.num_world_commits += 1;
        log::debug!("Committed into world {}", self.world_index());
    }

    /// Allocates a boolean in a bitset which is shared by all booleans created this way.
    ///
    /// Shared booleans must be created at the root world, since growing the shared bitset in a
    /// deeper world would be undone on backtrack.
    pub fn make_shared_bool(&mut self, initial_value: bool) -> SharedBool {
        gourd_assert_simple!(
            self.world_index() == 0,
            "Shared booleans can only be created at the root world"
        );

        let index = self.num_shared_booleans;
        self.num_shared_booleans += 1;

        let mut shared = self
            .shared_booleans
            .take()
            .unwrap_or_else(|| StoredBitSet::new(self, 64));
        shared.ensure_capacity(self, self.num_shared_booleans);
        if initial_value {
            shared.set(self, index);
        }
        self.shared_booleans = Some(shared);

        SharedBool::new(index)
    }

    pub(crate) fn shared_booleans(&self) -> Option<&StoredBitSet> {
        self.shared_booleans.as_ref()
    }

    pub(crate) fn with_shared_booleans<R>(
        &mut self,
        f: impl FnOnce(&mut StoredBitSet, &mut Environment) -> R,
    ) -> Option<R> {
        let mut shared = self.shared_booleans.take()?;
        let result = f(&mut shared, self);
        self.shared_booleans = Some(shared);
        Some(result)
    }

    pub fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger.clone());
        let num_cells = self.bools.num_cells()
            + self.ints.num_cells()
            + self.longs.num_cells()
            + self.doubles.num_cells();
        num_cells.log(statistic_logger.attach_to_prefix("num_cells"));
        let trail_len = self.bools.trail_len()
            + self.ints.trail_len()
            + self.longs.trail_len()
            + self.doubles.trail_len()
            + self.operations.len();
        trail_len.log(statistic_logger.attach_to_prefix("trail_len"));
    }

    #[cfg(test)]
    pub(crate) fn trail_len<T: TrailedType>(&self) -> usize {
        T::cells(self).trail_len()
    }
}
