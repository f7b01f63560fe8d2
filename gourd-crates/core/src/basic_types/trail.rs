use super::TrailStorage;
use crate::environment::EnvironmentOptions;
use crate::gourd_asserts::gourd_assert_simple;

/// An append-only log partitioned into one segment per world.
///
/// Entries pushed while at world `w` belong to the segment of `w`; popping back to an earlier
/// world hands out the removed entries in reverse order so that the caller can undo them.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    /// At index i is the position where the segment of world `i + 1` starts on the trail
    trail_delimiter: Vec<usize>,
    trail: TrailStorage<T>,
}

impl<T> Trail<T> {
    pub(crate) fn new(options: &EnvironmentOptions) -> Self {
        Trail {
            trail_delimiter: Vec::new(),
            trail: TrailStorage::new(options),
        }
    }

    pub(crate) fn new_world(&mut self) {
        self.trail_delimiter.push(self.trail.len());
    }

    pub(crate) fn get_world(&self) -> usize {
        self.trail_delimiter.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.trail.len()
    }

    /// Removes every segment above `new_world`, handing out the removed entries from the most
    /// recently pushed to the oldest.
    ///
    /// Entries that are not consumed from the returned iterator are still removed.
    pub(crate) fn synchronise(&mut self, new_world: usize) -> PoppedEntries<'_, T> {
        gourd_assert_simple!(
            new_world < self.get_world(),
            "Cannot synchronise to world {new_world} from world {}",
            self.get_world()
        );

        let new_trail_len = self.trail_delimiter[new_world];
        self.trail_delimiter.truncate(new_world);

        PoppedEntries {
            storage: &mut self.trail,
            until: new_trail_len,
        }
    }

    /// Merges the segment of the current world into the segment of the world below it.
    ///
    /// When the merge lands on world 0 the entries are discarded, since world 0 is never
    /// popped.
    pub(crate) fn commit(&mut self) {
        gourd_assert_simple!(self.get_world() > 0, "Cannot commit world 0");

        let _ = self.trail_delimiter.pop();
        if self.trail_delimiter.is_empty() {
            self.trail.clear();
        }
    }

    pub(crate) fn push(&mut self, elem: T) {
        self.trail.push(elem)
    }
}

/// The entries removed by [`Trail::synchronise`], newest first.
#[derive(Debug)]
pub(crate) struct PoppedEntries<'a, T> {
    storage: &'a mut TrailStorage<T>,
    until: usize,
}

impl<T> Iterator for PoppedEntries<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.storage.len() > self.until {
            self.storage.pop()
        } else {
            None
        }
    }
}

impl<T> Drop for PoppedEntries<'_, T> {
    fn drop(&mut self) {
        while self.storage.len() > self.until {
            let _ = self.storage.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::TrailStorageStrategy;

    fn trails() -> [Trail<i32>; 2] {
        let chunked = EnvironmentOptions {
            trail_storage: TrailStorageStrategy::Chunked,
            initial_trail_capacity: 2,
            ..Default::default()
        };
        [
            Trail::new(&EnvironmentOptions::default()),
            Trail::new(&chunked),
        ]
    }

    fn contents(trail: &Trail<i32>) -> Vec<i32> {
        (0..trail.len())
            .filter_map(|index| trail.trail.get(index).copied())
            .collect()
    }

    #[test]
    fn backtracking_removes_elements_beyond_world() {
        for mut trail in trails() {
            trail.new_world();
            trail.push(1);
            let _ = trail.synchronise(0);

            assert_eq!(0, trail.len());
        }
    }

    #[test]
    fn backtracking_is_nonchronological() {
        for mut trail in trails() {
            trail.push(1);

            trail.new_world();
            trail.push(2);
            trail.new_world();
            trail.push(3);
            trail.new_world();
            trail.push(4);

            let _ = trail.synchronise(1);

            assert_eq!(vec![1, 2], contents(&trail));
        }
    }

    #[test]
    fn popped_elements_are_given_in_reverse_order_when_backtracking() {
        for mut trail in trails() {
            trail.push(1);

            trail.new_world();
            trail.push(2);
            trail.new_world();
            trail.push(3);
            trail.new_world();
            trail.push(4);

            let popped = trail.synchronise(0).collect::<Vec<_>>();
            assert_eq!(vec![4, 3, 2], popped);
        }
    }

    #[test]
    fn unconsumed_popped_elements_are_still_removed() {
        for mut trail in trails() {
            trail.new_world();
            trail.push(1);
            trail.push(2);
            trail.push(3);

            let mut popped = trail.synchronise(0);
            assert_eq!(Some(3), popped.next());
            drop(popped);

            assert_eq!(0, trail.len());
        }
    }

    #[test]
    fn commit_merges_the_two_most_recent_segments() {
        for mut trail in trails() {
            trail.new_world();
            trail.push(1);
            trail.new_world();
            trail.push(2);
            trail.new_world();
            trail.push(3);

            trail.commit();

            assert_eq!(2, trail.get_world());
            assert_eq!(vec![1, 2, 3], contents(&trail));

            let popped = trail.synchronise(1).collect::<Vec<_>>();
            assert_eq!(vec![3, 2], popped);
            assert_eq!(vec![1], contents(&trail));
        }
    }

    #[test]
    fn committing_into_world_zero_discards_the_entries() {
        for mut trail in trails() {
            trail.new_world();
            trail.push(1);

            trail.commit();

            assert_eq!(0, trail.get_world());
            assert_eq!(0, trail.len());
        }
    }
}
