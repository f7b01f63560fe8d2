use crate::propagation::PropagatorId;

/// The propagators which have to be activated again when search comes back to a world at or
/// below the one they were last activated in.
///
/// Every entry remembers the world index and the environment timestamp of its last activation;
/// an entry which was never activated is always due.
#[derive(Debug, Default, Clone)]
pub(crate) struct DynamicPropagators {
    entries: Vec<(PropagatorId, Option<(usize, u64)>)>,
}

impl DynamicPropagators {
    /// Adds the propagator, or makes it due again if it is already present.
    pub(crate) fn add_or_update(&mut self, propagator: PropagatorId) {
        self.remove(propagator);
        self.entries.push((propagator, None));
    }

    pub(crate) fn remove(&mut self, propagator: PropagatorId) {
        self.entries.retain(|&(entry, _)| entry != propagator);
    }

    pub(crate) fn contains(&self, propagator: PropagatorId) -> bool {
        self.entries.iter().any(|&(entry, _)| entry == propagator)
    }

    /// Hands out every due propagator and marks it as activated at (`world`, `timestamp`).
    ///
    /// A propagator is due when it was never activated, when `world` is below the world of its
    /// last activation, or when it is that world but other worlds were pushed in between.
    pub(crate) fn descending(
        &mut self,
        world: usize,
        timestamp: u64,
        mut awake: impl FnMut(PropagatorId),
    ) {
        for (propagator, last_activation) in self.entries.iter_mut() {
            let due = match *last_activation {
                None => true,
                Some((last_world, last_timestamp)) => {
                    world < last_world || (world == last_world && timestamp != last_timestamp)
                }
            };

            if due {
                awake(*propagator);
                *last_activation = Some((world, timestamp));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn due(dynamic: &mut DynamicPropagators, world: usize, timestamp: u64) -> Vec<PropagatorId> {
        let mut due = vec![];
        dynamic.descending(world, timestamp, |propagator| due.push(propagator));
        due
    }

    #[test]
    fn new_entries_are_due_once() {
        let mut dynamic = DynamicPropagators::default();
        dynamic.add_or_update(PropagatorId(0));

        assert_eq!(vec![PropagatorId(0)], due(&mut dynamic, 2, 2));
        assert!(due(&mut dynamic, 2, 2).is_empty());
        assert!(due(&mut dynamic, 3, 3).is_empty());
    }

    #[test]
    fn entries_are_due_after_backtracking_to_or_below_their_world() {
        let mut dynamic = DynamicPropagators::default();
        dynamic.add_or_update(PropagatorId(1));
        assert_eq!(vec![PropagatorId(1)], due(&mut dynamic, 2, 2));

        // Push to world 3 and pop back to world 2.
        assert_eq!(vec![PropagatorId(1)], due(&mut dynamic, 2, 3));
        // Pop to world 1.
        assert_eq!(vec![PropagatorId(1)], due(&mut dynamic, 1, 3));
        assert!(due(&mut dynamic, 1, 3).is_empty());
    }

    #[test]
    fn removed_entries_are_never_due() {
        let mut dynamic = DynamicPropagators::default();
        dynamic.add_or_update(PropagatorId(0));
        dynamic.remove(PropagatorId(0));

        assert!(!dynamic.contains(PropagatorId(0)));
        assert!(due(&mut dynamic, 0, 0).is_empty());
    }
}
