use enumset::EnumSet;

use super::IntEvent;
use crate::basic_types::EmptyDomain;
use crate::environment::Environment;
use crate::environment::StoredBitSet;
use crate::environment::StoredInt;
use crate::gourd_asserts::gourd_assert_simple;

/// The backtrackable domain of an integer variable.
#[derive(Debug, Clone)]
pub(crate) enum IntDomain {
    /// Only the bounds are stored; requests to remove a value strictly between the bounds are
    /// ignored.
    Interval { lb: StoredInt, ub: StoredInt },
    /// Every value is stored as a bit at position `value - offset`.
    Enumerated {
        lb: StoredInt,
        ub: StoredInt,
        size: StoredInt,
        values: StoredBitSet,
        offset: i32,
    },
}

impl IntDomain {
    pub(crate) fn interval(environment: &mut Environment, lb: i32, ub: i32) -> IntDomain {
        assert!(lb <= ub, "Cannot create the empty interval [{lb}, {ub}]");

        IntDomain::Interval {
            lb: environment.make_int(lb),
            ub: environment.make_int(ub),
        }
    }

    /// # Panics
    /// When `values` is empty.
    pub(crate) fn enumerated(environment: &mut Environment, values: &[i32]) -> IntDomain {
        let (Some(&lb), Some(&ub)) = (values.iter().min(), values.iter().max()) else {
            panic!("Cannot create a variable with an empty domain");
        };

        let mut bits = StoredBitSet::new(environment, bit_index(ub, lb) + 1);
        for &value in values {
            bits.set(environment, bit_index(value, lb));
        }
        let size = bits.cardinality(environment) as i32;

        IntDomain::Enumerated {
            lb: environment.make_int(lb),
            ub: environment.make_int(ub),
            size: environment.make_int(size),
            values: bits,
            offset: lb,
        }
    }

    pub(crate) fn lower_bound(&self, environment: &Environment) -> i32 {
        match self {
            IntDomain::Interval { lb, .. } | IntDomain::Enumerated { lb, .. } => {
                lb.get(environment)
            }
        }
    }

    pub(crate) fn upper_bound(&self, environment: &Environment) -> i32 {
        match self {
            IntDomain::Interval { ub, .. } | IntDomain::Enumerated { ub, .. } => {
                ub.get(environment)
            }
        }
    }

    pub(crate) fn size(&self, environment: &Environment) -> u64 {
        match self {
            IntDomain::Interval { lb, ub } => {
                u64::from(ub.get(environment).abs_diff(lb.get(environment))) + 1
            }
            IntDomain::Enumerated { size, .. } => size.get(environment) as u64,
        }
    }

    pub(crate) fn is_fixed(&self, environment: &Environment) -> bool {
        self.lower_bound(environment) == self.upper_bound(environment)
    }

    pub(crate) fn contains(&self, environment: &Environment, value: i32) -> bool {
        if value < self.lower_bound(environment) || value > self.upper_bound(environment) {
            return false;
        }

        match self {
            IntDomain::Interval { .. } => true,
            IntDomain::Enumerated { values, offset, .. } => {
                values.get(environment, bit_index(value, *offset))
            }
        }
    }

    /// The smallest value in the domain which is strictly larger than `value`.
    pub(crate) fn next_value(&self, environment: &Environment, value: i32) -> Option<i32> {
        let lb = self.lower_bound(environment);
        if value < lb {
            return Some(lb);
        }
        if value >= self.upper_bound(environment) {
            return None;
        }

        match self {
            IntDomain::Interval { .. } => Some(value + 1),
            IntDomain::Enumerated { values, offset, .. } => values
                .next_set_bit(environment, bit_index(value, *offset) + 1)
                .map(|index| bit_value(index, *offset)),
        }
    }

    /// The largest value in the domain which is strictly smaller than `value`.
    pub(crate) fn previous_value(&self, environment: &Environment, value: i32) -> Option<i32> {
        let ub = self.upper_bound(environment);
        if value > ub {
            return Some(ub);
        }
        if value <= self.lower_bound(environment) {
            return None;
        }

        match self {
            IntDomain::Interval { .. } => Some(value - 1),
            IntDomain::Enumerated { values, offset, .. } => values
                .prev_set_bit(environment, bit_index(value, *offset) - 1)
                .map(|index| bit_value(index, *offset)),
        }
    }

    pub(crate) fn update_lower_bound(
        &self,
        environment: &mut Environment,
        value: i32,
    ) -> Result<EnumSet<IntEvent>, EmptyDomain> {
        let old_lb = self.lower_bound(environment);
        if value <= old_lb {
            return Ok(EnumSet::empty());
        }
        let ub = self.upper_bound(environment);
        if value > ub {
            return Err(EmptyDomain);
        }

        let new_lb = match self {
            IntDomain::Interval { lb, .. } => {
                lb.set(environment, value);
                value
            }
            IntDomain::Enumerated {
                lb,
                size,
                values,
                offset,
                ..
            } => {
                // The upper bound is in the domain, so there is a next value.
                let new_lb = values
                    .next_set_bit(environment, bit_index(value, *offset))
                    .map_or(ub, |index| bit_value(index, *offset));
                let new_lb_index = bit_index(new_lb, *offset);
                let mut removed = 0;
                let mut current = Some(bit_index(old_lb, *offset));
                while let Some(index) = current.filter(|&index| index < new_lb_index) {
                    values.clear(environment, index);
                    removed += 1;
                    current = values.next_set_bit(environment, index + 1);
                }
                let _ = size.add(environment, -removed);
                lb.set(environment, new_lb);
                new_lb
            }
        };

        let mut events = IntEvent::IncLow | IntEvent::Remove;
        if new_lb == ub {
            events |= IntEvent::Instantiate;
        }
        Ok(events)
    }

    pub(crate) fn update_upper_bound(
        &self,
        environment: &mut Environment,
        value: i32,
    ) -> Result<EnumSet<IntEvent>, EmptyDomain> {
        let old_ub = self.upper_bound(environment);
        if value >= old_ub {
            return Ok(EnumSet::empty());
        }
        let lb = self.lower_bound(environment);
        if value < lb {
            return Err(EmptyDomain);
        }

        let new_ub = match self {
            IntDomain::Interval { ub, .. } => {
                ub.set(environment, value);
                value
            }
            IntDomain::Enumerated {
                ub,
                size,
                values,
                offset,
                ..
            } => {
                let new_ub = values
                    .prev_set_bit(environment, bit_index(value, *offset))
                    .map_or(lb, |index| bit_value(index, *offset));
                let new_ub_index = bit_index(new_ub, *offset);
                let mut removed = 0;
                let mut current = Some(bit_index(old_ub, *offset));
                while let Some(index) = current.filter(|&index| index > new_ub_index) {
                    values.clear(environment, index);
                    removed += 1;
                    current = index
                        .checked_sub(1)
                        .and_then(|from| values.prev_set_bit(environment, from));
                }
                let _ = size.add(environment, -removed);
                ub.set(environment, new_ub);
                new_ub
            }
        };

        let mut events = IntEvent::DecUpp | IntEvent::Remove;
        if new_ub == lb {
            events |= IntEvent::Instantiate;
        }
        Ok(events)
    }

    pub(crate) fn remove_value(
        &self,
        environment: &mut Environment,
        value: i32,
    ) -> Result<EnumSet<IntEvent>, EmptyDomain> {
        if !self.contains(environment, value) {
            return Ok(EnumSet::empty());
        }
        if self.is_fixed(environment) {
            return Err(EmptyDomain);
        }

        if value == self.lower_bound(environment) {
            return self.update_lower_bound(environment, value + 1);
        }
        if value == self.upper_bound(environment) {
            return self.update_upper_bound(environment, value - 1);
        }

        match self {
            IntDomain::Interval { .. } => Ok(EnumSet::empty()),
            IntDomain::Enumerated {
                size,
                values,
                offset,
                ..
            } => {
                values.clear(environment, bit_index(value, *offset));
                let _ = size.add(environment, -1);
                Ok(IntEvent::Remove.into())
            }
        }
    }

    pub(crate) fn instantiate_to(
        &self,
        environment: &mut Environment,
        value: i32,
    ) -> Result<EnumSet<IntEvent>, EmptyDomain> {
        if !self.contains(environment, value) {
            return Err(EmptyDomain);
        }
        if self.is_fixed(environment) {
            return Ok(EnumSet::empty());
        }

        let mut events = IntEvent::Instantiate | IntEvent::Remove;
        if value > self.lower_bound(environment) {
            events |= IntEvent::IncLow;
        }
        if value < self.upper_bound(environment) {
            events |= IntEvent::DecUpp;
        }

        match self {
            IntDomain::Interval { lb, ub } => {
                lb.set(environment, value);
                ub.set(environment, value);
            }
            IntDomain::Enumerated {
                lb,
                ub,
                size,
                values,
                offset,
            } => {
                let kept = bit_index(value, *offset);
                let mut current = values.next_set_bit(environment, 0);
                while let Some(index) = current {
                    if index != kept {
                        values.clear(environment, index);
                    }
                    current = values.next_set_bit(environment, index + 1);
                }
                size.set(environment, 1);
                lb.set(environment, value);
                ub.set(environment, value);
            }
        }

        Ok(events)
    }
}

/// The position of `value` in the bitset of a domain whose smallest initial value is `offset`.
fn bit_index(value: i32, offset: i32) -> usize {
    gourd_assert_simple!(value >= offset);
    value.abs_diff(offset) as usize
}

fn bit_value(index: usize, offset: i32) -> i32 {
    (i64::from(offset) + index as i64) as i32
}
