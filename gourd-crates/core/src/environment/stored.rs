use std::fmt::Debug;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

use super::Environment;
use super::TrailedCells;
use crate::containers::StorageKey;

/// A backtrackable value of type `T` which lives in an [`Environment`].
///
/// The handle itself is a plain index; reading and writing go through the environment which
/// created it. Writing to a stored value records its previous value on the trail of `T` (at most
/// once per world), such that [`Environment::world_pop`] restores it.
pub struct Stored<T> {
    id: u32,
    value_type: PhantomData<T>,
}

/// A backtrackable boolean.
pub type StoredBool = Stored<bool>;
/// A backtrackable 32-bit integer.
pub type StoredInt = Stored<i32>;
/// A backtrackable 64-bit integer.
pub type StoredLong = Stored<i64>;
/// A backtrackable floating point number.
pub type StoredDouble = Stored<f64>;

impl<T: TrailedType> Stored<T> {
    /// The current value.
    pub fn get(self, environment: &Environment) -> T {
        environment.get(self)
    }

    /// Overwrite the current value; the old value is restored when the current world is popped.
    pub fn set(self, environment: &mut Environment, value: T) {
        environment.set(self, value)
    }
}

impl Stored<i32> {
    /// Adds `delta` to the current value and returns the new value.
    pub fn add(self, environment: &mut Environment, delta: i32) -> i32 {
        let value = self.get(environment) + delta;
        self.set(environment, value);
        value
    }
}

impl Stored<i64> {
    /// Adds `delta` to the current value and returns the new value.
    pub fn add(self, environment: &mut Environment, delta: i64) -> i64 {
        let value = self.get(environment) + delta;
        self.set(environment, value);
        value
    }
}

// The traits below are implemented by hand to avoid imposing them on `T`.
impl<T> Clone for Stored<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Stored<T> {}

impl<T> PartialEq for Stored<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Stored<T> {}

impl<T> Hash for Stored<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl<T> Debug for Stored<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stored<{}>({})", std::any::type_name::<T>(), self.id)
    }
}

impl<T> StorageKey for Stored<T> {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Stored {
            id: index as u32,
            value_type: PhantomData,
        }
    }
}

/// The scalar types which can be stored in an [`Environment`]; every type has its own trail.
///
/// This trait is sealed.
pub trait TrailedType: private::Sealed + Copy + PartialEq + Debug + 'static {}

impl TrailedType for bool {}
impl TrailedType for i32 {}
impl TrailedType for i64 {}
impl TrailedType for f64 {}

mod private {
    use super::Environment;
    use super::TrailedCells;

    #[allow(
        unreachable_pub,
        private_interfaces,
        reason = "sealed supertrait of a public trait, reaching into the cell arenas"
    )]
    pub trait Sealed: Sized {
        fn cells(environment: &Environment) -> &TrailedCells<Self>;

        fn cells_mut(environment: &mut Environment) -> &mut TrailedCells<Self>;
    }
}

macro_rules! impl_sealed {
    ($type:ty, $field:ident) => {
        #[allow(private_interfaces, reason = "implements the sealed supertrait")]
        impl private::Sealed for $type {
            fn cells(environment: &Environment) -> &TrailedCells<Self> {
                &environment.$field
            }

            fn cells_mut(environment: &mut Environment) -> &mut TrailedCells<Self> {
                &mut environment.$field
            }
        }
    };
}

impl_sealed!(bool, bools);
impl_sealed!(i32, ints);
impl_sealed!(i64, longs);
impl_sealed!(f64, doubles);
