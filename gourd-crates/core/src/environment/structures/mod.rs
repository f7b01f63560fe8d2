mod shared_bool;
mod stored_bit_set;
mod stored_vec;

pub use shared_bool::SharedBool;
pub use stored_bit_set::StoredBitSet;
pub use stored_vec::StoredVec;
