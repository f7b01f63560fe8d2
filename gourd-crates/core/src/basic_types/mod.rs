mod contradiction;
mod entailment;
mod trail;
mod trail_storage;

pub use contradiction::*;
pub use entailment::Entailment;
pub(crate) use trail::Trail;
pub(crate) use trail_storage::TrailStorage;
