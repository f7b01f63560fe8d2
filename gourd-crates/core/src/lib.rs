//! # Gourd core
//! The kernel of a constraint programming solver: a backtrackable [`environment`], integer
//! [`variables`] whose domains live in that environment, and an engine which runs
//! [`propagation`] algorithms until no domain changes any more.
//!
//! A model is built on a [`State`] by creating variables and adding propagators; search then
//! alternates decisions, propagation and backtracking:
//!
//! ```rust
//! # use gourd_core::State;
//! # use gourd_core::propagation::ReadDomains;
//! let mut state = State::default();
//! let x = state.new_interval_variable(0, 10, Some("x"));
//!
//! state.propagate().expect("no propagators, so no contradiction");
//!
//! state.world_push();
//! let _ = state.update_lower_bound(x, 4).expect("4 is in the domain");
//! state.propagate().expect("no propagators, so no contradiction");
//! assert_eq!(state.lower_bound(x), 4);
//!
//! state.world_pop();
//! assert_eq!(state.lower_bound(x), 0);
//! ```
//!
//! Propagators are implemented against the [`propagation::Propagator`] trait; see the
//! [`propagation`] module for how to write one.
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;
pub mod environment;
pub(crate) mod gourd_asserts;
pub mod propagation;
mod state;
pub mod statistics;
pub mod variables;

pub use convert_case;

pub use crate::basic_types::Contradiction;
pub use crate::basic_types::EmptyDomain;
pub use crate::basic_types::Entailment;
pub use crate::basic_types::PropagationStatus;
pub use crate::engine::EngineOptions;
pub use crate::engine::EngineStatistics;
pub use crate::state::State;
pub use crate::state::StateOptions;

#[cfg(test)]
pub(crate) mod test_propagators;
