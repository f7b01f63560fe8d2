//! The contract between the engine and the filtering algorithms.
//!
//! A propagator takes the domains of the variables in its scope and removes values which cannot
//! be part of any solution, or reports that no solution exists in the current world. Every
//! concrete propagator implements [`Propagator`], and is created by a [`PropagatorConstructor`]
//! which registers its scope through a [`PropagatorConstructorContext`].
//!
//! During filtering a propagator only talks to the solver through the
//! [`PropagationContext`]: it reads domains through [`ReadDomains`] and updates them with
//! [`PropagationContext::update_lower_bound`] and friends. A domain update which would empty a
//! domain returns a [`Contradiction`](crate::basic_types::Contradiction) which the propagator
//! passes on with `?`.
//!
//! Propagators are not required to reach a fixpoint on their own; the engine calls them again
//! until no further events happen.
//!
//! # How to implement a new propagator?
//!
//! 1. Implement [`Propagator::name`] and [`Propagator::propagate`], filtering from scratch.
//! 2. Implement [`PropagatorConstructor`], registering the scope.
//! 3. Declare [`Propagator::priority`] and, per variable,
//!    [`Propagator::propagation_conditions`].
//! 4. For incrementality, return `true` from [`Propagator::reacts_to_fine_events`] and implement
//!    [`Propagator::propagate_fine`], deferring expensive work with
//!    [`PropagationContext::force_propagate`].
//! 5. Implement [`Propagator::is_entailed`] so that solutions can be checked.
//!
//! The propagator is added to the solver through [`State::add_propagator`](crate::State::add_propagator).

mod constructor;
mod contexts;
mod domains;
mod local_id;
mod priority;
mod propagator;
mod propagator_id;
pub(crate) mod store;

pub use constructor::*;
pub use contexts::*;
pub use domains::*;
pub use local_id::*;
pub use priority::*;
pub use propagator::*;
pub use propagator_id::PropagatorId;
pub use store::PropagatorHandle;
