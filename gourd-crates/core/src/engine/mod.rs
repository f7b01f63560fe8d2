//! The propagation engine and the structures it schedules with.
mod dynamic_propagators;
mod fine_events;
mod options;
mod propagation_engine;
mod propagator_queue;

pub(crate) use dynamic_propagators::DynamicPropagators;
pub(crate) use fine_events::FineEvents;
pub use options::EngineOptions;
pub(crate) use propagation_engine::PropagationEngine;
pub use propagation_engine::EngineStatistics;
pub(crate) use propagator_queue::PropagatorQueue;
