/// Options which determine how the propagation engine schedules propagators.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Activate the propagators added before the first propagation ordered by priority, and by
    /// scope size within a priority; otherwise they are activated in the order they were added.
    pub sort_activation_by_priority: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            sort_activation_by_priority: true,
        }
    }
}
