/// Options which determine how the [`Environment`](super::Environment) stores its trails.
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentOptions {
    /// The memory layout of every trail.
    pub trail_storage: TrailStorageStrategy,
    /// The number of entries a trail can hold before it first grows. For
    /// [`TrailStorageStrategy::Chunked`] this is the size of every chunk.
    pub initial_trail_capacity: usize,
    /// The factor by which a [`TrailStorageStrategy::Array`] trail grows when it is full.
    pub load_factor: f64,
}

impl Default for EnvironmentOptions {
    fn default() -> Self {
        Self {
            trail_storage: TrailStorageStrategy::default(),
            initial_trail_capacity: 256,
            load_factor: 1.5,
        }
    }
}

/// The memory layout of a trail. The choice does not influence behaviour, only performance.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum TrailStorageStrategy {
    /// A single growable array; growing occasionally copies the whole trail.
    #[default]
    Array,
    /// Fixed-size chunks allocated on demand; entries are never copied, but every access goes
    /// through one more indirection.
    Chunked,
}
