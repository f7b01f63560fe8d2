use enum_map::Enum;

/// The cost class of a propagator; cheaper classes are propagated first.
///
/// The engine keeps one queue per priority and always runs a propagator from the first non-empty
/// queue, so a queue is drained completely (including the propagators it schedules into itself)
/// before a later queue is touched.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Enum)]
#[repr(u8)]
pub enum Priority {
    Unary = 0,
    Binary = 1,
    Ternary = 2,
    Linear = 3,
    Quadratic = 4,
    Cubic = 5,
    #[default]
    VerySlow = 6,
}

impl Priority {
    pub const ALL: [Priority; 7] = [
        Priority::Unary,
        Priority::Binary,
        Priority::Ternary,
        Priority::Linear,
        Priority::Quadratic,
        Priority::Cubic,
        Priority::VerySlow,
    ];
}
