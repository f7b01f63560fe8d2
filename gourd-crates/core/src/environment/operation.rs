use std::fmt::Debug;

/// An arbitrary reversible action.
///
/// Saved through [`Environment::save`](super::Environment::save); [`Operation::undo`] is called
/// once the world in which it was saved is popped. Operations saved in the same world are undone
/// in the reverse order in which they were saved.
pub trait Operation: Debug {
    fn undo(self: Box<Self>);
}
