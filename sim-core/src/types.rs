/// Stable handle for a [`crate::body::Body`].
///
/// Ids are handed out by [`crate::simulation::Simulation`] in creation
/// order and never reused, so a handle stays valid across the re-sorting
/// done by the broad phase. Once the body is merged away and purged,
/// lookups by this id return `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);
