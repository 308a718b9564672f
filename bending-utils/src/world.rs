//! World identifiers and positions.

use std::fmt;
use std::sync::Arc;

use glam::DVec3;

/// Name of a loaded world. Cheap to clone.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(Arc<str>);

impl WorldId {
    /// Creates a world id from its name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// The world name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorldId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A position inside a specific world.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    /// The world the position is in.
    pub world: WorldId,
    /// Block-space coordinates.
    pub position: DVec3,
}

impl Location {
    /// Creates a location.
    #[must_use]
    pub const fn new(world: WorldId, position: DVec3) -> Self {
        Self { world, position }
    }
}
