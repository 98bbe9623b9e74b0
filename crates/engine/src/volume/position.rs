use std::fmt;
use std::sync::Arc;

/// Absolute block position in a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl BlockPos {
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }
}

/// Identifier of a logical world/dimension.
///
/// Only obtainable through a [`WorldCatalog`], so an area can never
/// refer to a world the host does not have. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(Arc<str>);

impl WorldId {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of worlds claim areas can be resolved against.
#[derive(Debug, Clone, Default)]
pub struct WorldCatalog {
    worlds: Vec<WorldId>,
}

impl WorldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a world name, returning its id. Registering the same
    /// name twice yields the same id.
    pub fn register(&mut self, name: &str) -> WorldId {
        if let Some(id) = self.resolve(name) {
            return id;
        }
        let id = WorldId(Arc::from(name));
        self.worlds.push(id.clone());
        id
    }

    /// Look up a registered world by name.
    pub fn resolve(&self, name: &str) -> Option<WorldId> {
        self.worlds.iter().find(|w| w.name() == name).cloned()
    }
}

/// A block position in a specific world: the query point for all
/// containment and authorization checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub world: WorldId,
    pub pos: BlockPos,
}

impl Location {
    pub fn new(world: WorldId, x: i64, y: i64, z: i64) -> Self {
        Self {
            world,
            pos: BlockPos::new(x, y, z),
        }
    }
}
