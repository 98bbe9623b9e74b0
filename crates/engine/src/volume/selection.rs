//! The transient pair of corner points an actor builds a claim from.

use super::area::AreaVolume;
use super::position::{BlockPos, Location, WorldId};

/// A claim-in-progress: up to two corners inside one world.
///
/// Pure value type. The per-actor session map that owns these lives in
/// the command layer, keyed by actor id; nothing here is global.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    world: Option<WorldId>,
    pos1: Option<BlockPos>,
    pos2: Option<BlockPos>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first corner. Selecting in a different world discards
    /// the previously set corner.
    pub fn set_first(&mut self, loc: Location) {
        self.reset_if_world_changed(&loc.world);
        self.world = Some(loc.world);
        self.pos1 = Some(loc.pos);
    }

    /// Set the second corner, with the same world rule as [`set_first`].
    ///
    /// [`set_first`]: Selection::set_first
    pub fn set_second(&mut self, loc: Location) {
        self.reset_if_world_changed(&loc.world);
        self.world = Some(loc.world);
        self.pos2 = Some(loc.pos);
    }

    fn reset_if_world_changed(&mut self, world: &WorldId) {
        if self.world.as_ref().is_some_and(|w| w != world) {
            self.pos1 = None;
            self.pos2 = None;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.pos1.is_some() && self.pos2.is_some()
    }

    /// Volume of the selected cuboid; 0 while a corner is missing.
    pub fn volume(&self) -> u64 {
        match (self.pos1, self.pos2) {
            (Some(a), Some(b)) => {
                let dx = (b.x - a.x).unsigned_abs() + 1;
                let dy = (b.y - a.y).unsigned_abs() + 1;
                let dz = (b.z - a.z).unsigned_abs() + 1;
                dx * dy * dz
            }
            _ => 0,
        }
    }

    /// Build the claim volume, once both corners are set.
    pub fn to_area(&self) -> Option<AreaVolume> {
        match (&self.world, self.pos1, self.pos2) {
            (Some(world), Some(a), Some(b)) => Some(AreaVolume::new(world.clone(), a, b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::WorldCatalog;

    fn setup() -> (WorldId, WorldId) {
        let mut catalog = WorldCatalog::new();
        (catalog.register("world"), catalog.register("nether"))
    }

    #[test]
    fn incomplete_selection_has_zero_volume_and_no_area() {
        let (w, _) = setup();
        let mut sel = Selection::new();
        assert_eq!(sel.volume(), 0);
        sel.set_first(Location::new(w, 0, 0, 0));
        assert_eq!(sel.volume(), 0);
        assert!(sel.to_area().is_none());
        assert!(!sel.is_complete());
    }

    #[test]
    fn complete_selection_builds_the_area() {
        let (w, _) = setup();
        let mut sel = Selection::new();
        sel.set_first(Location::new(w.clone(), 10, 10, 10));
        sel.set_second(Location::new(w.clone(), 1, 1, 1));
        assert_eq!(sel.volume(), 1000);
        let area = sel.to_area().unwrap();
        assert_eq!(area.min(), BlockPos::new(1, 1, 1));
        assert_eq!(area.max(), BlockPos::new(10, 10, 10));
        assert_eq!(area.world(), &w);
    }

    #[test]
    fn corner_in_another_world_restarts_the_selection() {
        let (w, nether) = setup();
        let mut sel = Selection::new();
        sel.set_first(Location::new(w, 0, 0, 0));
        sel.set_second(Location::new(nether, 5, 5, 5));
        assert!(!sel.is_complete());
        assert!(sel.to_area().is_none());
    }
}
