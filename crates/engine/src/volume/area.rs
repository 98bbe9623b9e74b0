//! Axis-aligned claim volumes.

use std::fmt;

use crate::error::FlatError;

use super::position::{BlockPos, Location, WorldCatalog, WorldId};

/// An immutable axis-aligned box over integer block coordinates inside
/// one world.
///
/// Whatever pair of corners it is built from, the box is stored
/// normalized: `min <= max` on every axis. Bounds are inclusive on both
/// ends, so a one-block selection has volume 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaVolume {
    world: WorldId,
    min: BlockPos,
    max: BlockPos,
}

impl AreaVolume {
    pub fn new(world: WorldId, a: BlockPos, b: BlockPos) -> Self {
        Self {
            world,
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    pub fn world(&self) -> &WorldId {
        &self.world
    }

    pub fn min(&self) -> BlockPos {
        self.min
    }

    pub fn max(&self) -> BlockPos {
        self.max
    }

    /// Inclusive containment on all three axes. A location in another
    /// world is never contained.
    pub fn contains(&self, loc: &Location) -> bool {
        self.world == loc.world
            && loc.pos.x >= self.min.x
            && loc.pos.x <= self.max.x
            && loc.pos.y >= self.min.y
            && loc.pos.y <= self.max.y
            && loc.pos.z >= self.min.z
            && loc.pos.z <= self.max.z
    }

    /// Standard AABB overlap test: the projections overlap on all three
    /// axes at once. Boxes in different worlds never intersect.
    pub fn intersects(&self, other: &AreaVolume) -> bool {
        self.world == other.world
            && self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// True when `loc` is within `range` blocks of either corner on
    /// every axis (Chebyshev bound). Used to keep boundary highlighting
    /// limited to nearby areas, not for containment logic.
    pub fn within_distance(&self, loc: &Location, range: i64) -> bool {
        if self.world != loc.world {
            return false;
        }
        let near = |corner: BlockPos| {
            (loc.pos.x - corner.x).abs() <= range
                && (loc.pos.y - corner.y).abs() <= range
                && (loc.pos.z - corner.z).abs() <= range
        };
        near(self.min) || near(self.max)
    }

    /// Number of blocks inside the box.
    pub fn volume(&self) -> u64 {
        let dx = (self.max.x - self.min.x + 1) as u64;
        let dy = (self.max.y - self.min.y + 1) as u64;
        let dz = (self.max.z - self.min.z + 1) as u64;
        dx * dy * dz
    }

    /// Lazy iterator over every block on the outer shell: any position
    /// with at least one axis at its min or max.
    pub fn boundary_cells(&self) -> impl Iterator<Item = BlockPos> + use<> {
        let (min, max) = (self.min, self.max);
        (min.x..=max.x).flat_map(move |x| {
            (min.y..=max.y).flat_map(move |y| {
                (min.z..=max.z).filter_map(move |z| {
                    let on_shell = x == min.x
                        || x == max.x
                        || y == min.y
                        || y == max.y
                        || z == min.z
                        || z == max.z;
                    on_shell.then_some(BlockPos::new(x, y, z))
                })
            })
        })
    }

    /// Parse the compact `world:x1,y1,z1;x2,y2,z2` form, resolving the
    /// world through `catalog`. Fails with [`FlatError::InvalidFormat`]
    /// on fewer than seven fields, non-integer coordinates, or an
    /// unknown world.
    pub fn parse(s: &str, catalog: &WorldCatalog) -> Result<Self, FlatError> {
        let bad = || FlatError::InvalidFormat(s.to_string());
        let parts: Vec<&str> = s.split([':', ';', ',']).collect();
        if parts.len() < 7 {
            return Err(bad());
        }
        let world = catalog.resolve(parts[0]).ok_or_else(bad)?;
        let mut coords = [0i64; 6];
        for (slot, part) in coords.iter_mut().zip(&parts[1..7]) {
            *slot = part.trim().parse().map_err(|_| bad())?;
        }
        Ok(Self::new(
            world,
            BlockPos::new(coords[0], coords[1], coords[2]),
            BlockPos::new(coords[3], coords[4], coords[5]),
        ))
    }
}

impl fmt::Display for AreaVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{},{},{};{},{},{}",
            self.world, self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> (WorldCatalog, WorldId) {
        let mut catalog = WorldCatalog::new();
        let id = catalog.register("world");
        (catalog, id)
    }

    fn area(w: &WorldId, a: (i64, i64, i64), b: (i64, i64, i64)) -> AreaVolume {
        AreaVolume::new(
            w.clone(),
            BlockPos::new(a.0, a.1, a.2),
            BlockPos::new(b.0, b.1, b.2),
        )
    }

    #[test]
    fn corners_normalize() {
        let (_, w) = world();
        let a = area(&w, (10, 20, 30), (-1, -2, -3));
        assert_eq!(a.min(), BlockPos::new(-1, -2, -3));
        assert_eq!(a.max(), BlockPos::new(10, 20, 30));
    }

    #[test]
    fn contains_is_inclusive_at_both_corners() {
        let (_, w) = world();
        let a = area(&w, (1, 1, 1), (10, 10, 10));
        assert!(a.contains(&Location::new(w.clone(), 1, 1, 1)));
        assert!(a.contains(&Location::new(w.clone(), 10, 10, 10)));
        assert!(a.contains(&Location::new(w.clone(), 5, 5, 5)));
        assert!(!a.contains(&Location::new(w.clone(), 0, 5, 5)));
        assert!(!a.contains(&Location::new(w, 11, 5, 5)));
    }

    #[test]
    fn contains_rejects_other_worlds() {
        let (mut catalog, w) = world();
        let nether = catalog.register("nether");
        let a = area(&w, (0, 0, 0), (10, 10, 10));
        assert!(!a.contains(&Location::new(nether, 5, 5, 5)));
    }

    #[test]
    fn intersects_is_symmetric() {
        let (_, w) = world();
        let pairs = [
            (area(&w, (0, 0, 0), (10, 10, 10)), area(&w, (5, 5, 5), (15, 15, 15))),
            (area(&w, (0, 0, 0), (10, 10, 10)), area(&w, (10, 10, 10), (20, 20, 20))),
            (area(&w, (0, 0, 0), (10, 10, 10)), area(&w, (11, 0, 0), (20, 10, 10))),
            (area(&w, (-5, -5, -5), (-1, -1, -1)), area(&w, (0, 0, 0), (3, 3, 3))),
        ];
        for (a, b) in &pairs {
            assert_eq!(a.intersects(b), b.intersects(a));
        }
    }

    #[test]
    fn touching_boxes_intersect_separate_boxes_do_not() {
        let (_, w) = world();
        let a = area(&w, (0, 0, 0), (10, 10, 10));
        // Shared face at x = 10.
        assert!(a.intersects(&area(&w, (10, 0, 0), (20, 10, 10))));
        // One block gap on x.
        assert!(!a.intersects(&area(&w, (11, 0, 0), (20, 10, 10))));
        // Overlap on x/z but not y.
        assert!(!a.intersects(&area(&w, (0, 11, 0), (10, 20, 10))));
    }

    #[test]
    fn boxes_in_different_worlds_never_intersect() {
        let (mut catalog, w) = world();
        let nether = catalog.register("nether");
        let a = area(&w, (0, 0, 0), (10, 10, 10));
        let b = AreaVolume::new(nether, BlockPos::new(0, 0, 0), BlockPos::new(10, 10, 10));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn within_distance_checks_either_corner() {
        let (_, w) = world();
        let a = area(&w, (0, 0, 0), (100, 10, 100));
        assert!(a.within_distance(&Location::new(w.clone(), 5, 5, 5), 10));
        assert!(a.within_distance(&Location::new(w.clone(), 95, 5, 95), 10));
        assert!(!a.within_distance(&Location::new(w, 50, 5, 50), 10));
    }

    #[test]
    fn volume_counts_inclusive_blocks() {
        let (_, w) = world();
        assert_eq!(area(&w, (1, 1, 1), (10, 10, 10)).volume(), 1000);
        assert_eq!(area(&w, (3, 3, 3), (3, 3, 3)).volume(), 1);
    }

    #[test]
    fn boundary_cells_cover_exactly_the_shell() {
        let (_, w) = world();
        let a = area(&w, (0, 0, 0), (3, 3, 3));
        let cells: Vec<_> = a.boundary_cells().collect();
        // 4^3 total minus the 2^3 interior.
        assert_eq!(cells.len(), 64 - 8);
        assert!(cells.iter().all(|c| {
            c.x == 0 || c.x == 3 || c.y == 0 || c.y == 3 || c.z == 0 || c.z == 3
        }));
    }

    #[test]
    fn boundary_of_flat_area_is_every_cell() {
        let (_, w) = world();
        let a = area(&w, (0, 5, 0), (2, 5, 2));
        assert_eq!(a.boundary_cells().count(), 9);
    }

    #[test]
    fn display_parse_round_trip() {
        let (catalog, w) = world();
        let a = area(&w, (-3, 7, 12), (4, -2, 9));
        let s = a.to_string();
        assert_eq!(s, "world:-3,-2,9;4,7,12");
        let back = AreaVolume::parse(&s, &catalog).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn parse_rejects_malformed_strings() {
        let (catalog, _) = world();
        for s in ["", "world", "world:1,2,3", "world:1,2,3;4,5", "world:1,2,x;4,5,6"] {
            assert!(matches!(
                AreaVolume::parse(s, &catalog),
                Err(FlatError::InvalidFormat(_))
            ), "expected InvalidFormat for {s:?}");
        }
    }

    #[test]
    fn parse_rejects_unknown_world() {
        let (catalog, _) = world();
        assert!(matches!(
            AreaVolume::parse("void:1,2,3;4,5,6", &catalog),
            Err(FlatError::InvalidFormat(_))
        ));
    }
}
