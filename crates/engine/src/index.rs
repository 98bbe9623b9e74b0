//! Grid-bucketed spatial index over flats.
//!
//! Flats change rarely compared to how often containment is queried
//! (every protected block event, every movement tick), so the index
//! trades a little insert/remove work for cheap point lookups: each
//! 16x16 column of a world maps to the short list of flats whose areas
//! touch it.
//!
//! The index is a derived cache. It never owns flats -- cells hold flat
//! names -- and it can always be rebuilt from the registry's flat set.

use std::collections::HashMap;

use crate::flat::Flat;
use crate::volume::{AreaVolume, Location, WorldId};

/// Edge length of one grid cell in blocks.
pub const GRID_SIZE: i64 = 16;

/// One 16x16 column of a specific world.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GridKey {
    world: WorldId,
    x: i64,
    z: i64,
}

impl GridKey {
    fn at(loc: &Location) -> Self {
        Self {
            world: loc.world.clone(),
            x: loc.pos.x.div_euclid(GRID_SIZE),
            z: loc.pos.z.div_euclid(GRID_SIZE),
        }
    }
}

#[derive(Debug, Default)]
pub struct SpatialIndex {
    cells: HashMap<GridKey, Vec<String>>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the flat under every cell its areas span.
    ///
    /// A flat with several areas may appear under many cells, and more
    /// than once in a single cell; duplicates are harmless because
    /// lookups always finish with a precise containment test.
    pub fn insert(&mut self, flat: &Flat) {
        for area in flat.areas() {
            self.insert_area(flat.name(), area);
        }
    }

    /// Register one additional area of an already-indexed flat.
    pub fn insert_area(&mut self, name: &str, area: &AreaVolume) {
        for key in cell_range(area) {
            self.cells.entry(key).or_default().push(name.to_string());
        }
    }

    /// Remove the flat from exactly the cells its areas span, dropping
    /// cells that end up empty.
    pub fn remove(&mut self, flat: &Flat) {
        for area in flat.areas() {
            for key in cell_range(area) {
                let emptied = match self.cells.get_mut(&key) {
                    Some(names) => {
                        names.retain(|n| n != flat.name());
                        names.is_empty()
                    }
                    None => false,
                };
                if emptied {
                    self.cells.remove(&key);
                }
            }
        }
    }

    /// Drop every cell; used before a full rebuild from the registry.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Candidate flat names for the cell containing `loc`. Usually
    /// empty or a handful of names; the caller still has to do the
    /// exact containment test.
    pub fn candidates(&self, loc: &Location) -> &[String] {
        self.cells
            .get(&GridKey::at(loc))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of non-empty cells (diagnostics and tests).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// Inclusive range of cells an area's XZ footprint spans.
fn cell_range(area: &AreaVolume) -> impl Iterator<Item = GridKey> + '_ {
    let min_x = area.min().x.div_euclid(GRID_SIZE);
    let max_x = area.max().x.div_euclid(GRID_SIZE);
    let min_z = area.min().z.div_euclid(GRID_SIZE);
    let max_z = area.max().z.div_euclid(GRID_SIZE);
    (min_x..=max_x).flat_map(move |x| {
        (min_z..=max_z).map(move |z| GridKey {
            world: area.world().clone(),
            x,
            z,
        })
    })
}
