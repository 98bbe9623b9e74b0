//! The authoritative collection of all flats.

use indexmap::IndexMap;
use uuid::Uuid;

use crate::error::FlatError;
use crate::flat::Flat;
use crate::index::SpatialIndex;
use crate::volume::{AreaVolume, Location};

/// The existing area a candidate claim collides with, kept as user
/// feedback for the rejection message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub flat: String,
    pub area: String,
}

/// Owns the canonical flat set and the spatial index derived from it.
///
/// Every mutation goes through this type, so the index can never
/// diverge from the flats: create/extend insert into the index, delete
/// removes from it, bulk load rebuilds it. The registry is confined to
/// one logical thread; background persistence only ever sees
/// [`snapshot`](FlatRegistry::snapshot) copies.
#[derive(Debug, Default)]
pub struct FlatRegistry {
    flats: IndexMap<String, Flat>,
    index: SpatialIndex,
}

impl FlatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.flats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flats.is_empty()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.flats.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Flat> {
        self.flats.get(name)
    }

    /// Mutable access for ownership/trust transitions. Area mutation is
    /// not reachable from here (it is crate-private), so the index
    /// cannot be desynchronized through this handle.
    pub fn flat_mut(&mut self, name: &str) -> Result<&mut Flat, FlatError> {
        self.flats
            .get_mut(name)
            .ok_or_else(|| FlatError::NotFound(name.to_string()))
    }

    /// Create a new flat with a single initial area.
    ///
    /// Geometric overlap is deliberately not checked here; callers
    /// compose [`auth::check_claimable`](crate::auth::check_claimable)
    /// in front of this.
    pub fn create(&mut self, name: &str, area: AreaVolume) -> Result<(), FlatError> {
        if self.exists(name) {
            return Err(FlatError::DuplicateName(name.to_string()));
        }
        let flat = Flat::new(name, area);
        self.index.insert(&flat);
        self.flats.insert(name.to_string(), flat);
        Ok(())
    }

    /// Append another area to an existing flat.
    pub fn add_area(&mut self, name: &str, area: AreaVolume) -> Result<(), FlatError> {
        let flat = self
            .flats
            .get_mut(name)
            .ok_or_else(|| FlatError::NotFound(name.to_string()))?;
        self.index.insert_area(name, &area);
        flat.add_area(area);
        Ok(())
    }

    /// Remove a flat from the registry and the index.
    pub fn delete(&mut self, name: &str) -> Result<Flat, FlatError> {
        let flat = self
            .flats
            .shift_remove(name)
            .ok_or_else(|| FlatError::NotFound(name.to_string()))?;
        self.index.remove(&flat);
        Ok(flat)
    }

    /// The flat containing `loc`, if any. Index candidates first, then
    /// the precise containment test; equivalent to a brute-force scan
    /// over all flats.
    pub fn get_by_location(&self, loc: &Location) -> Option<&Flat> {
        self.index
            .candidates(loc)
            .iter()
            .filter_map(|name| self.flats.get(name))
            .find(|flat| flat.contains(loc))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flat> {
        self.flats.values()
    }

    /// Snapshot of all flat names, in creation order.
    pub fn all_names(&self) -> Vec<String> {
        self.flats.keys().cloned().collect()
    }

    /// Snapshot of every area across all flats.
    pub fn all_areas(&self) -> Vec<AreaVolume> {
        self.flats
            .values()
            .flat_map(|flat| flat.areas().iter().cloned())
            .collect()
    }

    /// Number of flats owned by `id`, for claim limits.
    pub fn owned_count(&self, id: Uuid) -> usize {
        self.flats.values().filter(|flat| flat.is_owner(id)).count()
    }

    /// First existing area the candidate intersects, if any.
    pub fn find_conflict(&self, candidate: &AreaVolume) -> Option<Conflict> {
        for flat in self.flats.values() {
            for area in flat.areas() {
                if area.intersects(candidate) {
                    return Some(Conflict {
                        flat: flat.name().to_string(),
                        area: area.to_string(),
                    });
                }
            }
        }
        None
    }

    /// Replace the whole in-memory state, rebuilding the index. Flats
    /// arriving under an already-seen name are skipped with a warning
    /// rather than clobbering the first one.
    pub fn replace_all(&mut self, flats: Vec<Flat>) {
        self.flats.clear();
        self.index.clear();
        for flat in flats {
            if self.flats.contains_key(flat.name()) {
                tracing::warn!("Skipping duplicate flat '{}' during load", flat.name());
                continue;
            }
            self.index.insert(&flat);
            self.flats.insert(flat.name().to_string(), flat);
        }
    }

    /// Defensive copy of every flat (map plus each area list), handed
    /// to the persistence worker so it never reads live state.
    pub fn snapshot(&self) -> Vec<Flat> {
        self.flats.values().cloned().collect()
    }
}
