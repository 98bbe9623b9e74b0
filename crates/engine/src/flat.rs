//! A named claim: one or more areas, an optional owner, trusted players.

use std::collections::HashSet;

use uuid::Uuid;

use crate::volume::{AreaVolume, Location};

/// A named aggregate of claim volumes.
///
/// The name is the primary key and never changes after creation. The
/// area list is non-empty and keeps insertion order for display. An
/// absent owner means the flat is unclaimed; the trusted set is only
/// meaningful while owned and is cleared together with the owner.
///
/// Mutators are crate-private: all writes go through the registry and
/// the auth transitions so the spatial index and the ownership
/// invariants cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flat {
    name: String,
    areas: Vec<AreaVolume>,
    owner: Option<Uuid>,
    trusted: HashSet<Uuid>,
}

impl Flat {
    pub fn new(name: impl Into<String>, area: AreaVolume) -> Self {
        Self {
            name: name.into(),
            areas: vec![area],
            owner: None,
            trusted: HashSet::new(),
        }
    }

    /// Rebuild a flat from persisted parts. Returns `None` when no
    /// valid area survived loading. Trusted entries without an owner
    /// are meaningless and are discarded.
    pub fn from_parts(
        name: impl Into<String>,
        areas: Vec<AreaVolume>,
        owner: Option<Uuid>,
        trusted: impl IntoIterator<Item = Uuid>,
    ) -> Option<Self> {
        if areas.is_empty() {
            return None;
        }
        let trusted = match owner {
            Some(_) => trusted.into_iter().collect(),
            None => HashSet::new(),
        };
        Some(Self {
            name: name.into(),
            areas,
            owner,
            trusted,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn areas(&self) -> &[AreaVolume] {
        &self.areas
    }

    pub fn owner(&self) -> Option<Uuid> {
        self.owner
    }

    pub fn trusted(&self) -> &HashSet<Uuid> {
        &self.trusted
    }

    /// True when any of the flat's areas contains the location.
    pub fn contains(&self, loc: &Location) -> bool {
        self.areas.iter().any(|area| area.contains(loc))
    }

    pub fn is_owner(&self, id: Uuid) -> bool {
        self.owner == Some(id)
    }

    pub fn is_trusted(&self, id: Uuid) -> bool {
        self.trusted.contains(&id)
    }

    pub(crate) fn add_area(&mut self, area: AreaVolume) {
        self.areas.push(area);
    }

    pub(crate) fn set_owner(&mut self, id: Uuid) {
        self.owner = Some(id);
    }

    /// Clears the owner and the whole trusted set in one step; trust
    /// must not survive unclaiming.
    pub(crate) fn clear_owner(&mut self) {
        self.owner = None;
        self.trusted.clear();
    }

    /// Returns false if the target was already trusted.
    pub(crate) fn add_trusted(&mut self, id: Uuid) -> bool {
        self.trusted.insert(id)
    }

    /// Returns false if the target was not trusted.
    pub(crate) fn remove_trusted(&mut self, id: Uuid) -> bool {
        self.trusted.remove(&id)
    }
}
