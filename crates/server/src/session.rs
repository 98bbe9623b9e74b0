//! Per-actor selection sessions.
//!
//! Each actor building a claim has at most one in-progress
//! [`Selection`]. The tracker is owned by the command layer and keyed
//! by actor id; a selection is never read across actors and is dropped
//! when the actor disconnects or changes world.

use std::collections::HashMap;

use uuid::Uuid;

use flats_engine::volume::{Location, Selection};

#[derive(Debug, Default)]
pub struct SessionTracker {
    selections: HashMap<Uuid, Selection>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_first(&mut self, actor: Uuid, loc: Location) {
        self.selections.entry(actor).or_default().set_first(loc);
    }

    pub fn select_second(&mut self, actor: Uuid, loc: Location) {
        self.selections.entry(actor).or_default().set_second(loc);
    }

    pub fn selection(&self, actor: Uuid) -> Option<&Selection> {
        self.selections.get(&actor)
    }

    /// Drop the actor's selection (disconnect, or explicit reset).
    pub fn clear(&mut self, actor: Uuid) {
        self.selections.remove(&actor);
    }

    /// An actor that switched worlds starts over.
    pub fn actor_changed_world(&mut self, actor: Uuid) {
        self.clear(actor);
    }
}
