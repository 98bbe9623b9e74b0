//! Flat enter/leave distribution.
//!
//! Movement events from the host are reduced to boundary crossings:
//! when an actor's containing flat changes, a [`FlatTransition`] is
//! published on a `tokio::sync::broadcast` channel for anything that
//! reacts to actors entering or leaving claims. Subscribers that fall
//! behind simply miss transitions; the tracker itself stays correct.

use std::collections::HashMap;

use tokio::sync::broadcast;
use uuid::Uuid;

use flats_engine::registry::FlatRegistry;
use flats_engine::volume::Location;

/// Capacity of the transition channel; crossings are rare compared to
/// raw movement events, so a small buffer is plenty.
pub const BUS_CAPACITY: usize = 256;

/// An actor crossed a flat boundary. `from`/`to` are flat names;
/// `None` is the wilderness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatTransition {
    pub actor: Uuid,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Remembers which flat each actor is currently inside and publishes a
/// transition whenever that changes.
pub struct MovementTracker {
    current: HashMap<Uuid, Option<String>>,
    tx: broadcast::Sender<FlatTransition>,
}

impl MovementTracker {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self {
            current: HashMap::new(),
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FlatTransition> {
        self.tx.subscribe()
    }

    /// Record a movement. Publishes and returns the transition when the
    /// containing flat changed, `None` for movement within the same
    /// flat or the same stretch of wilderness.
    pub fn moved(
        &mut self,
        registry: &FlatRegistry,
        actor: Uuid,
        loc: &Location,
    ) -> Option<FlatTransition> {
        let now = registry.get_by_location(loc).map(|f| f.name().to_string());
        let before = self.current.insert(actor, now.clone()).unwrap_or(None);
        if before == now {
            return None;
        }
        let transition = FlatTransition {
            actor,
            from: before,
            to: now,
        };
        // No subscribers is fine.
        let _ = self.tx.send(transition.clone());
        Some(transition)
    }

    /// Forget a disconnected actor. Publishes a leave transition if
    /// they were inside a flat.
    pub fn actor_left(&mut self, actor: Uuid) -> Option<FlatTransition> {
        let before = self.current.remove(&actor)??;
        let transition = FlatTransition {
            actor,
            from: Some(before),
            to: None,
        };
        let _ = self.tx.send(transition.clone());
        Some(transition)
    }
}

impl Default for MovementTracker {
    fn default() -> Self {
        Self::new()
    }
}
