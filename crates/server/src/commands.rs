//! The flats command surface.
//!
//! Every handler returns a discrete [`CommandOutcome`] for the host to
//! render as user feedback; no message formatting happens here. The
//! handler owns the registry, the selection sessions and the settings,
//! and is driven from one logical thread.

use uuid::Uuid;

use flats_engine::auth::{self, Actor};
use flats_engine::error::FlatError;
use flats_engine::flat::Flat;
use flats_engine::registry::FlatRegistry;
use flats_engine::volume::Location;

use crate::session::SessionTracker;
use crate::settings::Settings;

/// Discrete result of one command, rendered by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Created { flat: String },
    Extended { flat: String },
    Deleted { flat: String },
    Claimed { flat: String },
    AlreadyYours { flat: String },
    OwnedBy { flat: String, owner: Uuid },
    ClaimLimitReached { max: usize },
    Unclaimed { flat: String },
    Trusted { flat: String, target: Uuid },
    AlreadyTrusted { flat: String, target: Uuid },
    Untrusted { flat: String, target: Uuid },
    NotTrusted { flat: String, target: Uuid },
    Overlap { flat: String, area: String },
    NotFound { flat: String },
    NotInFlat,
    NotOwner { flat: String },
    NothingSelected,
    SelectionTooLarge { volume: u64, max: u64 },
    Info(FlatInfo),
    List { flats: Vec<FlatSummary> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatInfo {
    pub flat: String,
    pub owner: Option<Uuid>,
    pub trusted: Vec<Uuid>,
    pub areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatSummary {
    pub flat: String,
    pub owner: Option<Uuid>,
    pub areas: usize,
}

pub struct CommandHandler {
    registry: FlatRegistry,
    sessions: SessionTracker,
    settings: Settings,
}

impl CommandHandler {
    pub fn new(registry: FlatRegistry, settings: Settings) -> Self {
        Self {
            registry,
            sessions: SessionTracker::new(),
            settings,
        }
    }

    pub fn registry(&self) -> &FlatRegistry {
        &self.registry
    }

    pub fn sessions_mut(&mut self) -> &mut SessionTracker {
        &mut self.sessions
    }

    /// Defensive copy for the persistence worker.
    pub fn snapshot(&self) -> Vec<Flat> {
        self.registry.snapshot()
    }

    /// Turn the actor's selection into a new flat, or a new area of an
    /// existing flat. The overlap check runs before any mutation.
    pub fn add(&mut self, actor: &Actor, name: &str) -> CommandOutcome {
        let Some(area) = self
            .sessions
            .selection(actor.id)
            .and_then(|sel| sel.to_area())
        else {
            return CommandOutcome::NothingSelected;
        };

        let volume = area.volume();
        if volume > self.settings.max_flat_volume {
            return CommandOutcome::SelectionTooLarge {
                volume,
                max: self.settings.max_flat_volume,
            };
        }

        if let Err(FlatError::Overlap { flat, area }) = auth::check_claimable(&self.registry, &area)
        {
            return CommandOutcome::Overlap { flat, area };
        }

        if self.registry.exists(name) {
            // Checked above, cannot fail.
            let _ = self.registry.add_area(name, area);
            CommandOutcome::Extended { flat: name.to_string() }
        } else {
            let _ = self.registry.create(name, area);
            CommandOutcome::Created { flat: name.to_string() }
        }
    }

    pub fn remove(&mut self, name: &str) -> CommandOutcome {
        match self.registry.delete(name) {
            Ok(flat) => CommandOutcome::Deleted { flat: flat.name().to_string() },
            Err(_) => CommandOutcome::NotFound { flat: name.to_string() },
        }
    }

    /// Claim the flat at the actor's location.
    pub fn claim(&mut self, actor: &Actor, loc: &Location) -> CommandOutcome {
        let Some(name) = self.flat_name_at(loc) else {
            return CommandOutcome::NotInFlat;
        };

        // Precondition order matches the user-facing feedback: own flat
        // first, then somebody else's, then the claim limit.
        let flat = self.registry.get(&name).expect("name came from the index");
        if flat.is_owner(actor.id) {
            return CommandOutcome::AlreadyYours { flat: name };
        }
        if let Some(owner) = flat.owner() {
            return CommandOutcome::OwnedBy { flat: name, owner };
        }
        let max = self.settings.max_claimable_flats;
        if !actor.admin_bypass && self.registry.owned_count(actor.id) >= max {
            return CommandOutcome::ClaimLimitReached { max };
        }

        let flat = self.registry.flat_mut(&name).expect("checked above");
        match auth::claim(flat, actor) {
            Ok(()) => CommandOutcome::Claimed { flat: name },
            // Owner state cannot have changed between the checks above
            // and here; keep the arms anyway for completeness.
            Err(FlatError::AlreadyYours) => CommandOutcome::AlreadyYours { flat: name },
            Err(FlatError::AlreadyOwned { owner }) => CommandOutcome::OwnedBy { flat: name, owner },
            Err(_) => CommandOutcome::NotInFlat,
        }
    }

    /// Release the flat at the actor's location.
    pub fn unclaim(&mut self, actor: &Actor, loc: &Location) -> CommandOutcome {
        let Some(name) = self.flat_name_at(loc) else {
            return CommandOutcome::NotInFlat;
        };
        let flat = self.registry.flat_mut(&name).expect("name came from the index");
        match auth::unclaim(flat, actor) {
            Ok(()) => CommandOutcome::Unclaimed { flat: name },
            Err(_) => CommandOutcome::NotOwner { flat: name },
        }
    }

    pub fn trust(&mut self, actor: &Actor, target: Uuid, loc: &Location) -> CommandOutcome {
        let Some(name) = self.flat_name_at(loc) else {
            return CommandOutcome::NotInFlat;
        };
        let flat = self.registry.flat_mut(&name).expect("name came from the index");
        match auth::trust(flat, actor, target) {
            Ok(()) => CommandOutcome::Trusted { flat: name, target },
            Err(FlatError::AlreadyTrusted(_)) | Err(FlatError::CannotTrustOwner) => {
                CommandOutcome::AlreadyTrusted { flat: name, target }
            }
            Err(_) => CommandOutcome::NotOwner { flat: name },
        }
    }

    pub fn untrust(&mut self, actor: &Actor, target: Uuid, loc: &Location) -> CommandOutcome {
        let Some(name) = self.flat_name_at(loc) else {
            return CommandOutcome::NotInFlat;
        };
        let flat = self.registry.flat_mut(&name).expect("name came from the index");
        match auth::untrust(flat, actor, target) {
            Ok(()) => CommandOutcome::Untrusted { flat: name, target },
            Err(FlatError::NotTrusted(_)) => CommandOutcome::NotTrusted { flat: name, target },
            Err(_) => CommandOutcome::NotOwner { flat: name },
        }
    }

    pub fn info(&self, loc: &Location) -> CommandOutcome {
        match self.registry.get_by_location(loc) {
            Some(flat) => {
                let mut trusted: Vec<Uuid> = flat.trusted().iter().copied().collect();
                trusted.sort();
                CommandOutcome::Info(FlatInfo {
                    flat: flat.name().to_string(),
                    owner: flat.owner(),
                    trusted,
                    areas: flat.areas().iter().map(ToString::to_string).collect(),
                })
            }
            None => CommandOutcome::NotInFlat,
        }
    }

    pub fn list(&self) -> CommandOutcome {
        CommandOutcome::List {
            flats: self
                .registry
                .iter()
                .map(|flat| FlatSummary {
                    flat: flat.name().to_string(),
                    owner: flat.owner(),
                    areas: flat.areas().len(),
                })
                .collect(),
        }
    }

    fn flat_name_at(&self, loc: &Location) -> Option<String> {
        self.registry.get_by_location(loc).map(|f| f.name().to_string())
    }
}
