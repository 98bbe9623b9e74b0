//! Line-based admin console.
//!
//! Stands in for the host's command collaborator: it parses one line
//! per command, drives the [`CommandHandler`], and renders the discrete
//! outcomes as text. The real game-server integration would do exactly
//! the same calls from its own command plumbing.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use flats_engine::auth::{self, Actor};
use flats_engine::volume::{Location, WorldCatalog};

use crate::commands::{CommandHandler, CommandOutcome};

pub struct Console {
    handler: Arc<Mutex<CommandHandler>>,
    catalog: WorldCatalog,
    actor: Actor,
}

impl Console {
    /// The console starts as an administrative actor; `actor` switches
    /// identity for exercising ownership and trust from several sides.
    pub fn new(handler: Arc<Mutex<CommandHandler>>, catalog: WorldCatalog) -> Self {
        Self {
            handler,
            catalog,
            actor: Actor::admin(Uuid::new_v4()),
        }
    }

    /// Execute one console line and return the text to print.
    pub fn dispatch(&mut self, line: &str) -> String {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, args)) = tokens.split_first() else {
            return String::new();
        };

        let mut handler = self.handler.lock().expect("command handler poisoned");
        match (cmd, args) {
            ("help", _) => HELP.to_string(),

            ("actor", [id]) => match Uuid::parse_str(id) {
                Ok(id) => {
                    self.actor = Actor::new(id);
                    format!("Acting as {id}")
                }
                Err(_) => format!("Not a UUID: {id}"),
            },
            ("actor", [id, "admin"]) => match Uuid::parse_str(id) {
                Ok(id) => {
                    self.actor = Actor::admin(id);
                    format!("Acting as {id} (admin bypass)")
                }
                Err(_) => format!("Not a UUID: {id}"),
            },

            ("select1", rest) => match self.parse_location(rest) {
                Ok(loc) => {
                    handler.sessions_mut().select_first(self.actor.id, loc);
                    "First corner set".to_string()
                }
                Err(e) => e,
            },
            ("select2", rest) => match self.parse_location(rest) {
                Ok(loc) => {
                    handler.sessions_mut().select_second(self.actor.id, loc);
                    "Second corner set".to_string()
                }
                Err(e) => e,
            },

            ("add", [name]) => render(handler.add(&self.actor, name)),
            ("remove", [name]) => render(handler.remove(name)),
            ("list", []) => render(handler.list()),

            ("claim", rest) => match self.parse_location(rest) {
                Ok(loc) => render(handler.claim(&self.actor, &loc)),
                Err(e) => e,
            },
            ("unclaim", rest) => match self.parse_location(rest) {
                Ok(loc) => render(handler.unclaim(&self.actor, &loc)),
                Err(e) => e,
            },
            ("trust", [target, rest @ ..]) => self.trust_command(&mut handler, target, rest, true),
            ("untrust", [target, rest @ ..]) => {
                self.trust_command(&mut handler, target, rest, false)
            }
            ("info", rest) => match self.parse_location(rest) {
                Ok(loc) => render(handler.info(&loc)),
                Err(e) => e,
            },
            ("check", rest) => match self.parse_location(rest) {
                Ok(loc) => {
                    let decision = auth::resolve_at(handler.registry(), &self.actor, &loc);
                    format!("{decision:?}")
                }
                Err(e) => e,
            },

            _ => format!("Unknown command '{cmd}' (try 'help')"),
        }
    }

    fn trust_command(
        &self,
        handler: &mut CommandHandler,
        target: &str,
        rest: &[&str],
        grant: bool,
    ) -> String {
        let target = match Uuid::parse_str(target) {
            Ok(id) => id,
            Err(_) => return format!("Not a UUID: {target}"),
        };
        match self.parse_location(rest) {
            Ok(loc) => render(if grant {
                handler.trust(&self.actor, target, &loc)
            } else {
                handler.untrust(&self.actor, target, &loc)
            }),
            Err(e) => e,
        }
    }

    fn parse_location(&self, args: &[&str]) -> Result<Location, String> {
        let [world, x, y, z] = args else {
            return Err("Expected: <world> <x> <y> <z>".to_string());
        };
        let world = self
            .catalog
            .resolve(world)
            .ok_or_else(|| format!("Unknown world '{world}'"))?;
        let parse = |s: &str| s.parse::<i64>().map_err(|_| format!("Not a coordinate: {s}"));
        Ok(Location::new(world, parse(x)?, parse(y)?, parse(z)?))
    }
}

fn render(outcome: CommandOutcome) -> String {
    use CommandOutcome::*;
    match outcome {
        Created { flat } => format!("Created flat '{flat}'"),
        Extended { flat } => format!("Added area to flat '{flat}'"),
        Deleted { flat } => format!("Deleted flat '{flat}'"),
        Claimed { flat } => format!("Flat '{flat}' is now yours"),
        AlreadyYours { flat } => format!("Flat '{flat}' is already yours"),
        OwnedBy { flat, owner } => format!("Flat '{flat}' is already owned by {owner}"),
        ClaimLimitReached { max } => format!("You already own the maximum of {max} flats"),
        Unclaimed { flat } => format!("Flat '{flat}' released"),
        Trusted { flat, target } => format!("{target} is now trusted in '{flat}'"),
        AlreadyTrusted { flat, target } => format!("{target} is already trusted in '{flat}'"),
        Untrusted { flat, target } => format!("{target} is no longer trusted in '{flat}'"),
        NotTrusted { flat, target } => format!("{target} is not trusted in '{flat}'"),
        Overlap { flat, area } => format!("Selection intersects flat '{flat}' at {area}"),
        NotFound { flat } => format!("No flat named '{flat}'"),
        NotInFlat => "You are not inside a flat".to_string(),
        NotOwner { flat } => format!("Flat '{flat}' is not yours"),
        NothingSelected => "Select two corners first".to_string(),
        SelectionTooLarge { volume, max } => {
            format!("Selection of {volume} blocks exceeds the limit of {max}")
        }
        Info(info) => {
            let mut out = format!("Flat '{}'\n", info.flat);
            match info.owner {
                Some(owner) => out.push_str(&format!("  owner: {owner}\n")),
                None => out.push_str("  unclaimed\n"),
            }
            for id in &info.trusted {
                out.push_str(&format!("  trusted: {id}\n"));
            }
            for area in &info.areas {
                out.push_str(&format!("  area: {area}\n"));
            }
            out.trim_end().to_string()
        }
        List { flats } => {
            if flats.is_empty() {
                return "No flats".to_string();
            }
            flats
                .iter()
                .map(|s| {
                    let owner = s
                        .owner
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "unclaimed".to_string());
                    format!("{} ({} areas, {owner})", s.flat, s.areas)
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

const HELP: &str = "\
Commands:
  actor <uuid> [admin]        switch acting identity
  select1 <world> <x> <y> <z> set the first corner
  select2 <world> <x> <y> <z> set the second corner
  add <name>                  create or extend a flat from the selection
  remove <name>               delete a flat
  claim <world> <x> <y> <z>   claim the flat at a location
  unclaim <world> <x> <y> <z> release the flat at a location
  trust <uuid> <world> <x> <y> <z>
  untrust <uuid> <world> <x> <y> <z>
  info <world> <x> <y> <z>    show the flat at a location
  check <world> <x> <y> <z>   protection decision for the current actor
  list                        list all flats
  help                        this text";
