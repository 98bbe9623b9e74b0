//! Host-side glue around the flats claim engine: persistence, settings,
//! per-actor selection sessions, the command surface, boundary
//! highlighting, and the enter/leave event bus.

pub mod commands;
pub mod console;
pub mod events;
pub mod highlight;
pub mod persistence;
pub mod session;
pub mod settings;
