//! Core of the flats claim system.
//!
//! A "flat" is a named claim made of one or more axis-aligned volumes
//! inside a voxel world, with an optional owner and a set of trusted
//! players. This crate holds everything with algorithmic content: the
//! volume geometry, the grid-bucketed spatial index, the authoritative
//! registry, and the authorization decisions consumed by protection
//! checks.
//!
//! Everything here is synchronous and in-memory, mutated from a single
//! logical thread. Persistence, scheduling and command plumbing live in
//! the server crate.

pub mod auth;
pub mod error;
pub mod flat;
pub mod index;
pub mod registry;
pub mod volume;
