//! Core types and definitions for decoy-duel.
//!
//! This crate defines the vocabulary shared by the targeting engine, the
//! controllers and the replay tool: geometry, contact reports, enums,
//! decisions and tuning constants. It has no knowledge of any host engine.

pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod types;

#[cfg(test)]
mod tests;
