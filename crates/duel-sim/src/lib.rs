//! Controllers and a headless harness for decoy duels.
//!
//! `controller` and `launcher` hold the decision units a host engine drives
//! through the traits in `host`. `DuelEngine` is a small hecs-backed host
//! that runs scripted scenarios, used by the replay tool and the tests.

pub mod components;
pub mod controller;
pub mod engine;
pub mod host;
pub mod launcher;
pub mod scenario;
pub mod systems;

pub use duel_targeting as targeting;
pub use engine::DuelEngine;

#[cfg(test)]
mod tests;
