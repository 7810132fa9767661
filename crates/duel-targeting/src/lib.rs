//! Adaptive target selection and threat classification.
//!
//! Pure decision logic: contact histories, kinematic classification,
//! scoring, hysteresis-based selection and reactive planning. No host
//! dependency; controllers in `duel-sim` drive it.

pub mod budget;
pub mod classifier;
pub mod deployment;
pub mod engagement;
pub mod engine;
pub mod history;
pub mod planner;
pub mod profiles;
pub mod pursuit;
pub mod scoring;
pub mod selector;
pub mod strategy;

pub use duel_core as core;
pub use engine::TargetingEngine;
