//! Harness systems run by `DuelEngine` each tick.
//!
//! Systems are free functions over the hecs `World`. They hold no state.

pub mod cleanup;
pub mod movement;
pub mod sensor;
