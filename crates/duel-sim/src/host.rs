//! Collaborator traits the host engine provides to controllers.
//!
//! Controllers never see the host's entity store. They read their own
//! platform through `OwnPlatform` and hand new entities back through
//! `EntityRegistrar`.

use duel_core::error::RegistrationError;
use duel_core::types::{ContactReport, DecoySpec, OwnShipState, Position};

/// The platform a controller is mounted on.
pub trait OwnPlatform {
    fn position(&self) -> Position;

    /// Heading in degrees, 0 = North, clockwise.
    fn heading(&self) -> f64;

    fn xy_speed(&self) -> f64;

    /// Whether a contact is a threat this platform should react to.
    fn threat_evaluation(&self, contact: &ContactReport) -> bool;

    /// Platform-level override of the contact a controller chose.
    fn get_target(&self, chosen: &ContactReport) -> Option<ContactReport>;

    /// Clear any platform-level target override.
    fn reset_target(&mut self);

    fn decoy_loadout(&self) -> &[DecoySpec];

    fn own_state(&self) -> OwnShipState {
        OwnShipState {
            position: self.position(),
            heading_deg: self.heading(),
            xy_speed: self.xy_speed(),
        }
    }
}

/// Hands newly launched entities to the host.
pub trait EntityRegistrar {
    /// Register a decoy launched at `origin`. Ticks are relative to now:
    /// the decoy becomes active after `activation_tick` and is destroyed
    /// at `destroy_tick`.
    fn register_decoy(
        &mut self,
        spec: &DecoySpec,
        origin: Position,
        activation_tick: u64,
        destroy_tick: u64,
    ) -> Result<(), RegistrationError>;
}
