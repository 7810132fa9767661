//! Decoy launcher.
//!
//! Idles until a deploy order arrives, then registers every ordered decoy
//! with the host in the same tick. The decoys in an order are already paid
//! for by the commanding controller; refused ones are kept aside so the
//! host can hand them back for a refund.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use duel_core::events::Decision;
use duel_core::types::{DecoySpec, Position};

use crate::host::EntityRegistrar;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LauncherPhase {
    #[default]
    Wait,
    Launch,
}

#[derive(Debug, Clone)]
pub struct Launcher {
    name: String,
    phase: LauncherPhase,
    order: Vec<DecoySpec>,
    refused: Vec<DecoySpec>,
}

impl Launcher {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phase: LauncherPhase::Wait,
            order: Vec::new(),
            refused: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> LauncherPhase {
        self.phase
    }

    /// Ordered decoys the host refused since the last call.
    pub fn take_refused(&mut self) -> Vec<DecoySpec> {
        std::mem::take(&mut self.refused)
    }

    /// External transition: a deploy order arrived.
    pub fn ext_trans(&mut self, decoys: Vec<DecoySpec>) {
        self.order.extend(decoys);
        self.phase = LauncherPhase::Launch;
    }

    /// Register the ordered decoys at `origin`. Each lives for its lifespan
    /// rounded up to whole ticks. Failed registrations are skipped and
    /// collected for `take_refused`.
    pub fn output(
        &mut self,
        origin: Position,
        registrar: &mut dyn EntityRegistrar,
    ) -> Vec<Decision> {
        if self.phase != LauncherPhase::Launch {
            return Vec::new();
        }

        let mut launched = Vec::new();
        for (idx, spec) in self.order.drain(..).enumerate() {
            let destroy_tick = spec.lifespan_ticks();
            match registrar.register_decoy(&spec, origin, 0, destroy_tick) {
                Ok(()) => {
                    info!(
                        launcher = %self.name,
                        index = idx,
                        decoy = ?spec.decoy_type,
                        lifespan_ticks = destroy_tick,
                        "decoy launched"
                    );
                    launched.push(spec.decoy_type);
                }
                Err(e) => {
                    warn!(launcher = %self.name, index = idx, error = %e, "decoy registration failed");
                    self.refused.push(spec);
                }
            }
        }

        if launched.is_empty() {
            return Vec::new();
        }
        vec![Decision::DecoysLaunched { types: launched }]
    }

    pub fn int_trans(&mut self) {
        if self.phase == LauncherPhase::Launch {
            self.phase = LauncherPhase::Wait;
        }
    }
}
