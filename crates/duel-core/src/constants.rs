//! Tuning constants. Every value here is a default; profiles can override it.

/// Seconds of simulated time per tick.
pub const TICK_SECS: f64 = 1.0;

// --- History tracking ---

/// Position samples kept per contact by command controllers.
pub const COMMAND_POSITION_WINDOW: usize = 5;

/// Position samples kept per contact by torpedo controllers.
pub const TORPEDO_POSITION_WINDOW: usize = 4;

/// Velocity samples kept per contact.
pub const VELOCITY_WINDOW: usize = 3;

/// Ticks a contact may go unseen before its history is evicted.
pub const HISTORY_STALE_TICKS: u64 = 10;

/// Ticks within which a contact counts towards threat density.
pub const ACTIVE_CONTACT_TICKS: u64 = 2;

/// Confidence of a freshly created history.
pub const INITIAL_CONFIDENCE: f64 = 0.5;

// --- Classification ---

/// Genuine-target speed band (units per tick). The real vessel cruises at 3.0.
pub const GENUINE_SPEED_MIN: f64 = 2.5;
pub const GENUINE_SPEED_MAX: f64 = 3.5;

/// Maximum speed variance for a genuine target.
pub const GENUINE_MAX_SPEED_VARIANCE: f64 = 0.2;

/// Minimum average heading change (rad) for a genuine target's evasive track.
pub const GENUINE_MIN_HEADING_CHANGE: f64 = 0.3;

/// Confidence assigned to a genuine-target classification.
pub const GENUINE_CONFIDENCE: f64 = 0.9;

/// Self-propelled decoy speed band.
pub const SELF_PROPELLED_SPEED_MIN: f64 = 1.5;
pub const SELF_PROPELLED_SPEED_MAX: f64 = 2.5;

/// Maximum speed variance for a self-propelled decoy.
pub const SELF_PROPELLED_MAX_SPEED_VARIANCE: f64 = 0.1;

/// Maximum average heading change (rad) for a self-propelled decoy.
pub const SELF_PROPELLED_MAX_HEADING_CHANGE: f64 = 0.2;

/// Confidence assigned to a self-propelled decoy classification.
pub const SELF_PROPELLED_CONFIDENCE: f64 = 0.8;

/// Below this average speed a contact is a stationary decoy.
pub const STATIONARY_MAX_SPEED: f64 = 0.5;

/// Confidence assigned to a stationary decoy classification.
pub const STATIONARY_CONFIDENCE: f64 = 0.9;

/// Decoys at or above this confidence are treated as confirmed.
pub const DECOY_CONFIRM_CONFIDENCE: f64 = 0.8;

/// Genuine targets above this confidence steer strategy selection.
pub const GENUINE_STRATEGY_CONFIDENCE: f64 = 0.7;

// --- Group deployment ---

/// New contacts in a single tick that indicate a decoy salvo.
pub const GROUP_DEPLOYMENT_MIN_NEW: usize = 3;

/// Confidence given to the contact nearest the salvo centroid.
pub const GROUP_DEPLOYMENT_CONFIDENCE: f64 = 0.8;

// --- Scoring ---

/// Ship nominal speed used by the signature scorer.
pub const SHIP_STANDARD_SPEED: f64 = 3.0;

/// Class score of a confirmed decoy under decoy-aware strategies.
pub const CONFIRMED_DECOY_SCORE: f64 = 1.0;

/// Bonus for a genuine target under PrioritizeGenuine.
pub const PRIORITIZE_GENUINE_BONUS: f64 = 50.0;

/// Bonus for contacts near the estimated genuine position under BypassDecoys.
pub const BYPASS_PROXIMITY_BONUS: f64 = 30.0;

/// Radius around the estimated genuine position that earns the bypass bonus.
pub const BYPASS_PROXIMITY_RADIUS: f64 = 10.0;

// --- Selection ---

/// Lock cycles before the attacking torpedo applies hysteresis.
pub const ATTACK_TORPEDO_MIN_LOCK_CYCLES: u32 = 1;

/// Improvement required for the attacking torpedo to switch.
pub const ATTACK_TORPEDO_SWITCH_THRESHOLD: f64 = 0.15;

/// Lock cycles before the defending torpedo applies hysteresis.
pub const DEFENSE_TORPEDO_MIN_LOCK_CYCLES: u32 = 3;

/// Improvement required for the defending torpedo to switch.
pub const DEFENSE_TORPEDO_SWITCH_THRESHOLD: f64 = 0.10;

// --- Reactive planning ---

/// Range below which the attacking platform evades.
pub const DANGER_DISTANCE: f64 = 15.0;

/// Speed multiplier requested with an evasion maneuver.
pub const EVASION_SPEED_FACTOR: f64 = 1.2;

/// Random heading jitter (degrees, ±) on attack evasion.
pub const EVASION_JITTER_DEG: f64 = 15.0;

/// Maximum heading change per tick (degrees).
pub const MAX_TURN_DEG_PER_TICK: f64 = 20.0;

/// Consecutive opening-range samples that count as a successful escape.
pub const ESCAPE_RUN_LENGTH: u32 = 3;

/// Range beyond which the platform counts as escaped.
pub const ESCAPE_SAFE_DISTANCE: f64 = 60.0;

/// Heading freeze after a successful escape (seconds).
pub const ESCAPE_COOLDOWN_SECS: f64 = 12.0;

/// Threat range at which decoys are deployed.
pub const DECOY_DEPLOY_DISTANCE: f64 = 35.0;

/// Minimum ticks between two decoy launches.
pub const MIN_LAUNCH_INTERVAL_TICKS: u64 = 5;

/// Default countermeasure budget per scenario run.
pub const DEFAULT_DECOY_BUDGET: f64 = 10.0;

/// Budget cost of a stationary decoy.
pub const STATIONARY_DECOY_COST: f64 = 1.0;

/// Budget cost of a self-propelled decoy.
pub const SELF_PROPELLED_DECOY_COST: f64 = 2.5;

// --- Pursuit pattern analysis ---

/// Samples kept for pursuit analysis of the closest threat.
pub const PURSUIT_WINDOW: usize = 4;

/// Samples required before a pursuit pattern is inferred.
pub const PURSUIT_MIN_SAMPLES: usize = 3;

/// Direction change (degrees) that counts as a turn.
pub const PURSUIT_TURN_DEG: f64 = 25.0;

/// Average range change below which the threat is closing steadily.
pub const PURSUIT_CLOSING_RATE: f64 = -0.5;

/// Confidence needed before pattern-based evasion is used.
pub const PURSUIT_MIN_CONFIDENCE: f64 = 0.2;

/// Zigzag offset from the reciprocal bearing (degrees).
pub const ZIGZAG_OFFSET_DEG: f64 = 45.0;

/// Seconds per zigzag leg.
pub const ZIGZAG_PERIOD_SECS: f64 = 2.0;

/// Offset from the reciprocal bearing at medium range (degrees).
pub const PREDICTIVE_OFFSET_DEG: f64 = 60.0;
