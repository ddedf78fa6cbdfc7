//! Compile-time measurement constants.

// ── Reception ─────────────────────────────────────────────────────────────────

/// Wire buffer size for one NMEA sentence, terminator slot included.
pub const SENTENCE_CAPACITY: usize = 120;

/// Upper bound on comma-separated fields kept per sentence (GGA has 15).
pub const MAX_FIELDS: usize = 20;

// ── Output ────────────────────────────────────────────────────────────────────

/// Rendered chunks the output queue holds before text is dropped. One fix
/// renders at most two (progress, finish).
pub const OUTBOX_DEPTH: usize = 4;

// ── Race ──────────────────────────────────────────────────────────────────────

/// Ground speed (km/h) that must be exceeded to count as a start.
pub const SPEED_TRIGGER_KMH: f64 = 1.5;

/// Distance from the start point (m) that ends the run.
pub const TARGET_DISTANCE_M: f64 = 75.0;

// ── Units ─────────────────────────────────────────────────────────────────────

/// 1 knot = 1.852 km/h
pub const KNOTS_TO_KMH: f64 = 1.852;

/// Mean Earth radius for the spherical model (m).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Period of the tick that advances [`crate::Clock`].
pub const TICK_PERIOD_MS: u64 = 1;
