//! Gameplay tuning
//!
//! Every physics and generation constant the simulation reads. Fixed once a
//! round state is built; loaded from JSON by the driver.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Data-driven gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    /// Added to velocity every tick
    pub gravity: f32,
    /// Magnitude of the upward velocity a flap sets
    pub impulse: f32,

    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Avatars ===
    pub avatar_radius: f32,
    /// Pipe hitbox half-extent (forgiving, <= radius)
    pub collision_tolerance: f32,
    pub player_x: f32,
    pub bot_x_min: f32,
    pub bot_x_spread: f32,
    pub spawn_y_spread: f32,
    pub bot_count: usize,

    // === Pipes ===
    pub obstacle_speed: f32,
    pub obstacle_width: f32,
    pub obstacle_gap: f32,
    pub spawn_interval: u64,
    pub split_margin: f32,
    pub split_reserve: f32,
    pub prune_margin: f32,

    // === Bot policy ===
    pub bot_lookahead: f32,
    pub bot_target_jitter: f32,
    pub bot_flap_margin: f32,
    /// Upper bound (exclusive) of the per-bot error tolerance
    pub bot_max_error_tolerance: f32,

    // === Round ===
    pub min_obstacles_for_win: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            impulse: IMPULSE,

            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            avatar_radius: AVATAR_RADIUS,
            collision_tolerance: COLLISION_TOLERANCE,
            player_x: PLAYER_X,
            bot_x_min: BOT_X_MIN,
            bot_x_spread: BOT_X_SPREAD,
            spawn_y_spread: SPAWN_Y_SPREAD,
            bot_count: BOT_COUNT,

            obstacle_speed: OBSTACLE_SPEED,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_gap: OBSTACLE_GAP,
            spawn_interval: SPAWN_INTERVAL_TICKS,
            split_margin: SPLIT_MARGIN,
            split_reserve: SPLIT_RESERVE,
            prune_margin: PRUNE_MARGIN,

            bot_lookahead: BOT_LOOKAHEAD,
            bot_target_jitter: BOT_TARGET_JITTER,
            bot_flap_margin: BOT_FLAP_MARGIN,
            bot_max_error_tolerance: BOT_MAX_ERROR_TOLERANCE,

            min_obstacles_for_win: MIN_OBSTACLES_FOR_WIN,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning in {}: {}; using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON (for writing a starter tuning file)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values so every random range stays closed and non-empty
    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }

    pub fn sanitize(&mut self) {
        self.spawn_interval = self.spawn_interval.max(1);
        self.avatar_radius = finite_or(self.avatar_radius, AVATAR_RADIUS).max(1.0);
        self.collision_tolerance =
            finite_or(self.collision_tolerance, COLLISION_TOLERANCE).clamp(0.0, self.avatar_radius);
        self.obstacle_gap = finite_or(self.obstacle_gap, OBSTACLE_GAP).max(1.0);
        self.obstacle_width = finite_or(self.obstacle_width, OBSTACLE_WIDTH).max(1.0);
        self.field_width = finite_or(self.field_width, FIELD_WIDTH).max(1.0);
        self.field_height = finite_or(self.field_height, FIELD_HEIGHT).max(1.0);

        self.gravity = finite_or(self.gravity, GRAVITY);
        self.impulse = finite_or(self.impulse, IMPULSE).abs();
        self.obstacle_speed = finite_or(self.obstacle_speed, OBSTACLE_SPEED).max(0.0);

        self.bot_x_spread = finite_or(self.bot_x_spread, BOT_X_SPREAD).max(0.0);
        self.spawn_y_spread = finite_or(self.spawn_y_spread, SPAWN_Y_SPREAD).max(0.0);
        self.split_margin = finite_or(self.split_margin, SPLIT_MARGIN).max(0.0);
        self.split_reserve = finite_or(self.split_reserve, SPLIT_RESERVE).max(0.0);
        self.prune_margin = finite_or(self.prune_margin, PRUNE_MARGIN).max(0.0);

        self.bot_lookahead = finite_or(self.bot_lookahead, BOT_LOOKAHEAD);
        self.bot_target_jitter = finite_or(self.bot_target_jitter, BOT_TARGET_JITTER).max(0.0);
        self.bot_flap_margin = finite_or(self.bot_flap_margin, BOT_FLAP_MARGIN);
        self.bot_max_error_tolerance =
            finite_or(self.bot_max_error_tolerance, BOT_MAX_ERROR_TOLERANCE).clamp(0.0, 1.0);
    }

    /// Range the split point of a new pipe is drawn from, for a field of the
    /// given height. Never empty.
    pub fn split_range(&self, field_height: f32) -> (f32, f32) {
        let low = self.split_margin;
        let high = (field_height - self.split_reserve).max(low);
        (low, high)
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let tuning = Tuning::default();
        assert_eq!(tuning.gravity, 0.25);
        assert_eq!(tuning.impulse, 4.0);
        assert_eq!(tuning.obstacle_gap, 160.0);
        assert_eq!(tuning.spawn_interval, 110);
        assert_eq!(tuning.bot_count, 49);
        assert_eq!(tuning.min_obstacles_for_win, 6);
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.5, "bot_count": 3 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.bot_count, 3);
        assert_eq!(tuning.obstacle_speed, OBSTACLE_SPEED);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Tuning::from_json("not json").is_err());
    }

    #[test]
    fn test_sanitize_clamps_degenerate_values() {
        let tuning = Tuning {
            spawn_interval: 0,
            avatar_radius: -3.0,
            collision_tolerance: 50.0,
            obstacle_gap: 0.0,
            impulse: -4.0,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(tuning.spawn_interval, 1);
        assert_eq!(tuning.avatar_radius, 1.0);
        assert_eq!(tuning.collision_tolerance, 1.0);
        assert_eq!(tuning.obstacle_gap, 1.0);
        assert_eq!(tuning.impulse, 4.0);
    }

    #[test]
    fn test_split_range_never_inverted() {
        let tuning = Tuning::default();
        assert_eq!(tuning.split_range(600.0), (100.0, 300.0));
        // Field shorter than the reserve collapses to a single point
        assert_eq!(tuning.split_range(200.0), (100.0, 100.0));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let tuning = Tuning::load("/definitely/not/here/tuning.json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_json_roundtrip_keeps_values() {
        let tuning = Tuning {
            bot_count: 7,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert!(!json.is_empty());
        let parsed = Tuning::from_json(&json).unwrap();
        assert_eq!(parsed, tuning);
    }
}
