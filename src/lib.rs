//! Flap Royale - last bird flapping
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (avatars, pipe track, collisions, round state)
//! - `settings`: Data-driven gameplay tuning
//! - `stats`: In-memory session statistics

pub mod settings;
pub mod sim;
pub mod stats;

pub use settings::Tuning;
pub use stats::SessionStats;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Downward acceleration added to velocity every tick
    pub const GRAVITY: f32 = 0.25;
    /// Upward velocity set by a flap
    pub const IMPULSE: f32 = 4.0;

    /// Field defaults (pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Avatar defaults
    pub const AVATAR_RADIUS: f32 = 15.0;
    /// Half-extent of the pipe hitbox, narrower than the drawn radius
    pub const COLLISION_TOLERANCE: f32 = 10.0;
    pub const PLAYER_X: f32 = 100.0;
    /// Bots spawn at BOT_X_MIN + U[0, BOT_X_SPREAD)
    pub const BOT_X_MIN: f32 = 50.0;
    pub const BOT_X_SPREAD: f32 = 100.0;
    /// Everyone spawns at height/2 ± SPAWN_Y_SPREAD/2
    pub const SPAWN_Y_SPREAD: f32 = 200.0;
    pub const BOT_COUNT: usize = 49;

    /// Pipe defaults
    pub const OBSTACLE_SPEED: f32 = 3.0;
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const OBSTACLE_GAP: f32 = 160.0;
    pub const SPAWN_INTERVAL_TICKS: u64 = 110;
    /// Split point is drawn from [SPLIT_MARGIN, height - SPLIT_RESERVE)
    pub const SPLIT_MARGIN: f32 = 100.0;
    pub const SPLIT_RESERVE: f32 = 300.0;
    /// Pipes are dropped once their trailing edge is this far past x = 0
    pub const PRUNE_MARGIN: f32 = 100.0;

    /// Bot decision policy
    pub const BOT_LOOKAHEAD: f32 = 50.0;
    pub const BOT_TARGET_JITTER: f32 = 80.0;
    pub const BOT_FLAP_MARGIN: f32 = 15.0;
    pub const BOT_MAX_ERROR_TOLERANCE: f32 = 0.05;

    /// No win until this many pipes have spawned in the round
    pub const MIN_OBSTACLES_FOR_WIN: u32 = 6;

    /// Label used when the player leaves the name blank
    pub const DEFAULT_PLAYER_LABEL: &str = "Player";
    pub const BOT_LABEL: &str = "Bot";
}
