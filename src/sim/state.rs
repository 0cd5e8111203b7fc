//! Round state and core simulation types
//!
//! Everything a round mutates lives in [`RoundState`]; presentation code only
//! reads it through the query methods, the event queue and snapshots.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::out_of_bounds;
use super::snapshot::RoundSnapshot;
use super::track::{Obstacle, Track};
use crate::consts::{BOT_LABEL, DEFAULT_PLAYER_LABEL};
use crate::settings::Tuning;

/// The player always occupies this slot in the avatar list
pub const PLAYER_INDEX: usize = 0;

/// Neon palette shared by the player picker and bot colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorToken {
    #[default]
    Cyan,
    Magenta,
    Green,
    Yellow,
    Orange,
}

impl ColorToken {
    pub const PALETTE: [ColorToken; 5] = [
        ColorToken::Cyan,
        ColorToken::Magenta,
        ColorToken::Green,
        ColorToken::Yellow,
        ColorToken::Orange,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            ColorToken::Cyan => "#00ffff",
            ColorToken::Magenta => "#ff00ff",
            ColorToken::Green => "#00ff00",
            ColorToken::Yellow => "#ffff00",
            ColorToken::Orange => "#ff3300",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cyan" | "#00ffff" => Some(ColorToken::Cyan),
            "magenta" | "#ff00ff" => Some(ColorToken::Magenta),
            "green" | "#00ff00" => Some(ColorToken::Green),
            "yellow" | "#ffff00" => Some(ColorToken::Yellow),
            "orange" | "#ff3300" => Some(ColorToken::Orange),
            _ => None,
        }
    }

    /// Uniform pick from the palette
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::PALETTE[rng.random_range(0..Self::PALETTE.len())]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Bot,
}

/// A falling circular entity (player or bot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub role: Role,
    pub label: String,
    pub color: ColorToken,
    /// x is fixed after creation; only y moves
    pub pos: Vec2,
    /// Vertical velocity (positive is down)
    pub velocity: f32,
    pub radius: f32,
    pub alive: bool,
    /// Chance in [0, 1) that a bot skips a flap it wanted. Always 0 for the player.
    pub error_tolerance: f32,
}

impl Avatar {
    pub fn new_player(label: &str, color: ColorToken, pos: Vec2, radius: f32) -> Self {
        Self {
            role: Role::Player,
            label: normalize_label(label),
            color,
            pos,
            velocity: 0.0,
            radius,
            alive: true,
            error_tolerance: 0.0,
        }
    }

    pub fn new_bot(color: ColorToken, pos: Vec2, radius: f32, error_tolerance: f32) -> Self {
        Self {
            role: Role::Bot,
            label: BOT_LABEL.to_string(),
            color,
            pos,
            velocity: 0.0,
            radius,
            alive: true,
            error_tolerance,
        }
    }

    pub fn is_player(&self) -> bool {
        self.role == Role::Player
    }

    /// One fixed step of semi-implicit Euler: velocity first, then position
    pub fn integrate(&mut self, gravity: f32) {
        if !self.alive {
            return;
        }
        self.velocity += gravity;
        self.pos.y += self.velocity;
    }

    /// Kill the avatar if it left [0, field_height]. Returns true only on the
    /// tick it died.
    pub fn check_bounds(&mut self, field_height: f32) -> bool {
        self.alive && out_of_bounds(self.pos.y, self.radius, field_height) && self.kill()
    }

    /// Flap: overwrite velocity with the upward impulse
    pub fn impulse(&mut self, magnitude: f32) {
        self.velocity = -magnitude;
    }

    /// Mark dead. Returns false if the avatar was already dead.
    pub fn kill(&mut self) -> bool {
        std::mem::replace(&mut self.alive, false)
    }
}

/// Blank labels become the default placeholder
pub fn normalize_label(label: &str) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_LABEL.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
}

/// Round controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for start
    #[default]
    Idle,
    /// Tick loop active
    Running,
    /// Simulation halted with a recorded outcome
    Ended(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    OutOfBounds,
    Obstacle,
}

/// Things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// `seed` replays this round through `RoundState::start_with_seed`
    RoundStarted { seed: u64, avatars: usize },
    ObstacleSpawned { id: u32 },
    ObstaclePassed { id: u32, score: u64 },
    AvatarDied { index: usize, cause: DeathCause },
    RoundEnded { outcome: Outcome, score: u64 },
}

/// Complete state of one round plus the random source that drives it
#[derive(Debug, Clone)]
pub struct RoundState {
    pub(crate) tuning: Tuning,
    pub(crate) seed: u64,
    /// Draws one seed per round
    pub(crate) session_rng: Pcg32,
    pub(crate) round_seed: u64,
    /// Reseeded from `round_seed` on every start
    pub(crate) rng: Pcg32,
    pub(crate) phase: RoundPhase,
    pub(crate) field: Vec2,
    pub(crate) elapsed_ticks: u64,
    pub(crate) score: u64,
    pub(crate) alive_count: usize,
    /// Index 0 is always the player once a round has started
    pub(crate) avatars: Vec<Avatar>,
    pub(crate) track: Track,
    pub(crate) events: Vec<RoundEvent>,
}

impl RoundState {
    /// Create an idle round seeded from OS entropy
    pub fn new(tuning: Tuning) -> Self {
        Self::with_seed(tuning, rand::random())
    }

    /// Create an idle round with a fixed seed (reproducible)
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        let tuning = tuning.sanitized();
        let field = Vec2::new(tuning.field_width, tuning.field_height);
        Self {
            tuning,
            seed,
            session_rng: Pcg32::seed_from_u64(seed),
            round_seed: seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RoundPhase::Idle,
            field,
            elapsed_ticks: 0,
            score: 0,
            alive_count: 0,
            avatars: Vec::new(),
            track: Track::default(),
            events: Vec::new(),
        }
    }

    /// Begin a fresh round from any phase. Each start draws a new round seed
    /// from the session stream.
    pub fn start(&mut self, player_label: &str, player_color: ColorToken) {
        let round_seed = self.session_rng.random();
        self.start_with_seed(player_label, player_color, round_seed);
    }

    /// Begin a round driven entirely by `round_seed`. The same seed, tuning
    /// and inputs replay the same round.
    pub fn start_with_seed(
        &mut self,
        player_label: &str,
        player_color: ColorToken,
        round_seed: u64,
    ) {
        self.round_seed = round_seed;
        self.rng = Pcg32::seed_from_u64(round_seed);
        self.track.clear();
        self.elapsed_ticks = 0;
        self.score = 0;
        self.events.clear();
        self.avatars.clear();

        let radius = self.tuning.avatar_radius;
        let player_y = self.spawn_y();
        self.avatars.push(Avatar::new_player(
            player_label,
            player_color,
            Vec2::new(self.tuning.player_x, player_y),
            radius,
        ));

        for _ in 0..self.tuning.bot_count {
            let x = self.tuning.bot_x_min + self.rng.random::<f32>() * self.tuning.bot_x_spread;
            let y = self.spawn_y();
            let error_tolerance = self.rng.random::<f32>() * self.tuning.bot_max_error_tolerance;
            let color = ColorToken::random(&mut self.rng);
            self.avatars
                .push(Avatar::new_bot(color, Vec2::new(x, y), radius, error_tolerance));
        }

        self.alive_count = self.avatars.len();
        self.phase = RoundPhase::Running;
        self.events.push(RoundEvent::RoundStarted {
            seed: round_seed,
            avatars: self.avatars.len(),
        });
        log::info!(
            "Round started: player={:?}, bots={}, seed={}",
            self.avatars[PLAYER_INDEX].label,
            self.tuning.bot_count,
            round_seed
        );
    }

    /// Back to idle. The last score stays readable until the next start.
    pub fn reset(&mut self) {
        self.phase = RoundPhase::Idle;
    }

    /// Flap the player. Ignored unless running with the player alive.
    pub fn request_player_impulse(&mut self) -> bool {
        if self.phase != RoundPhase::Running {
            return false;
        }
        let impulse = self.tuning.impulse;
        match self.avatars.get_mut(PLAYER_INDEX) {
            Some(player) if player.alive => {
                player.impulse(impulse);
                true
            }
            _ => false,
        }
    }

    /// Follow a resized presentation surface. Degenerate sizes are ignored.
    pub fn resize_field(&mut self, width: f32, height: f32) {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.field = Vec2::new(width, height);
        } else {
            log::warn!("Ignoring invalid field size {}x{}", width, height);
        }
    }

    /// Spawn height: field midpoint ± half the configured spread
    fn spawn_y(&mut self) -> f32 {
        let spread = self.tuning.spawn_y_spread;
        self.field.y / 2.0 + (self.rng.random::<f32>() - 0.5) * spread
    }

    /// Mark the round ended and record it
    pub(crate) fn end(&mut self, outcome: Outcome) {
        self.phase = RoundPhase::Ended(outcome);
        self.events.push(RoundEvent::RoundEnded {
            outcome,
            score: self.score,
        });
        log::info!(
            "Round ended: {:?} after {} ticks, score {}",
            outcome,
            self.elapsed_ticks,
            self.score
        );
    }

    // === Queries ===

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seed of the current (or last) round
    pub fn round_seed(&self) -> u64 {
        self.round_seed
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            RoundPhase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn avatars(&self) -> &[Avatar] {
        &self.avatars
    }

    pub fn player(&self) -> Option<&Avatar> {
        self.avatars.get(PLAYER_INDEX)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.track.obstacles()
    }

    /// Pipes spawned so far this round (including pruned ones)
    pub fn obstacles_spawned(&self) -> u32 {
        self.track.spawned()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// (width, height)
    pub fn field_size(&self) -> (f32, f32) {
        (self.field.x, self.field.y)
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot_at(y: f32) -> Avatar {
        Avatar::new_bot(ColorToken::Cyan, Vec2::new(100.0, y), 15.0, 0.0)
    }

    #[test]
    fn test_integrate_applies_velocity_after_gravity() {
        let mut avatar = bot_at(300.0);
        avatar.integrate(0.25);
        assert_eq!(avatar.velocity, 0.25);
        assert_eq!(avatar.pos.y, 300.25);
        avatar.integrate(0.25);
        assert_eq!(avatar.velocity, 0.5);
        assert_eq!(avatar.pos.y, 300.75);
    }

    #[test]
    fn test_integrate_dead_is_noop() {
        let mut avatar = bot_at(300.0);
        avatar.kill();
        avatar.integrate(0.25);
        assert_eq!(avatar.velocity, 0.0);
        assert_eq!(avatar.pos.y, 300.0);
    }

    #[test]
    fn test_impulse_overwrites() {
        let mut once = bot_at(300.0);
        once.velocity = 7.0;
        once.impulse(4.0);

        let mut twice = bot_at(300.0);
        twice.velocity = 7.0;
        twice.impulse(4.0);
        twice.impulse(4.0);

        assert_eq!(once.velocity, -4.0);
        assert_eq!(twice.velocity, once.velocity);
    }

    proptest::proptest! {
        #[test]
        fn prop_gravity_strictly_increases_velocity(
            y in 100.0f32..500.0,
            gravity in 0.01f32..2.0,
            ticks in 1usize..50,
        ) {
            let mut avatar = bot_at(y);
            let mut last_velocity = avatar.velocity;
            for _ in 0..ticks {
                let last_y = avatar.pos.y;
                avatar.integrate(gravity);
                proptest::prop_assert!(avatar.velocity > last_velocity);
                proptest::prop_assert!((avatar.velocity - last_velocity - gravity).abs() < 1e-3);
                proptest::prop_assert_eq!(avatar.pos.y, last_y + avatar.velocity);
                last_velocity = avatar.velocity;
            }
        }
    }

    proptest::proptest! {
        // Any velocity that does not carry it back below the top edge
        // (y + v + 0.25 < 15)
        #[test]
        fn prop_bounds_death_once(velocity in -50.0f32..15.0, ticks in 1usize..50) {
            let mut avatar = bot_at(-1.0);
            avatar.velocity = velocity;
            avatar.integrate(0.25);
            proptest::prop_assert!(avatar.check_bounds(600.0));
            proptest::prop_assert!(!avatar.alive);

            // Later ticks neither move nor re-kill it
            let (y, v) = (avatar.pos.y, avatar.velocity);
            for _ in 0..ticks {
                avatar.integrate(0.25);
                proptest::prop_assert!(!avatar.check_bounds(600.0));
            }
            proptest::prop_assert_eq!(avatar.pos.y, y);
            proptest::prop_assert_eq!(avatar.velocity, v);
            proptest::prop_assert!(!avatar.kill());
        }
    }

    #[test]
    fn test_bounds_bottom_edge() {
        let mut avatar = bot_at(585.0);
        assert!(!avatar.check_bounds(600.0));
        avatar.pos.y = 585.5;
        assert!(avatar.check_bounds(600.0));
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label(""), "Player");
        assert_eq!(normalize_label("   "), "Player");
        assert_eq!(normalize_label(" Ana "), "Ana");
    }

    #[test]
    fn test_color_token_parse() {
        assert_eq!(ColorToken::from_str("Magenta"), Some(ColorToken::Magenta));
        assert_eq!(ColorToken::from_str("#ff3300"), Some(ColorToken::Orange));
        assert_eq!(ColorToken::from_str("teal"), None);
        for color in ColorToken::PALETTE {
            assert_eq!(ColorToken::from_str(color.hex()), Some(color));
        }
    }

    #[test]
    fn test_start_populates_round() {
        let mut state = RoundState::with_seed(Tuning::default(), 7);
        assert_eq!(state.phase(), RoundPhase::Idle);

        state.start("", ColorToken::Yellow);
        assert_eq!(state.phase(), RoundPhase::Running);
        assert_eq!(state.avatars().len(), 50);
        assert_eq!(state.alive_count(), 50);

        let player = state.player().unwrap();
        assert!(player.is_player());
        assert_eq!(player.label, "Player");
        assert_eq!(player.color, ColorToken::Yellow);
        assert_eq!(player.pos.x, 100.0);

        for bot in &state.avatars()[1..] {
            assert_eq!(bot.role, Role::Bot);
            assert!(bot.pos.x >= 50.0 && bot.pos.x < 150.0);
            assert!(bot.pos.y >= 200.0 && bot.pos.y <= 400.0);
            assert!(bot.error_tolerance >= 0.0 && bot.error_tolerance < 0.05);
        }
    }

    #[test]
    fn test_reset_keeps_score_and_restart_clears_it() {
        let mut state = RoundState::with_seed(Tuning::default(), 7);
        state.start("Ana", ColorToken::Cyan);
        state.score = 4;

        state.reset();
        assert_eq!(state.phase(), RoundPhase::Idle);
        assert_eq!(state.score(), 4);

        state.start("Ana", ColorToken::Cyan);
        assert_eq!(state.score(), 0);
        assert_eq!(state.elapsed_ticks(), 0);
        assert!(state.obstacles().is_empty());
    }

    #[test]
    fn test_request_player_impulse_gating() {
        let mut state = RoundState::with_seed(Tuning::default(), 7);
        assert!(!state.request_player_impulse());

        state.start("Ana", ColorToken::Cyan);
        assert!(state.request_player_impulse());
        assert_eq!(state.player().unwrap().velocity, -4.0);

        state.avatars[PLAYER_INDEX].kill();
        assert!(!state.request_player_impulse());
    }

    #[test]
    fn test_resize_field_ignores_degenerate() {
        let mut state = RoundState::with_seed(Tuning::default(), 7);
        state.resize_field(1024.0, 768.0);
        assert_eq!(state.field_size(), (1024.0, 768.0));
        state.resize_field(0.0, f32::NAN);
        assert_eq!(state.field_size(), (1024.0, 768.0));
    }

    #[test]
    fn test_drain_events() {
        let mut state = RoundState::with_seed(Tuning::default(), 7);
        state.start("Ana", ColorToken::Cyan);
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![RoundEvent::RoundStarted {
                seed: state.round_seed(),
                avatars: 50
            }]
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_round_seeds_follow_session_seed() {
        let mut a = RoundState::with_seed(Tuning::default(), 7);
        let mut b = RoundState::with_seed(Tuning::default(), 7);
        let mut seeds = Vec::new();
        for _ in 0..3 {
            a.start("Ana", ColorToken::Cyan);
            b.start("Ana", ColorToken::Cyan);
            assert_eq!(a.round_seed(), b.round_seed());
            seeds.push(a.round_seed());
        }
        assert_eq!(a.seed(), 7);
        assert_ne!(seeds[0], seeds[1]);
        assert_ne!(seeds[1], seeds[2]);
    }

    #[test]
    fn test_round_seed_replays_later_round() {
        let mut session = RoundState::with_seed(Tuning::default(), 7);
        session.start("Ana", ColorToken::Cyan);
        session.start("Ana", ColorToken::Cyan);
        let reported = match session.drain_events().first() {
            Some(RoundEvent::RoundStarted { seed, .. }) => *seed,
            other => panic!("expected RoundStarted, got {:?}", other),
        };
        assert_eq!(reported, session.round_seed());

        let mut replay = RoundState::with_seed(Tuning::default(), 0);
        replay.start_with_seed("Ana", ColorToken::Cyan, reported);
        assert_eq!(replay.snapshot(), session.snapshot());
        assert_eq!(replay.rng, session.rng);
    }
}
