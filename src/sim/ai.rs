//! Reactive flap policy
//!
//! Looks at the nearest pipe still ahead (with a small lookahead margin),
//! aims for a jittered point near its gap center, and flaps when it sinks
//! below that. No memory and no planning beyond the one pipe. Bots use it
//! every tick; the player uses it in autopilot mode.

use rand::Rng;

use super::state::Avatar;
use super::track::Obstacle;
use crate::settings::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Flap,
    Coast,
}

/// First pipe whose trailing edge is still ahead of `x - lookahead`
pub fn next_obstacle(x: f32, lookahead: f32, obstacles: &[Obstacle]) -> Option<&Obstacle> {
    obstacles.iter().find(|o| o.trailing_edge() > x - lookahead)
}

/// Pick an action for one avatar this tick
pub fn decide(
    avatar: &Avatar,
    obstacles: &[Obstacle],
    field_height: f32,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Action {
    let flap = match next_obstacle(avatar.pos.x, tuning.bot_lookahead, obstacles) {
        Some(next) => {
            let jitter = (rng.random::<f32>() - 0.5) * tuning.bot_target_jitter;
            let target = next.gap_center() + jitter;
            // Higher error tolerance means more skipped flaps
            avatar.pos.y > target + tuning.bot_flap_margin
                && rng.random::<f32>() > avatar.error_tolerance
        }
        // Track is clear: hover around the middle
        None => avatar.pos.y > field_height / 2.0,
    };

    if flap { Action::Flap } else { Action::Coast }
}
