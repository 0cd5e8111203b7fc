//! Fixed step simulation tick
//!
//! Core loop that advances a running round by exactly one step. The
//! presentation layer calls [`tick`] once per frame.

use super::ai::{Action, decide};
use super::collision::hits_any;
use super::state::{DeathCause, Outcome, PLAYER_INDEX, RoundEvent, RoundPhase, RoundState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap the player before stepping (click/tap/space)
    pub impulse: bool,
    /// Demo mode - the bot policy flies the player
    pub autopilot: bool,
}

/// Advance the round by one fixed step. No-op unless running.
pub fn tick(state: &mut RoundState, input: &TickInput) {
    if state.phase != RoundPhase::Running {
        return;
    }

    if input.impulse {
        state.request_player_impulse();
    }

    state.elapsed_ticks += 1;

    step_track(state);
    step_avatars(state, input.autopilot);
    credit_passes(state);

    state.alive_count = state.avatars.iter().filter(|a| a.alive).count();

    evaluate_end(state);
}

/// Spawn, scroll and prune pipes
fn step_track(state: &mut RoundState) {
    let RoundState {
        tuning,
        rng,
        field,
        elapsed_ticks,
        track,
        events,
        ..
    } = state;

    if let Some(id) = track.maybe_spawn(*elapsed_ticks, field.x, field.y, tuning, rng) {
        events.push(RoundEvent::ObstacleSpawned { id });
    }
    track.advance(tuning.obstacle_speed);
    track.prune(tuning.prune_margin);
}

/// Physics, bounds, policy and pipe collisions for every live avatar
fn step_avatars(state: &mut RoundState, autopilot: bool) {
    let RoundState {
        tuning,
        rng,
        field,
        avatars,
        track,
        events,
        ..
    } = state;
    let obstacles = track.obstacles();

    for (index, avatar) in avatars.iter_mut().enumerate() {
        if !avatar.alive {
            continue;
        }

        avatar.integrate(tuning.gravity);
        if avatar.check_bounds(field.y) {
            log::debug!("Avatar {} left the field", index);
            events.push(RoundEvent::AvatarDied {
                index,
                cause: DeathCause::OutOfBounds,
            });
            continue;
        }

        if (!avatar.is_player() || autopilot)
            && decide(avatar, obstacles, field.y, tuning, rng) == Action::Flap
        {
            avatar.impulse(tuning.impulse);
        }

        if hits_any(avatar.pos, tuning.collision_tolerance, obstacles) && avatar.kill() {
            log::debug!("Avatar {} hit a pipe", index);
            events.push(RoundEvent::AvatarDied {
                index,
                cause: DeathCause::Obstacle,
            });
        }
    }
}

/// Score pipes the player cleared this tick
fn credit_passes(state: &mut RoundState) {
    let RoundState {
        avatars,
        track,
        score,
        events,
        ..
    } = state;
    let Some(player) = avatars.get(PLAYER_INDEX) else {
        return;
    };

    track.check_passed(player, |obstacle| {
        *score += 1;
        events.push(RoundEvent::ObstaclePassed {
            id: obstacle.id,
            score: *score,
        });
    });
}

/// Lose beats win: a dead player ends the round before survivors are counted
fn evaluate_end(state: &mut RoundState) {
    let player_alive = state.player().is_some_and(|p| p.alive);
    if !player_alive {
        state.end(Outcome::Lose);
        return;
    }

    if state.alive_count == 1 && state.track.spawned() >= state.tuning.min_obstacles_for_win {
        state.end(Outcome::Win);
    }
}
