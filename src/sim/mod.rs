//! Round simulation module
//!
//! All gameplay logic lives here:
//! - One fixed step per tick, no delta time
//! - Randomness only from the round's seeded RNG
//! - Stable iteration order (player first, pipes in spawn order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod track;

pub use ai::{Action, decide};
pub use collision::{avatar_obstacle_collision, hits_any, out_of_bounds};
pub use snapshot::{AvatarView, ObstacleView, RoundSnapshot};
pub use state::{
    Avatar, ColorToken, DeathCause, Outcome, PLAYER_INDEX, Role, RoundEvent, RoundPhase,
    RoundState,
};
pub use tick::{TickInput, tick};
pub use track::{Obstacle, Track};
