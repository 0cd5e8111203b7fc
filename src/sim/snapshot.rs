//! Read-only, serializable view of a round for the presentation layer

use serde::{Deserialize, Serialize};

use super::state::{Avatar, Role, RoundPhase, RoundState};
use super::track::Obstacle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarView {
    pub role: Role,
    pub label: String,
    /// Hex color string
    pub color: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alive: bool,
}

impl From<&Avatar> for AvatarView {
    fn from(avatar: &Avatar) -> Self {
        Self {
            role: avatar.role,
            label: avatar.label.clone(),
            color: avatar.color.hex().to_string(),
            x: avatar.pos.x,
            y: avatar.pos.y,
            radius: avatar.radius,
            alive: avatar.alive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub x: f32,
    pub width: f32,
    pub split: f32,
    pub gap: f32,
}

impl From<&Obstacle> for ObstacleView {
    fn from(obstacle: &Obstacle) -> Self {
        Self {
            x: obstacle.x,
            width: obstacle.width,
            split: obstacle.split,
            gap: obstacle.gap,
        }
    }
}

/// Everything a frame needs to draw the field and HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    pub tick: u64,
    pub score: u64,
    pub alive: usize,
    pub field_width: f32,
    pub field_height: f32,
    pub avatars: Vec<AvatarView>,
    pub obstacles: Vec<ObstacleView>,
}

impl RoundSnapshot {
    pub fn capture(state: &RoundState) -> Self {
        let (field_width, field_height) = state.field_size();
        Self {
            phase: state.phase(),
            tick: state.elapsed_ticks(),
            score: state.score(),
            alive: state.alive_count(),
            field_width,
            field_height,
            avatars: state.avatars().iter().map(AvatarView::from).collect(),
            obstacles: state.obstacles().iter().map(ObstacleView::from).collect(),
        }
    }
}
