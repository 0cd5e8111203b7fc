//! Collision tests between avatars, the field edges and pipe pairs
//!
//! Pipes use a forgiving square hitbox: the avatar's center ± `tolerance`,
//! where tolerance is smaller than the drawn radius. All comparisons are
//! strict, so touching the hitbox edge exactly is survivable.

use glam::Vec2;

use super::track::Obstacle;

/// True if a circle at `y` with `radius` pokes outside [0, field_height]
#[inline]
pub fn out_of_bounds(y: f32, radius: f32, field_height: f32) -> bool {
    y + radius > field_height || y - radius < 0.0
}

/// True if the avatar's hitbox shares any x with the pipe pair
#[inline]
pub fn overlaps_horizontally(center: Vec2, tolerance: f32, obstacle: &Obstacle) -> bool {
    center.x + tolerance > obstacle.x && center.x - tolerance < obstacle.trailing_edge()
}

/// True if the avatar's hitbox sticks out of the gap above or below
#[inline]
pub fn outside_gap(center: Vec2, tolerance: f32, obstacle: &Obstacle) -> bool {
    center.y - tolerance < obstacle.gap_top() || center.y + tolerance > obstacle.gap_bottom()
}

/// Check an avatar center against one pipe pair
pub fn avatar_obstacle_collision(center: Vec2, tolerance: f32, obstacle: &Obstacle) -> bool {
    overlaps_horizontally(center, tolerance, obstacle) && outside_gap(center, tolerance, obstacle)
}

/// Check an avatar center against every active pipe pair
pub fn hits_any(center: Vec2, tolerance: f32, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|obstacle| avatar_obstacle_collision(center, tolerance, obstacle))
}
