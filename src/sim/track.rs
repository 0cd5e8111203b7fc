//! Pipe track: spawning, scrolling, pruning and pass detection

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Avatar;
use crate::settings::Tuning;

/// A pipe pair: upper pipe from 0 to `split`, lower pipe from
/// `split + gap` to the field bottom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Leading (left) edge
    pub x: f32,
    pub width: f32,
    /// Bottom of the upper pipe
    pub split: f32,
    pub gap: f32,
    /// Player has cleared this pipe
    pub passed: bool,
}

impl Obstacle {
    pub fn new(id: u32, x: f32, width: f32, split: f32, gap: f32) -> Self {
        Self {
            id,
            x,
            width,
            split,
            gap,
            passed: false,
        }
    }

    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn gap_top(&self) -> f32 {
        self.split
    }

    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.split + self.gap
    }

    #[inline]
    pub fn gap_center(&self) -> f32 {
        self.split + self.gap / 2.0
    }
}

/// Active pipes in spawn order (oldest/leftmost first)
#[derive(Debug, Clone, Default)]
pub struct Track {
    obstacles: Vec<Obstacle>,
    /// Pipes spawned this round, including pruned ones. Also the next id.
    spawned: u32,
}

impl Track {
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.spawned = 0;
    }

    /// Add a pipe pair at `x` with the given split
    pub fn push(&mut self, x: f32, split: f32, tuning: &Tuning) -> u32 {
        self.spawned += 1;
        let id = self.spawned;
        self.obstacles
            .push(Obstacle::new(id, x, tuning.obstacle_width, split, tuning.obstacle_gap));
        id
    }

    /// Spawn one pipe pair at the right edge every `spawn_interval` ticks.
    /// Returns the new pipe's id.
    pub fn maybe_spawn(
        &mut self,
        tick: u64,
        field_width: f32,
        field_height: f32,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Option<u32> {
        if tick == 0 || tick % tuning.spawn_interval.max(1) != 0 {
            return None;
        }
        let (low, high) = tuning.split_range(field_height);
        let split = low + rng.random::<f32>() * (high - low);
        let id = self.push(field_width, split, tuning);
        log::debug!("Pipe {} spawned at tick {} (split {:.1})", id, tick, split);
        Some(id)
    }

    /// Scroll every pipe left by `speed`
    pub fn advance(&mut self, speed: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;
        }
    }

    /// Drop pipes whose trailing edge is more than `margin` past x = 0.
    /// Survivors keep their order. Returns how many were removed.
    pub fn prune(&mut self, margin: f32) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.trailing_edge() >= -margin);
        before - self.obstacles.len()
    }

    /// Credit every pipe the live player has just cleared, once each
    pub fn check_passed(&mut self, player: &Avatar, mut on_pass: impl FnMut(&Obstacle)) {
        if !player.alive {
            return;
        }
        for obstacle in &mut self.obstacles {
            if !obstacle.passed && obstacle.trailing_edge() < player.pos.x {
                obstacle.passed = true;
                on_pass(&*obstacle);
            }
        }
    }
}
