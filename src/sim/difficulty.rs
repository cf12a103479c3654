//! Score-driven difficulty curves
//!
//! Nothing here is cached: every spawn decision asks again with the current
//! score, since score changes every tick.

use serde::{Deserialize, Serialize};

use super::entity::ObstacleKind;

/// Per-kind scaling parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyCurve {
    /// Seconds between spawns at level 0
    pub base_delay: f32,
    /// Multiplier applied to the delay per level (0 < decay <= 1)
    pub decay: f32,
    /// Floor for the spawn delay
    pub min_delay: f32,
    /// Obstacle speed at level 0
    pub base_speed: f32,
    /// Fractional speed gain per level
    pub growth_rate: f32,
    /// Pool ceiling at level 0
    pub base_ceiling: usize,
    /// Levels per +1 ceiling step (0 = fixed ceiling)
    pub levels_per_bump: u32,
    /// Ceiling never exceeds this
    pub hard_max: usize,
}

/// Difficulty as a pure function of score
#[derive(Debug, Clone)]
pub struct DifficultyModel {
    interval: u64,
    curves: [DifficultyCurve; ObstacleKind::COUNT],
}

impl DifficultyModel {
    /// `interval` is the number of score points per difficulty level
    pub fn new(interval: u64, regular: DifficultyCurve, mega: DifficultyCurve) -> Self {
        Self {
            interval: interval.max(1),
            curves: [regular, mega],
        }
    }

    #[inline]
    pub fn curve(&self, kind: ObstacleKind) -> &DifficultyCurve {
        &self.curves[kind.index()]
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// `floor(score / interval)`
    #[inline]
    pub fn level(&self, score: u64) -> u32 {
        u32::try_from(score / self.interval).unwrap_or(u32::MAX)
    }

    /// Seconds until the next spawn of `kind`; decays geometrically, floored
    pub fn spawn_delay(&self, kind: ObstacleKind, score: u64) -> f32 {
        let curve = self.curve(kind);
        let level = self.level(score).min(i32::MAX as u32) as i32;
        (curve.base_delay * curve.decay.powi(level)).max(curve.min_delay)
    }

    /// Launch speed for `kind`; grows linearly per level
    pub fn obstacle_speed(&self, kind: ObstacleKind, score: u64) -> f32 {
        let curve = self.curve(kind);
        curve.base_speed * (1.0 + self.level(score) as f32 * curve.growth_rate)
    }

    /// Current pool ceiling for `kind`; stepped, capped at `hard_max`
    pub fn pool_ceiling(&self, kind: ObstacleKind, score: u64) -> usize {
        let curve = self.curve(kind);
        let bumps = match curve.levels_per_bump {
            0 => 0,
            n => (self.level(score) / n) as usize,
        };
        curve.base_ceiling.saturating_add(bumps).min(curve.hard_max)
    }
}
