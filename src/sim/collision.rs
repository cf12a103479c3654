//! Player-versus-obstacle hit testing
//!
//! Only the 3×3 grid cells around the player are examined. Both bodies are
//! treated as circles, and the hit window is the sum of radii scaled by an
//! overlap factor below 1 so grazes do not count.

use glam::Vec2;

use super::entity::{BodyId, ObstacleId, Player};
use super::lifecycle::EntityLifecycle;

/// Whether two circles overlap within the forgiving hit window
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32, overlap_factor: f32) -> bool {
    a.distance(b) < (ra + rb) * overlap_factor
}

#[derive(Debug, Clone)]
pub struct CollisionDetector {
    overlap_factor: f32,
    suspended: bool,
    /// Reused neighborhood buffer
    scratch: Vec<BodyId>,
}

impl CollisionDetector {
    pub fn new(overlap_factor: f32) -> Self {
        Self {
            overlap_factor,
            suspended: false,
            scratch: Vec::new(),
        }
    }

    #[inline]
    pub fn overlap_factor(&self) -> f32 {
        self.overlap_factor
    }

    /// Stop reporting hits (round already decided)
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// First obstacle near the player that overlaps it, if any.
    ///
    /// When several overlap at once, which one is reported is unspecified.
    pub fn check_player_collision(
        &mut self,
        player: &Player,
        lifecycle: &EntityLifecycle,
    ) -> Option<ObstacleId> {
        if self.suspended {
            return None;
        }

        lifecycle.neighbors_into(player.pos(), &mut self.scratch);
        self.scratch.iter().find_map(|&id| {
            let BodyId::Obstacle(oid) = id else {
                return None;
            };
            let obstacle = lifecycle.get(oid)?;
            (obstacle.active
                && circles_overlap(
                    player.pos(),
                    player.radius,
                    obstacle.pos(),
                    obstacle.radius,
                    self.overlap_factor,
                ))
            .then_some(oid)
        })
    }
}
