//! Game state and core simulation types
//!
//! Everything a round needs lives in `GameState`; nothing here knows how the
//! world is drawn.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{BodyFactory, EulerIntegrator, Integrator, ProfileBodyFactory};
use super::collision::CollisionDetector;
use super::difficulty::DifficultyModel;
use super::entity::{ObstacleId, ObstacleKind, Player};
use super::lifecycle::EntityLifecycle;
use crate::consts::UNITS_PER_POINT;
use crate::tuning::Tuning;

/// Round state machine: `Playing -> Colliding -> RoundOver`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// The first hit was found this tick; one-shot effects are running
    Colliding,
    /// Terminal. A reset is needed to play again.
    RoundOver,
}

/// Things the frame driver may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Spawned { id: ObstacleId },
    Culled { count: usize },
    /// Player jumped from the top of the world back to the start line
    Wrapped,
    Collision { obstacle: ObstacleId, at: Vec2 },
    /// Emitted exactly once per round
    RoundOver { final_score: u64 },
}

/// Visible screen size in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// World-space rectangle outside which obstacles are recycled
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CullBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl CullBounds {
    pub fn around(viewport: Viewport, camera_top: f32, margin: f32) -> Self {
        Self {
            left: -margin,
            right: viewport.width + margin,
            top: camera_top - margin,
            bottom: camera_top + viewport.height + margin,
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// Snapshot for a debug overlay
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    pub active_obstacles: usize,
    pub regular_pool: usize,
    pub mega_pool: usize,
    pub player_pos: Vec2,
    pub score: u64,
    pub level: u32,
    /// Percent of the world height below the player
    pub world_progress: f32,
    pub grid_cells: usize,
}

/// Complete round state
pub struct GameState {
    pub tuning: Tuning,
    pub difficulty: DifficultyModel,
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub viewport: Viewport,
    pub bounds: CullBounds,
    pub player: Player,
    pub lifecycle: EntityLifecycle,
    pub detector: CollisionDetector,
    pub(crate) integrator: Box<dyn Integrator>,
    pub phase: GamePhase,
    /// Height score (world units climbed / 10)
    pub score: u64,
    /// Distance carried over from top-of-world wraps
    pub wrapped_distance: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seconds accumulated toward the next spawn, per kind
    pub spawn_timers: [f32; ObstacleKind::COUNT],
    pub spawning: bool,
    /// Times collision handling has run this round (0 or 1)
    pub resolutions: u32,
    pub final_score: Option<u64>,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new round with the default body factory and integrator
    pub fn new(tuning: Tuning, viewport: Viewport, seed: u64) -> Self {
        Self::with_collaborators(
            tuning,
            viewport,
            seed,
            Box::new(ProfileBodyFactory),
            Box::new(EulerIntegrator),
        )
    }

    pub fn with_collaborators(
        tuning: Tuning,
        viewport: Viewport,
        seed: u64,
        factory: Box<dyn BodyFactory>,
        integrator: Box<dyn Integrator>,
    ) -> Self {
        let lifecycle = EntityLifecycle::with_factory(&tuning, factory);
        let player = Player::new(&tuning.player, start_position(&tuning, viewport));
        let mut state = Self {
            difficulty: tuning.difficulty_model(),
            detector: CollisionDetector::new(tuning.overlap_factor),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            viewport,
            bounds: CullBounds::default(),
            player,
            lifecycle,
            integrator,
            phase: GamePhase::Playing,
            score: 0,
            wrapped_distance: 0.0,
            time_ticks: 0,
            spawn_timers: [0.0; ObstacleKind::COUNT],
            spawning: true,
            resolutions: 0,
            final_score: None,
            events: Vec::new(),
            tuning,
        };
        state.start_round();
        log::info!("Round started with seed {}", seed);
        state
    }

    fn start_round(&mut self) {
        self.lifecycle.track_player(&mut self.player);
        self.update_score();
        self.refresh_bounds();
    }

    /// Top edge of the camera, following the player and clamped to the world
    pub fn camera_top(&self) -> f32 {
        let max_top = (self.tuning.world_height - self.viewport.height).max(0.0);
        (self.player.pos().y - self.tuning.camera_lead - self.viewport.height / 2.0).clamp(0.0, max_top)
    }

    /// Recompute the culling rectangle from the camera and viewport
    pub fn refresh_bounds(&mut self) {
        self.bounds = CullBounds::around(self.viewport, self.camera_top(), self.tuning.culling_margin);
    }

    /// Viewport changed size. Only the culling margins depend on it.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.refresh_bounds();
        log::debug!("Viewport resized to {}x{}", width, height);
    }

    pub fn level(&self) -> u32 {
        self.difficulty.level(self.score)
    }

    pub(crate) fn update_score(&mut self) {
        let climbed = self.tuning.world_height - self.player.pos().y + self.wrapped_distance;
        self.score = (climbed.max(0.0) / UNITS_PER_POINT).floor() as u64;
    }

    /// One-shot collision handling. Moves the round to `RoundOver`.
    pub(crate) fn resolve_collision(&mut self, obstacle: ObstacleId) {
        assert_eq!(
            self.phase,
            GamePhase::Playing,
            "collision resolved outside of play"
        );

        self.phase = GamePhase::Colliding;
        self.resolutions += 1;
        self.detector.suspend();
        self.spawning = false;
        self.player.body.vel = Vec2::ZERO;
        self.final_score = Some(self.score);
        self.events.push(GameEvent::Collision {
            obstacle,
            at: self.player.pos(),
        });
        log::info!(
            "Player hit {} obstacle at height {}",
            obstacle.kind.as_str(),
            self.score
        );

        self.phase = GamePhase::RoundOver;
        self.events.push(GameEvent::RoundOver {
            final_score: self.score,
        });
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Throw the round away and start a fresh one (same tuning, RNG continues)
    pub fn reset(&mut self) {
        self.lifecycle.reset(&self.tuning);
        self.player = Player::new(&self.tuning.player, start_position(&self.tuning, self.viewport));
        self.detector = CollisionDetector::new(self.tuning.overlap_factor);
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.wrapped_distance = 0.0;
        self.time_ticks = 0;
        self.spawn_timers = [0.0; ObstacleKind::COUNT];
        self.spawning = true;
        self.resolutions = 0;
        self.final_score = None;
        self.events.clear();
        self.start_round();
        log::info!("Round reset");
    }

    pub fn debug_stats(&self) -> DebugStats {
        let world_height = self.tuning.world_height;
        DebugStats {
            active_obstacles: self.lifecycle.active_count(),
            regular_pool: self.lifecycle.pool(ObstacleKind::Regular).len(),
            mega_pool: self.lifecycle.pool(ObstacleKind::Mega).len(),
            player_pos: self.player.pos(),
            score: self.score,
            level: self.level(),
            world_progress: (world_height - self.player.pos().y) / world_height * 100.0,
            grid_cells: self.lifecycle.grid().bucket_count(),
        }
    }
}

/// Bottom-center start line
fn start_position(tuning: &Tuning, viewport: Viewport) -> Vec2 {
    Vec2::new(viewport.width / 2.0, tuning.world_height - tuning.start_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lifecycle::SpawnParams;

    fn state() -> GameState {
        GameState::new(Tuning::default(), Viewport::default(), 7)
    }

    #[test]
    fn test_new_round() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.pos(), Vec2::new(400.0, 99_800.0));
        assert_eq!(state.score, 20);
        assert!(state.player.cell().is_some());
        assert_eq!(state.lifecycle.grid().tracked_count(), 1);
    }

    #[test]
    fn test_camera_follows_with_lead() {
        let mut state = state();
        assert_eq!(state.camera_top(), 99_800.0 - 200.0 - 300.0);

        // Camera cannot scroll past either world edge
        state.player.body.pos.y = 99_990.0;
        assert_eq!(state.camera_top(), 100_000.0 - 600.0);
        state.player.body.pos.y = 100.0;
        assert_eq!(state.camera_top(), 0.0);
    }

    #[test]
    fn test_bounds_follow_camera() {
        let mut state = state();
        state.player.body.pos.y = 50_000.0;
        state.refresh_bounds();
        let top = 50_000.0 - 200.0 - 300.0;
        assert_eq!(state.bounds.top, top - 400.0);
        assert_eq!(state.bounds.bottom, top + 600.0 + 400.0);
        assert!(state.bounds.contains(Vec2::new(-399.0, top)));
        assert!(!state.bounds.contains(Vec2::new(1_201.0, top)));
    }

    #[test]
    fn test_resize_only_moves_bounds() {
        let mut state = state();
        let pools = state.lifecycle.pool(ObstacleKind::Regular).len();
        state.resize(1_280.0, 720.0);
        assert_eq!(state.bounds.right, 1_280.0 + 400.0);
        assert_eq!(state.lifecycle.pool(ObstacleKind::Regular).len(), pools);
        assert_eq!(state.lifecycle.grid().tracked_count(), 1);
    }

    #[test]
    fn test_reset_rebuilds_everything() {
        let mut state = state();
        for i in 0..25 {
            state.lifecycle.spawn(
                ObstacleKind::Regular,
                SpawnParams {
                    pos: Vec2::new(i as f32 * 20.0, 99_500.0),
                    vel: Vec2::ZERO,
                    angular_vel: 0.0,
                    scale: 0.08,
                },
                50,
            );
        }
        state.score = 999;
        state.phase = GamePhase::RoundOver;

        state.reset();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lifecycle.active_count(), 0);
        assert_eq!(state.lifecycle.pool(ObstacleKind::Regular).len(), 20);
        assert_eq!(state.lifecycle.grid().tracked_count(), 1);
        assert_eq!(state.score, 20);
        assert!(!state.detector.is_suspended());
    }

    #[test]
    fn test_debug_stats() {
        let state = state();
        let stats = state.debug_stats();
        assert_eq!(stats.active_obstacles, 0);
        assert_eq!(stats.regular_pool, 20);
        assert_eq!(stats.mega_pool, 5);
        assert_eq!(stats.grid_cells, 1);
        assert!((stats.world_progress - 0.2).abs() < 1e-3);
    }
}
