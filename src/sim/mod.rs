//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (active set order, then grid buckets)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod body;
pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod grid;
pub mod lifecycle;
pub mod pool;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use body::{Body, BodyFactory, EulerIntegrator, Integrator, ProfileBodyFactory};
pub use collision::{CollisionDetector, circles_overlap};
pub use difficulty::{DifficultyCurve, DifficultyModel};
pub use entity::{BodyId, Obstacle, ObstacleId, ObstacleKind, Player};
pub use grid::{CellKey, GridMember, SpatialGrid};
pub use lifecycle::{EntityLifecycle, SpawnParams};
pub use pool::ObjectPool;
pub use state::{CullBounds, DebugStats, GameEvent, GamePhase, GameState, Viewport};
pub use tick::{TickInput, spawn_obstacle, tick};
