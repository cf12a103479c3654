//! Obstacles, the player, and the ids the grid tracks them by

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::grid::{CellKey, GridMember};
use crate::tuning::{KindProfile, PlayerProfile};

/// Obstacle classes. Each one has its own pool and `KindProfile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Regular,
    Mega,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 2] = [ObstacleKind::Regular, ObstacleKind::Mega];
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index for per-kind arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            ObstacleKind::Regular => 0,
            ObstacleKind::Mega => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Regular => "regular",
            ObstacleKind::Mega => "mega",
        }
    }
}

/// Stable handle to a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObstacleId {
    pub kind: ObstacleKind,
    pub slot: u32,
}

/// Anything the spatial grid can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyId {
    Player,
    Obstacle(ObstacleId),
}

/// A pooled asteroid
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub body: Body,
    pub radius: f32,
    pub active: bool,
    /// Grid bookkeeping, written only by `SpatialGrid`
    pub(crate) cell: Option<CellKey>,
}

impl Obstacle {
    pub fn new(id: ObstacleId, body: Body, profile: &KindProfile) -> Self {
        let radius = body.radius_for(profile.radius_fraction);
        Self {
            id,
            body,
            radius,
            active: false,
            cell: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> ObstacleKind {
        self.id.kind
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Cell the grid currently files this obstacle under
    pub fn cell(&self) -> Option<CellKey> {
        self.cell
    }

    /// Rescale and recompute the collision radius
    pub fn set_scale(&mut self, scale: f32, profile: &KindProfile) {
        self.body.scale = scale;
        self.radius = self.body.radius_for(profile.radius_fraction);
    }
}

impl GridMember for Obstacle {
    fn grid_position(&self) -> Vec2 {
        self.body.pos
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn cached_cell(&self) -> Option<CellKey> {
        self.cell
    }

    fn set_cached_cell(&mut self, cell: Option<CellKey>) {
        self.cell = cell;
    }
}

/// The player's ship. Not pooled; lives as long as the round.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub radius: f32,
    pub(crate) cell: Option<CellKey>,
}

impl Player {
    pub fn new(profile: &PlayerProfile, pos: Vec2) -> Self {
        let mut body = Body::new(profile.sprite_extent, profile.scale);
        body.pos = pos;
        body.visible = true;
        let radius = body.radius_for(profile.radius_fraction);
        Self {
            body,
            radius,
            cell: None,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn cell(&self) -> Option<CellKey> {
        self.cell
    }
}

impl GridMember for Player {
    fn grid_position(&self) -> Vec2 {
        self.body.pos
    }

    fn is_active(&self) -> bool {
        true
    }

    fn cached_cell(&self) -> Option<CellKey> {
        self.cell
    }

    fn set_cached_cell(&mut self, cell: Option<CellKey>) {
        self.cell = cell;
    }
}
