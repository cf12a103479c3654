//! Active obstacle set: spawn, cull, and grid upkeep
//!
//! Owns both pools, the spatial grid, and the list of live obstacles. Every
//! path that activates or retires an obstacle goes through here so the three
//! never disagree.

use glam::Vec2;

use super::body::{BodyFactory, ProfileBodyFactory};
use super::entity::{BodyId, Obstacle, ObstacleId, ObstacleKind, Player};
use super::grid::SpatialGrid;
use super::pool::ObjectPool;
use crate::tuning::Tuning;

/// Initial transform for a spawned obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angular_vel: f32,
    pub scale: f32,
}

pub struct EntityLifecycle {
    pools: [ObjectPool; ObstacleKind::COUNT],
    grid: SpatialGrid<BodyId>,
    active: Vec<ObstacleId>,
    factory: Box<dyn BodyFactory>,
}

impl std::fmt::Debug for EntityLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityLifecycle")
            .field("pools", &self.pools)
            .field("grid", &self.grid)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl EntityLifecycle {
    pub fn new(tuning: &Tuning) -> Self {
        Self::with_factory(tuning, Box::new(ProfileBodyFactory))
    }

    pub fn with_factory(tuning: &Tuning, factory: Box<dyn BodyFactory>) -> Self {
        let mut lifecycle = Self {
            pools: ObstacleKind::ALL.map(|kind| ObjectPool::new(kind, tuning.profile(kind).clone())),
            grid: SpatialGrid::new(tuning.cell_size),
            active: Vec::new(),
            factory,
        };
        lifecycle.prewarm();
        lifecycle
    }

    /// Allocate each pool's starting slots, never past its base ceiling
    fn prewarm(&mut self) {
        for pool in &mut self.pools {
            let profile = pool.profile();
            let count = profile.prewarm.min(profile.curve.base_ceiling);
            if count < profile.prewarm {
                log::warn!(
                    "Prewarm for {} clamped from {} to {}",
                    pool.kind().as_str(),
                    profile.prewarm,
                    count
                );
            }
            pool.prewarm(count, self.factory.as_mut());
        }
    }

    /// Activate an obstacle of `kind` and start tracking it.
    ///
    /// `ceiling` is the pool's current limit. Returns `None` when the pool is
    /// exhausted; the spawn is simply skipped.
    pub fn spawn(&mut self, kind: ObstacleKind, params: SpawnParams, ceiling: usize) -> Option<ObstacleId> {
        let pool = &mut self.pools[kind.index()];
        let id = pool.acquire(ceiling, self.factory.as_mut())?;
        let profile = pool.profile().clone();

        let obstacle = pool.get_mut(id)?;
        obstacle.body.pos = params.pos;
        obstacle.body.vel = params.vel;
        obstacle.body.angular_vel = params.angular_vel;
        obstacle.body.rotation = 0.0;
        obstacle.set_scale(params.scale, &profile);

        self.grid.insert(BodyId::Obstacle(id), obstacle);
        self.active.push(id);
        Some(id)
    }

    /// Retire one obstacle: grid, pool, then the active set
    pub fn release(&mut self, id: ObstacleId) {
        let pool = &mut self.pools[id.kind.index()];
        if let Some(obstacle) = pool.get_mut(id) {
            self.grid.remove(BodyId::Obstacle(id), obstacle);
        }
        pool.release(id);
        if let Some(i) = self.active.iter().position(|&a| a == id) {
            self.active.swap_remove(i);
        }
    }

    /// Retire every active obstacle for which `is_out` holds. Returns how many
    /// were recycled.
    ///
    /// Must run before `refresh_grid` in a tick so that no query sees an
    /// obstacle that is already gone.
    pub fn cull<F>(&mut self, mut is_out: F) -> usize
    where
        F: FnMut(&Obstacle) -> bool,
    {
        let mut culled = 0;
        let mut i = 0;
        while i < self.active.len() {
            let id = self.active[i];
            let pool = &mut self.pools[id.kind.index()];
            let out = pool.get(id).is_none_or(|o| is_out(o));
            if out {
                if let Some(obstacle) = pool.get_mut(id) {
                    self.grid.remove(BodyId::Obstacle(id), obstacle);
                }
                pool.release(id);
                self.active.swap_remove(i);
                culled += 1;
            } else {
                i += 1;
            }
        }
        culled
    }

    /// Re-file every active obstacle under its current cell
    pub fn refresh_grid(&mut self) {
        for &id in &self.active {
            if let Some(obstacle) = self.pools[id.kind.index()].get_mut(id) {
                self.grid.update(BodyId::Obstacle(id), obstacle);
            }
        }
    }

    /// Start tracking the player (round start)
    pub fn track_player(&mut self, player: &mut Player) {
        self.grid.insert(BodyId::Player, player);
    }

    /// Re-file the player after it moved
    pub fn refresh_player(&mut self, player: &mut Player) {
        self.grid.update(BodyId::Player, player);
    }

    pub fn for_each_active<F>(&self, mut f: F)
    where
        F: FnMut(&Obstacle),
    {
        for &id in &self.active {
            if let Some(obstacle) = self.get(id) {
                f(obstacle);
            }
        }
    }

    pub fn for_each_active_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Obstacle),
    {
        for &id in &self.active {
            if let Some(obstacle) = self.pools[id.kind.index()].get_mut(id) {
                f(obstacle);
            }
        }
    }

    /// Ids near `pos` whose bodies are active, including `BodyId::Player` if
    /// the player is filed there
    pub fn neighbors_into(&self, pos: Vec2, out: &mut Vec<BodyId>) {
        let pools = &self.pools;
        self.grid.query_neighborhood_into(
            pos,
            |id| match id {
                BodyId::Player => true,
                BodyId::Obstacle(o) => pools[o.kind.index()].get(o).is_some_and(|ob| ob.active),
            },
            out,
        );
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.pools[id.kind.index()].get(id)
    }

    pub fn pool(&self, kind: ObstacleKind) -> &ObjectPool {
        &self.pools[kind.index()]
    }

    pub fn grid(&self) -> &SpatialGrid<BodyId> {
        &self.grid
    }

    /// Live obstacle ids (unordered)
    pub fn active_ids(&self) -> &[ObstacleId] {
        &self.active
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Drop everything and start over with freshly prewarmed pools
    pub fn reset(&mut self, tuning: &Tuning) {
        self.grid = SpatialGrid::new(tuning.cell_size);
        self.active.clear();
        self.pools = ObstacleKind::ALL.map(|kind| ObjectPool::new(kind, tuning.profile(kind).clone()));
        self.prewarm();
        log::debug!("Entity lifecycle reset");
    }
}
