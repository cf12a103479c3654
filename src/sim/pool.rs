//! Per-kind obstacle pools
//!
//! Slots are never freed while a round runs. A released obstacle is parked and
//! left in place for the next `acquire`, so a steady spawn/cull stream stops
//! allocating once the pool has grown to its working size.

use glam::Vec2;

use super::body::BodyFactory;
use super::entity::{Obstacle, ObstacleId, ObstacleKind};
use crate::consts::PARKED_POSITION;
use crate::tuning::KindProfile;

#[derive(Debug, Clone)]
pub struct ObjectPool {
    kind: ObstacleKind,
    profile: KindProfile,
    slots: Vec<Obstacle>,
}

impl ObjectPool {
    pub fn new(kind: ObstacleKind, profile: KindProfile) -> Self {
        Self {
            kind,
            profile,
            slots: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> ObstacleKind {
        self.kind
    }

    #[inline]
    pub fn profile(&self) -> &KindProfile {
        &self.profile
    }

    /// Allocate `count` inactive slots up front
    pub fn prewarm(&mut self, count: usize, factory: &mut dyn BodyFactory) {
        for _ in 0..count {
            self.grow(factory);
        }
        log::debug!("Prewarmed {} pool with {} slots", self.kind.as_str(), count);
    }

    /// Hand out an inactive slot, growing the pool if it is below `ceiling`.
    ///
    /// Returns `None` when every slot is busy and the pool is at its ceiling;
    /// the caller skips that spawn.
    pub fn acquire(&mut self, ceiling: usize, factory: &mut dyn BodyFactory) -> Option<ObstacleId> {
        let slot = match self.slots.iter().position(|o| !o.active) {
            Some(i) => i,
            None if self.slots.len() < ceiling => {
                let i = self.grow(factory);
                log::debug!(
                    "Grew {} pool to {} slots (ceiling {})",
                    self.kind.as_str(),
                    self.slots.len(),
                    ceiling
                );
                i
            }
            None => {
                log::trace!("{} pool exhausted at {} slots", self.kind.as_str(), self.slots.len());
                return None;
            }
        };

        let obstacle = &mut self.slots[slot];
        obstacle.active = true;
        obstacle.body.visible = true;
        Some(obstacle.id)
    }

    /// Deactivate and park an obstacle. Stale or inactive ids are ignored.
    ///
    /// The caller must already have removed it from the grid.
    pub fn release(&mut self, id: ObstacleId) {
        let Some(obstacle) = self.get_mut(id) else {
            return;
        };
        if !obstacle.active {
            return;
        }

        obstacle.active = false;
        obstacle.body.visible = false;
        obstacle.body.vel = Vec2::ZERO;
        obstacle.body.angular_vel = 0.0;
        obstacle.body.pos = PARKED_POSITION;
        obstacle.cell = None;
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        if id.kind != self.kind {
            return None;
        }
        self.slots.get(id.slot as usize)
    }

    pub fn get_mut(&mut self, id: ObstacleId) -> Option<&mut Obstacle> {
        if id.kind != self.kind {
            return None;
        }
        self.slots.get_mut(id.slot as usize)
    }

    /// Allocated slots, active or not
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|o| o.active).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.slots.iter()
    }

    fn grow(&mut self, factory: &mut dyn BodyFactory) -> usize {
        let slot = self.slots.len();
        let id = ObstacleId {
            kind: self.kind,
            slot: slot as u32,
        };
        let mut body = factory.build(self.kind, &self.profile);
        body.pos = PARKED_POSITION;
        body.visible = false;
        self.slots.push(Obstacle::new(id, body, &self.profile));
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{Body, ProfileBodyFactory};

    /// Counts how many bodies were built
    #[derive(Default)]
    struct CountingFactory {
        built: usize,
    }

    impl BodyFactory for CountingFactory {
        fn build(&mut self, _kind: ObstacleKind, profile: &KindProfile) -> Body {
            self.built += 1;
            Body::new(profile.sprite_extent, profile.base_scale)
        }
    }

    fn pool() -> ObjectPool {
        ObjectPool::new(ObstacleKind::Regular, KindProfile::regular())
    }

    #[test]
    fn test_ceiling_two_scenario() {
        let mut pool = pool();
        let mut factory = CountingFactory::default();

        let a = pool.acquire(2, &mut factory);
        let b = pool.acquire(2, &mut factory);
        let c = pool.acquire(2, &mut factory);
        assert!(a.is_some());
        assert!(b.is_some());
        assert!(c.is_none());

        pool.release(a.unwrap());
        let d = pool.acquire(2, &mut factory);
        assert_eq!(d, a);
        assert_eq!(pool.len(), 2);
        assert_eq!(factory.built, 2);
    }

    #[test]
    fn test_reuses_before_growing() {
        let mut pool = pool();
        let mut factory = CountingFactory::default();
        pool.prewarm(3, &mut factory);
        assert_eq!(pool.active_count(), 0);

        for _ in 0..3 {
            pool.acquire(10, &mut factory).unwrap();
        }
        assert_eq!(factory.built, 3);

        pool.acquire(10, &mut factory).unwrap();
        assert_eq!(factory.built, 4);
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn test_ceiling_is_rechecked_each_acquire() {
        let mut pool = pool();
        let mut factory = ProfileBodyFactory;
        assert!(pool.acquire(1, &mut factory).is_some());
        assert!(pool.acquire(1, &mut factory).is_none());
        // A higher ceiling from the difficulty model lets it grow again
        assert!(pool.acquire(2, &mut factory).is_some());
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_release_resets_motion() {
        let mut pool = pool();
        let id = pool.acquire(5, &mut ProfileBodyFactory).unwrap();
        {
            let o = pool.get_mut(id).unwrap();
            o.body.pos = Vec2::new(100.0, 200.0);
            o.body.vel = Vec2::new(5.0, 5.0);
            o.body.angular_vel = 12.0;
        }
        pool.release(id);

        let o = pool.get(id).unwrap();
        assert!(!o.active);
        assert!(!o.body.visible);
        assert_eq!(o.body.vel, Vec2::ZERO);
        assert_eq!(o.body.angular_vel, 0.0);
        assert_eq!(o.body.pos, PARKED_POSITION);
        assert_eq!(o.cell(), None);
    }

    #[test]
    fn test_stale_ids_are_ignored() {
        let mut pool = pool();
        pool.release(ObstacleId {
            kind: ObstacleKind::Regular,
            slot: 42,
        });
        pool.release(ObstacleId {
            kind: ObstacleKind::Mega,
            slot: 0,
        });
        assert!(pool.get(ObstacleId {
            kind: ObstacleKind::Mega,
            slot: 0
        })
        .is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_conservation_after_churn() {
        let mut pool = pool();
        let mut factory = CountingFactory::default();
        let ceiling = 6;
        for round in 0..20 {
            let ids: Vec<_> = (0..ceiling)
                .map(|_| pool.acquire(ceiling, &mut factory).unwrap())
                .collect();
            assert!(pool.acquire(ceiling, &mut factory).is_none(), "round {round}");
            for id in ids {
                pool.release(id);
            }
        }
        assert_eq!(pool.len(), ceiling);
        assert_eq!(factory.built, ceiling);
    }
}
