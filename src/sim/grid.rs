//! Uniform-grid spatial index
//!
//! World space is cut into square cells of a fixed size. Every tracked body is
//! filed in the bucket of the cell containing its position, so "what is near
//! the player" only ever looks at the 3×3 block of cells around it instead of
//! every live obstacle.
//!
//! Invariants:
//! - a body is in at most one bucket
//! - inactive bodies are never in a bucket
//! - empty buckets are dropped immediately, so `bucket_count` is the number of
//!   occupied cells

use std::collections::HashMap;
use std::hash::Hash;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::cell_index;

/// Integer cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub x: i32,
    pub y: i32,
}

impl CellKey {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing `pos`
    #[inline]
    pub fn from_position(pos: Vec2, cell_size: f32) -> Self {
        Self {
            x: cell_index(pos.x, cell_size),
            y: cell_index(pos.y, cell_size),
        }
    }

    /// The 3×3 block centered on this cell. Offsets past the `i32` range are
    /// dropped, so no cell is yielded twice.
    pub fn neighborhood(self) -> impl Iterator<Item = CellKey> {
        (-1..=1).flat_map(move |dx| {
            (-1..=1).filter_map(move |dy| {
                Some(CellKey::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
            })
        })
    }
}

/// A body the grid can file. The cached cell is grid bookkeeping: only the
/// grid writes it, and it lets `remove` go straight to the right bucket.
pub trait GridMember {
    fn grid_position(&self) -> Vec2;
    fn is_active(&self) -> bool;
    fn cached_cell(&self) -> Option<CellKey>;
    fn set_cached_cell(&mut self, cell: Option<CellKey>);
}

/// Spatial index keyed by cell, holding body ids of type `K`
#[derive(Debug, Clone)]
pub struct SpatialGrid<K> {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<K>>,
}

impl<K: Copy + Eq + Hash> SpatialGrid<K> {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell for a position at this grid's resolution
    #[inline]
    pub fn cell_key(&self, pos: Vec2) -> CellKey {
        CellKey::from_position(pos, self.cell_size)
    }

    /// File `member` under its current cell. Inactive members are ignored and
    /// inserting twice is harmless, even after a move.
    pub fn insert<M: GridMember>(&mut self, id: K, member: &mut M) {
        if !member.is_active() {
            return;
        }

        let key = self.cell_key(member.grid_position());
        if member.cached_cell().is_some_and(|old| old != key) {
            self.remove(id, member);
        }
        let bucket = self.cells.entry(key).or_default();
        if !bucket.contains(&id) {
            bucket.push(id);
        }
        member.set_cached_cell(Some(key));
    }

    /// Drop `member` from whatever cell it was filed under
    pub fn remove<M: GridMember>(&mut self, id: K, member: &mut M) {
        let Some(key) = member.cached_cell() else {
            return;
        };

        if let Some(bucket) = self.cells.get_mut(&key) {
            if let Some(i) = bucket.iter().position(|&k| k == id) {
                bucket.swap_remove(i);
            }
            if bucket.is_empty() {
                self.cells.remove(&key);
            }
        }
        member.set_cached_cell(None);
    }

    /// Re-file `member` after it moved. Staying inside the same cell costs a
    /// key computation and nothing else.
    pub fn update<M: GridMember>(&mut self, id: K, member: &mut M) {
        if !member.is_active() {
            return;
        }

        let key = self.cell_key(member.grid_position());
        if member.cached_cell() == Some(key) {
            return;
        }

        self.remove(id, member);
        self.insert(id, member);
    }

    /// Collect every id in the 3×3 cells around `pos` into `out`.
    ///
    /// `out` is cleared first. Ids for which `is_active` returns false are
    /// skipped. The result may contain the querying body's own id.
    pub fn query_neighborhood_into<F>(&self, pos: Vec2, is_active: F, out: &mut Vec<K>)
    where
        F: Fn(K) -> bool,
    {
        out.clear();
        for key in self.cell_key(pos).neighborhood() {
            if let Some(bucket) = self.cells.get(&key) {
                out.extend(bucket.iter().copied().filter(|&id| is_active(id)));
            }
        }
    }

    /// Allocating variant of `query_neighborhood_into`
    pub fn query_neighborhood<F>(&self, pos: Vec2, is_active: F) -> Vec<K>
    where
        F: Fn(K) -> bool,
    {
        let mut out = Vec::new();
        self.query_neighborhood_into(pos, is_active, &mut out);
        out
    }

    /// Drop every bucket
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of occupied cells
    pub fn bucket_count(&self) -> usize {
        self.cells.len()
    }

    /// Total ids across all buckets
    pub fn tracked_count(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// Cell currently holding `id`, if any. Scans every bucket; meant for
    /// diagnostics, not the tick path.
    pub fn cell_of(&self, id: K) -> Option<CellKey> {
        self.cells
            .iter()
            .find_map(|(key, bucket)| bucket.contains(&id).then_some(*key))
    }

    /// Whether `key` currently holds `id`
    pub fn bucket_contains(&self, key: CellKey, id: K) -> bool {
        self.cells.get(&key).is_some_and(|b| b.contains(&id))
    }

    /// Occupied cells (unordered)
    pub fn occupied_cells(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.cells.keys().copied()
    }
}
