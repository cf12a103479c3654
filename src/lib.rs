//! Astro Ascent - A vertical-scrolling asteroid dodger
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (spatial grid, pools, collisions, round state)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Top-10 leaderboard
//! - `persistence`: JSON storage backends for the leaderboard and settings
//! - `platform`: Device-agnostic input intents
//! - `settings`: Player preferences

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{Leaderboard, ScoreRecord};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Where released obstacles are parked (well outside any world)
    pub const PARKED_POSITION: Vec2 = Vec2::new(-1.0e6, -1.0e6);

    /// World units per point of score
    pub const UNITS_PER_POINT: f32 = 10.0;
}

/// Floor-divide a coordinate into a grid cell index.
///
/// Uses `floor`, not truncation, so `-0.5` lands in cell `-1` and never
/// shares a cell with `0.5`.
#[inline]
pub fn cell_index(coord: f32, cell_size: f32) -> i32 {
    (coord / cell_size).floor() as i32
}
