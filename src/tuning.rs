//! Data-driven game balance
//!
//! Every number the simulation uses lives here so it can be tweaked from a
//! JSON file without a rebuild. Missing fields fall back to the defaults
//! below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{DifficultyCurve, DifficultyModel, ObstacleKind};

/// Reasons a tuning file can be rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cell size must be positive, got {0}")]
    CellSize(f32),
    #[error("overlap factor must be in (0, 1], got {0}")]
    OverlapFactor(f32),
    #[error("difficulty interval must be at least 1")]
    Interval,
    #[error("{kind} profile: {reason}")]
    Profile { kind: &'static str, reason: &'static str },
}

/// The player's ship geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    pub sprite_extent: f32,
    pub scale: f32,
    pub radius_fraction: f32,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            sprite_extent: 512.0,
            scale: 0.1,
            radius_fraction: 0.3,
        }
    }
}

/// Everything specific to one obstacle kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindProfile {
    /// Unscaled sprite width
    pub sprite_extent: f32,
    pub base_scale: f32,
    /// Collision radius as a fraction of the scaled width
    pub radius_fraction: f32,
    /// Slots allocated when a round starts
    pub prewarm: usize,
    /// No spawns until the score reaches this
    pub min_score: u64,
    /// Spawn line distance above the camera top
    pub spawn_offset: f32,
    /// Horizontal spawn band as fractions of viewport width
    pub spawn_band: [f32; 2],
    /// Minimum distance from either screen edge
    pub edge_margin: f32,
    /// Heading range in degrees (0 = right, 90 = up)
    pub heading_deg: [f32; 2],
    /// Constant downward velocity added on top of the heading
    pub downward_drift: f32,
    /// Spin range, degrees per second (symmetric)
    pub spin: f32,
    /// Score at which the scale starts growing
    pub growth_start: u64,
    /// Score span over which scale goes from base to `grown_scale`
    pub growth_span: u64,
    pub grown_scale: f32,
    /// Scaled width never exceeds this fraction of the viewport (0 = no cap)
    pub width_cap: f32,
    pub curve: DifficultyCurve,
}

impl KindProfile {
    pub fn regular() -> Self {
        Self {
            sprite_extent: 512.0,
            base_scale: 0.08,
            radius_fraction: 0.3,
            prewarm: 20,
            min_score: 0,
            spawn_offset: 50.0,
            spawn_band: [0.0, 1.0],
            edge_margin: 50.0,
            heading_deg: [30.0, 150.0],
            downward_drift: 200.0,
            spin: 50.0,
            growth_start: 0,
            growth_span: 0,
            grown_scale: 0.08,
            width_cap: 0.0,
            curve: DifficultyCurve {
                base_delay: 0.5,
                decay: 0.92,
                min_delay: 0.15,
                base_speed: 80.0,
                growth_rate: 0.05,
                base_ceiling: 50,
                levels_per_bump: 0,
                hard_max: 50,
            },
        }
    }

    pub fn mega() -> Self {
        Self {
            sprite_extent: 512.0,
            base_scale: 0.16,
            radius_fraction: 0.51,
            prewarm: 5,
            min_score: 2500,
            spawn_offset: 350.0,
            spawn_band: [0.3, 0.7],
            edge_margin: 0.0,
            heading_deg: [-90.0, -90.0],
            downward_drift: 0.0,
            spin: 0.5,
            growth_start: 2500,
            growth_span: 10_000,
            grown_scale: 0.4,
            width_cap: 1.0 / 3.0,
            curve: DifficultyCurve {
                base_delay: 5.0,
                decay: 0.9,
                min_delay: 1.5,
                base_speed: 150.0,
                growth_rate: 0.04,
                base_ceiling: 5,
                levels_per_bump: 2,
                hard_max: 12,
            },
        }
    }

    /// Scale for a freshly spawned obstacle at `score` in a viewport `width` wide
    pub fn spawn_scale(&self, score: u64, width: f32) -> f32 {
        let mut scale = self.base_scale;
        if self.growth_span > 0 {
            let grown = score.saturating_sub(self.growth_start) as f32;
            scale += grown / self.growth_span as f32 * (self.grown_scale - self.base_scale);
        }
        if self.width_cap > 0.0 && self.sprite_extent > 0.0 {
            scale = scale.min(width * self.width_cap / self.sprite_extent);
        }
        scale
    }

    /// Horizontal spawn range for a viewport `width` wide
    pub fn spawn_x_range(&self, width: f32) -> (f32, f32) {
        let lo = (self.spawn_band[0] * width).max(self.edge_margin);
        let hi = (self.spawn_band[1] * width).min(width - self.edge_margin);
        if hi < lo { (width / 2.0, width / 2.0) } else { (lo, hi) }
    }

    /// Heading bounds in degrees, lowest first
    pub fn heading_range(&self) -> (f32, f32) {
        let [a, b] = self.heading_deg;
        (a.min(b), a.max(b))
    }

    fn validate(&self, kind: ObstacleKind) -> Result<(), TuningError> {
        let fail = |reason| {
            Err(TuningError::Profile {
                kind: kind.as_str(),
                reason,
            })
        };
        if self.sprite_extent <= 0.0 || self.base_scale <= 0.0 {
            return fail("sprite extent and scale must be positive");
        }
        if self.radius_fraction <= 0.0 {
            return fail("radius fraction must be positive");
        }
        if self.curve.base_delay <= 0.0 || self.curve.min_delay <= 0.0 {
            return fail("spawn delays must be positive");
        }
        if !(self.curve.decay > 0.0 && self.curve.decay <= 1.0) {
            return fail("delay decay must be in (0, 1]");
        }
        if self.curve.growth_rate < 0.0 {
            return fail("speed growth must not be negative");
        }
        if self.curve.hard_max < self.curve.base_ceiling {
            return fail("hard max is below the base ceiling");
        }
        if self.prewarm > self.curve.base_ceiling {
            return fail("prewarm exceeds the base ceiling");
        }
        let [lo, hi] = self.heading_deg;
        if !(lo.is_finite() && hi.is_finite()) || lo > hi {
            return fail("heading range must be finite and ordered");
        }
        if !(self.spin.is_finite() && self.spin >= 0.0) {
            return fail("spin must be finite and not negative");
        }
        if !self.spawn_band.iter().all(|b| b.is_finite()) || !self.edge_margin.is_finite() {
            return fail("spawn band and edge margin must be finite");
        }
        Ok(())
    }
}

/// Complete balance table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Vertical extent of the world (y grows downward)
    pub world_height: f32,
    /// Player starts this far above the world bottom
    pub start_offset: f32,
    /// Player wraps back to the start line when above this y
    pub top_wrap_line: f32,
    /// Upward player speed
    pub climb_speed: f32,
    /// Horizontal player speed while steering
    pub strafe_speed: f32,
    /// Camera keeps the player this far below screen center
    pub camera_lead: f32,
    pub cell_size: f32,
    /// Extra space around the viewport before obstacles are recycled
    pub culling_margin: f32,
    /// Shrinks the hit window below the sum of radii
    pub overlap_factor: f32,
    /// Score points per difficulty level
    pub difficulty_interval: u64,
    pub player: PlayerProfile,
    pub regular: KindProfile,
    pub mega: KindProfile,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_height: 100_000.0,
            start_offset: 200.0,
            top_wrap_line: 50.0,
            climb_speed: 200.0,
            strafe_speed: 300.0,
            camera_lead: 200.0,
            cell_size: 200.0,
            culling_margin: 400.0,
            overlap_factor: 0.9,
            difficulty_interval: 500,
            player: PlayerProfile::default(),
            regular: KindProfile::regular(),
            mega: KindProfile::mega(),
        }
    }
}

impl Tuning {
    #[inline]
    pub fn profile(&self, kind: ObstacleKind) -> &KindProfile {
        match kind {
            ObstacleKind::Regular => &self.regular,
            ObstacleKind::Mega => &self.mega,
        }
    }

    pub fn difficulty_model(&self) -> DifficultyModel {
        DifficultyModel::new(self.difficulty_interval, self.regular.curve, self.mega.curve)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.cell_size > 0.0) {
            return Err(TuningError::CellSize(self.cell_size));
        }
        if !(self.overlap_factor > 0.0 && self.overlap_factor <= 1.0) {
            return Err(TuningError::OverlapFactor(self.overlap_factor));
        }
        if self.difficulty_interval == 0 {
            return Err(TuningError::Interval);
        }
        for kind in ObstacleKind::ALL {
            self.profile(kind).validate(kind)?;
        }
        Ok(())
    }

    /// Parse and validate a JSON tuning table
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn from_file(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `path`, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({})", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "cell_size": 250.0 }"#).unwrap();
        assert_eq!(tuning.cell_size, 250.0);
        assert_eq!(tuning.world_height, 100_000.0);
        assert_eq!(tuning.mega.radius_fraction, 0.51);
    }

    #[test]
    fn test_rejects_bad_overlap() {
        let err = Tuning::from_json(r#"{ "overlap_factor": 1.5 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OverlapFactor(_)));
    }

    #[test]
    fn test_rejects_zero_cell() {
        let err = Tuning::from_json(r#"{ "cell_size": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::CellSize(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default(Path::new("/definitely/not/here.json"));
        assert_eq!(tuning.cell_size, Tuning::default().cell_size);
    }

    #[test]
    fn test_mega_scale_growth() {
        let mega = KindProfile::mega();
        assert_eq!(mega.spawn_scale(0, 10_000.0), 0.16);
        assert_eq!(mega.spawn_scale(2500, 10_000.0), 0.16);
        assert!((mega.spawn_scale(12_500, 10_000.0) - 0.4).abs() < 1e-6);
        // Narrow screens cap the width at a third of the viewport
        let capped = mega.spawn_scale(12_500, 600.0);
        assert!((capped * mega.sprite_extent - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_reversed_heading() {
        let mut tuning = Tuning::default();
        tuning.regular.heading_deg = [150.0, 30.0];
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Profile { kind: "regular", .. })
        ));
        assert_eq!(tuning.regular.heading_range(), (30.0, 150.0));

        tuning.regular.heading_deg = [30.0, f32::INFINITY];
        assert!(matches!(tuning.validate(), Err(TuningError::Profile { .. })));

        let mut json = serde_json::to_value(Tuning::default()).unwrap();
        json["mega"]["heading_deg"] = serde_json::json!([-60.0, -120.0]);
        let err = Tuning::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, TuningError::Profile { kind: "mega", .. }));
    }

    #[test]
    fn test_rejects_negative_spin() {
        let mut tuning = Tuning::default();
        tuning.mega.spin = -1.0;
        assert!(matches!(tuning.validate(), Err(TuningError::Profile { kind: "mega", .. })));
    }

    #[test]
    fn test_rejects_prewarm_above_ceiling() {
        let mut tuning = Tuning::default();
        tuning.mega.prewarm = 40;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Profile { kind: "mega", .. })
        ));

        // Exactly at the ceiling is fine
        tuning.mega.prewarm = tuning.mega.curve.base_ceiling;
        tuning.validate().unwrap();
    }

    #[test]
    fn test_spawn_ranges() {
        assert_eq!(KindProfile::regular().spawn_x_range(800.0), (50.0, 750.0));
        let (lo, hi) = KindProfile::mega().spawn_x_range(800.0);
        assert!((lo - 240.0).abs() < 1e-3 && (hi - 560.0).abs() < 1e-3);
        assert_eq!(KindProfile::regular().spawn_x_range(60.0), (30.0, 30.0));
    }
}
