//! Physical bodies and the collaborators that build and move them
//!
//! The core never decides how a body is drawn or how velocity is integrated in
//! a real physics host; it only needs a mutable transform it can place, read,
//! and park. `BodyFactory` and `Integrator` are the seams a host plugs into.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::ObstacleKind;
use crate::tuning::KindProfile;

/// Transform and motion state of anything that moves in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Rotation in degrees (visual only)
    pub rotation: f32,
    /// Degrees per second
    pub angular_vel: f32,
    pub scale: f32,
    /// Unscaled sprite width in world units
    pub extent: f32,
    pub visible: bool,
}

impl Body {
    pub fn new(extent: f32, scale: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            rotation: 0.0,
            angular_vel: 0.0,
            scale,
            extent,
            visible: false,
        }
    }

    /// Scaled on-screen width
    #[inline]
    pub fn display_width(&self) -> f32 {
        self.extent * self.scale
    }

    /// Collision radius as a fraction of the scaled width
    #[inline]
    pub fn radius_for(&self, fraction: f32) -> f32 {
        self.display_width() * fraction
    }
}

/// Builds fresh obstacle bodies for a pool that has run dry
pub trait BodyFactory {
    fn build(&mut self, kind: ObstacleKind, profile: &KindProfile) -> Body;
}

/// Default factory: a hidden body sized from the kind profile
#[derive(Debug, Default, Clone, Copy)]
pub struct ProfileBodyFactory;

impl BodyFactory for ProfileBodyFactory {
    fn build(&mut self, _kind: ObstacleKind, profile: &KindProfile) -> Body {
        Body::new(profile.sprite_extent, profile.base_scale)
    }
}

/// Advances a body by one timestep
pub trait Integrator {
    fn integrate(&mut self, body: &mut Body, dt: f32);
}

/// Explicit Euler integration, matching an arcade physics step with no drag
#[derive(Debug, Default, Clone, Copy)]
pub struct EulerIntegrator;

impl Integrator for EulerIntegrator {
    fn integrate(&mut self, body: &mut Body, dt: f32) {
        body.pos += body.vel * dt;
        body.rotation = (body.rotation + body.angular_vel * dt) % 360.0;
    }
}
