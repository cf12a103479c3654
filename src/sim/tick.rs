//! Per-tick simulation step
//!
//! Order inside a tick is fixed:
//! 1. refresh culling bounds from the camera
//! 2. cull obstacles outside them
//! 3. re-file moved bodies in the grid
//! 4. collision check against the player's neighborhood
//! 5. difficulty-driven spawning
//! 6. kinematics, wrapping, score
//!
//! Culling before the grid refresh, and the refresh before the collision
//! check, means no query ever sees an obstacle that is already gone or filed
//! under a stale cell.

use glam::Vec2;
use rand::Rng;

use super::entity::{ObstacleId, ObstacleKind};
use super::lifecycle::SpawnParams;
use super::state::{GameEvent, GamePhase, GameState};

/// Input intents for a single tick, already stripped of their source device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
}

/// Advance the round by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Nothing runs once the round is decided
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    state.refresh_bounds();
    let bounds = state.bounds;
    let culled = state.lifecycle.cull(|o| !bounds.contains(o.pos()));
    if culled > 0 {
        state.events.push(GameEvent::Culled { count: culled });
    }

    state.lifecycle.refresh_player(&mut state.player);
    state.lifecycle.refresh_grid();

    if let Some(hit) = state.detector.check_player_collision(&state.player, &state.lifecycle) {
        state.resolve_collision(hit);
        return;
    }

    run_spawners(state, dt);
    advance_bodies(state, input, dt);
}

/// Count down each kind's spawn timer against the current difficulty
fn run_spawners(state: &mut GameState, dt: f32) {
    if !state.spawning {
        return;
    }

    for kind in ObstacleKind::ALL {
        let i = kind.index();
        state.spawn_timers[i] += dt;

        let delay = state.difficulty.spawn_delay(kind, state.score);
        if state.spawn_timers[i] < delay {
            continue;
        }
        state.spawn_timers[i] = (state.spawn_timers[i] - delay).min(delay);

        if state.score < state.tuning.profile(kind).min_score {
            continue;
        }
        if let Some(id) = spawn_obstacle(state, kind) {
            state.events.push(GameEvent::Spawned { id });
        }
    }
}

/// Place one obstacle of `kind` on the spawn line above the camera.
///
/// Returns `None` when the spawn line is above the world or the pool is at
/// its ceiling.
pub fn spawn_obstacle(state: &mut GameState, kind: ObstacleKind) -> Option<ObstacleId> {
    let profile = state.tuning.profile(kind);
    let spawn_y = state.camera_top() - profile.spawn_offset;
    if spawn_y < 0.0 {
        return None;
    }

    let width = state.viewport.width;
    let (lo, hi) = profile.spawn_x_range(width);
    let x = state.rng.random_range(lo..=hi);

    let (min_heading, max_heading) = profile.heading_range();
    let heading = state.rng.random_range(min_heading..=max_heading).to_radians();
    let speed = state.difficulty.obstacle_speed(kind, state.score);
    let vel = Vec2::new(
        speed * heading.cos(),
        -speed * heading.sin() + profile.downward_drift,
    );

    let angular_vel = if profile.spin > 0.0 {
        state.rng.random_range(-profile.spin..=profile.spin)
    } else {
        0.0
    };

    let params = SpawnParams {
        pos: Vec2::new(x, spawn_y),
        vel,
        angular_vel,
        scale: profile.spawn_scale(state.score, width),
    };
    let ceiling = state.difficulty.pool_ceiling(kind, state.score);
    state.lifecycle.spawn(kind, params, ceiling)
}

/// Steer the player, integrate everything, then wrap and score
fn advance_bodies(state: &mut GameState, input: &TickInput, dt: f32) {
    let strafe = match (input.move_left, input.move_right) {
        (true, _) => -state.tuning.strafe_speed,
        (false, true) => state.tuning.strafe_speed,
        (false, false) => 0.0,
    };
    state.player.body.vel = Vec2::new(strafe, -state.tuning.climb_speed);

    state.integrator.integrate(&mut state.player.body, dt);
    let integrator = &mut state.integrator;
    state
        .lifecycle
        .for_each_active_mut(|o| integrator.integrate(&mut o.body, dt));

    // Horizontal screen wrap
    let width = state.viewport.width;
    let pos = &mut state.player.body.pos;
    if pos.x < 0.0 {
        pos.x = width;
    } else if pos.x > width {
        pos.x = 0.0;
    }

    // Back to the start line at the top of the world, keeping the climb
    if pos.y <= state.tuning.top_wrap_line {
        let restart = state.tuning.world_height - state.tuning.start_offset;
        state.wrapped_distance += restart - pos.y;
        pos.y = restart;
        state.events.push(GameEvent::Wrapped);
        log::debug!("Player wrapped to the start line");
    }

    state.update_score();
}
