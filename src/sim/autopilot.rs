//! Demo-mode steering
//!
//! Picks the most dangerous obstacle ahead of the player and sidesteps it.
//! Good enough for attract mode and headless soak runs, not for a high score.

use super::state::GameState;
use super::tick::TickInput;

/// How far above the player obstacles are considered
const LOOK_AHEAD: f32 = 360.0;
/// Extra horizontal clearance on top of the two radii
const CLEARANCE: f32 = 30.0;

/// Steering intent for the current state. Idle when nothing is in the way.
pub fn autopilot_input(state: &GameState) -> TickInput {
    let player = &state.player;
    let p = player.pos();

    // Closest obstacle that is ahead and roughly on our column
    let mut threat: Option<(f32, f32)> = None;
    state.lifecycle.for_each_active(|o| {
        let o_pos = o.pos();
        let ahead = p.y - o_pos.y;
        if !(-o.radius..=LOOK_AHEAD).contains(&ahead) {
            return;
        }
        let dx = o_pos.x - p.x;
        if dx.abs() > player.radius + o.radius + CLEARANCE {
            return;
        }
        if threat.is_none_or(|(best, _)| ahead < best) {
            threat = Some((ahead, dx));
        }
    });

    match threat {
        // Obstacle to our right (or dead ahead): go left, unless the wall is close
        Some((_, dx)) if dx >= 0.0 && p.x > player.radius * 2.0 => TickInput {
            move_left: true,
            move_right: false,
        },
        Some(_) => TickInput {
            move_left: false,
            move_right: true,
        },
        None => TickInput::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::ObstacleKind;
    use crate::sim::lifecycle::SpawnParams;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state_with_obstacle(offset: Vec2) -> GameState {
        let mut state = GameState::new(Tuning::default(), Viewport::default(), 3);
        let pos = state.player.pos() + offset;
        state.lifecycle.spawn(
            ObstacleKind::Regular,
            SpawnParams {
                pos,
                vel: Vec2::ZERO,
                angular_vel: 0.0,
                scale: 0.08,
            },
            50,
        );
        state
    }

    #[test]
    fn test_idle_when_clear() {
        let state = GameState::new(Tuning::default(), Viewport::default(), 3);
        assert_eq!(autopilot_input(&state), TickInput::default());

        // Off to the side does not count
        let state = state_with_obstacle(Vec2::new(200.0, -100.0));
        assert_eq!(autopilot_input(&state), TickInput::default());

        // Behind the player does not count
        let state = state_with_obstacle(Vec2::new(0.0, 200.0));
        assert_eq!(autopilot_input(&state), TickInput::default());
    }

    #[test]
    fn test_sidesteps_away_from_threat() {
        let state = state_with_obstacle(Vec2::new(10.0, -150.0));
        assert!(autopilot_input(&state).move_left);

        let state = state_with_obstacle(Vec2::new(-10.0, -150.0));
        assert!(autopilot_input(&state).move_right);
    }
}
