//! Keyboard and touch steering

use crate::sim::TickInput;

/// Horizontal swipe distance (screen units) before a touch starts steering
pub const TOUCH_THRESHOLD: f32 = 50.0;

/// Held-key state for the two steering directions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    /// Apply a key press or release by key name. Returns false for keys that
    /// do not steer.
    pub fn set_key(&mut self, key: &str, down: bool) -> bool {
        match key {
            "ArrowLeft" | "Left" | "a" | "A" => self.left = down,
            "ArrowRight" | "Right" | "d" | "D" => self.right = down,
            _ => return false,
        }
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Swipe steering: once a move exceeds the threshold the direction latches
/// until the next opposite swipe or until the touch ends
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TouchSteering {
    last_x: Option<f32>,
    /// -1 left, 1 right, 0 idle
    direction: i8,
}

impl TouchSteering {
    pub fn touch_start(&mut self, x: f32) {
        self.last_x = Some(x);
    }

    pub fn touch_move(&mut self, x: f32) {
        let Some(last) = self.last_x else {
            return;
        };
        let diff = x - last;
        if diff.abs() > TOUCH_THRESHOLD {
            self.direction = if diff > 0.0 { 1 } else { -1 };
        }
        self.last_x = Some(x);
    }

    pub fn touch_end(&mut self) {
        self.last_x = None;
        self.direction = 0;
    }

    pub fn is_touching(&self) -> bool {
        self.last_x.is_some()
    }

    pub fn steering_left(&self) -> bool {
        self.direction < 0
    }

    pub fn steering_right(&self) -> bool {
        self.direction > 0
    }
}

/// Everything the driver collects between ticks
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub keys: KeyState,
    pub touch: TouchSteering,
}

impl InputState {
    /// Merge all devices into one intent
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            move_left: self.keys.left || self.touch.steering_left(),
            move_right: self.keys.right || self.touch.steering_right(),
        }
    }

    /// Focus lost or round over: nothing stays held
    pub fn release_all(&mut self) {
        self.keys.clear();
        self.touch.touch_end();
    }
}
