//! Platform abstraction layer
//!
//! Turns device events into the simulation's `TickInput`. Keyboard and touch
//! both feed `InputState`; the simulation never sees which one was used.

pub mod input;

pub use input::{InputState, KeyState, TOUCH_THRESHOLD, TouchSteering};
