//! Reactive state shared between the movement engine, plugins and surfaces.

pub mod drag_state;
pub mod mutable_state;

pub use drag_state::{DragRecord, HandleState};
pub use mutable_state::{MutableState, Observe, Subscription};

use serde::{Deserialize, Serialize};

/// Pixel displacement, either of the handle from the base center or of a device anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Offset {
    type Output = Offset;

    fn sub(self, other: Offset) -> Offset {
        Offset::new(self.x - other.x, self.y - other.y)
    }
}

/// The two observable cells every joystick owns.
#[derive(Clone, Debug)]
pub struct JoystickStates {
    pub offset: MutableState<Offset>,
    pub should_transition: MutableState<bool>,
}

impl JoystickStates {
    pub fn new() -> Self {
        Self {
            offset: MutableState::new(Offset::ZERO),
            should_transition: MutableState::new(false),
        }
    }

    pub fn clear_subscribers(&self) {
        self.offset.clear_subscribers();
        self.should_transition.clear_subscribers();
    }
}

impl Default for JoystickStates {
    fn default() -> Self {
        Self::new()
    }
}
