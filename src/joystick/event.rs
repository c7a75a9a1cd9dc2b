use crate::state::Offset;
use serde::Serialize;
use std::rc::Rc;

/// Outward callback receiving every accepted move.
pub type MoveCallback = Rc<dyn Fn(&JoystickMoveEvent)>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MoveOffset {
    pub pixels: Offset,
    /// Pixels divided by the clamp radius, per axis.
    pub percentage: Offset,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MoveAngle {
    pub radians: f64,
    pub degrees: f64,
}

/// Distance of the handle from the base center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MovePressure {
    pub pixels: f64,
    pub percentage: f64,
}

/// Snapshot emitted after the handle moved. Built fresh for every move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct JoystickMoveEvent {
    pub offset: MoveOffset,
    pub angle: MoveAngle,
    pub pressure: MovePressure,
}

impl JoystickMoveEvent {
    /// The "centered" event sent at construction and after a reset.
    pub const fn zero() -> Self {
        Self {
            offset: MoveOffset {
                pixels: Offset::ZERO,
                percentage: Offset::ZERO,
            },
            angle: MoveAngle {
                radians: 0.0,
                degrees: 0.0,
            },
            pressure: MovePressure {
                pixels: 0.0,
                percentage: 0.0,
            },
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}
