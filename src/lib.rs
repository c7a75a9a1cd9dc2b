//! Reactive movement engine for an on-screen joystick.
//!
//! Input plugins (pointer, keyboard, gamepad) report raw deltas; the
//! [`joystick::MovementEngine`] clamps them around the base, writes the handle
//! offset into an observable cell and emits a normalised
//! [`joystick::JoystickMoveEvent`].
//!
//! # Architecture
//!
//! ```text
//! InputHost ──► plugins ──► HandleState ──► MovementEngine ──► offset cell ──► Surface
//!                                               │
//!                                               └──► Throttle ──► on_move
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod joystick;
pub mod plugins;
pub mod state;
pub mod surface;
pub mod trig;
pub mod ui;

pub use config::{BoundingModel, JoystickConfig, JoystickOptions};
pub use error::JoystickError;
pub use joystick::{Joystick, JoystickMoveEvent, JoystickProps};
