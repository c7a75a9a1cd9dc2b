//! Gamepad plugin: an analog stick drives the handle, polled once per frame.
//!
//! ```text
//! frame tick ──► AxisSource::poll ──► stick (x, y) * radius ──► engine
//! ```
//!
//! Leaving the deadzone starts a gesture, returning to rest ends it, and a
//! disconnect cancels it. Full deflection maps onto the clamp circle's edge.

use super::{JoystickPlugin, PluginContext};
use crate::error::JoystickError;
use crate::input::FrameTick;
use crate::state::Offset;
use gilrs::{Axis, Event, EventType, Gamepad, GamepadId, Gilrs};
use std::cell::{Cell, RefCell};
use tracing::{debug, error, info, warn};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GamepadSignal {
    /// Stick position in `[-1, 1]`, screen space (y grows downward), deadzone applied.
    Stick { x: f32, y: f32 },
    Disconnected,
}

/// Something that can be asked for the stick's latest state.
pub trait AxisSource {
    /// `None` when nothing changed since the last poll.
    fn poll(&mut self) -> Option<GamepadSignal>;
}

/// Zeroes values inside the deadzone and rescales the rest to the full range.
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        0.0
    } else {
        let sign = if value < 0.0 { -1.0 } else { 1.0 };
        sign * (value.abs() - deadzone) / (1.0 - deadzone)
    }
}

/// Accepts a deadzone in `[0, 1)`.
pub fn validate_deadzone(deadzone: f32) -> Result<f32, JoystickError> {
    if !(deadzone >= 0.0 && deadzone < 1.0) {
        return Err(JoystickError::ConfigError(format!(
            "gamepad deadzone must be in [0, 1), got {}",
            deadzone
        )));
    }
    Ok(deadzone)
}

/// Left stick of the first connected gamepad, read through gilrs.
pub struct GilrsAxisSource {
    gilrs: Gilrs,
    active_gamepad: Option<GamepadId>,
    deadzone: f32,
    x: f32,
    y: f32,
}

impl GilrsAxisSource {
    pub fn new(deadzone: f32) -> Result<Self, JoystickError> {
        let deadzone = validate_deadzone(deadzone)?;
        info!("Initializing gilrs gamepad interface");
        let gilrs = Gilrs::new().map_err(|e| {
            error!("Failed to initialize gilrs: {}", e);
            JoystickError::GamepadInit(e.to_string())
        })?;

        let active_gamepad = {
            let gamepads: Vec<(GamepadId, Gamepad<'_>)> = gilrs.gamepads().collect();
            info!("Found {} gamepads", gamepads.len());
            let selected = match gamepads.first() {
                Some((id, gamepad)) => {
                    info!("Selected gamepad: {} ({})", gamepad.name(), id);
                    Some(*id)
                }
                None => {
                    warn!("No gamepad connected, waiting for one");
                    None
                }
            };
            selected
        };

        Ok(Self {
            gilrs,
            active_gamepad,
            deadzone,
            x: 0.0,
            y: 0.0,
        })
    }
}

impl AxisSource for GilrsAxisSource {
    fn poll(&mut self) -> Option<GamepadSignal> {
        let mut signal = None;
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected if self.active_gamepad.is_none() => {
                    info!("Gamepad {} connected, selecting it", id);
                    self.active_gamepad = Some(id);
                }
                EventType::Disconnected if self.active_gamepad == Some(id) => {
                    warn!("Active gamepad {} disconnected", id);
                    self.active_gamepad = None;
                    self.x = 0.0;
                    self.y = 0.0;
                    signal = Some(GamepadSignal::Disconnected);
                }
                EventType::AxisChanged(axis, value, _) if self.active_gamepad == Some(id) => {
                    match axis {
                        Axis::LeftStickX => self.x = apply_deadzone(value, self.deadzone),
                        // gilrs reports up as positive
                        Axis::LeftStickY => self.y = -apply_deadzone(value, self.deadzone),
                        _ => continue,
                    }
                    signal = Some(GamepadSignal::Stick {
                        x: self.x,
                        y: self.y,
                    });
                }
                _ => {}
            }
        }
        signal
    }
}

pub struct GamepadPlugin {
    source: Box<dyn AxisSource>,
    disable_reset: bool,
}

impl GamepadPlugin {
    pub fn new(source: impl AxisSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            disable_reset: false,
        }
    }

    /// Backed by gilrs with the given stick deadzone.
    pub fn gilrs(deadzone: f32) -> Result<Self, JoystickError> {
        Ok(Self::new(GilrsAxisSource::new(deadzone)?))
    }

    pub fn without_reset(mut self) -> Self {
        self.disable_reset = true;
        self
    }
}

impl JoystickPlugin for GamepadPlugin {
    fn name(&self) -> &'static str {
        "gamepad"
    }

    fn attach(self: Box<Self>, ctx: PluginContext) {
        let GamepadPlugin {
            source,
            disable_reset,
        } = *self;
        let source = RefCell::new(source);
        let active = Cell::new(false);

        let tick_ctx = ctx.clone();
        ctx.listeners.listen(&ctx.host.frame, move |_: &FrameTick| {
            let ctx = &tick_ctx;
            let signal = source.borrow_mut().poll();
            match signal {
                None => {}
                Some(GamepadSignal::Disconnected) => {
                    if active.replace(false) {
                        debug!("Gamepad gone, cancelling gesture");
                        ctx.end_gesture(!disable_reset);
                        ctx.cancel_gesture();
                    }
                }
                Some(GamepadSignal::Stick { x, y }) if !(x.is_finite() && y.is_finite()) => {
                    warn!("Ignoring non-finite stick reading ({}, {})", x, y);
                }
                Some(GamepadSignal::Stick { x, y }) => {
                    let at_rest = x == 0.0 && y == 0.0;
                    if !at_rest {
                        if !active.replace(true) {
                            ctx.begin_gesture(Offset::ZERO);
                        }
                        let radius = ctx.get_radius();
                        ctx.handle_handle_move(x as f64 * radius, y as f64 * radius);
                    } else if active.replace(false) {
                        ctx.end_gesture(!disable_reset);
                    }
                }
            }
        });
    }
}
