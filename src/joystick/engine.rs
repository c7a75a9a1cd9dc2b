//! Movement engine: the single place raw deltas are clamped into handle offsets.
//!
//! ```text
//! plugin ──(dx, dy)──► handle_handle_move ──► radius ──► clamp ──► offset cell
//!                                                              └──► throttled on_move
//! ```
//!
//! A call is ignored unless the handle is enabled and at least one plugin is
//! currently dragging.

use super::event::{JoystickMoveEvent, MoveAngle, MoveOffset, MovePressure};
use super::throttle::ThrottledEmitter;
use crate::config::{BoundingModel, JoystickConfig};
use crate::state::{HandleState, JoystickStates, Offset};
use crate::surface::Surface;
use crate::trig::Trig;
use std::rc::Rc;
use tracing::trace;

/// Effective clamp radius for the given element sizes and bounding policy.
///
/// `inner` and `outer` shift the base radius by half the handle's larger side;
/// `center` and `none` use the base radius as is. The boundary modifier is
/// added last.
pub fn resolve_radius(
    model: BoundingModel,
    boundary_modifier: f64,
    base_width: f64,
    handle_width: f64,
    handle_height: f64,
) -> f64 {
    let edge = match model {
        BoundingModel::Inner | BoundingModel::Outer => handle_width.max(handle_height) / 2.0,
        BoundingModel::Center | BoundingModel::None => 0.0,
    };
    let signed_edge = if model == BoundingModel::Outer { edge } else { -edge };
    base_width / 2.0 + signed_edge + boundary_modifier
}

/// Result of clamping one raw delta.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClampedMove {
    pub offset: Offset,
    pub event: JoystickMoveEvent,
}

/// Pure clamp step. A non-positive or non-finite radius is a degenerate layout:
/// offsets pass through unclamped and percentages read 0.
pub fn clamp_move(config: &JoystickConfig, radius: f64, dx: f64, dy: f64) -> ClampedMove {
    let hypotenuse = Trig::hypotenuse(dx, dy);
    let radians = Trig::angle_radians(dx, dy);
    let degenerate = !(radius.is_finite() && radius > 0.0);
    let unbounded = degenerate || config.bounding_model == BoundingModel::None;
    let inside = hypotenuse < radius || unbounded;

    let x = if config.disable_x {
        0.0
    } else if inside {
        dx
    } else {
        Trig::max_x(radians, radius)
    };
    let y = if config.disable_y {
        0.0
    } else if inside {
        dy
    } else {
        Trig::max_y(radians, radius)
    };

    let beyond_edge = hypotenuse > radius && !unbounded;
    let (percentage, pressure_percentage) = if degenerate {
        (Offset::ZERO, 0.0)
    } else {
        let pressure = if beyond_edge {
            1.0
        } else {
            (hypotenuse / radius).abs()
        };
        (Offset::new(x / radius, y / radius), pressure)
    };

    ClampedMove {
        offset: Offset::new(x, y),
        event: JoystickMoveEvent {
            offset: MoveOffset {
                pixels: Offset::new(x, y),
                percentage,
            },
            angle: MoveAngle {
                radians,
                degrees: Trig::radians_to_degrees(radians),
            },
            pressure: MovePressure {
                pixels: if beyond_edge { radius } else { hypotenuse },
                percentage: pressure_percentage,
            },
        },
    }
}

struct EngineInner {
    config: Rc<JoystickConfig>,
    states: JoystickStates,
    handle_state: HandleState,
    base: Rc<dyn Surface>,
    handle: Rc<dyn Surface>,
    emitter: ThrottledEmitter,
}

/// Cloneable entry point shared with every plugin.
#[derive(Clone)]
pub struct MovementEngine {
    inner: Rc<EngineInner>,
}

impl MovementEngine {
    pub fn new(
        config: Rc<JoystickConfig>,
        states: JoystickStates,
        handle_state: HandleState,
        base: Rc<dyn Surface>,
        handle: Rc<dyn Surface>,
        emitter: ThrottledEmitter,
    ) -> Self {
        Self {
            inner: Rc::new(EngineInner {
                config,
                states,
                handle_state,
                base,
                handle,
                emitter,
            }),
        }
    }

    /// Clamp radius from the surfaces' current sizes.
    pub fn get_radius(&self) -> f64 {
        let handle = &self.inner.handle;
        resolve_radius(
            self.inner.config.bounding_model,
            self.inner.config.boundary_modifier,
            self.inner.base.client_width(),
            handle.client_width(),
            handle.client_height(),
        )
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.config.disabled || self.inner.handle.disabled()
    }

    /// Moves the handle towards the raw `(dx, dy)` delta from center.
    ///
    /// Returns the clamped move when it was accepted, `None` when ignored.
    /// The offset cell is written on every accepted call; the outward event is
    /// subject to throttling.
    pub fn handle_handle_move(&self, dx: f64, dy: f64) -> Option<ClampedMove> {
        if self.is_disabled() || !self.inner.handle_state.any_dragging() {
            trace!("Ignoring move ({:.2}, {:.2}): not dragging or disabled", dx, dy);
            return None;
        }

        let radius = self.get_radius();
        let clamped = clamp_move(&self.inner.config, radius, dx, dy);
        trace!(
            "Move ({:.2}, {:.2}) -> ({:.2}, {:.2}) at radius {:.2}",
            dx,
            dy,
            clamped.offset.x,
            clamped.offset.y,
            radius
        );

        self.inner.states.offset.set(clamped.offset);
        self.inner.emitter.emit(&clamped.event);
        Some(clamped)
    }

    /// Zeroes the offset and sends the zero event past the throttle.
    pub fn emit_reset(&self) {
        self.inner.states.offset.set(Offset::ZERO);
        self.inner.emitter.emit_unthrottled(&JoystickMoveEvent::zero());
    }

    pub fn emitter(&self) -> &ThrottledEmitter {
        &self.inner.emitter
    }

    pub fn config(&self) -> &Rc<JoystickConfig> {
        &self.inner.config
    }
}
