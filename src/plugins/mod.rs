//! Input plugins and the capability bundle they receive.
//!
//! Each plugin is attached once, in registration order, while the joystick is
//! mounted. It wires listeners onto the [`InputHost`] through the bundle's
//! [`ListenerScope`] and drives the handle via [`PluginContext::handle_handle_move`].
//!
//! Plugins cooperate through the shared [`HandleState`]; nothing stops two of them
//! from dragging at once. Mixing plugins is allowed but each one is only tested on
//! its own.

pub mod gamepad;
pub mod keyboard;
pub mod pointer;

pub use gamepad::{AxisSource, GamepadPlugin, GamepadSignal, GilrsAxisSource};
pub use keyboard::KeyboardPlugin;
pub use pointer::PointerPlugin;

use crate::config::JoystickConfig;
use crate::input::{InputHost, ListenerScope};
use crate::joystick::engine::{ClampedMove, MovementEngine};
use crate::joystick::event::JoystickMoveEvent;
use crate::state::{HandleState, JoystickStates, Offset};
use crate::surface::Surface;
use std::rc::Rc;
use tracing::debug;

/// An input source adapter. Any `FnOnce(PluginContext)` closure is a plugin too.
pub trait JoystickPlugin {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn attach(self: Box<Self>, ctx: PluginContext);
}

impl<F> JoystickPlugin for F
where
    F: FnOnce(PluginContext) + 'static,
{
    fn attach(self: Box<Self>, ctx: PluginContext) {
        (*self)(ctx)
    }
}

/// Everything a plugin may touch. Cheap to clone into listener closures.
#[derive(Clone)]
pub struct PluginContext {
    /// Position in the plugin list; index into `HandleState::plugin_dragging`.
    pub plugin_index: usize,
    pub states: JoystickStates,
    pub handle_state: HandleState,
    pub engine: MovementEngine,
    pub base: Rc<dyn Surface>,
    pub handle: Rc<dyn Surface>,
    pub config: Rc<JoystickConfig>,
    pub host: InputHost,
    pub listeners: Rc<ListenerScope>,
}

impl PluginContext {
    pub fn handle_handle_move(&self, dx: f64, dy: f64) -> Option<ClampedMove> {
        self.engine.handle_handle_move(dx, dy)
    }

    pub fn get_radius(&self) -> f64 {
        self.engine.get_radius()
    }

    /// Calls the user's move callback directly, bypassing the throttle.
    pub fn on_move(&self, event: &JoystickMoveEvent) {
        self.engine.emitter().emit_unthrottled(event);
    }

    pub fn is_dragging(&self) -> bool {
        self.handle_state.is_dragging(self.plugin_index)
    }

    /// Marks this plugin as dragging from `anchor` and stops the return animation.
    pub fn begin_gesture(&self, anchor: Offset) {
        debug!("Plugin {} begins gesture at {:?}", self.plugin_index, anchor);
        self.handle_state.set_initial_offsets(anchor);
        self.handle_state.set_dragging(self.plugin_index, true);
        self.states.should_transition.set(false);
    }

    /// Re-enables the return animation and, with `reset`, recenters everything.
    ///
    /// Resetting clears the shared record for every plugin and sends the zero
    /// event so consumers see an explicit "centered" move. Without `reset` the
    /// record is left alone: the handle stays where it was released and this
    /// plugin keeps its anchor for the next gesture.
    pub fn end_gesture(&self, reset: bool) {
        debug!("Plugin {} ends gesture (reset: {})", self.plugin_index, reset);
        self.states
            .should_transition
            .set(!self.config.disable_reset_animation);
        if reset {
            self.handle_state.reset();
            self.engine.emit_reset();
        }
    }

    /// Clears only this plugin's dragging flag, e.g. when its device goes away.
    pub fn cancel_gesture(&self) {
        debug!("Plugin {} cancels gesture", self.plugin_index);
        self.handle_state.set_dragging(self.plugin_index, false);
    }
}
