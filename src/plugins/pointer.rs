//! Pointer plugin: mouse, pen and single-touch dragging of the handle.
//!
//! ```text
//! handle pointer-down ──► anchor = client pos, dragging = true
//! window pointer-move ──► engine(client - anchor)
//! window pointer-up   ──► transition on, reset (unless disabled)
//! ```

use super::{JoystickPlugin, PluginContext};
use crate::input::PointerEvent;
use crate::state::Subscription;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default)]
pub struct PointerPlugin {
    /// Keep the handle where it was released instead of snapping back to center.
    pub disable_reset: bool,
}

impl PointerPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_reset() -> Self {
        Self {
            disable_reset: true,
        }
    }
}

impl JoystickPlugin for PointerPlugin {
    fn name(&self) -> &'static str {
        "pointer"
    }

    fn attach(self: Box<Self>, ctx: PluginContext) {
        let disable_reset = self.disable_reset;
        let move_listener: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let on_move = {
            let ctx = ctx.clone();
            move |event: &PointerEvent| {
                let anchor = ctx.handle_state.initial_offsets();
                let dx = if ctx.config.disable_x {
                    0.0
                } else {
                    event.client_x - anchor.x
                };
                let dy = if ctx.config.disable_y {
                    0.0
                } else {
                    event.client_y - anchor.y
                };
                ctx.handle_handle_move(dx, dy);
            }
        };
        let on_move = Rc::new(on_move);

        let on_up = {
            let ctx = ctx.clone();
            let move_listener = Rc::clone(&move_listener);
            move |_: &PointerEvent| {
                if let Some(listener) = move_listener.borrow_mut().take() {
                    listener.unsubscribe();
                }
                ctx.end_gesture(!disable_reset);
            }
        };
        let on_up = Rc::new(on_up);

        let down_ctx = ctx.clone();
        ctx.listeners
            .listen(&ctx.host.handle_pointer_down, move |event: &PointerEvent| {
                let ctx = &down_ctx;
                debug!(
                    "Pointer down at ({:.1}, {:.1})",
                    event.client_x, event.client_y
                );

                // One move/up pair per gesture, even if the host repeats pointer-down.
                if move_listener.borrow().is_none() {
                    let on_move = Rc::clone(&on_move);
                    let sub = ctx
                        .listeners
                        .listen(&ctx.host.window_pointer_move, move |e| on_move(e));
                    *move_listener.borrow_mut() = Some(sub);

                    let on_up = Rc::clone(&on_up);
                    ctx.listeners
                        .listen_once(&ctx.host.window_pointer_up, move |e| on_up(e));
                }

                ctx.states.should_transition.set(false);
                if !disable_reset || !ctx.is_dragging() {
                    ctx.begin_gesture(event.client());
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JoystickOptions;
    use crate::input::InputHost;
    use crate::joystick::{Joystick, JoystickMoveEvent, JoystickProps};
    use crate::state::Offset;
    use crate::surface::SurfaceElement;
    use std::cell::RefCell;

    fn mount(
        options: JoystickOptions,
        plugin: PointerPlugin,
    ) -> (
        InputHost,
        crate::joystick::Joystick<crate::joystick::Mounted>,
        Rc<RefCell<Vec<JoystickMoveEvent>>>,
    ) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let props = JoystickProps::from_options(options)
            .with_plugin(plugin)
            .with_on_move(move |e| sink.borrow_mut().push(*e));
        let host = InputHost::new();
        let joystick = Joystick::create(props)
            .unwrap()
            .mount(
                Rc::new(SurfaceElement::new(200.0, 200.0)),
                Rc::new(SurfaceElement::new(40.0, 40.0)),
                host.clone(),
            );
        (host, joystick, events)
    }

    #[test]
    fn test_drag_clamps_and_release_resets() {
        let (host, joystick, events) = mount(JoystickOptions::default(), PointerPlugin::new());

        host.handle_pointer_down.dispatch(&PointerEvent::new(500.0, 500.0));
        assert!(joystick.handle_state().is_dragging(0));
        assert!(!joystick.states().should_transition.get());

        host.window_pointer_move.dispatch(&PointerEvent::new(650.0, 500.0));
        assert_eq!(joystick.states().offset.get(), Offset::new(100.0, 0.0));

        host.window_pointer_up.dispatch(&PointerEvent::new(650.0, 500.0));
        assert_eq!(joystick.states().offset.get(), Offset::ZERO);
        assert!(!joystick.handle_state().any_dragging());
        assert_eq!(joystick.handle_state().initial_offsets(), Offset::ZERO);
        assert!(joystick.states().should_transition.get());

        let events = events.borrow();
        // construction, the move, the reset
        assert_eq!(events.len(), 3);
        assert!(events[0].is_zero());
        assert_eq!(events[1].pressure.percentage, 1.0);
        assert!(events[2].is_zero());
    }

    #[test]
    fn test_moves_after_release_are_ignored() {
        let (host, joystick, events) = mount(JoystickOptions::default(), PointerPlugin::new());

        host.handle_pointer_down.dispatch(&PointerEvent::new(0.0, 0.0));
        host.window_pointer_up.dispatch(&PointerEvent::new(0.0, 0.0));
        host.window_pointer_move.dispatch(&PointerEvent::new(30.0, 30.0));

        assert_eq!(joystick.states().offset.get(), Offset::ZERO);
        assert_eq!(events.borrow().len(), 2);
        assert_eq!(host.window_pointer_move.listener_count(), 0);
    }

    #[test]
    fn test_disabled_axis_is_zeroed_before_clamping() {
        let options = JoystickOptions {
            disable_x: Some(true),
            ..Default::default()
        };
        let (host, joystick, _) = mount(options, PointerPlugin::new());

        host.handle_pointer_down.dispatch(&PointerEvent::new(100.0, 100.0));
        host.window_pointer_move.dispatch(&PointerEvent::new(180.0, 110.0));
        assert_eq!(joystick.states().offset.get(), Offset::new(0.0, 10.0));
    }

    #[test]
    fn test_without_reset_keeps_position_and_anchor() {
        let (host, joystick, events) =
            mount(JoystickOptions::default(), PointerPlugin::without_reset());

        host.handle_pointer_down.dispatch(&PointerEvent::new(10.0, 10.0));
        host.window_pointer_move.dispatch(&PointerEvent::new(40.0, 50.0));
        host.window_pointer_up.dispatch(&PointerEvent::new(40.0, 50.0));

        assert_eq!(joystick.states().offset.get(), Offset::new(30.0, 40.0));
        assert!(joystick.handle_state().is_dragging(0));
        assert_eq!(events.borrow().len(), 2);

        // A second gesture keeps the first anchor.
        host.handle_pointer_down.dispatch(&PointerEvent::new(90.0, 90.0));
        assert_eq!(joystick.handle_state().initial_offsets(), Offset::new(10.0, 10.0));
        host.window_pointer_move.dispatch(&PointerEvent::new(20.0, 10.0));
        assert_eq!(joystick.states().offset.get(), Offset::new(10.0, 0.0));
    }

    #[test]
    fn test_repeated_pointer_down_registers_one_move_listener() {
        let (host, _joystick, _) = mount(JoystickOptions::default(), PointerPlugin::new());
        host.handle_pointer_down.dispatch(&PointerEvent::new(0.0, 0.0));
        host.handle_pointer_down.dispatch(&PointerEvent::new(5.0, 5.0));
        assert_eq!(host.window_pointer_move.listener_count(), 1);
        assert_eq!(host.window_pointer_up.listener_count(), 1);
    }
}
