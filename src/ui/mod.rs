//! # egui Joystick Demo
//!
//! Draws a joystick base and handle with egui and feeds egui's pointer and key
//! input into an [`InputHost`]. The handle position comes from the handle
//! [`SurfaceElement`]'s last applied style, so everything on screen went through
//! the movement engine.
//!
//! ## Frame Processing
//!
//! ```text
//! egui input ──► InputHost (pointer/key/frame) ──► plugins ──► engine
//!                                                                │
//! painter ◄── animated handle position ◄── SurfaceElement style ◄┘
//! ```
//!
//! The return-to-center animation uses egui's value animation with the duration
//! parsed from the configured reset animation.

pub mod common;

use crate::input::{FrameTick, InputHost, KeyEvent, PointerEvent};
use crate::joystick::{Joystick, JoystickMoveEvent, JoystickProps, Mounted};
use crate::surface::{parse_transition_seconds, SurfaceElement};
use common::{to_offset, to_vec2, UiColors};
use eframe::egui::{self, vec2, Event, Frame, Id, Pos2, Sense, Stroke};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};

/// Handle diameter relative to the base.
const HANDLE_RATIO: f32 = 0.3;

pub struct JoystickDemo {
    host: InputHost,
    joystick: Option<Joystick<Mounted>>,
    base: Rc<SurfaceElement>,
    handle: Rc<SurfaceElement>,
    last_event: Rc<RefCell<JoystickMoveEvent>>,
    event_count: Rc<Cell<u64>>,
    pointer_down: bool,
    reset_duration: Duration,
}

impl JoystickDemo {
    /// Mounts the joystick built from `props` against the demo's surfaces.
    pub fn new(props: JoystickProps) -> color_eyre::Result<Self> {
        let last_event = Rc::new(RefCell::new(JoystickMoveEvent::zero()));
        let event_count = Rc::new(Cell::new(0));

        let props = {
            let last_event = Rc::clone(&last_event);
            let event_count = Rc::clone(&event_count);
            props.with_on_move(move |event| {
                *last_event.borrow_mut() = *event;
                event_count.set(event_count.get() + 1);
            })
        };

        let host = InputHost::new();
        let base = Rc::new(SurfaceElement::new(0.0, 0.0));
        let handle = Rc::new(SurfaceElement::new(0.0, 0.0));
        let joystick = Joystick::create(props)?.mount(base.clone(), handle.clone(), host.clone());

        let reset_duration = parse_transition_seconds(&joystick.config().reset_animation)
            .unwrap_or(Duration::from_millis(200));
        info!("Demo ready, reset animation {:?}", reset_duration);

        Ok(Self {
            host,
            joystick: Some(joystick),
            base,
            handle,
            last_event,
            event_count,
            pointer_down: false,
            reset_duration,
        })
    }

    fn forward_keys(&self, ctx: &egui::Context) {
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            if let Event::Key {
                key,
                pressed,
                repeat,
                ..
            } = event
            {
                let key_event = KeyEvent { key, repeat };
                if pressed {
                    self.host.key_down.dispatch(&key_event);
                } else {
                    self.host.key_up.dispatch(&key_event);
                }
            }
        }
    }

    fn forward_pointer(&mut self, ctx: &egui::Context, handle_response: &egui::Response) {
        if handle_response.drag_started() {
            let origin = ctx
                .input(|i| i.pointer.press_origin())
                .or_else(|| handle_response.interact_pointer_pos());
            if let Some(origin) = origin {
                debug!("Demo pointer down at {:?}", origin);
                let anchor = to_offset(origin);
                self.host
                    .handle_pointer_down
                    .dispatch(&PointerEvent::new(anchor.x, anchor.y));
                self.pointer_down = true;
            }
        }

        if !self.pointer_down {
            return;
        }

        let (latest, moving, released) = ctx.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.is_moving(),
                i.pointer.any_released(),
            )
        });
        if let Some(pos) = latest {
            let client = to_offset(pos);
            let event = PointerEvent::new(client.x, client.y);
            if moving {
                self.host.window_pointer_move.dispatch(&event);
            }
            if released {
                self.host.window_pointer_up.dispatch(&event);
                self.pointer_down = false;
            }
        } else if released {
            self.host.window_pointer_up.dispatch(&PointerEvent::new(0.0, 0.0));
            self.pointer_down = false;
        }
    }

    fn draw_stats(&self, ui: &mut egui::Ui) {
        let event = *self.last_event.borrow();
        ui.label(format!("events: {}", self.event_count.get()));
        ui.label(format!(
            "offset: ({:.1}, {:.1}) px / ({:.2}, {:.2})",
            event.offset.pixels.x,
            event.offset.pixels.y,
            event.offset.percentage.x,
            event.offset.percentage.y
        ));
        ui.label(format!(
            "angle: {:.3} rad / {:.1}°",
            event.angle.radians, event.angle.degrees
        ));
        ui.label(format!(
            "pressure: {:.1} px / {:.0}%",
            event.pressure.pixels,
            event.pressure.percentage * 100.0
        ));
    }
}

impl eframe::App for JoystickDemo {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt);
        self.host.frame.dispatch(&FrameTick {
            delta: Duration::from_secs_f32(dt.max(0.0)),
        });
        self.forward_keys(ctx);

        egui::CentralPanel::default()
            .frame(Frame::new().fill(UiColors::MAIN_BG).inner_margin(12.0))
            .show(ctx, |ui| {
                self.draw_stats(ui);
                ui.separator();

                let available = ui.available_size();
                let side = available.x.min(available.y) * 0.8;
                let (rect, _) = ui.allocate_exact_size(vec2(side, side), Sense::hover());
                let handle_side = side * HANDLE_RATIO;
                self.base.resize(side as f64, side as f64);
                self.handle.resize(handle_side as f64, handle_side as f64);

                let style = self.handle.style();
                let animation_secs = if style.transition.is_some() {
                    self.reset_duration.as_secs_f32()
                } else {
                    0.0
                };
                let target = to_vec2(style.translate);
                let shown = vec2(
                    ctx.animate_value_with_time(Id::new("handle_x"), target.x, animation_secs),
                    ctx.animate_value_with_time(Id::new("handle_y"), target.y, animation_secs),
                );

                let handle_center: Pos2 = rect.center() + shown;
                let handle_rect =
                    egui::Rect::from_center_size(handle_center, vec2(handle_side, handle_side));
                let handle_response =
                    ui.interact(handle_rect, Id::new("joystick_handle"), Sense::drag());
                self.forward_pointer(ctx, &handle_response);

                let painter = ui.painter();
                painter.circle(
                    rect.center(),
                    side / 2.0,
                    UiColors::INNER_BG,
                    Stroke::new(1.0, UiColors::BORDER),
                );
                if let Some(radius) = self.joystick.as_ref().and_then(|j| j.get_radius()) {
                    if radius > 0.0 {
                        painter.circle_stroke(
                            rect.center(),
                            radius as f32,
                            Stroke::new(1.0, UiColors::BORDER),
                        );
                    }
                }
                let color = if self.joystick.as_ref().is_some_and(|j| j.config().disabled) {
                    UiColors::INACTIVE
                } else {
                    UiColors::ACTIVE
                };
                painter.circle_filled(handle_center, handle_side / 2.0, color);
            });

        ctx.request_repaint();
    }
}

impl Drop for JoystickDemo {
    fn drop(&mut self) {
        if let Some(joystick) = self.joystick.take() {
            joystick.cleanup();
        }
    }
}
