//! Keyboard plugin: arrow keys and WASD push the handle in eight directions.
//!
//! The first held direction key starts a gesture anchored at the center, the
//! held set forms a direction vector (normalised on diagonals) that is scaled by
//! `deflection` times the current radius, and releasing the last key ends it.

use super::{JoystickPlugin, PluginContext};
use crate::error::JoystickError;
use crate::input::KeyEvent;
use crate::state::Offset;
use egui::Key;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_key(key: Key) -> Option<Direction> {
        match key {
            Key::ArrowUp | Key::W => Some(Direction::Up),
            Key::ArrowDown | Key::S => Some(Direction::Down),
            Key::ArrowLeft | Key::A => Some(Direction::Left),
            Key::ArrowRight | Key::D => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct KeyboardPlugin {
    /// Fraction of the radius a held key pushes the handle to, in `(0, 1]`.
    deflection: f64,
    disable_reset: bool,
}

impl Default for KeyboardPlugin {
    fn default() -> Self {
        Self {
            deflection: 1.0,
            disable_reset: false,
        }
    }
}

impl KeyboardPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deflection(deflection: f64) -> Result<Self, JoystickError> {
        if !(deflection > 0.0 && deflection <= 1.0) {
            return Err(JoystickError::ConfigError(format!(
                "keyboard deflection must be in (0, 1], got {}",
                deflection
            )));
        }
        Ok(Self {
            deflection,
            ..Self::default()
        })
    }

    pub fn without_reset(mut self) -> Self {
        self.disable_reset = true;
        self
    }
}

/// Unit-length (or zero) screen-space vector for a set of held directions.
pub fn direction_vector(held: &HashSet<Direction>) -> Offset {
    let axis = |neg: Direction, pos: Direction| -> f64 {
        (held.contains(&pos) as i8 - held.contains(&neg) as i8) as f64
    };
    let x = axis(Direction::Left, Direction::Right);
    let y = axis(Direction::Up, Direction::Down);
    let length = (x * x + y * y).sqrt();
    if length == 0.0 {
        Offset::ZERO
    } else {
        Offset::new(x / length, y / length)
    }
}

impl JoystickPlugin for KeyboardPlugin {
    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn attach(self: Box<Self>, ctx: PluginContext) {
        let deflection = self.deflection;
        let disable_reset = self.disable_reset;
        let held: Rc<RefCell<HashSet<Direction>>> = Rc::new(RefCell::new(HashSet::new()));

        let push = {
            let ctx = ctx.clone();
            let held = Rc::clone(&held);
            move || {
                let direction = direction_vector(&held.borrow());
                let reach = ctx.get_radius() * deflection;
                ctx.handle_handle_move(direction.x * reach, direction.y * reach);
            }
        };
        let push = Rc::new(push);

        let down_ctx = ctx.clone();
        let down_held = Rc::clone(&held);
        let down_push = Rc::clone(&push);
        ctx.listeners.listen(&ctx.host.key_down, move |event: &KeyEvent| {
            let ctx = &down_ctx;
            let Some(direction) = Direction::from_key(event.key) else {
                return;
            };
            if event.repeat {
                return;
            }
            let first = down_held.borrow().is_empty();
            if !down_held.borrow_mut().insert(direction) {
                return;
            }
            debug!("Key down {:?} -> {:?}", event.key, direction);
            if first && (!disable_reset || !ctx.is_dragging()) {
                ctx.begin_gesture(Offset::ZERO);
            } else if first {
                ctx.states.should_transition.set(false);
            }
            down_push();
        });

        let up_ctx = ctx.clone();
        ctx.listeners.listen(&ctx.host.key_up, move |event: &KeyEvent| {
            let ctx = &up_ctx;
            let Some(direction) = Direction::from_key(event.key) else {
                return;
            };
            if !held.borrow_mut().remove(&direction) {
                return;
            }
            debug!("Key up {:?} -> {:?}", event.key, direction);
            if held.borrow().is_empty() {
                ctx.end_gesture(!disable_reset);
            } else {
                push();
            }
        });
    }
}
