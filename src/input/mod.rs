//! Host-side input plumbing.
//!
//! The embedding application owns an [`InputHost`] and feeds raw device events
//! into it (pointer, keyboard, frame ticks). Plugins attach listeners through a
//! [`ListenerScope`] so that a joystick's cleanup can detach everything it added.
//!
//! ```text
//! Host app ──► InputHost targets ──► plugin listeners ──► MovementEngine
//! ```

pub mod event_target;

pub use event_target::EventTarget;

use crate::state::{Offset, Subscription};
use std::cell::RefCell;
use std::time::Duration;
use tracing::debug;

/// A pointer (mouse, pen or single touch) event in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerEvent {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }

    pub fn client(&self) -> Offset {
        Offset::new(self.client_x, self.client_y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyEvent {
    pub key: egui::Key,
    /// Auto-repeat while held
    pub repeat: bool,
}

impl KeyEvent {
    pub fn new(key: egui::Key) -> Self {
        Self { key, repeat: false }
    }
}

/// Emitted once per rendered frame; polling plugins hang off this.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTick {
    pub delta: Duration,
}

/// The event sources a joystick's plugins may listen to.
#[derive(Clone)]
pub struct InputHost {
    pub handle_pointer_down: EventTarget<PointerEvent>,
    pub window_pointer_move: EventTarget<PointerEvent>,
    pub window_pointer_up: EventTarget<PointerEvent>,
    pub key_down: EventTarget<KeyEvent>,
    pub key_up: EventTarget<KeyEvent>,
    pub frame: EventTarget<FrameTick>,
}

impl InputHost {
    pub fn new() -> Self {
        Self {
            handle_pointer_down: EventTarget::new("handle_pointer_down"),
            window_pointer_move: EventTarget::new("window_pointer_move"),
            window_pointer_up: EventTarget::new("window_pointer_up"),
            key_down: EventTarget::new("key_down"),
            key_up: EventTarget::new("key_up"),
            frame: EventTarget::new("frame"),
        }
    }

    pub fn total_listeners(&self) -> usize {
        self.handle_pointer_down.listener_count()
            + self.window_pointer_move.listener_count()
            + self.window_pointer_up.listener_count()
            + self.key_down.listener_count()
            + self.key_up.listener_count()
            + self.frame.listener_count()
    }
}

impl Default for InputHost {
    fn default() -> Self {
        Self::new()
    }
}

/// Records every listener registered on behalf of one joystick instance.
#[derive(Default)]
pub struct ListenerScope {
    tracked: RefCell<Vec<Subscription>>,
}

impl ListenerScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen<E: 'static>(
        &self,
        target: &EventTarget<E>,
        callback: impl Fn(&E) + 'static,
    ) -> Subscription {
        self.track(target.add_listener(callback))
    }

    pub fn listen_once<E: 'static>(
        &self,
        target: &EventTarget<E>,
        callback: impl Fn(&E) + 'static,
    ) -> Subscription {
        self.track(target.add_listener_once(callback))
    }

    /// Records `subscription`, dropping entries whose listener is already gone.
    pub fn track(&self, subscription: Subscription) -> Subscription {
        let mut tracked = self.tracked.borrow_mut();
        tracked.retain(Subscription::is_active);
        tracked.push(subscription.clone());
        subscription
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.borrow().len()
    }

    /// Detaches every tracked listener and returns how many were still attached.
    pub fn release_all(&self) -> usize {
        let tracked: Vec<Subscription> = self.tracked.borrow_mut().drain(..).collect();
        let mut released = 0;
        for subscription in &tracked {
            if subscription.is_active() {
                subscription.unsubscribe();
                released += 1;
            }
        }
        debug!("Released {} of {} tracked listeners", released, tracked.len());
        released
    }
}
