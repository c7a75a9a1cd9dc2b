//! Time gate around the outward move callback.
//!
//! Two states: unthrottled (every event passes) and throttled (an event passes
//! only when at least `interval` ms have elapsed since the last one that passed).
//! Dropped events are discarded; there is no trailing flush.

use super::event::{JoystickMoveEvent, MoveCallback};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

/// Wall-clock milliseconds. Replaceable in tests.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn now_ms(&self) -> i64 {
        chrono::Local::now().timestamp_millis()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Throttle {
    Unthrottled,
    Throttled {
        interval_ms: u64,
        last_emit_ms: Option<i64>,
    },
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        if interval_ms == 0 {
            Throttle::Unthrottled
        } else {
            Throttle::Throttled {
                interval_ms,
                last_emit_ms: None,
            }
        }
    }

    /// Whether an event at `now_ms` may pass. Passing records `now_ms`.
    pub fn should_process(&mut self, now_ms: i64) -> bool {
        match self {
            Throttle::Unthrottled => true,
            Throttle::Throttled {
                interval_ms,
                last_emit_ms,
            } => {
                let open = match *last_emit_ms {
                    None => true,
                    Some(last) => now_ms.saturating_sub(last) >= *interval_ms as i64,
                };
                if open {
                    *last_emit_ms = Some(now_ms);
                }
                open
            }
        }
    }
}

/// The user's move callback behind a [`Throttle`].
pub struct ThrottledEmitter {
    on_move: MoveCallback,
    throttle: RefCell<Throttle>,
    clock: Rc<dyn Clock>,
}

impl ThrottledEmitter {
    pub fn new(on_move: MoveCallback, interval_ms: u64, clock: Rc<dyn Clock>) -> Self {
        Self {
            on_move,
            throttle: RefCell::new(Throttle::new(interval_ms)),
            clock,
        }
    }

    /// Returns whether the callback was invoked.
    pub fn emit(&self, event: &JoystickMoveEvent) -> bool {
        let now = self.clock.now_ms();
        let open = self.throttle.borrow_mut().should_process(now);
        if open {
            (self.on_move)(event);
        } else {
            trace!("Move event dropped by throttle");
        }
        open
    }

    /// Bypasses the throttle, used for the explicit zero event.
    pub fn emit_unthrottled(&self, event: &JoystickMoveEvent) {
        (self.on_move)(event);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;

    /// Manually advanced clock.
    #[derive(Default)]
    pub(crate) struct TestClock {
        now: Cell<i64>,
    }

    impl TestClock {
        pub(crate) fn advance(&self, ms: i64) {
            self.now.set(self.now.get() + ms);
        }
    }

    impl Clock for TestClock {
        fn now_ms(&self) -> i64 {
            self.now.get()
        }
    }

    #[test]
    fn test_unthrottled_passes_everything() {
        let mut throttle = Throttle::new(0);
        assert_eq!(throttle, Throttle::Unthrottled);
        assert!(throttle.should_process(0));
        assert!(throttle.should_process(0));
    }

    #[test]
    fn test_throttled_gate() {
        let mut throttle = Throttle::new(100);
        assert!(throttle.should_process(1_000));
        assert!(!throttle.should_process(1_099));
        assert!(throttle.should_process(1_100));
        assert!(!throttle.should_process(1_150));
    }

    #[test]
    fn test_first_event_always_passes() {
        let mut throttle = Throttle::new(10_000);
        assert!(throttle.should_process(0));
    }

    #[test]
    fn test_emitter_counts_forwarded_calls() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let clock = Rc::new(TestClock::default());
        let emitter = ThrottledEmitter::new(
            Rc::new(move |_| c.set(c.get() + 1)),
            50,
            clock.clone(),
        );

        assert!(emitter.emit(&JoystickMoveEvent::zero()));
        clock.advance(20);
        assert!(!emitter.emit(&JoystickMoveEvent::zero()));
        emitter.emit_unthrottled(&JoystickMoveEvent::zero());
        clock.advance(30);
        assert!(emitter.emit(&JoystickMoveEvent::zero()));
        assert_eq!(count.get(), 3);
    }
}
