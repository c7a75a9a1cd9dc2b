//! Observable value cell with synchronous subscriber fan-out.
//!
//! Every [`MutableState::set`] replaces the value and notifies all subscribers in
//! registration order before returning. There is no batching and no equality
//! check, so writing an unchanged value still notifies.
//!
//! # Reentrancy
//!
//! A subscriber may call `set` on the same cell. The nested write runs its own
//! notification round immediately; the outer round then continues with the
//! remaining subscribers, each receiving whatever value is current at the time
//! it is called. [`MutableState::notify_depth`] exposes how many rounds are in
//! flight so callers can detect recursion.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;

type Callback<T> = Rc<dyn Fn(&T)>;

struct Subscriber<T> {
    id: u64,
    callback: Callback<T>,
}

struct StateInner<T> {
    current: RefCell<T>,
    subscribers: RefCell<Vec<Subscriber<T>>>,
    next_id: Cell<u64>,
    depth: Cell<usize>,
}

impl<T> StateInner<T> {
    fn remove(&self, id: u64) {
        self.subscribers.borrow_mut().retain(|s| s.id != id);
    }

    fn contains(&self, id: u64) -> bool {
        self.subscribers.borrow().iter().any(|s| s.id == id)
    }
}

/// Closes a notification round even if a subscriber panics.
struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        Self { depth }
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

/// Handle returned by a subscription. Dropping it does not unsubscribe.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    release: Rc<dyn Fn()>,
    active: Rc<dyn Fn() -> bool>,
}

impl Subscription {
    pub(crate) fn new(id: u64, release: Rc<dyn Fn()>, active: Rc<dyn Fn() -> bool>) -> Self {
        Self {
            id,
            release,
            active,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// False once the callback has been removed, however that happened.
    pub fn is_active(&self) -> bool {
        (self.active)()
    }

    /// Removes the subscription. Calling it more than once is harmless.
    pub fn unsubscribe(&self) {
        (self.release)();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Shared observable cell. Clones point at the same value and subscriber list.
pub struct MutableState<T> {
    inner: Rc<StateInner<T>>,
}

impl<T> Clone for MutableState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for MutableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableState")
            .field("current", &self.inner.current.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl<T: Clone + 'static> MutableState<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(StateInner {
                current: RefCell::new(value),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                depth: Cell::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.current.borrow().clone()
    }

    /// Replaces the value and notifies every subscriber with the latest value.
    pub fn set(&self, value: T) {
        *self.inner.current.borrow_mut() = value;

        // Snapshot so subscribers may (un)subscribe or write while being notified.
        let snapshot: Vec<(u64, Callback<T>)> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|s| (s.id, Rc::clone(&s.callback)))
            .collect();

        let _round = DepthGuard::enter(&self.inner.depth);
        let depth = self.inner.depth.get();
        if depth > 1 {
            trace!("Nested notification round at depth {}", depth);
        }

        for (id, callback) in snapshot {
            if !self.is_subscribed(id) {
                continue;
            }
            let latest = self.get();
            callback(&latest);
        }
    }

    /// Registers a callback invoked on every `set`.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.subscribers.borrow_mut().push(Subscriber {
            id,
            callback: Rc::new(callback),
        });

        let weak: Weak<StateInner<T>> = Rc::downgrade(&self.inner);
        let probe = weak.clone();
        Subscription::new(
            id,
            Rc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.remove(id);
                }
            }),
            Rc::new(move || probe.upgrade().is_some_and(|inner| inner.contains(id))),
        )
    }

    pub fn unsubscribe(&self, id: u64) {
        self.inner.remove(id);
    }

    pub fn clear_subscribers(&self) {
        self.inner.subscribers.borrow_mut().clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Number of notification rounds currently running for this cell.
    pub fn notify_depth(&self) -> usize {
        self.inner.depth.get()
    }

    fn is_subscribed(&self, id: u64) -> bool {
        self.inner.contains(id)
    }
}

/// Type-erased view of a cell, used by bindings that only care that something changed.
pub trait Observe {
    fn observe(&self, callback: Rc<dyn Fn()>) -> Subscription;
    fn clear_subscribers(&self);
}

impl<T: Clone + 'static> Observe for MutableState<T> {
    fn observe(&self, callback: Rc<dyn Fn()>) -> Subscription {
        self.subscribe(move |_| callback())
    }

    fn clear_subscribers(&self) {
        MutableState::clear_subscribers(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_initial_value() {
        let state = MutableState::new(5);
        assert_eq!(state.get(), 5);
    }

    #[test]
    fn test_set_notifies_in_registration_order() {
        let state = MutableState::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        state.subscribe(move |v| first.borrow_mut().push(("first", *v)));
        let second = Rc::clone(&log);
        state.subscribe(move |v| second.borrow_mut().push(("second", *v)));

        state.set(7);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_unchanged_value_still_notifies() {
        let state = MutableState::new(1);
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        state.subscribe(move |_| c.set(c.get() + 1));

        state.set(1);
        state.set(1);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let state = MutableState::new(0);
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let sub = state.subscribe(move |_| c.set(c.get() + 1));
        let other = state.subscribe(|_| {});
        assert_ne!(sub.id(), other.id());

        sub.unsubscribe();
        sub.unsubscribe();
        state.set(3);

        assert_eq!(count.get(), 0);
        assert_eq!(state.subscriber_count(), 1);
    }

    #[test]
    fn test_clear_subscribers() {
        let state = MutableState::new(0);
        state.subscribe(|_| {});
        state.subscribe(|_| {});
        state.clear_subscribers();
        assert_eq!(state.subscriber_count(), 0);
    }

    #[test]
    fn test_nested_set_recurses_before_outer_round_finishes() {
        let state = MutableState::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let writer = state.clone();
        let depth_log = Rc::clone(&seen);
        state.subscribe(move |v| {
            depth_log.borrow_mut().push((writer.notify_depth(), *v));
            if *v == 1 {
                writer.set(2);
            }
        });

        state.set(1);
        assert_eq!(*seen.borrow(), vec![(1, 1), (2, 2)]);
        assert_eq!(state.get(), 2);
        assert_eq!(state.notify_depth(), 0);
    }

    #[test]
    fn test_unsubscribe_during_notification_skips_later_subscriber() {
        let state = MutableState::new(0);
        let count = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let slot_ref = Rc::clone(&slot);
        state.subscribe(move |_| {
            if let Some(sub) = slot_ref.borrow().as_ref() {
                sub.unsubscribe();
            }
        });
        let c = Rc::clone(&count);
        *slot.borrow_mut() = Some(state.subscribe(move |_| c.set(c.get() + 1)));

        state.set(1);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_subscription_reports_whether_it_is_live() {
        let state = MutableState::new(0);
        let sub = state.subscribe(|_| {});
        assert!(sub.is_active());
        sub.unsubscribe();
        assert!(!sub.is_active());

        let cleared = state.subscribe(|_| {});
        state.clear_subscribers();
        assert!(!cleared.is_active());
    }

    #[test]
    fn test_panicking_subscriber_does_not_leave_round_open() {
        let state = MutableState::new(0);
        state.subscribe(|v| {
            if *v == 1 {
                panic!("subscriber failed");
            }
        });

        let writer = state.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| writer.set(1)));
        assert!(result.is_err());
        assert_eq!(state.notify_depth(), 0);

        state.set(2);
        assert_eq!(state.notify_depth(), 0);
        assert_eq!(state.get(), 2);
    }
}
