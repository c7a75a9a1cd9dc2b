use crate::state::Subscription;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::trace;

type Listener<E> = Rc<dyn Fn(&E)>;

struct Entry<E> {
    id: u64,
    once: bool,
    callback: Listener<E>,
}

struct TargetInner<E> {
    name: &'static str,
    entries: RefCell<Vec<Entry<E>>>,
    next_id: Cell<u64>,
}

impl<E> TargetInner<E> {
    fn remove(&self, id: u64) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    fn contains(&self, id: u64) -> bool {
        self.entries.borrow().iter().any(|e| e.id == id)
    }
}

/// A host event source that listeners attach to, modelled on DOM event targets.
pub struct EventTarget<E> {
    inner: Rc<TargetInner<E>>,
}

impl<E> Clone for EventTarget<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: 'static> EventTarget<E> {
    pub fn new(name: &'static str) -> Self {
        Self {
            inner: Rc::new(TargetInner {
                name,
                entries: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn add_listener(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        self.register(Rc::new(callback), false)
    }

    /// The listener is removed right before its first invocation.
    pub fn add_listener_once(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        self.register(Rc::new(callback), true)
    }

    pub fn remove_listener(&self, subscription: &Subscription) -> bool {
        self.inner.remove(subscription.id())
    }

    /// Delivers `event` to every listener registered when dispatch began.
    ///
    /// Listeners removed by an earlier listener in the same dispatch are skipped.
    /// Returns how many listeners ran.
    pub fn dispatch(&self, event: &E) -> usize {
        let snapshot: Vec<(u64, bool, Listener<E>)> = self
            .inner
            .entries
            .borrow()
            .iter()
            .map(|e| (e.id, e.once, Rc::clone(&e.callback)))
            .collect();

        let mut delivered = 0;
        for (id, once, callback) in snapshot {
            if !self.inner.contains(id) {
                continue;
            }
            if once {
                self.inner.remove(id);
            }
            callback(event);
            delivered += 1;
        }
        trace!("Dispatched {} event to {} listeners", self.inner.name, delivered);
        delivered
    }

    pub fn clear(&self) {
        self.inner.entries.borrow_mut().clear();
    }

    pub fn listener_count(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    fn register(&self, callback: Listener<E>, once: bool) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .entries
            .borrow_mut()
            .push(Entry { id, once, callback });

        let weak: Weak<TargetInner<E>> = Rc::downgrade(&self.inner);
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_reaches_all_listeners() {
        let target: EventTarget<i32> = EventTarget::new("test");
        let sum = Rc::new(Cell::new(0));
        for _ in 0..3 {
            let s = Rc::clone(&sum);
            target.add_listener(move |v| s.set(s.get() + v));
        }
        assert_eq!(target.dispatch(&2), 3);
        assert_eq!(sum.get(), 6);
    }

    #[test]
    fn test_once_listener_runs_once() {
        let target: EventTarget<()> = EventTarget::new("test");
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        target.add_listener_once(move |_| c.set(c.get() + 1));

        target.dispatch(&());
        target.dispatch(&());
        assert_eq!(count.get(), 1);
        assert_eq!(target.listener_count(), 0);
    }

    #[test]
    fn test_listener_removed_mid_dispatch_is_skipped() {
        let target: EventTarget<()> = EventTarget::new("test");
        let count = Rc::new(Cell::new(0));
        let later: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let slot = Rc::clone(&later);
        target.add_listener(move |_| {
            if let Some(sub) = slot.borrow().as_ref() {
                sub.unsubscribe();
            }
        });
        let c = Rc::clone(&count);
        *later.borrow_mut() = Some(target.add_listener(move |_| c.set(c.get() + 1)));

        assert_eq!(target.dispatch(&()), 1);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_remove_listener() {
        let target: EventTarget<()> = EventTarget::new("test");
        let sub = target.add_listener(|_| {});
        assert!(target.remove_listener(&sub));
        assert!(!target.remove_listener(&sub));
    }

    #[test]
    fn test_once_subscription_goes_inactive_after_dispatch() {
        let target: EventTarget<()> = EventTarget::new("test");
        let once = target.add_listener_once(|_| {});
        let kept = target.add_listener(|_| {});

        target.dispatch(&());
        assert!(!once.is_active());
        assert!(kept.is_active());

        target.clear();
        assert!(!kept.is_active());
        assert_eq!(target.listener_count(), 0);
        assert_eq!(target.dispatch(&()), 0);
    }
}
