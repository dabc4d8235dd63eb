//! Single-threaded subscribe/notify lists.
//!
//! Every mutable configuration slot (theme, radius, font scale) announces its
//! changes through a [`Subscribers`] list. Listeners are snapshotted before
//! delivery, so a listener may subscribe or unsubscribe while an event is
//! being delivered.
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use vitrine_theme::Subscribers;
//!
//! let events: Subscribers<u32> = Subscribers::new();
//! let seen = Rc::new(Cell::new(0));
//!
//! let sink = seen.clone();
//! let subscription = events.subscribe(move |n| sink.set(sink.get() + n));
//!
//! events.notify(&2);
//! subscription.unsubscribe();
//! events.notify(&5);
//! assert_eq!(seen.get(), 2);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<E> = Rc<dyn Fn(&E)>;

struct ListenerList<E> {
    next_id: u64,
    listeners: Vec<(u64, Listener<E>)>,
}

/// A list of listeners for events of type `E`.
///
/// Cloning yields another handle to the same list.
pub struct Subscribers<E> {
    inner: Rc<RefCell<ListenerList<E>>>,
}

impl<E: 'static> Subscribers<E> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListenerList {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Registers a listener. Dropping the returned [`Subscription`]
    /// unregisters it; call [`Subscription::detach`] to keep it for the
    /// lifetime of the list.
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let id = {
            let mut list = self.inner.borrow_mut();
            let id = list.next_id;
            list.next_id += 1;
            list.listeners.push((id, Rc::new(listener)));
            id
        };

        let weak: Weak<RefCell<ListenerList<E>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(list) = weak.upgrade() {
                list.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
            }
        })
    }

    /// Delivers `event` to every listener registered at call time.
    pub fn notify(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Returns true if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: 'static> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Subscribers<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.inner.borrow().listeners.len())
            .finish()
    }
}

/// Handle returned by a subscribe call. Unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Unregisters the listener now.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keeps the listener registered after this handle is dropped.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_notify_reaches_all_listeners() {
        let events: Subscribers<i32> = Subscribers::new();
        let total = Rc::new(Cell::new(0));

        let a = total.clone();
        let _s1 = events.subscribe(move |n| a.set(a.get() + n));
        let b = total.clone();
        let _s2 = events.subscribe(move |n| b.set(b.get() + n * 10));

        events.notify(&1);
        assert_eq!(total.get(), 11);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let events: Subscribers<()> = Subscribers::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        {
            let _sub = events.subscribe(move |_| h.set(h.get() + 1));
            events.notify(&());
        }
        events.notify(&());
        assert_eq!(hits.get(), 1);
        assert!(events.is_empty());
    }

    #[test]
    fn test_detach_keeps_listener() {
        let events: Subscribers<()> = Subscribers::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        events.subscribe(move |_| h.set(h.get() + 1)).detach();
        events.notify(&());
        events.notify(&());
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_subscribe_during_notify() {
        let events: Subscribers<()> = Subscribers::new();
        let late: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let handle = events.clone();
        let store = late.clone();
        let _sub = events.subscribe(move |_| {
            store.borrow_mut().push(handle.subscribe(|_| {}));
        });

        events.notify(&());
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_unsubscribe_after_list_dropped() {
        let events: Subscribers<()> = Subscribers::new();
        let sub = events.subscribe(|_| {});
        drop(events);
        sub.unsubscribe();
    }
}
