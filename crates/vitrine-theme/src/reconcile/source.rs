//! Tree change notifications.
//!
//! A [`ChangeSource`] tells interested parties about nodes inserted into the
//! render tree. Hosts bridge their own mutation events into an
//! [`EventBus`]; [`MemoryTree`](super::MemoryTree) can publish to one
//! directly.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::tree::NodeId;

/// A node was added to the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInserted {
    pub node: NodeId,
    pub classes: Vec<String>,
}

impl NodeInserted {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Handle identifying an insertion listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type InsertPredicate = Box<dyn Fn(&NodeInserted) -> bool>;
pub type InsertCallback = Box<dyn Fn(&NodeInserted)>;

/// Source of insertion events.
pub trait ChangeSource {
    /// Calls `callback` for every inserted node matching `predicate`.
    fn on_insert(&self, predicate: InsertPredicate, callback: InsertCallback) -> ListenerId;

    /// Removes a listener. Returns false if it was already gone.
    fn remove(&self, id: ListenerId) -> bool;

    /// Publishes an insertion.
    fn notify(&self, event: &NodeInserted);
}

struct Entry {
    id: ListenerId,
    predicate: Rc<dyn Fn(&NodeInserted) -> bool>,
    callback: Rc<dyn Fn(&NodeInserted)>,
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    entries: Vec<Entry>,
}

/// In-process [`ChangeSource`]. Clones share listeners.
#[derive(Clone, Default)]
pub struct EventBus {
    state: Rc<RefCell<BusState>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().entries.len()
    }
}

impl ChangeSource for EventBus {
    fn on_insert(&self, predicate: InsertPredicate, callback: InsertCallback) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        state.entries.push(Entry {
            id,
            predicate: Rc::from(predicate),
            callback: Rc::from(callback),
        });
        id
    }

    fn remove(&self, id: ListenerId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.entries.len();
        state.entries.retain(|entry| entry.id != id);
        state.entries.len() != before
    }

    fn notify(&self, event: &NodeInserted) {
        let snapshot: Vec<_> = self
            .state
            .borrow()
            .entries
            .iter()
            .map(|entry| (entry.predicate.clone(), entry.callback.clone()))
            .collect();
        for (predicate, callback) in snapshot {
            if predicate(event) {
                callback(event);
            }
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
