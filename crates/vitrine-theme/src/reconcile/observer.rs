//! The observer that keeps marked nodes on the current radius scale.
//!
//! Listeners hold only a weak handle to the observer's state, so dropping the
//! observer is enough to silence them; [`ReconciliationObserver::stop`] also
//! unregisters them from their sources.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::clock::{Clock, SystemClock};
use super::debounce::{Debouncer, DEFAULT_WINDOW};
use super::source::{ChangeSource, ListenerId};
use super::tree::RenderTree;
use crate::cascade::TokensChanged;
use crate::notify::{Subscribers, Subscription};
use crate::radius::{RadiusMarker, RadiusStore};

/// A render tree shared between the host and the observer.
pub type SharedTree = Rc<RefCell<dyn RenderTree>>;

/// What started a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassTrigger {
    /// The radius configuration changed.
    RadiusUpdated,
    /// A debounce window elapsed after insertions or token changes.
    Debounced,
    /// The host forced the pending pass with [`ReconciliationObserver::flush`].
    Flushed,
}

/// Outcome of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub trigger: PassTrigger,
    /// Nodes restyled.
    pub applied: usize,
    /// Nodes that failed and were skipped.
    pub failed: usize,
}

struct Inner {
    tree: SharedTree,
    radius: RadiusStore,
    clock: Rc<dyn Clock>,
    debouncer: RefCell<Debouncer>,
    passes: Cell<u64>,
}

impl Inner {
    fn schedule(&self) {
        let now = self.clock.now();
        self.debouncer.borrow_mut().trigger(now);
        trace!(?now, "reconciliation pass scheduled");
    }

    fn run_pass(&self, trigger: PassTrigger) -> Option<PassReport> {
        let Ok(mut tree) = self.tree.try_borrow_mut() else {
            debug!(?trigger, "render tree busy; deferring pass");
            self.schedule();
            return None;
        };

        let scale = self.radius.current();
        let mut report = PassReport {
            trigger,
            applied: 0,
            failed: 0,
        };
        for marker in RadiusMarker::ALL {
            let value = scale.css(marker.token());
            for node in tree.marked_nodes(marker) {
                match catch_unwind(AssertUnwindSafe(|| tree.apply_radius(node, &value))) {
                    Ok(Ok(())) => report.applied += 1,
                    Ok(Err(err)) => {
                        warn!(%node, %err, "skipping node");
                        report.failed += 1;
                    }
                    Err(_) => {
                        warn!(%node, marker = marker.class_name(), "node panicked while restyling; skipping");
                        report.failed += 1;
                    }
                }
            }
        }

        self.passes.set(self.passes.get() + 1);
        debug!(
            ?trigger,
            applied = report.applied,
            failed = report.failed,
            "reconciliation pass complete"
        );
        Some(report)
    }
}

struct Listeners {
    insert: ListenerId,
    _radius: Subscription,
    _tokens: Subscription,
}

/// Re-applies the current radius scale to marked nodes as the tree and the
/// configuration change.
///
/// - a radius update restyles immediately;
/// - insertions of marked nodes and token changes schedule a debounced pass,
///   run by [`run_pending`](Self::run_pending) once the window has elapsed.
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use std::time::Duration;
/// use vitrine_theme::reconcile::{EventBus, ManualClock, MemoryTree, ReconciliationObserver};
/// use vitrine_theme::{RadiusScale, RadiusStore, RadiusToken, Subscribers};
///
/// let bus = EventBus::new();
/// let tree = Rc::new(RefCell::new(MemoryTree::new().with_source(bus.clone())));
/// let radius = RadiusStore::default();
/// let clock = ManualClock::new();
///
/// let mut observer = ReconciliationObserver::new(
///     Rc::new(bus),
///     tree.clone(),
///     radius.clone(),
///     Subscribers::new(),
/// )
/// .with_clock(clock.clone());
/// observer.start();
///
/// let node = tree.borrow_mut().insert(&["rounded-lg"]);
/// clock.advance(Duration::from_millis(100));
/// observer.run_pending();
/// assert_eq!(tree.borrow().radius_of(node), Some("8px"));
///
/// radius.set(RadiusScale::for_token(RadiusToken::Lg));
/// assert_eq!(tree.borrow().radius_of(node), Some("12px"));
/// ```
pub struct ReconciliationObserver {
    inner: Rc<Inner>,
    source: Rc<dyn ChangeSource>,
    tokens: Subscribers<TokensChanged>,
    listeners: Option<Listeners>,
}

impl ReconciliationObserver {
    /// Creates a stopped observer using the system clock and a 100ms window.
    pub fn new(
        source: Rc<dyn ChangeSource>,
        tree: SharedTree,
        radius: RadiusStore,
        tokens: Subscribers<TokensChanged>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                tree,
                radius,
                clock: Rc::new(SystemClock::new()),
                debouncer: RefCell::new(Debouncer::new(DEFAULT_WINDOW)),
                passes: Cell::new(0),
            }),
            source,
            tokens,
            listeners: None,
        }
    }

    /// Replaces the clock. Stops the observer and drops any pending pass.
    pub fn with_clock(self, clock: impl Clock + 'static) -> Self {
        let window = self.inner.debouncer.borrow().window();
        self.rebuild(Rc::new(clock), window)
    }

    /// Replaces the debounce window. Stops the observer and drops any pending
    /// pass.
    pub fn with_debounce(self, window: Duration) -> Self {
        let clock = self.inner.clock.clone();
        self.rebuild(clock, window)
    }

    fn rebuild(mut self, clock: Rc<dyn Clock>, window: Duration) -> Self {
        self.stop();
        self.inner = Rc::new(Inner {
            tree: self.inner.tree.clone(),
            radius: self.inner.radius.clone(),
            clock,
            debouncer: RefCell::new(Debouncer::new(window)),
            passes: Cell::new(self.inner.passes.get()),
        });
        self
    }

    /// Registers the insertion, radius and token listeners. No-op if running.
    pub fn start(&mut self) {
        if self.listeners.is_some() {
            return;
        }

        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        let insert = self.source.on_insert(
            Box::new(|event| event.classes.iter().any(|c| RadiusMarker::from_class(c).is_some())),
            Box::new(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.schedule();
                }
            }),
        );

        let weak = Rc::downgrade(&self.inner);
        let radius = self.inner.radius.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.run_pass(PassTrigger::RadiusUpdated);
            }
        });

        let weak = Rc::downgrade(&self.inner);
        let tokens = self.tokens.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.schedule();
            }
        });

        self.listeners = Some(Listeners {
            insert,
            _radius: radius,
            _tokens: tokens,
        });
        debug!("reconciliation observer started");
    }

    /// Removes every listener and cancels the pending pass. Idempotent.
    pub fn stop(&mut self) {
        if let Some(listeners) = self.listeners.take() {
            self.source.remove(listeners.insert);
            debug!("reconciliation observer stopped");
        }
        self.inner.debouncer.borrow_mut().cancel();
    }

    pub fn is_running(&self) -> bool {
        self.listeners.is_some()
    }

    /// Returns true if a debounced pass is waiting for its window.
    pub fn is_pending(&self) -> bool {
        self.inner.debouncer.borrow().is_pending()
    }

    /// Runs the debounced pass if its window has elapsed.
    pub fn run_pending(&self) -> Option<PassReport> {
        let now = self.inner.clock.now();
        let due = self.inner.debouncer.borrow_mut().fire_if_due(now);
        if due {
            self.inner.run_pass(PassTrigger::Debounced)
        } else {
            None
        }
    }

    /// Runs the pending pass now, ignoring the window.
    pub fn flush(&self) -> Option<PassReport> {
        let pending = self.inner.debouncer.borrow().is_pending();
        if !pending {
            return None;
        }
        self.inner.debouncer.borrow_mut().cancel();
        self.inner.run_pass(PassTrigger::Flushed)
    }

    /// Passes completed so far.
    pub fn passes(&self) -> u64 {
        self.inner.passes.get()
    }
}

impl Drop for ReconciliationObserver {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for ReconciliationObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconciliationObserver")
            .field("running", &self.is_running())
            .field("pending", &self.is_pending())
            .field("passes", &self.passes())
            .finish_non_exhaustive()
    }
}
