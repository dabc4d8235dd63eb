//! Live re-application of radius tokens to rendered nodes.
//!
//! Nodes opt in by carrying one of the marker classes `rounded-small`,
//! `rounded-medium`, `rounded-large` or `rounded-full` (or the short forms
//! `rounded-sm`, `rounded-md`, `rounded-lg`). The
//! [`ReconciliationObserver`] keeps their corner radius in step with the
//! [`RadiusStore`](crate::RadiusStore), including nodes inserted after the
//! initial render.
//!
//! The observer talks to the host through three seams:
//!
//! - [`ChangeSource`]: insertion notifications ([`EventBus`] in-process)
//! - [`RenderTree`]: marked-node lookup and style application ([`MemoryTree`])
//! - [`Clock`]: time for debounce deadlines ([`SystemClock`], [`ManualClock`])
//!
//! Nothing runs in the background. The host calls
//! [`ReconciliationObserver::run_pending`] from its event loop.

mod clock;
mod debounce;
mod observer;
mod source;
mod tree;

pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::{Debouncer, DEFAULT_WINDOW};
pub use observer::{PassReport, PassTrigger, ReconciliationObserver, SharedTree};
pub use source::{ChangeSource, EventBus, InsertCallback, InsertPredicate, ListenerId, NodeInserted};
pub use tree::{ApplyError, MemoryTree, NodeId, RenderTree};
