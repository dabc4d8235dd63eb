//! Fault isolation around a rendered subtree.
//!
//! A [`FaultBoundary`] runs a render closure and turns both returned errors
//! and panics into a [`Fault`], substituting a fallback view. Once faulted it
//! keeps serving the fallback, without calling the render closure, until
//! [`FaultBoundary::reset`] is called:
//!
//! ```text
//! Ok --(error or panic)--> Faulted --(reset)--> Ok
//! ```

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;
use tracing::{debug, warn};

/// How the wrapped render failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The render returned an error.
    Error,
    /// The render panicked.
    Panic,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Error => f.write_str("error"),
            FaultKind::Panic => f.write_str("panic"),
        }
    }
}

/// A captured render failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("render {kind}: {message}")]
pub struct Fault {
    pub kind: FaultKind,
    pub message: String,
}

impl Fault {
    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self {
            kind: FaultKind::Panic,
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryState {
    Ok,
    Faulted(Fault),
}

/// Catches failures of the subtree it wraps.
pub struct FaultBoundary<V> {
    fallback: Box<dyn Fn(&Fault) -> V>,
    state: BoundaryState,
}

impl<V> FaultBoundary<V> {
    /// Creates a boundary that renders `fallback` while faulted.
    pub fn new(fallback: impl Fn(&Fault) -> V + 'static) -> Self {
        Self {
            fallback: Box::new(fallback),
            state: BoundaryState::Ok,
        }
    }

    /// Renders through the boundary.
    pub fn render<E, F>(&mut self, render: F) -> V
    where
        E: fmt::Display,
        F: FnOnce() -> Result<V, E>,
    {
        if let BoundaryState::Faulted(fault) = &self.state {
            return (self.fallback)(fault);
        }

        let fault = match catch_unwind(AssertUnwindSafe(render)) {
            Ok(Ok(view)) => return view,
            Ok(Err(err)) => Fault {
                kind: FaultKind::Error,
                message: err.to_string(),
            },
            Err(payload) => Fault::from_panic(payload),
        };

        warn!(kind = %fault.kind, message = %fault.message, "render faulted; showing fallback");
        let view = (self.fallback)(&fault);
        self.state = BoundaryState::Faulted(fault);
        view
    }

    /// Returns to [`BoundaryState::Ok`] so the next render runs again.
    pub fn reset(&mut self) {
        if self.is_faulted() {
            debug!("fault boundary reset");
            self.state = BoundaryState::Ok;
        }
    }

    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    pub fn is_faulted(&self) -> bool {
        matches!(self.state, BoundaryState::Faulted(_))
    }

    pub fn fault(&self) -> Option<&Fault> {
        match &self.state {
            BoundaryState::Faulted(fault) => Some(fault),
            BoundaryState::Ok => None,
        }
    }
}

impl<V> fmt::Debug for FaultBoundary<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultBoundary")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
