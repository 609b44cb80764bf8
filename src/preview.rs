//! Last-request-wins gating for in-flight preview renders.
//!
//! An image decode cannot generally be aborted mid-flight, so stale renders
//! are not cancelled; they are made useless instead. Each render takes a
//! ticket before starting, and the host checks the ticket is still current
//! before applying the finished result.

use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifying one in-flight render generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderTicket(u64);

/// Monotonic generation counter shared by one preview session.
#[derive(Debug, Default)]
pub struct PreviewGate {
    current: AtomicU64,
}

impl PreviewGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new render generation, superseding all earlier tickets.
    pub fn begin(&self) -> RenderTicket {
        RenderTicket(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// True while no newer render has begun since this ticket was issued.
    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.current.load(Ordering::Acquire) == ticket.0
    }
}
