//! Deferred, coalesced rebuild requests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A pending-rebuild flag shared between the "target updated" listener
/// and the host's idle hook.
///
/// Any number of [`request`](Self::request) calls before the next
/// [`take`](Self::take) collapse into a single rebuild.
#[derive(Debug, Clone, Default)]
pub struct RebuildRequest {
    pending: Arc<AtomicBool>,
}

impl RebuildRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a rebuild. Returns `false` if one was already pending.
    pub fn request(&self) -> bool {
        let scheduled = !self.pending.swap(true, Ordering::AcqRel);
        if !scheduled {
            log::trace!("rebuild already pending");
        }
        scheduled
    }

    /// Consumes the pending request, returning whether there was one.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}
