//! State shared between the tick handler and the consumer.
//!
//! The handler is the only producer: it commits frames, raises errors and
//! bumps the completion marker. The consumer only pops frames and drains
//! errors.
//!
//! Popping takes a critical section. To keep it from delaying a live
//! handler invocation (which would shift the bit sampling point), the
//! consumer first spins until the marker changes, then enters the critical
//! section right after a handler has returned.

use core::cell::RefCell;

use critical_section::Mutex;
use lin_proto::{ErrorFlags, LinFrame};
use portable_atomic::{AtomicU8, Ordering};

use crate::errors::ErrorRegister;
use crate::ring::FrameRing;

pub struct LinShared {
    frames: Mutex<RefCell<FrameRing>>,
    errors: ErrorRegister,
    marker: AtomicU8,
}

impl LinShared {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames: Mutex::new(RefCell::new(FrameRing::new())),
            errors: ErrorRegister::new(),
            marker: AtomicU8::new(0),
        }
    }

    /// Drop queued frames and pending errors. Call before the tick starts.
    pub fn reset(&self) {
        critical_section::with(|cs| self.frames.borrow_ref_mut(cs).clear());
        let _ = self.errors.take();
    }

    // ----- handler side -----

    /// Queue a completed frame, flagging an overrun if the oldest was lost.
    pub fn commit_frame(&self, frame: &LinFrame) {
        let kept = critical_section::with(|cs| self.frames.borrow_ref_mut(cs).push(frame));
        if !kept {
            self.errors.raise(ErrorFlags::BUFFER_OVERRUN);
        }
    }

    #[inline]
    pub fn raise(&self, flags: ErrorFlags) {
        self.errors.raise(flags);
    }

    /// Called once at the end of every handler invocation.
    #[inline]
    pub fn mark_handler_done(&self) {
        // Single writer, no read-modify-write needed.
        let next = self.marker.load(Ordering::Relaxed).wrapping_add(1);
        self.marker.store(next, Ordering::Release);
    }

    // ----- consumer side -----

    #[inline]
    #[must_use]
    pub fn handler_marker(&self) -> u8 {
        self.marker.load(Ordering::Acquire)
    }

    /// Spin until the handler completes its next invocation.
    ///
    /// Never call from the handler itself, or with the tick stopped.
    pub fn wait_for_handler_end(&self) {
        let seen = self.handler_marker();
        while self.handler_marker() == seen {
            core::hint::spin_loop();
        }
    }

    /// Pop the oldest frame without waiting for a handler boundary.
    pub fn pop_frame(&self) -> Option<LinFrame> {
        critical_section::with(|cs| self.frames.borrow_ref_mut(cs).pop())
    }

    /// Pop the oldest frame right after a handler invocation ends.
    pub fn read_next_frame(&self) -> Option<LinFrame> {
        self.wait_for_handler_end();
        self.pop_frame()
    }

    /// Read and clear the accumulated error mask.
    #[inline]
    pub fn take_errors(&self) -> ErrorFlags {
        self.errors.take()
    }
}

impl Default for LinShared {
    fn default() -> Self {
        Self::new()
    }
}
