//! Fixed-capacity frame queue.
//!
//! `head == tail` means empty, so one slot always stays unused; the ring
//! keeps `MAX_FRAME_BUFFERS + 1` slots to hold `MAX_FRAME_BUFFERS` frames.
//! A push that would make `head` catch up with `tail` drops the oldest
//! frame instead.
//!
//! The ring itself is not synchronized. [`LinShared`](crate::LinShared)
//! wraps it in a critical-section mutex.

use lin_proto::LinFrame;

/// Frames held before the oldest is overwritten.
pub const MAX_FRAME_BUFFERS: usize = 8;

const SLOTS: usize = MAX_FRAME_BUFFERS + 1;

#[derive(Debug, Clone)]
pub struct FrameRing {
    slots: [LinFrame; SLOTS],
    /// Next slot to write.
    head: usize,
    /// Oldest unread slot.
    tail: usize,
}

impl FrameRing {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [LinFrame::new(); SLOTS],
            head: 0,
            tail: 0,
        }
    }

    #[inline]
    const fn next(index: usize) -> usize {
        if index + 1 >= SLOTS {
            0
        } else {
            index + 1
        }
    }

    /// Append a frame. Returns false if the oldest frame was dropped.
    pub fn push(&mut self, frame: &LinFrame) -> bool {
        self.slots[self.head] = *frame;
        self.head = Self::next(self.head);
        if self.head == self.tail {
            self.tail = Self::next(self.tail);
            return false;
        }
        true
    }

    /// Remove and return the oldest frame.
    pub fn pop(&mut self) -> Option<LinFrame> {
        if self.is_empty() {
            return None;
        }
        let frame = self.slots[self.tail];
        self.tail = Self::next(self.tail);
        Some(frame)
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        (self.head + SLOTS - self.tail) % SLOTS
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Drop all queued frames.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }
}

impl Default for FrameRing {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(id: u8) -> LinFrame {
        LinFrame::from_bytes(&[id, 0xAA]).unwrap()
    }

    #[test]
    fn test_empty() {
        let mut ring = FrameRing::new();
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn test_fifo_order() {
        let mut ring = FrameRing::new();
        assert!(ring.push(&frame(1)));
        assert!(ring.push(&frame(2)));
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.pop(), Some(frame(1)));
        assert_eq!(ring.pop(), Some(frame(2)));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn test_capacity_without_overrun() {
        let mut ring = FrameRing::new();
        for i in 0..MAX_FRAME_BUFFERS as u8 {
            assert!(ring.push(&frame(i)));
        }
        assert_eq!(ring.len(), MAX_FRAME_BUFFERS);
    }

    #[test]
    fn test_overrun_drops_oldest() {
        let mut ring = FrameRing::new();
        let mut overruns = 0;
        for i in 0..=MAX_FRAME_BUFFERS as u8 {
            if !ring.push(&frame(i)) {
                overruns += 1;
            }
        }
        assert_eq!(overruns, 1);
        assert_eq!(ring.len(), MAX_FRAME_BUFFERS);
        for i in 1..=MAX_FRAME_BUFFERS as u8 {
            assert_eq!(ring.pop(), Some(frame(i)));
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn test_wraps_around() {
        let mut ring = FrameRing::new();
        for round in 0..3u8 {
            for i in 0..5u8 {
                assert!(ring.push(&frame(round * 10 + i)));
            }
            for i in 0..5u8 {
                assert_eq!(ring.pop(), Some(frame(round * 10 + i)));
            }
        }
    }

    #[test]
    fn test_clear() {
        let mut ring = FrameRing::new();
        ring.push(&frame(1));
        ring.clear();
        assert!(ring.is_empty());
    }
}
