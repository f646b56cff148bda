//! Hand completed passes to the output stage.
//!
//! The output stage may run on another execution context than the scheduler
//! (an interrupt, a DAC callback, another thread). Two single-producer,
//! single-consumer surfaces connect them:
//!
//! - [`CompletionFlag`] - raised by the scheduler after every pass, taken by
//!   the output stage before it reads the output vector
//! - [`frame_channel`] - an optional lock-free ring of output vectors, for an
//!   output stage that cannot borrow the matrix

use std::sync::atomic::{AtomicBool, Ordering};

use rtrb::{Consumer, Producer, RingBuffer};

use crate::sample::Sample;

/// Signals that a pass has completed and the output vector is ready.
///
/// Raised with release ordering and taken with acquire ordering, so writes made
/// during the pass are visible to a consumer on another thread once it has
/// observed the flag.
#[derive(Debug, Default)]
pub struct CompletionFlag(AtomicBool);

impl CompletionFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Consume the signal. Returns whether a pass had completed since the last
    /// call.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::Acquire)
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Create a ring buffer holding up to `frames` output vectors of `len` samples.
pub fn frame_channel(len: usize, frames: usize) -> (FrameSink, FrameSource) {
    let len = len.max(1);
    let (producer, consumer) = RingBuffer::new(len * frames.max(1));
    (
        FrameSink { producer, len },
        FrameSource { consumer, len },
    )
}

/// Scheduler side of [`frame_channel`]. Attach it with
/// [`Matrix::with_frame_sink`](crate::Matrix::with_frame_sink).
pub struct FrameSink {
    producer: Producer<Sample>,
    len: usize,
}

impl FrameSink {
    /// Samples per frame.
    pub fn frame_len(&self) -> usize {
        self.len
    }

    /// Whole frames that can be pushed without dropping.
    #[inline]
    pub fn available(&self) -> usize {
        self.producer.slots() / self.len
    }

    /// Push one frame, padded with zeros or truncated to the frame length.
    /// Returns `false` and drops the frame when the ring is full.
    pub fn push(&mut self, frame: &[Sample]) -> bool {
        if self.producer.slots() < self.len {
            return false;
        }

        let padding = std::iter::repeat(0).take(self.len.saturating_sub(frame.len()));
        for sample in frame.iter().copied().take(self.len).chain(padding) {
            let _ = self.producer.push(sample);
        }
        true
    }
}

/// Output-stage side of [`frame_channel`].
pub struct FrameSource {
    consumer: Consumer<Sample>,
    len: usize,
}

impl FrameSource {
    pub fn frame_len(&self) -> usize {
        self.len
    }

    /// Whole frames waiting to be read.
    #[inline]
    pub fn ready(&self) -> usize {
        self.consumer.slots() / self.len
    }

    /// Pop the oldest frame into `out`. Samples beyond `out.len()` are
    /// discarded. Returns `false` when no whole frame is waiting.
    pub fn pop(&mut self, out: &mut [Sample]) -> bool {
        if self.consumer.slots() < self.len {
            return false;
        }

        for i in 0..self.len {
            let sample = self.consumer.pop().unwrap_or(0);
            if let Some(slot) = out.get_mut(i) {
                *slot = sample;
            }
        }
        true
    }
}
