use std::sync::atomic::{AtomicUsize, Ordering};

use crate::sample::Sample;

/// Fixed-capacity ring of samples.
///
/// Slots are handed out round-robin by an atomic cursor. Once more than
/// `capacity` samples have been reserved, the oldest slots are overwritten.
/// Nothing is allocated after construction.
#[derive(Debug)]
pub struct SampleBuffer {
    samples: Box<[Sample]>,
    cursor: AtomicUsize,
}

impl SampleBuffer {
    /// Panics if `capacity` or `max_depth` is zero; there is nothing useful the
    /// profiler can do without a buffer.
    pub fn new(capacity: usize, max_depth: usize) -> Self {
        assert!(capacity > 0, "sample buffer capacity must be positive");
        assert!(max_depth > 0, "maximum stack depth must be positive");

        let samples = std::iter::repeat_with(|| Sample::new(max_depth))
            .take(capacity)
            .collect::<Box<[_]>>();
        log::debug!(
            "Sample buffer allocated (capacity: {}, max depth: {})",
            capacity,
            max_depth
        );

        Self {
            samples,
            cursor: AtomicUsize::new(0),
        }
    }

    // async-signal-safe
    /// Reserves the next slot for the caller to fill in.
    ///
    /// Never blocks and never fails. Two callers only share a slot when more
    /// than `capacity` reservations happen while one of them is still writing.
    pub fn reserve_sample(&self) -> &Sample {
        let cursor = self.cursor.fetch_add(1, Ordering::Relaxed);
        &self.samples[cursor % self.samples.len()]
    }

    /// Panics if `index >= capacity()`.
    pub fn at(&self, index: usize) -> &Sample {
        &self.samples[index]
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn max_depth(&self) -> usize {
        self.samples[0].max_depth()
    }

    /// Iterates over every slot, used or not.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Drops all samples without reallocating. Concurrent writers are not
    /// excluded; the sampling control layer stops them first.
    pub fn clear(&self) {
        for sample in self.samples.iter() {
            sample.clear();
        }
        self.cursor.store(0, Ordering::Relaxed);
        log::debug!("Sample buffer cleared");
    }
}
