use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};

use crate::util::monotonic_micros;

/// Identifies the execution context (isolate) which owns a sample.
///
/// Zero is reserved for "no owner", which is how unused slots are represented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextId(NonZeroU64);

impl ContextId {
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

/// Class id of an allocated object, as assigned by the runtime's class table.
pub type ClassId = usize;

/// VM or user tag word attached to a sample. Zero means "no tag".
pub type Tag = usize;

const KIND_UNUSED: u8 = 0;
const KIND_STACK: u8 = 1;
const KIND_ALLOCATION: u8 = 2;

/// What a slot currently holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleKind {
    Unused,
    Stack,
    Allocation { cid: ClassId },
}

/// A reusable record in the sample buffer.
///
/// Every field is an atomic word, so writers (possibly in a signal handler)
/// and readers (profile builders on other threads) can touch the same slot
/// without locking. Readers may observe a torn sample; that is tolerated.
///
/// Frame 0 is the innermost frame (the sampled pc or the allocation site),
/// higher depths walk outward toward the callers. A zero pc terminates the
/// frame sequence.
#[derive(Debug)]
pub struct Sample {
    context: AtomicU64,
    timestamp: AtomicU64,
    kind: AtomicU8,
    // Class id while the slot is an allocation sample.
    metadata: AtomicUsize,
    vm_tag: AtomicUsize,
    user_tag: AtomicUsize,
    frames: Box<[AtomicUsize]>,
}

impl Sample {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            context: AtomicU64::new(0),
            timestamp: AtomicU64::new(0),
            kind: AtomicU8::new(KIND_UNUSED),
            metadata: AtomicUsize::new(0),
            vm_tag: AtomicUsize::new(0),
            user_tag: AtomicUsize::new(0),
            frames: std::iter::repeat_with(|| AtomicUsize::new(0))
                .take(max_depth)
                .collect(),
        }
    }

    // async-signal-safe
    /// Turns this slot into a fresh stack sample owned by `context`.
    pub fn init(&self, context: ContextId, pc0: usize, pc1: usize) {
        self.kind.store(KIND_UNUSED, Ordering::Release);
        self.timestamp.store(monotonic_micros(), Ordering::Relaxed);
        self.metadata.store(0, Ordering::Relaxed);
        self.vm_tag.store(0, Ordering::Relaxed);
        self.user_tag.store(0, Ordering::Relaxed);
        for frame in self.frames.iter() {
            frame.store(0, Ordering::Relaxed);
        }
        self.set_at(0, pc0);
        self.set_at(1, pc1);
        self.context.store(context.get(), Ordering::Relaxed);
        self.kind.store(KIND_STACK, Ordering::Release);
    }

    // async-signal-safe
    pub(crate) fn clear(&self) {
        self.kind.store(KIND_UNUSED, Ordering::Release);
        self.context.store(0, Ordering::Relaxed);
        self.timestamp.store(0, Ordering::Relaxed);
        self.metadata.store(0, Ordering::Relaxed);
        self.vm_tag.store(0, Ordering::Relaxed);
        self.user_tag.store(0, Ordering::Relaxed);
        for frame in self.frames.iter() {
            frame.store(0, Ordering::Relaxed);
        }
    }

    /// Stores the pc at `depth`. Frames deeper than the configured maximum
    /// depth are dropped.
    pub fn set_at(&self, depth: usize, pc: usize) {
        if let Some(frame) = self.frames.get(depth) {
            frame.store(pc, Ordering::Relaxed);
        }
    }

    /// Returns the pc at `depth`, or 0 when `depth` is out of range.
    pub fn at(&self, depth: usize) -> usize {
        self.frames
            .get(depth)
            .map_or(0, |frame| frame.load(Ordering::Relaxed))
    }

    pub fn max_depth(&self) -> usize {
        self.frames.len()
    }

    /// Recorded frames, innermost first, up to the first empty slot.
    pub fn frames(&self) -> impl Iterator<Item = usize> + '_ {
        self.frames
            .iter()
            .map(|frame| frame.load(Ordering::Relaxed))
            .take_while(|pc| *pc != 0)
    }

    pub fn set_is_allocation_sample(&self, allocation_sample: bool) {
        let kind = if allocation_sample {
            KIND_ALLOCATION
        } else {
            KIND_STACK
        };
        self.kind.store(kind, Ordering::Release);
    }

    pub fn is_allocation_sample(&self) -> bool {
        self.kind.load(Ordering::Acquire) == KIND_ALLOCATION
    }

    pub fn set_metadata(&self, cid: ClassId) {
        self.metadata.store(cid, Ordering::Relaxed);
    }

    /// The allocated class, present only while this is an allocation sample.
    pub fn allocation_cid(&self) -> Option<ClassId> {
        match self.kind() {
            SampleKind::Allocation { cid } => Some(cid),
            _ => None,
        }
    }

    pub fn kind(&self) -> SampleKind {
        match self.kind.load(Ordering::Acquire) {
            KIND_STACK => SampleKind::Stack,
            KIND_ALLOCATION => SampleKind::Allocation {
                cid: self.metadata.load(Ordering::Relaxed),
            },
            _ => SampleKind::Unused,
        }
    }

    /// The owning context, or `None` for a slot that was never written (or
    /// was cleared).
    pub fn context(&self) -> Option<ContextId> {
        if self.kind.load(Ordering::Acquire) == KIND_UNUSED {
            return None;
        }
        ContextId::new(self.context.load(Ordering::Relaxed))
    }

    /// Monotonic timestamp in microseconds, stamped by `init`.
    pub fn timestamp(&self) -> u64 {
        self.timestamp.load(Ordering::Relaxed)
    }

    pub fn set_timestamp(&self, micros: u64) {
        self.timestamp.store(micros, Ordering::Relaxed);
    }

    pub fn set_vm_tag(&self, tag: Tag) {
        self.vm_tag.store(tag, Ordering::Relaxed);
    }

    pub fn vm_tag(&self) -> Tag {
        self.vm_tag.load(Ordering::Relaxed)
    }

    pub fn set_user_tag(&self, tag: Tag) {
        self.user_tag.store(tag, Ordering::Relaxed);
    }

    pub fn user_tag(&self) -> Tag {
        self.user_tag.load(Ordering::Relaxed)
    }
}
