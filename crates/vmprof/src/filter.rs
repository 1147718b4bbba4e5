use crate::sample::{ClassId, ContextId, Sample};

/// Selects which buffered samples take part in a profile.
///
/// A filter is bound to one execution context; samples owned by any other
/// context are never accepted. Implementations must be side-effect free.
pub trait SampleFilter {
    fn context(&self) -> ContextId;

    /// Extra selection on top of the ownership check.
    fn filter_sample(&self, _sample: &Sample) -> bool {
        true
    }

    fn accepts(&self, sample: &Sample) -> bool {
        sample.context() == Some(self.context()) && self.filter_sample(sample)
    }
}

/// Accepts every sample owned by a context.
#[derive(Clone, Copy, Debug)]
pub struct ContextFilter {
    context: ContextId,
}

impl ContextFilter {
    pub fn new(context: ContextId) -> Self {
        Self { context }
    }
}

impl SampleFilter for ContextFilter {
    fn context(&self) -> ContextId {
        self.context
    }
}

/// Accepts allocation samples of one class.
#[derive(Clone, Copy, Debug)]
pub struct AllocationFilter {
    context: ContextId,
    cid: ClassId,
}

impl AllocationFilter {
    pub fn new(context: ContextId, cid: ClassId) -> Self {
        Self { context, cid }
    }
}

impl SampleFilter for AllocationFilter {
    fn context(&self) -> ContextId {
        self.context
    }

    fn filter_sample(&self, sample: &Sample) -> bool {
        sample.is_allocation_sample() && sample.allocation_cid() == Some(self.cid)
    }
}

/// Accepts samples stamped within `[start, end]` (monotonic microseconds).
#[derive(Clone, Copy, Debug)]
pub struct TimeRangeFilter {
    context: ContextId,
    start: u64,
    end: u64,
}

impl TimeRangeFilter {
    pub fn new(context: ContextId, start: u64, end: u64) -> Self {
        Self {
            context,
            start,
            end,
        }
    }
}

impl SampleFilter for TimeRangeFilter {
    fn context(&self) -> ContextId {
        self.context
    }

    fn filter_sample(&self, sample: &Sample) -> bool {
        (self.start..=self.end).contains(&sample.timestamp())
    }
}

/// Wraps an ad-hoc predicate.
pub struct PredicateFilter<F> {
    context: ContextId,
    predicate: F,
}

impl<F> PredicateFilter<F>
where
    F: Fn(&Sample) -> bool,
{
    pub fn new(context: ContextId, predicate: F) -> Self {
        Self { context, predicate }
    }
}

impl<F> SampleFilter for PredicateFilter<F>
where
    F: Fn(&Sample) -> bool,
{
    fn context(&self) -> ContextId {
        self.context
    }

    fn filter_sample(&self, sample: &Sample) -> bool {
        (self.predicate)(sample)
    }
}
