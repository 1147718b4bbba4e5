use std::sync::Arc;

use crate::configuration::Configuration;
use crate::error::ConfigurationError;
use crate::sample::{ClassId, ContextId, Sample};
use crate::sample_buffer::SampleBuffer;

/// Owns the process-wide sample buffer on behalf of the sampling control
/// layer.
///
/// The record methods are what the timer handler and the allocation hook call
/// once they have walked the stack. They only reserve and fill a slot.
#[derive(Debug, Clone)]
pub struct ProfilerService {
    configuration: Configuration,
    buffer: Arc<SampleBuffer>,
}

impl ProfilerService {
    pub fn new(configuration: Configuration) -> Result<Self, ConfigurationError> {
        configuration.validate()?;

        let buffer = Arc::new(SampleBuffer::new(
            configuration.capacity,
            configuration.max_stack_depth,
        ));
        Ok(Self {
            configuration,
            buffer,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn buffer(&self) -> &Arc<SampleBuffer> {
        &self.buffer
    }

    // async-signal-safe
    /// Records a stack snapshot. `pcs` is innermost first.
    pub fn record_stack_sample(&self, context: ContextId, pcs: &[usize]) -> &Sample {
        let sample = self.buffer.reserve_sample();
        Self::fill(sample, context, pcs);
        sample
    }

    // async-signal-safe
    /// Records one allocation of a traced class. `pcs` starts at the
    /// allocation site.
    pub fn record_allocation_sample(
        &self,
        context: ContextId,
        cid: ClassId,
        pcs: &[usize],
    ) -> &Sample {
        let sample = self.buffer.reserve_sample();
        Self::fill(sample, context, pcs);
        sample.set_metadata(cid);
        sample.set_is_allocation_sample(true);
        sample
    }

    fn fill(sample: &Sample, context: ContextId, pcs: &[usize]) {
        let pc0 = pcs.first().copied().unwrap_or(0);
        let pc1 = pcs.get(1).copied().unwrap_or(0);
        sample.init(context, pc0, pc1);
        for (depth, pc) in pcs.iter().enumerate().skip(2) {
            sample.set_at(depth, *pc);
        }
    }

    /// Drops every buffered sample, typically between measurement runs.
    pub fn clear_samples(&self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleKind;

    const CONTEXT: Option<ContextId> = ContextId::new(1);

    #[test]
    fn test_rejects_invalid_configuration() {
        let configuration = Configuration::default().with_capacity(0);
        assert!(matches!(
            ProfilerService::new(configuration),
            Err(ConfigurationError::ZeroCapacity)
        ));
    }

    #[test]
    fn test_record_samples() {
        let configuration = Configuration::default()
            .with_capacity(4)
            .with_max_stack_depth(3);
        let service = ProfilerService::new(configuration).unwrap();

        let sample = service.record_stack_sample(CONTEXT.unwrap(), &[0x1, 0x2, 0x3, 0x4]);
        assert_eq!(sample.kind(), SampleKind::Stack);
        assert_eq!(sample.frames().collect::<Vec<_>>(), vec![0x1, 0x2, 0x3]);

        let sample = service.record_allocation_sample(CONTEXT.unwrap(), 12, &[0x5]);
        assert_eq!(sample.kind(), SampleKind::Allocation { cid: 12 });
        assert_eq!(sample.frames().collect::<Vec<_>>(), vec![0x5]);

        service.clear_samples();
        assert!(service.buffer().iter().all(|s| s.context().is_none()));
    }
}
