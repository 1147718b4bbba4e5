//! Sampling-profiler core: a lock-free sample ring buffer, sample filters,
//! and call-path tries aggregated from the buffer on demand.

extern crate serde;
#[macro_use]
extern crate serde_derive;

pub mod code;
pub mod configuration;
pub mod error;
pub mod filter;
pub mod logging;
pub mod profile;
pub mod sample;
pub mod sample_buffer;
pub mod service;
mod util;
pub mod walker;

pub use code::{CodeInfo, CodeLookup, CodeTable, FunctionId};
pub use configuration::Configuration;
pub use error::{CodeTableError, ConfigurationError, ParseTagPolicyError};
pub use filter::{AllocationFilter, ContextFilter, PredicateFilter, SampleFilter, TimeRangeFilter};
pub use profile::{NodeKey, Profile, ProfileTrie, ProfileTrieNode, TagPolicy, TrieKind};
pub use sample::{ClassId, ContextId, Sample, SampleKind, Tag};
pub use sample_buffer::SampleBuffer;
pub use service::ProfilerService;
pub use util::monotonic_micros;
pub use walker::ProfileTrieWalker;
