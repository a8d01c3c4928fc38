//! Run SPEC CPU2006 benchmarks in gem5 syscall emulation mode and compare
//! the statistics of the runs.

pub mod launch;
pub mod registry;
pub mod resolve;
pub mod stats;
pub mod verify;

pub use launch::{Launch, LaunchError, LaunchMode, SimConfig};
pub use registry::{BenchmarkEntry, RunVariant};
pub use resolve::{resolve, InvocationDescriptor, Resolution, ResolveError, Resolver};
pub use stats::{report, Report, StatsError, StatsRecord};
pub use verify::{compare_files, Comparison};
