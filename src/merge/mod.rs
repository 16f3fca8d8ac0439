//! Auto-merge engine
//!
//! Functional core, imperative shell:
//! 1. Ingest - fold an event into the PR store (pure)
//! 2. Evaluate - decide readiness and emit a merge exactly once (pure)
//! 3. Execute - perform requested effects, feed results back as events

mod effect;
mod execute;
mod ingest;
mod machine;
mod orchestrator;
mod readiness;
mod runtime;

pub use effect::Effect;
pub use execute::execute_effect;
pub use ingest::is_approval;
pub use machine::{AutoMerger, DEFAULT_PROBE_DELAY, MergeOptions};
pub use readiness::{BlockReason, Readiness, evaluate};
pub use runtime::{run_event_loop, spawn_event_loop};
