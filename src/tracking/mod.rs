//! In-memory tracking of pull requests awaiting auto-merge
//!
//! The [`PrStore`] holds one [`PullRequestRecord`] per live PR together with
//! the commit index used to resolve commit-only events (statuses) back to
//! the PR they belong to.

mod record;
mod store;

pub use record::PullRequestRecord;
pub use store::PrStore;
