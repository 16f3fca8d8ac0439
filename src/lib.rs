//! eggtimer - merge GitHub pull requests as soon as they are ready
//!
//! A pull request is merged once it is mergeable, every known review
//! approves it and every status check on its head commit has passed.
//! Evidence arrives as webhook deliveries ([`events`]), is folded into
//! per-PR records ([`tracking`]) and evaluated by a pure state machine
//! ([`merge::AutoMerger`]). Remote work the machine asks for runs through
//! a [`platform::PlatformService`].

pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod merge;
pub mod platform;
pub mod tracking;
pub mod types;

pub use error::{Error, Result};
