//! Single-consumer event loop driving the state machine.

use super::{AutoMerger, execute_effect};
use crate::events::Event;
use crate::platform::PlatformService;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error};

/// Run the state machine until `inbound` closes and all work has finished.
///
/// Inbound events and completions of spawned work are handled one at a time
/// on this task. Effects run concurrently in a [`JoinSet`]; their results
/// re-enter through the same `handle` path. Queued inbound events are taken
/// before completions. Returns the machine so callers can inspect what is
/// still tracked.
pub async fn run_event_loop(
    mut machine: AutoMerger,
    platform: Arc<dyn PlatformService>,
    mut inbound: mpsc::Receiver<Event>,
) -> AutoMerger {
    let mut tasks: JoinSet<Option<Event>> = JoinSet::new();
    let mut inbound_open = true;

    loop {
        tokio::select! {
            biased;

            received = inbound.recv(), if inbound_open => match received {
                Some(event) => dispatch(&mut machine, &platform, &mut tasks, event),
                None => {
                    debug!(outstanding = tasks.len(), "inbound closed, draining");
                    inbound_open = false;
                }
            },
            Some(joined) = tasks.join_next() => match joined {
                Ok(Some(event)) => dispatch(&mut machine, &platform, &mut tasks, event),
                Ok(None) => {}
                Err(e) => error!(error = %e, "effect task failed"),
            },
            else => break,
        }
    }

    machine
}

/// Spawn [`run_event_loop`] on the current runtime.
///
/// Returns the sender for inbound events; drop it to let the loop finish.
/// A `capacity` of zero is raised to one.
pub fn spawn_event_loop(
    machine: AutoMerger,
    platform: Arc<dyn PlatformService>,
    capacity: usize,
) -> (mpsc::Sender<Event>, JoinHandle<AutoMerger>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let handle = tokio::spawn(run_event_loop(machine, platform, rx));
    (tx, handle)
}

fn dispatch(
    machine: &mut AutoMerger,
    platform: &Arc<dyn PlatformService>,
    tasks: &mut JoinSet<Option<Event>>,
    event: Event,
) {
    for effect in machine.handle(event) {
        debug!(pr = ?effect.pr(), ?effect, "dispatching effect");
        let platform = Arc::clone(platform);
        tasks.spawn(async move { execute_effect(platform.as_ref(), effect).await });
    }
}
