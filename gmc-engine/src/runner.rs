//! Perception loop
//!
//! Pulls frames from a [`JsonLinesSource`] and drives the engine until the
//! input ends, a fatal error occurs, or shutdown is requested.

use std::future::Future;

use gmc_common::time::now;
use tokio::io::AsyncBufRead;
use tracing::{debug, info};

use crate::dispatcher::CommandSink;
use crate::engine::GestureEngine;
use crate::error::Result;
use crate::perception::JsonLinesSource;

/// Counters reported when the loop ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub faults: u64,
    pub dispatched: u64,
}

pub async fn run_perception_loop<R, S, F>(
    engine: &mut GestureEngine,
    source: &mut JsonLinesSource<R>,
    sink: &S,
    shutdown: F,
) -> Result<RunSummary>
where
    R: AsyncBufRead + Unpin,
    S: CommandSink + ?Sized,
    F: Future<Output = ()>,
{
    let mut summary = RunSummary::default();
    tokio::pin!(shutdown);

    loop {
        let next = tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Shutdown requested, stopping perception loop");
                break;
            }
            next = source.next_signal() => next,
        };

        let outcome = match next {
            None => {
                info!("Perception input ended");
                break;
            }
            Some(Ok(signal)) => {
                summary.frames += 1;
                let at = signal.timestamp.unwrap_or_else(now);
                engine.step(&signal, at, sink)
            }
            Some(Err(e)) if e.is_transient() => {
                summary.faults += 1;
                debug!("{}", e);
                engine.step_fault(now(), sink)
            }
            Some(Err(e)) => return Err(e),
        };

        if outcome.command.is_some() {
            summary.dispatched += 1;
        }
    }

    debug!(
        "Perception loop finished: {} frames, {} faults, {} dispatched",
        summary.frames, summary.faults, summary.dispatched
    );
    Ok(summary)
}
