//! The event loop that ties the runtime to the DNS updater.
//!
//! A [`Watcher`] starts [`Idle`](WatcherState::Idle), optionally passes
//! through [`Scanning`](WatcherState::Scanning) to register containers
//! that are already running, and then stays in
//! [`Watching`](WatcherState::Watching) until the event stream ends.
//!
//! Events are handled strictly one after another. A failure while handling
//! one container is logged and never stops the loop; only a failure of
//! the event stream itself (or of listing containers before the loop)
//! is returned to the caller.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use futures_util::StreamExt;
use log::{debug, error, info, warn};

use crate::dns::DnsUpdater;
use crate::error::Result;
use crate::runtime::EventSource;
use crate::types::{DockerEvent, UpdateOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Scanning,
    Watching,
}

/// Counters for one scan or one run of the event loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub ignored: usize,
}

pub struct Watcher {
    source: Arc<dyn EventSource>,
    updater: DnsUpdater,
    state: WatcherState,
}

impl Watcher {
    pub fn new(source: Arc<dyn EventSource>, updater: DnsUpdater) -> Self {
        Self {
            source,
            updater,
            state: WatcherState::Idle,
        }
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    /// Scan if requested, then watch until the event stream closes.
    pub async fn run(&mut self, scan: bool) -> Result<Stats> {
        if scan {
            let stats = self.scan().await?;
            info!(
                "initial scan: {} updated, {} skipped, {} failed",
                stats.updated, stats.skipped, stats.failed
            );
        }
        self.watch().await
    }

    /// Register every running container.
    pub async fn scan(&mut self) -> Result<Stats> {
        self.state = WatcherState::Scanning;
        debug!("scanning running containers");

        let mut stats = Stats::default();
        for container_id in self.updater.inspector().running_containers().await? {
            debug!("adding container {}", container_id);
            let result = self.updater.update_container(&container_id).await;
            record(&mut stats, &container_id, result);
        }
        Ok(stats)
    }

    /// Consume the event stream, updating DNS for every `start` event.
    pub async fn watch(&mut self) -> Result<Stats> {
        self.state = WatcherState::Watching;
        debug!("starting event loop");

        let mut stats = Stats::default();
        let mut events = self.source.events().await?;
        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    error!("Error in Docker event stream: {}", e);
                    return Err(e);
                }
            };
            self.handle(&event, &mut stats).await;
        }

        warn!("event stream closed");
        Ok(stats)
    }

    async fn handle(&self, event: &DockerEvent, stats: &mut Stats) {
        if !event.is_start() {
            info!("ignoring event {}", event);
            stats.ignored += 1;
            return;
        }
        let result = self.updater.update_container(&event.container_id).await;
        record(stats, event, result);
    }
}

/// Resolves once `signal` reports a shutdown request. If the signal
/// handler could not be installed the error is logged and this never
/// resolves, so the watcher keeps running.
pub async fn shutdown_requested<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Received Ctrl+C, shutting down..."),
        Err(err) => {
            error!("Unable to listen for shutdown signal: {}", err);
            std::future::pending::<()>().await;
        }
    }
}

fn record(stats: &mut Stats, context: &dyn Display, result: Result<UpdateOutcome>) {
    match result {
        Ok(UpdateOutcome::Updated { .. }) => stats.updated += 1,
        Ok(UpdateOutcome::Skipped { .. }) => stats.skipped += 1,
        Err(e) if e.is_invariant_violation() => {
            error!("while handling {}: {}", context, e);
            stats.failed += 1;
        }
        Err(e) => {
            warn!("while handling {}: {}", context, e);
            stats.failed += 1;
        }
    }
}
