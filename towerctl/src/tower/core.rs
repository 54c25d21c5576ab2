//! Tower control core - main struct and run loop.
//!
//! This module contains the [`TowerControl`] struct and its event loop.
//! Registration lives in `registry`, per-intent arbitration in
//! `arbiter`.
//!
//! The loop is the system's critical section: it is the sole owner of
//! both registries and processes exactly one command or completion at a
//! time. Two planes can therefore never observe the same runway as free
//! and both claim it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::TowerError;
use crate::event::Event;
use crate::plane::{Plane, PlaneId};
use crate::runway::{Runway, RunwayId};
use crate::scheduler::{CompletionScheduler, TokioScheduler};

use super::arbiter::Arbitration;
use super::config::TowerConfig;
use super::handle::TowerHandle;
use super::registry::AirportSnapshot;
use super::telemetry::{NullTelemetrySink, TelemetrySink};

/// A message from a [`TowerHandle`] to the run loop.
pub(crate) enum Command {
    /// Arbitrate an event and reply with the outcome.
    Notify {
        event: Event,
        reply: oneshot::Sender<Result<Arbitration, TowerError>>,
    },

    /// Report the observable state of every registered component.
    Snapshot {
        reply: oneshot::Sender<AirportSnapshot>,
    },
}

// =============================================================================
// Tower Control
// =============================================================================

/// The arbitrator: single point of truth for runway allocation.
///
/// Owns the plane and runway registries, grants or denies requests,
/// authorizes plane transitions, and frees runways when completions
/// arrive. Construction returns the tower together with a cloneable
/// [`TowerHandle`]; registration happens before [`run`](Self::run)
/// consumes the tower.
pub struct TowerControl {
    /// Configuration (occupancy durations, channel capacity).
    pub(crate) config: TowerConfig,

    /// Registered planes by id.
    pub(crate) planes: HashMap<PlaneId, Plane>,

    /// Plane ids in registration order.
    pub(crate) plane_order: Vec<PlaneId>,

    /// Registered runways by id.
    pub(crate) runways: HashMap<RunwayId, Runway>,

    /// Runway ids in registration order; free-runway scans follow it.
    pub(crate) runway_order: Vec<RunwayId>,

    /// Completion timer factory.
    pub(crate) scheduler: Arc<dyn CompletionScheduler>,

    /// Telemetry sink for grants, denials, and releases.
    pub(crate) telemetry: Arc<dyn TelemetrySink>,

    /// Receiver for handle commands.
    command_rx: mpsc::Receiver<Command>,

    /// Receiver for timer-fired completion events.
    completion_rx: mpsc::UnboundedReceiver<Event>,
}

impl TowerControl {
    /// Creates a tower control with default telemetry (none).
    pub fn new(config: TowerConfig) -> (Self, TowerHandle) {
        Self::with_telemetry(config, Arc::new(NullTelemetrySink))
    }

    /// Creates a tower control with a telemetry sink.
    ///
    /// Completion timers run on the tokio runtime and re-enter the
    /// tower through its own completion channel.
    pub fn with_telemetry(
        config: TowerConfig,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> (Self, TowerHandle) {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let scheduler = Arc::new(TokioScheduler::new(completion_tx));
        Self::assemble(config, telemetry, scheduler, completion_rx)
    }

    /// Creates a tower control with telemetry and a custom scheduler.
    ///
    /// The internal completion channel goes unused; the scheduler is
    /// responsible for delivering completions, if it delivers them at
    /// all. This is the construction path for synchronous embedding and
    /// deterministic tests.
    pub fn with_scheduler(
        config: TowerConfig,
        telemetry: Arc<dyn TelemetrySink>,
        scheduler: Arc<dyn CompletionScheduler>,
    ) -> (Self, TowerHandle) {
        let (_completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self::assemble(config, telemetry, scheduler, completion_rx)
    }

    fn assemble(
        config: TowerConfig,
        telemetry: Arc<dyn TelemetrySink>,
        scheduler: Arc<dyn CompletionScheduler>,
        completion_rx: mpsc::UnboundedReceiver<Event>,
    ) -> (Self, TowerHandle) {
        let (command_tx, command_rx) = mpsc::channel(config.command_channel_capacity);

        let tower = Self {
            config,
            planes: HashMap::new(),
            plane_order: Vec::new(),
            runways: HashMap::new(),
            runway_order: Vec::new(),
            scheduler,
            telemetry,
            command_rx,
            completion_rx,
        };

        (tower, TowerHandle::new(command_tx))
    }

    /// Runs the arbitration loop until shutdown is signalled.
    ///
    /// Completions are drained before new commands so a freed runway is
    /// visible to the next request that arrives for it. The loop also
    /// ends when every handle has been dropped.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(
            planes = self.plane_order.len(),
            runways = self.runway_order.len(),
            "Tower control started"
        );

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    self.shutdown();
                    break;
                }

                Some(event) = self.completion_rx.recv() => {
                    let _ = self.handle_event(event);
                }

                command = self.command_rx.recv() => match command {
                    Some(command) => self.process_command(command),
                    None => {
                        self.shutdown();
                        break;
                    }
                },
            }
        }
    }

    /// Applies one handle command.
    fn process_command(&mut self, command: Command) {
        match command {
            Command::Notify { event, reply } => {
                let outcome = self.handle_event(event);
                // A caller that stopped waiting just misses the outcome.
                let _ = reply.send(outcome);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    /// Cancels outstanding completion timers and logs the stop.
    fn shutdown(&mut self) {
        let mut cancelled = 0_usize;
        for plane in self.planes.values_mut() {
            if plane.state().is_active() {
                cancelled += 1;
            }
            plane.cancel_timer();
        }

        if cancelled > 0 {
            warn!(in_flight = cancelled, "Stopping with activity in flight");
        }
        info!("Tower control stopped");
    }
}

impl std::fmt::Debug for TowerControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TowerControl")
            .field("planes", &self.plane_order.len())
            .field("runways", &self.runway_order.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tower_creation() {
        let (tower, _handle) = TowerControl::new(TowerConfig::default());
        assert!(tower.planes.is_empty());
        assert!(tower.runways.is_empty());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let (tower, handle) = TowerControl::new(TowerConfig::default());
        let shutdown = CancellationToken::new();

        let task = tokio::spawn(tower.run(shutdown.clone()));
        shutdown.cancel();
        task.await.unwrap();
        drop(handle);
    }

    #[tokio::test]
    async fn test_run_stops_when_handles_dropped() {
        let (tower, handle) = TowerControl::new(TowerConfig::default());
        let shutdown = CancellationToken::new();

        let task = tokio::spawn(tower.run(shutdown));
        drop(handle);
        task.await.unwrap();
    }
}
