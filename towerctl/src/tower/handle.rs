//! Handle for submitting events to a running tower.
//!
//! The [`TowerHandle`] is returned alongside the tower at construction.
//! It is cloneable; every clone feeds the same serialized arbitration
//! loop, so submissions from any number of tasks are processed one at a
//! time in arrival order.
//!
//! # Example
//!
//! ```ignore
//! use towerctl::tower::{TowerConfig, TowerControl};
//!
//! let (mut tower, handle) = TowerControl::new(TowerConfig::default());
//! tower.register_runway("runway-1")?;
//! tokio::spawn(tower.run(shutdown));
//!
//! match handle.request_takeoff("plane-1").await {
//!     Ok(granted) => println!("cleared: {:?}", granted),
//!     Err(denied) => println!("denied: {}", denied),
//! }
//! ```

use tokio::sync::{mpsc, oneshot};

use crate::error::TowerError;
use crate::event::{Event, Intent};
use crate::plane::PlaneId;

use super::arbiter::Arbitration;
use super::core::Command;
use super::registry::AirportSnapshot;

/// Cloneable handle to a running [`TowerControl`](super::TowerControl).
#[derive(Clone)]
pub struct TowerHandle {
    command_tx: mpsc::Sender<Command>,
}

impl TowerHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>) -> Self {
        Self { command_tx }
    }

    /// Submits an event and waits for its arbitration outcome.
    ///
    /// Returns once the consequence (grant, denial, or release) has been
    /// applied to the registries. [`TowerError::TowerGone`] means the
    /// tower shut down before answering.
    pub async fn notify(&self, event: Event) -> Result<Arbitration, TowerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Notify {
                event,
                reply: reply_tx,
            })
            .await
            .map_err(|_| TowerError::TowerGone)?;
        reply_rx.await.map_err(|_| TowerError::TowerGone)?
    }

    /// Requests a runway for landing.
    pub async fn request_landing(
        &self,
        plane: impl Into<PlaneId>,
    ) -> Result<Arbitration, TowerError> {
        self.notify(Event::new(plane, Intent::RequestLanding)).await
    }

    /// Requests a runway for takeoff.
    pub async fn request_takeoff(
        &self,
        plane: impl Into<PlaneId>,
    ) -> Result<Arbitration, TowerError> {
        self.notify(Event::new(plane, Intent::RequestTakeoff)).await
    }

    /// Returns the observable state of every registered component.
    pub async fn snapshot(&self) -> Result<AirportSnapshot, TowerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| TowerError::TowerGone)?;
        reply_rx.await.map_err(|_| TowerError::TowerGone)
    }
}

impl std::fmt::Debug for TowerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TowerHandle").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tower::config::TowerConfig;
    use crate::tower::core::TowerControl;

    #[tokio::test]
    async fn test_notify_after_tower_dropped() {
        let (tower, handle) = TowerControl::new(TowerConfig::default());
        drop(tower);

        let err = handle
            .notify(Event::new("plane-1", Intent::RequestLanding))
            .await
            .unwrap_err();
        assert_eq!(err, TowerError::TowerGone);

        let err = handle.snapshot().await.unwrap_err();
        assert_eq!(err, TowerError::TowerGone);
    }

    #[tokio::test]
    async fn test_handle_clones_feed_same_tower() {
        let (mut tower, handle) = TowerControl::new(TowerConfig::default());
        tower.register_runway("runway-1").unwrap();

        let shutdown = tokio_util::sync::CancellationToken::new();
        let task = tokio::spawn(tower.run(shutdown.clone()));

        let other = handle.clone();
        let snapshot = other.snapshot().await.unwrap();
        assert_eq!(snapshot.runways.len(), 1);

        shutdown.cancel();
        task.await.unwrap();
    }
}
