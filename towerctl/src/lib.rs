//! TowerCtl - airport traffic arbitration
//!
//! This library implements a tower-control core: planes request
//! exclusive, time-bounded use of runways, a single arbitrator grants or
//! denies each request, and completion timers free runways when a
//! landing or takeoff duration elapses.
//!
//! # High-Level API
//!
//! Construct a [`tower::TowerControl`], register runways and planes,
//! then run the arbitration loop and drive it through the returned
//! [`tower::TowerHandle`]:
//!
//! ```ignore
//! use tokio_util::sync::CancellationToken;
//! use towerctl::tower::{PlaneSpec, TowerConfig, TowerControl};
//!
//! let (mut tower, handle) = TowerControl::new(TowerConfig::default());
//! tower.register_runways(["runway-1", "runway-2"])?;
//! tower.register_plane(PlaneSpec::flying("plane-1"))?;
//!
//! let shutdown = CancellationToken::new();
//! tokio::spawn(tower.run(shutdown.clone()));
//!
//! handle.request_landing("plane-1").await?;
//! ```

pub mod error;
pub mod event;
pub mod logging;
pub mod plane;
pub mod runway;
pub mod scheduler;
pub mod tower;

/// Version of the towerctl library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
