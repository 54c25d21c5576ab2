//! Tower Control
//!
//! This module provides the arbitration core: a single authority that
//! grants exclusive, time-bounded runway use to requesting planes and
//! frees runways when their occupancy elapses.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       TowerHandle                            │
//! │  Submit requests and completions, poll snapshots            │
//! ├─────────────────────────────────────────────────────────────┤
//! │                       TowerControl                           │
//! │  Serialized loop: arbitrate one event at a time             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ Plane /     │  │ Completion  │  │ Telemetry           │  │
//! │  │ Runway      │  │ Scheduler   │  │ Sink                │  │
//! │  │ registries  │  │             │  │                     │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Core Concepts
//!
//! - **Plane**: an agent with a four-state lifecycle requesting
//!   temporary exclusive use of a runway.
//!
//! - **Runway**: an exclusive resource, free or occupied by exactly one
//!   plane.
//!
//! - **Arbitration**: per event, scan runways in registration order and
//!   grant the first free one, or deny. Denials are dropped, never
//!   queued; the requester may re-request.
//!
//! - **Completion**: a granted plane occupies its runway for a
//!   configured duration, after which a scheduled event re-enters the
//!   same serialized loop and frees the runway.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use towerctl::tower::{PlaneSpec, TowerConfig, TowerControl};
//!
//! let (mut tower, handle) = TowerControl::new(TowerConfig::default());
//! tower.register_runways(["runway-1", "runway-2"])?;
//! tower.register_plane(PlaneSpec::new("plane-1"))?;
//!
//! let shutdown = CancellationToken::new();
//! tokio::spawn(tower.run(shutdown.clone()));
//!
//! let granted = handle.request_takeoff("plane-1").await?;
//! ```

mod arbiter;
mod config;
mod core;
mod handle;
mod registry;
mod telemetry;

// Re-export public types

pub use arbiter::Arbitration;

pub use config::{
    TowerConfig, DEFAULT_COMMAND_CHANNEL_CAPACITY, DEFAULT_LANDING_DURATION_MS,
    DEFAULT_TAKEOFF_DURATION_MS,
};

pub use self::core::TowerControl;

pub use handle::TowerHandle;

pub use registry::{
    AirportSnapshot, PlaneSnapshot, PlaneSpec, RegistryError, RunwaySnapshot,
};

pub use telemetry::{
    MultiplexTelemetrySink, NullTelemetrySink, TelemetryEvent, TelemetrySink,
    TracingTelemetrySink,
};
