//! Tower control configuration.
//!
//! This module contains the [`TowerConfig`] struct and related constants
//! for configuring the arbitration loop.

use std::time::Duration;

// =============================================================================
// Configuration Constants
// =============================================================================

/// Default landing duration in milliseconds.
pub const DEFAULT_LANDING_DURATION_MS: u64 = 2000;

/// Default takeoff duration in milliseconds.
pub const DEFAULT_TAKEOFF_DURATION_MS: u64 = 2000;

/// Default command channel capacity.
pub const DEFAULT_COMMAND_CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// Tower Configuration
// =============================================================================

/// Configuration for tower control.
#[derive(Clone, Debug)]
pub struct TowerConfig {
    /// How long a granted landing occupies its runway.
    pub landing_duration: Duration,

    /// How long a granted takeoff occupies its runway.
    pub takeoff_duration: Duration,

    /// Capacity of the command channel feeding the arbitration loop.
    ///
    /// Must be at least 1.
    pub command_channel_capacity: usize,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            landing_duration: Duration::from_millis(DEFAULT_LANDING_DURATION_MS),
            takeoff_duration: Duration::from_millis(DEFAULT_TAKEOFF_DURATION_MS),
            command_channel_capacity: DEFAULT_COMMAND_CHANNEL_CAPACITY,
        }
    }
}

impl TowerConfig {
    /// Returns a config with both occupancy durations overridden.
    pub fn with_durations(landing: Duration, takeoff: Duration) -> Self {
        Self {
            landing_duration: landing,
            takeoff_duration: takeoff,
            ..Self::default()
        }
    }
}
