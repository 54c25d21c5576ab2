//! Telemetry for arbitration observability.
//!
//! Tower control emits structured events via a sink abstraction and does
//! not know how they are consumed. Grants, denials, and releases are all
//! observable here without coupling the arbitrator to any presentation
//! mechanism.
//!
//! # Example
//!
//! ```ignore
//! use towerctl::tower::{TelemetryEvent, TelemetrySink};
//!
//! struct LoggingSink;
//!
//! impl TelemetrySink for LoggingSink {
//!     fn emit(&self, event: TelemetryEvent) {
//!         tracing::info!(?event, "Tower event");
//!     }
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::error::TowerError;
use crate::event::Intent;
use crate::plane::{PlaneId, PlaneState};
use crate::runway::RunwayId;

// =============================================================================
// Telemetry Events
// =============================================================================

/// Events emitted while tower control registers components and
/// arbitrates requests.
#[derive(Clone, Debug)]
pub enum TelemetryEvent {
    /// A plane was added to the registry.
    PlaneRegistered {
        plane: PlaneId,
        state: PlaneState,
    },

    /// A runway was added to the registry.
    RunwayRegistered { runway: RunwayId },

    /// A landing was granted; the plane occupies the runway.
    LandingAuthorized {
        plane: PlaneId,
        runway: RunwayId,
        duration: Duration,
    },

    /// A takeoff was granted; the plane occupies the runway.
    TakeoffAuthorized {
        plane: PlaneId,
        runway: RunwayId,
        duration: Duration,
    },

    /// A request was denied; no state was mutated.
    RequestDenied {
        plane: PlaneId,
        intent: Intent,
        error: TowerError,
    },

    /// A completed plane vacated its runway.
    RunwayReleased {
        plane: PlaneId,
        runway: RunwayId,
        state: PlaneState,
    },

    /// A completion event arrived for a plane holding no runway.
    ReleaseNoop { plane: PlaneId },
}

impl TelemetryEvent {
    /// Returns the plane id associated with this event, if any.
    pub fn plane(&self) -> Option<&PlaneId> {
        match self {
            Self::PlaneRegistered { plane, .. }
            | Self::LandingAuthorized { plane, .. }
            | Self::TakeoffAuthorized { plane, .. }
            | Self::RequestDenied { plane, .. }
            | Self::RunwayReleased { plane, .. }
            | Self::ReleaseNoop { plane } => Some(plane),
            Self::RunwayRegistered { .. } => None,
        }
    }

    /// Returns a short name for this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PlaneRegistered { .. } => "plane_registered",
            Self::RunwayRegistered { .. } => "runway_registered",
            Self::LandingAuthorized { .. } => "landing_authorized",
            Self::TakeoffAuthorized { .. } => "takeoff_authorized",
            Self::RequestDenied { .. } => "request_denied",
            Self::RunwayReleased { .. } => "runway_released",
            Self::ReleaseNoop { .. } => "release_noop",
        }
    }
}

// =============================================================================
// Telemetry Sink Trait
// =============================================================================

/// Sink for tower telemetry events.
///
/// Implementations must be thread-safe (`Send + Sync`); completion
/// timers and callers emit from different tasks. The `emit` method
/// should be fast and non-blocking.
pub trait TelemetrySink: Send + Sync {
    /// Called for every telemetry event.
    fn emit(&self, event: TelemetryEvent);
}

// =============================================================================
// Built-in Sink Implementations
// =============================================================================

/// No-op sink for when telemetry is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTelemetrySink;

impl TelemetrySink for NullTelemetrySink {
    fn emit(&self, _event: TelemetryEvent) {
        // Intentionally empty
    }
}

/// Sink that logs events using the `tracing` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn emit(&self, event: TelemetryEvent) {
        match &event {
            TelemetryEvent::PlaneRegistered { plane, state } => {
                tracing::debug!(plane = %plane, state = %state, "Plane registered");
            }
            TelemetryEvent::RunwayRegistered { runway } => {
                tracing::debug!(runway = %runway, "Runway registered");
            }
            TelemetryEvent::LandingAuthorized {
                plane,
                runway,
                duration,
            } => {
                tracing::info!(
                    plane = %plane,
                    runway = %runway,
                    duration_ms = duration.as_millis(),
                    "Landing authorized"
                );
            }
            TelemetryEvent::TakeoffAuthorized {
                plane,
                runway,
                duration,
            } => {
                tracing::info!(
                    plane = %plane,
                    runway = %runway,
                    duration_ms = duration.as_millis(),
                    "Takeoff authorized"
                );
            }
            TelemetryEvent::RequestDenied {
                plane,
                intent,
                error,
            } => {
                tracing::warn!(
                    plane = %plane,
                    intent = %intent,
                    error = %error,
                    "Request denied"
                );
            }
            TelemetryEvent::RunwayReleased {
                plane,
                runway,
                state,
            } => {
                tracing::info!(
                    plane = %plane,
                    runway = %runway,
                    state = %state,
                    "Runway released"
                );
            }
            TelemetryEvent::ReleaseNoop { plane } => {
                tracing::warn!(plane = %plane, "Completion for plane holding no runway");
            }
        }
    }
}

/// Sink that forwards events to multiple sinks.
pub struct MultiplexTelemetrySink {
    sinks: Vec<Arc<dyn TelemetrySink>>,
}

impl MultiplexTelemetrySink {
    /// Creates a new multiplex sink with the given sinks.
    pub fn new(sinks: Vec<Arc<dyn TelemetrySink>>) -> Self {
        Self { sinks }
    }

    /// Adds a sink to the multiplex.
    pub fn add_sink(&mut self, sink: Arc<dyn TelemetrySink>) {
        self.sinks.push(sink);
    }
}

impl TelemetrySink for MultiplexTelemetrySink {
    fn emit(&self, event: TelemetryEvent) {
        for sink in &self.sinks {
            sink.emit(event.clone());
        }
    }
}

impl std::fmt::Debug for MultiplexTelemetrySink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiplexTelemetrySink")
            .field("sink_count", &self.sinks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn denied_event() -> TelemetryEvent {
        TelemetryEvent::RequestDenied {
            plane: PlaneId::new("plane-1"),
            intent: Intent::RequestLanding,
            error: TowerError::NoRunwayAvailable {
                plane: PlaneId::new("plane-1"),
            },
        }
    }

    #[test]
    fn test_null_sink() {
        let sink = NullTelemetrySink;
        // Should not panic
        sink.emit(denied_event());
    }

    #[test]
    fn test_tracing_sink() {
        let sink = TracingTelemetrySink;
        // Should not panic (logging may or may not be configured)
        sink.emit(denied_event());
        sink.emit(TelemetryEvent::RunwayRegistered {
            runway: RunwayId::new("runway-1"),
        });
    }

    #[test]
    fn test_event_plane() {
        let plane = PlaneId::new("plane-1");
        assert_eq!(denied_event().plane(), Some(&plane));

        let event = TelemetryEvent::RunwayRegistered {
            runway: RunwayId::new("runway-1"),
        };
        assert_eq!(event.plane(), None);
    }

    #[test]
    fn test_event_type_names() {
        assert_eq!(denied_event().event_type(), "request_denied");
        assert_eq!(
            TelemetryEvent::LandingAuthorized {
                plane: PlaneId::new("p"),
                runway: RunwayId::new("r"),
                duration: Duration::ZERO,
            }
            .event_type(),
            "landing_authorized"
        );
        assert_eq!(
            TelemetryEvent::ReleaseNoop {
                plane: PlaneId::new("p")
            }
            .event_type(),
            "release_noop"
        );
    }

    #[test]
    fn test_multiplex_sink() {
        struct CountingSink(AtomicUsize);

        impl TelemetrySink for CountingSink {
            fn emit(&self, _event: TelemetryEvent) {
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }

        let sink1 = Arc::new(CountingSink(AtomicUsize::new(0)));
        let sink2 = Arc::new(CountingSink(AtomicUsize::new(0)));

        let multiplex = MultiplexTelemetrySink::new(vec![
            Arc::clone(&sink1) as Arc<dyn TelemetrySink>,
            Arc::clone(&sink2) as Arc<dyn TelemetrySink>,
        ]);

        multiplex.emit(denied_event());

        assert_eq!(sink1.0.load(Ordering::Relaxed), 1);
        assert_eq!(sink2.0.load(Ordering::Relaxed), 1);
    }
}
