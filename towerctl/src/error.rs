//! Arbitration error taxonomy.
//!
//! Every variant is handled at the arbitrator boundary and reported
//! outward through the reply channel, telemetry, and log lines; none of
//! them terminates the arbitration loop. There is no retry machinery
//! here: a denied request is dropped and the requester may re-request.

use crate::event::Intent;
use crate::plane::{PlaneId, PlaneState};
use crate::runway::{RunwayError, RunwayId};

/// Errors produced while arbitrating events.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TowerError {
    /// Every runway is occupied; the request is denied and dropped.
    ///
    /// Recoverable: no state was mutated, and the plane may re-request
    /// once a runway frees up.
    #[error("no runway available for plane '{plane}'")]
    NoRunwayAvailable {
        /// The plane whose request was denied.
        plane: PlaneId,
    },

    /// The request is not permitted in the plane's current state.
    ///
    /// Covers repeated requests while a landing or takeoff is already in
    /// progress, and takeoff requests from a flying plane.
    #[error("plane '{plane}' cannot {intent} while {state}")]
    InvalidTransition {
        /// The plane that issued the request.
        plane: PlaneId,
        /// Its state at the time of the request.
        state: PlaneState,
        /// The rejected intent.
        intent: Intent,
    },

    /// An event referenced a plane id that is not registered.
    #[error("unknown plane '{0}'")]
    UnknownPlane(PlaneId),

    /// A completion event released a runway id that is not registered.
    #[error("unknown runway '{0}'")]
    UnknownRunway(RunwayId),

    /// A runway mutation failed.
    #[error(transparent)]
    Runway(#[from] RunwayError),

    /// The tower has shut down and no longer accepts events.
    #[error("tower control is no longer running")]
    TowerGone,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = TowerError::NoRunwayAvailable {
            plane: PlaneId::new("plane-1"),
        };
        assert_eq!(format!("{}", err), "no runway available for plane 'plane-1'");

        let err = TowerError::InvalidTransition {
            plane: PlaneId::new("plane-2"),
            state: PlaneState::Landing,
            intent: Intent::RequestTakeoff,
        };
        assert_eq!(
            format!("{}", err),
            "plane 'plane-2' cannot request_takeoff while Landing"
        );

        assert_eq!(
            format!("{}", TowerError::UnknownPlane(PlaneId::new("ghost"))),
            "unknown plane 'ghost'"
        );
    }

    #[test]
    fn test_runway_error_conversion() {
        let runway_err = RunwayError::AlreadyOccupied {
            runway: RunwayId::new("runway-1"),
            occupant: PlaneId::new("plane-1"),
        };
        let err: TowerError = runway_err.clone().into();
        assert_eq!(err, TowerError::Runway(runway_err));
    }
}
