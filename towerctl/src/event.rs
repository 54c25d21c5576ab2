//! Event types exchanged between planes and tower control.
//!
//! Every message entering the arbitration loop is an [`Event`]: the id of
//! the plane it concerns plus an [`Intent`]. Requests originate from
//! callers via the tower handle; completions originate from the
//! [`scheduler`](crate::scheduler) when a landing or takeoff duration
//! elapses. Both kinds travel the same serialized path.

use std::fmt;

use crate::plane::PlaneId;

/// What a plane wants from (or reports to) tower control.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Intent {
    /// Ask for a runway to land on.
    RequestLanding,

    /// Ask for a runway to take off from.
    RequestTakeoff,

    /// The landing duration elapsed; the plane is on the ground.
    LandingComplete,

    /// The takeoff duration elapsed; the plane is airborne.
    TakeoffComplete,
}

impl Intent {
    /// Returns true for the two request intents.
    pub fn is_request(&self) -> bool {
        matches!(self, Self::RequestLanding | Self::RequestTakeoff)
    }

    /// Returns true for the two completion intents.
    pub fn is_completion(&self) -> bool {
        !self.is_request()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RequestLanding => "request_landing",
            Self::RequestTakeoff => "request_takeoff",
            Self::LandingComplete => "landing_complete",
            Self::TakeoffComplete => "takeoff_complete",
        };
        write!(f, "{}", name)
    }
}

/// A message from a plane to tower control.
///
/// Events are ephemeral: constructed, consumed by one arbitration pass,
/// discarded. The sender is a [`PlaneId`] directly, so the arbitrator
/// never needs to inspect the type of a generic registry entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Event {
    /// The plane this event concerns.
    pub plane: PlaneId,

    /// What the plane wants or reports.
    pub intent: Intent,
}

impl Event {
    /// Creates an event for the given plane and intent.
    pub fn new(plane: impl Into<PlaneId>, intent: Intent) -> Self {
        Self {
            plane: plane.into(),
            intent,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from '{}'", self.intent, self.plane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_display() {
        assert_eq!(format!("{}", Intent::RequestLanding), "request_landing");
        assert_eq!(format!("{}", Intent::RequestTakeoff), "request_takeoff");
        assert_eq!(format!("{}", Intent::LandingComplete), "landing_complete");
        assert_eq!(format!("{}", Intent::TakeoffComplete), "takeoff_complete");
    }

    #[test]
    fn test_intent_classification() {
        assert!(Intent::RequestLanding.is_request());
        assert!(Intent::RequestTakeoff.is_request());
        assert!(!Intent::LandingComplete.is_request());

        assert!(Intent::LandingComplete.is_completion());
        assert!(Intent::TakeoffComplete.is_completion());
        assert!(!Intent::RequestTakeoff.is_completion());
    }

    #[test]
    fn test_event_new() {
        let event = Event::new("plane-1", Intent::RequestLanding);
        assert_eq!(event.plane.as_str(), "plane-1");
        assert_eq!(event.intent, Intent::RequestLanding);
    }

    #[test]
    fn test_event_display() {
        let event = Event::new("plane-2", Intent::TakeoffComplete);
        assert_eq!(format!("{}", event), "takeoff_complete from 'plane-2'");
    }
}
