//! Planes and their lifecycle state machine.
//!
//! A [`Plane`] is an agent that requests temporary exclusive use of a
//! runway. Its state and runway reference are mutated exclusively by
//! tower control while arbitrating events; nothing else writes to a
//! plane record.
//!
//! # State machine
//!
//! ```text
//!                request_landing granted           timer fires
//!   Off / Flying ────────────────────────▶ Landing ──────────▶ Off
//!                request_takeoff granted           timer fires
//!   Off ─────────────────────────────────▶ Takeoff ──────────▶ Flying
//! ```
//!
//! Takeoff is only granted from the ground; a flying plane may request
//! nothing but a landing. Any request while Landing or Takeoff is
//! rejected as an invalid transition.

use std::fmt;

use crate::error::TowerError;
use crate::event::Intent;
use crate::runway::RunwayId;
use crate::scheduler::ScheduledCompletion;

/// Unique identifier for a plane.
///
/// # Example
///
/// ```
/// use towerctl::plane::PlaneId;
///
/// let id = PlaneId::new("plane-1");
/// assert_eq!(id.as_str(), "plane-1");
/// ```
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct PlaneId(String);

impl PlaneId {
    /// Creates a plane id with the given string value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string value of this id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlaneId({})", self.0)
    }
}

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlaneId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PlaneId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lifecycle state of a plane.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlaneState {
    /// Parked on the ground, engines off.
    Off,

    /// Authorized on a runway, descending.
    Landing,

    /// Authorized on a runway, accelerating.
    Takeoff,

    /// Airborne.
    Flying,
}

impl PlaneState {
    /// Returns true while the plane holds a runway (Landing or Takeoff).
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Landing | Self::Takeoff)
    }
}

impl fmt::Display for PlaneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "Off"),
            Self::Landing => write!(f, "Landing"),
            Self::Takeoff => write!(f, "Takeoff"),
            Self::Flying => write!(f, "Flying"),
        }
    }
}

/// A plane registered with tower control.
///
/// The record holds the state machine, the runway currently in use (if
/// any), and the cancellation handle of the scheduled completion timer
/// while a landing or takeoff is in progress.
///
/// Invariant: `runway_in_use` is `Some` iff the state is active
/// (Landing or Takeoff), and a plane holds at most one runway.
#[derive(Debug)]
pub struct Plane {
    id: PlaneId,
    state: PlaneState,
    runway_in_use: Option<RunwayId>,
    timer: Option<ScheduledCompletion>,
}

impl Plane {
    /// Creates a plane record with the given initial state.
    ///
    /// Used during registration; an active initial state carries the
    /// runway the plane already occupies. No timer is attached to a
    /// pre-registered activity.
    pub(crate) fn new(id: PlaneId, state: PlaneState, runway_in_use: Option<RunwayId>) -> Self {
        Self {
            id,
            state,
            runway_in_use,
            timer: None,
        }
    }

    /// Returns the plane's id.
    pub fn id(&self) -> &PlaneId {
        &self.id
    }

    /// Returns the current state.
    pub fn state(&self) -> PlaneState {
        self.state
    }

    /// Returns true if the plane is in the given state.
    pub fn is(&self, state: PlaneState) -> bool {
        self.state == state
    }

    /// Returns the runway the plane currently holds, if any.
    pub fn runway_in_use(&self) -> Option<&RunwayId> {
        self.runway_in_use.as_ref()
    }

    /// Checks whether a request intent is permitted in the current state.
    ///
    /// Returns `InvalidTransition` for anything not on the state machine:
    /// any request while Landing or Takeoff, and takeoff while Flying.
    pub fn may_request(&self, intent: Intent) -> Result<(), TowerError> {
        let permitted = matches!(
            (self.state, intent),
            (PlaneState::Off, Intent::RequestLanding | Intent::RequestTakeoff)
                | (PlaneState::Flying, Intent::RequestLanding)
        );

        if permitted {
            Ok(())
        } else {
            Err(TowerError::InvalidTransition {
                plane: self.id.clone(),
                state: self.state,
                intent,
            })
        }
    }

    /// Transitions to Landing on the given runway, holding the timer.
    pub(crate) fn authorize_landing(&mut self, runway: RunwayId, timer: ScheduledCompletion) {
        self.state = PlaneState::Landing;
        self.runway_in_use = Some(runway);
        self.timer = Some(timer);
    }

    /// Transitions to Takeoff on the given runway, holding the timer.
    pub(crate) fn authorize_takeoff(&mut self, runway: RunwayId, timer: ScheduledCompletion) {
        self.state = PlaneState::Takeoff;
        self.runway_in_use = Some(runway);
        self.timer = Some(timer);
    }

    /// Transitions to Off after a landing completes.
    pub(crate) fn complete_landing(&mut self) {
        self.state = PlaneState::Off;
        self.timer = None;
    }

    /// Transitions to Flying after a takeoff completes.
    pub(crate) fn complete_takeoff(&mut self) {
        self.state = PlaneState::Flying;
        self.timer = None;
    }

    /// Returns and clears the runway in use.
    ///
    /// `None` means the plane held no runway; the caller treats that as
    /// a defensive no-op.
    pub(crate) fn release_runway(&mut self) -> Option<RunwayId> {
        self.runway_in_use.take()
    }

    /// Cancels the scheduled completion timer, if one is outstanding.
    pub(crate) fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detached_completion() -> ScheduledCompletion {
        ScheduledCompletion::detached()
    }

    fn plane_in(state: PlaneState) -> Plane {
        let runway = state.is_active().then(|| RunwayId::new("runway-1"));
        Plane::new(PlaneId::new("plane-1"), state, runway)
    }

    #[test]
    fn test_plane_id_roundtrip() {
        let id = PlaneId::from("p7");
        assert_eq!(id.as_str(), "p7");
        assert_eq!(format!("{}", id), "p7");
        assert_eq!(format!("{:?}", id), "PlaneId(p7)");
    }

    #[test]
    fn test_state_is_active() {
        assert!(PlaneState::Landing.is_active());
        assert!(PlaneState::Takeoff.is_active());
        assert!(!PlaneState::Off.is_active());
        assert!(!PlaneState::Flying.is_active());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(format!("{}", PlaneState::Off), "Off");
        assert_eq!(format!("{}", PlaneState::Flying), "Flying");
    }

    #[test]
    fn test_requests_from_off() {
        let plane = plane_in(PlaneState::Off);
        assert!(plane.may_request(Intent::RequestLanding).is_ok());
        assert!(plane.may_request(Intent::RequestTakeoff).is_ok());
    }

    #[test]
    fn test_requests_from_flying() {
        let plane = plane_in(PlaneState::Flying);
        assert!(plane.may_request(Intent::RequestLanding).is_ok());

        let err = plane.may_request(Intent::RequestTakeoff).unwrap_err();
        assert!(matches!(
            err,
            TowerError::InvalidTransition {
                state: PlaneState::Flying,
                intent: Intent::RequestTakeoff,
                ..
            }
        ));
    }

    #[test]
    fn test_requests_while_active_rejected() {
        for state in [PlaneState::Landing, PlaneState::Takeoff] {
            let plane = plane_in(state);
            for intent in [Intent::RequestLanding, Intent::RequestTakeoff] {
                let err = plane.may_request(intent).unwrap_err();
                assert!(matches!(err, TowerError::InvalidTransition { .. }));
            }
        }
    }

    #[test]
    fn test_landing_cycle() {
        let mut plane = plane_in(PlaneState::Flying);
        assert!(plane.runway_in_use().is_none());

        plane.authorize_landing(RunwayId::new("runway-1"), detached_completion());
        assert!(plane.is(PlaneState::Landing));
        assert_eq!(plane.runway_in_use().unwrap().as_str(), "runway-1");

        let released = plane.release_runway();
        plane.complete_landing();
        assert!(plane.is(PlaneState::Off));
        assert_eq!(released.unwrap().as_str(), "runway-1");
        assert!(plane.runway_in_use().is_none());
    }

    #[test]
    fn test_takeoff_cycle() {
        let mut plane = plane_in(PlaneState::Off);

        plane.authorize_takeoff(RunwayId::new("runway-2"), detached_completion());
        assert!(plane.is(PlaneState::Takeoff));

        let released = plane.release_runway();
        plane.complete_takeoff();
        assert!(plane.is(PlaneState::Flying));
        assert_eq!(released.unwrap().as_str(), "runway-2");
    }

    #[test]
    fn test_release_without_runway_is_none() {
        let mut plane = plane_in(PlaneState::Off);
        assert!(plane.release_runway().is_none());
        // A second release stays a no-op.
        assert!(plane.release_runway().is_none());
    }

    #[test]
    fn test_cancel_timer_without_timer() {
        let mut plane = plane_in(PlaneState::Off);
        // No timer outstanding; must not panic.
        plane.cancel_timer();
    }

    #[test]
    fn test_cancel_timer_cancels_handle() {
        let mut plane = plane_in(PlaneState::Off);
        let timer = detached_completion();
        let probe = timer.clone();

        plane.authorize_takeoff(RunwayId::new("runway-1"), timer);
        plane.cancel_timer();
        assert!(probe.is_cancelled());
    }
}
