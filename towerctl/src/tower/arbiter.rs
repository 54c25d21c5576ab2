//! Event arbitration.
//!
//! This module implements the per-intent handling behind
//! [`TowerControl::handle_event`]: granting runways to requesting planes
//! and releasing them on completion. The run loop in `core` drives this
//! one event at a time, which is what makes the check-then-act sequence
//! on runway occupancy safe.

use tracing::{info, warn};

use crate::error::TowerError;
use crate::event::{Event, Intent};
use crate::plane::{PlaneId, PlaneState};
use crate::runway::RunwayId;

use super::core::TowerControl;
use super::telemetry::TelemetryEvent;

/// Outcome of one arbitration pass.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Arbitration {
    /// The plane was cleared to land on the given runway.
    LandingAuthorized { runway: RunwayId },

    /// The plane was cleared to take off from the given runway.
    TakeoffAuthorized { runway: RunwayId },

    /// The plane completed its activity and vacated the runway.
    RunwayReleased { runway: RunwayId },

    /// A completion arrived for a plane holding no runway; nothing to do.
    ReleaseNoop,
}

impl TowerControl {
    /// Arbitrates a single event.
    ///
    /// This is the whole decision procedure: requests scan for the first
    /// free runway in registration order and either grant it or deny;
    /// completions free the sender's runway. Errors are reported, never
    /// escalated; the caller keeps the loop running regardless.
    pub fn handle_event(&mut self, event: Event) -> Result<Arbitration, TowerError> {
        let Event { plane, intent } = event;

        let result = match intent {
            Intent::RequestLanding | Intent::RequestTakeoff => {
                self.grant_runway(plane.clone(), intent)
            }
            Intent::LandingComplete | Intent::TakeoffComplete => {
                self.release_for(plane.clone(), intent)
            }
        };

        if let Err(error) = &result {
            if intent.is_request() {
                warn!(plane = %plane, intent = %intent, error = %error, "Request denied");
                self.telemetry.emit(TelemetryEvent::RequestDenied {
                    plane,
                    intent,
                    error: error.clone(),
                });
            } else {
                warn!(plane = %plane, intent = %intent, error = %error, "Completion rejected");
            }
        }

        result
    }

    /// Handles a landing or takeoff request.
    fn grant_runway(&mut self, plane_id: PlaneId, intent: Intent) -> Result<Arbitration, TowerError> {
        let plane = self
            .planes
            .get(&plane_id)
            .ok_or_else(|| TowerError::UnknownPlane(plane_id.clone()))?;
        plane.may_request(intent)?;

        let runway_id = self
            .first_free_runway()
            .ok_or_else(|| TowerError::NoRunwayAvailable {
                plane: plane_id.clone(),
            })?;

        let Some(runway) = self.runways.get_mut(&runway_id) else {
            return Err(TowerError::UnknownRunway(runway_id));
        };
        runway.assign(plane_id.clone())?;

        let (duration, completion) = if intent == Intent::RequestLanding {
            (self.config.landing_duration, Intent::LandingComplete)
        } else {
            (self.config.takeoff_duration, Intent::TakeoffComplete)
        };
        let timer = self
            .scheduler
            .schedule(duration, Event::new(plane_id.clone(), completion));

        let Some(plane) = self.planes.get_mut(&plane_id) else {
            return Err(TowerError::UnknownPlane(plane_id));
        };

        if intent == Intent::RequestLanding {
            plane.authorize_landing(runway_id.clone(), timer);
            info!(plane = %plane_id, runway = %runway_id, "Landing authorized");
            self.telemetry.emit(TelemetryEvent::LandingAuthorized {
                plane: plane_id,
                runway: runway_id.clone(),
                duration,
            });
            Ok(Arbitration::LandingAuthorized { runway: runway_id })
        } else {
            plane.authorize_takeoff(runway_id.clone(), timer);
            info!(plane = %plane_id, runway = %runway_id, "Takeoff authorized");
            self.telemetry.emit(TelemetryEvent::TakeoffAuthorized {
                plane: plane_id,
                runway: runway_id.clone(),
                duration,
            });
            Ok(Arbitration::TakeoffAuthorized { runway: runway_id })
        }
    }

    /// Handles a landing or takeoff completion.
    fn release_for(&mut self, plane_id: PlaneId, intent: Intent) -> Result<Arbitration, TowerError> {
        let plane = self
            .planes
            .get_mut(&plane_id)
            .ok_or_else(|| TowerError::UnknownPlane(plane_id.clone()))?;

        let Some(runway_id) = plane.release_runway() else {
            warn!(plane = %plane_id, "Completion for plane holding no runway");
            self.telemetry
                .emit(TelemetryEvent::ReleaseNoop { plane: plane_id });
            return Ok(Arbitration::ReleaseNoop);
        };

        let state = if intent == Intent::LandingComplete {
            plane.complete_landing();
            PlaneState::Off
        } else {
            plane.complete_takeoff();
            PlaneState::Flying
        };

        let Some(runway) = self.runways.get_mut(&runway_id) else {
            // The plane's side is already released; report the orphan id.
            return Err(TowerError::UnknownRunway(runway_id));
        };
        if runway.free().is_none() {
            warn!(runway = %runway_id, "Freed a runway that was already free");
        }

        info!(plane = %plane_id, runway = %runway_id, state = %state, "Runway released");
        self.telemetry.emit(TelemetryEvent::RunwayReleased {
            plane: plane_id,
            runway: runway_id.clone(),
            state,
        });
        Ok(Arbitration::RunwayReleased { runway: runway_id })
    }

    /// Returns the first free runway in registration order.
    fn first_free_runway(&self) -> Option<RunwayId> {
        self.runway_order
            .iter()
            .find(|id| {
                self.runways
                    .get(*id)
                    .map(|runway| runway.is_free())
                    .unwrap_or(false)
            })
            .cloned()
    }
}
