//! Component registration and observable snapshots.
//!
//! Planes and runways are registered before the arbitration loop starts;
//! the loop consumes the tower by value, so no event can arrive first.
//! Registration errors are setup-time fatal: they are returned to the
//! caller before the system goes live.
//!
//! A plane may be registered already mid-landing or mid-takeoff on a
//! named runway. Registration then marks that runway occupied, and the
//! plane leaves its active state only via an explicit completion event;
//! no timer is scheduled for pre-registered activity.

use tracing::debug;

use crate::plane::{Plane, PlaneId, PlaneState};
use crate::runway::{Runway, RunwayError, RunwayId};

use super::core::TowerControl;
use super::telemetry::TelemetryEvent;

/// Error returned when registration is rejected.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// A plane with this id is already registered.
    #[error("plane '{0}' is already registered")]
    DuplicatePlane(PlaneId),

    /// A runway with this id is already registered.
    #[error("runway '{0}' is already registered")]
    DuplicateRunway(RunwayId),

    /// A plane's initial runway is not in the registry.
    #[error("plane '{plane}' references unknown runway '{runway}'")]
    UnknownRunway { plane: PlaneId, runway: RunwayId },

    /// A plane's initial runway already has an occupant.
    #[error("runway '{runway}' is already occupied by plane '{occupant}'")]
    RunwayOccupied { runway: RunwayId, occupant: PlaneId },

    /// Initial state and runway assignment contradict each other.
    ///
    /// A runway must be given iff the state is Landing or Takeoff.
    #[error("plane '{plane}' initial state {state} is inconsistent with its runway assignment")]
    InvalidInitialState { plane: PlaneId, state: PlaneState },
}

/// Initial description of a plane to register.
///
/// # Example
///
/// ```
/// use towerctl::plane::PlaneState;
/// use towerctl::tower::PlaneSpec;
///
/// let parked = PlaneSpec::new("plane-1");
/// let airborne = PlaneSpec::flying("plane-2");
/// let mid_landing = PlaneSpec::new("plane-3")
///     .with_state(PlaneState::Landing)
///     .on_runway("runway-1");
/// ```
#[derive(Clone, Debug)]
pub struct PlaneSpec {
    id: PlaneId,
    state: PlaneState,
    runway: Option<RunwayId>,
}

impl PlaneSpec {
    /// Creates a spec for a plane parked on the ground (state Off).
    pub fn new(id: impl Into<PlaneId>) -> Self {
        Self {
            id: id.into(),
            state: PlaneState::Off,
            runway: None,
        }
    }

    /// Creates a spec for an airborne plane (state Flying).
    pub fn flying(id: impl Into<PlaneId>) -> Self {
        Self {
            state: PlaneState::Flying,
            ..Self::new(id)
        }
    }

    /// Overrides the initial state.
    pub fn with_state(mut self, state: PlaneState) -> Self {
        self.state = state;
        self
    }

    /// Names the runway the plane already occupies.
    ///
    /// Only valid together with an active initial state.
    pub fn on_runway(mut self, runway: impl Into<RunwayId>) -> Self {
        self.runway = Some(runway.into());
        self
    }

    /// Returns the plane id.
    pub fn id(&self) -> &PlaneId {
        &self.id
    }
}

// =============================================================================
// Snapshots
// =============================================================================

/// Observable state of one plane.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlaneSnapshot {
    pub id: PlaneId,
    pub state: PlaneState,
    pub runway_in_use: Option<RunwayId>,
}

/// Observable state of one runway.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunwaySnapshot {
    pub id: RunwayId,
    pub occupant: Option<PlaneId>,
}

/// Point-in-time view of every registered component, in registration
/// order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AirportSnapshot {
    pub planes: Vec<PlaneSnapshot>,
    pub runways: Vec<RunwaySnapshot>,
}

impl AirportSnapshot {
    /// Looks up a plane by id.
    pub fn plane(&self, id: &str) -> Option<&PlaneSnapshot> {
        self.planes.iter().find(|p| p.id.as_str() == id)
    }

    /// Looks up a runway by id.
    pub fn runway(&self, id: &str) -> Option<&RunwaySnapshot> {
        self.runways.iter().find(|r| r.id.as_str() == id)
    }

    /// Number of planes currently Landing or Takeoff.
    pub fn active_plane_count(&self) -> usize {
        self.planes.iter().filter(|p| p.state.is_active()).count()
    }

    /// Number of runways currently occupied.
    pub fn occupied_runway_count(&self) -> usize {
        self.runways.iter().filter(|r| r.occupant.is_some()).count()
    }
}

// =============================================================================
// Registration
// =============================================================================

impl TowerControl {
    /// Registers a runway.
    ///
    /// Runways are scanned for free capacity in registration order, so
    /// the order of calls is meaningful.
    pub fn register_runway(&mut self, id: impl Into<RunwayId>) -> Result<(), RegistryError> {
        let id = id.into();
        if self.runways.contains_key(&id) {
            return Err(RegistryError::DuplicateRunway(id));
        }

        debug!(runway = %id, "Runway registered");
        self.telemetry.emit(TelemetryEvent::RunwayRegistered {
            runway: id.clone(),
        });
        self.runway_order.push(id.clone());
        self.runways.insert(id.clone(), Runway::new(id));
        Ok(())
    }

    /// Registers several runways in order.
    pub fn register_runways<I, T>(&mut self, ids: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = T>,
        T: Into<RunwayId>,
    {
        for id in ids {
            self.register_runway(id)?;
        }
        Ok(())
    }

    /// Registers a plane.
    ///
    /// The spec's runway assignment and state must satisfy the occupancy
    /// invariant: a runway is named iff the state is active. An active
    /// spec occupies its runway immediately.
    pub fn register_plane(&mut self, spec: PlaneSpec) -> Result<(), RegistryError> {
        let PlaneSpec { id, state, runway } = spec;

        if self.planes.contains_key(&id) {
            return Err(RegistryError::DuplicatePlane(id));
        }
        if runway.is_some() != state.is_active() {
            return Err(RegistryError::InvalidInitialState { plane: id, state });
        }

        if let Some(runway_id) = &runway {
            let Some(entry) = self.runways.get_mut(runway_id) else {
                return Err(RegistryError::UnknownRunway {
                    plane: id,
                    runway: runway_id.clone(),
                });
            };
            entry.assign(id.clone()).map_err(|err| match err {
                RunwayError::AlreadyOccupied { runway, occupant } => {
                    RegistryError::RunwayOccupied { runway, occupant }
                }
            })?;
        }

        debug!(plane = %id, state = %state, "Plane registered");
        self.telemetry.emit(TelemetryEvent::PlaneRegistered {
            plane: id.clone(),
            state,
        });
        self.plane_order.push(id.clone());
        self.planes
            .insert(id.clone(), Plane::new(id, state, runway));
        Ok(())
    }

    /// Registers several planes in order.
    pub fn register_planes<I>(&mut self, specs: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = PlaneSpec>,
    {
        for spec in specs {
            self.register_plane(spec)?;
        }
        Ok(())
    }

    /// Returns a snapshot of every registered component.
    pub fn snapshot(&self) -> AirportSnapshot {
        let planes = self
            .plane_order
            .iter()
            .filter_map(|id| self.planes.get(id))
            .map(|plane| PlaneSnapshot {
                id: plane.id().clone(),
                state: plane.state(),
                runway_in_use: plane.runway_in_use().cloned(),
            })
            .collect();

        let runways = self
            .runway_order
            .iter()
            .filter_map(|id| self.runways.get(id))
            .map(|runway| RunwaySnapshot {
                id: runway.id().clone(),
                occupant: runway.occupant().cloned(),
            })
            .collect();

        AirportSnapshot { planes, runways }
    }
}
