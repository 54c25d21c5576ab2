//! Runways: exclusive, binary-occupancy resource units.
//!
//! A runway is either free or occupied by exactly one plane. All access
//! is serialized by tower control, so the type carries no concurrency
//! primitives of its own.

use std::fmt;

use crate::plane::PlaneId;

/// Unique identifier for a runway.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct RunwayId(String);

impl RunwayId {
    /// Creates a runway id with the given string value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string value of this id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RunwayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RunwayId({})", self.0)
    }
}

impl fmt::Display for RunwayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RunwayId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RunwayId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Error returned when a runway assignment fails.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RunwayError {
    /// The runway already has an occupant.
    #[error("runway '{runway}' is already occupied by plane '{occupant}'")]
    AlreadyOccupied {
        /// The runway that rejected the assignment.
        runway: RunwayId,
        /// The plane currently holding it.
        occupant: PlaneId,
    },
}

/// A runway with binary occupancy.
///
/// Invariant: `occupant` names at most the one plane currently
/// authorized on this runway; the runway is free iff it is `None`.
#[derive(Clone, Debug)]
pub struct Runway {
    id: RunwayId,
    occupant: Option<PlaneId>,
}

impl Runway {
    /// Creates a free runway.
    pub fn new(id: impl Into<RunwayId>) -> Self {
        Self {
            id: id.into(),
            occupant: None,
        }
    }

    /// Returns the runway's id.
    pub fn id(&self) -> &RunwayId {
        &self.id
    }

    /// Returns true iff the runway has no occupant.
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    /// Returns the current occupant, if any.
    pub fn occupant(&self) -> Option<&PlaneId> {
        self.occupant.as_ref()
    }

    /// Assigns the runway to a plane.
    ///
    /// Fails with [`RunwayError::AlreadyOccupied`] if the runway is not
    /// free; the existing occupant is untouched.
    pub fn assign(&mut self, plane: PlaneId) -> Result<(), RunwayError> {
        match &self.occupant {
            Some(occupant) => Err(RunwayError::AlreadyOccupied {
                runway: self.id.clone(),
                occupant: occupant.clone(),
            }),
            None => {
                self.occupant = Some(plane);
                Ok(())
            }
        }
    }

    /// Clears the occupant and returns it.
    ///
    /// Returns `None` when the runway was already free; freeing a free
    /// runway is idempotent, and the caller decides whether to log it.
    pub fn free(&mut self) -> Option<PlaneId> {
        self.occupant.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_runway_is_free() {
        let runway = Runway::new("runway-1");
        assert!(runway.is_free());
        assert!(runway.occupant().is_none());
        assert_eq!(runway.id().as_str(), "runway-1");
    }

    #[test]
    fn test_assign_occupies() {
        let mut runway = Runway::new("runway-1");
        runway.assign(PlaneId::new("plane-1")).unwrap();

        assert!(!runway.is_free());
        assert_eq!(runway.occupant().unwrap().as_str(), "plane-1");
    }

    #[test]
    fn test_assign_occupied_fails() {
        let mut runway = Runway::new("runway-1");
        runway.assign(PlaneId::new("plane-1")).unwrap();

        let err = runway.assign(PlaneId::new("plane-2")).unwrap_err();
        assert_eq!(
            err,
            RunwayError::AlreadyOccupied {
                runway: RunwayId::new("runway-1"),
                occupant: PlaneId::new("plane-1"),
            }
        );
        // The original occupant survives the rejected assignment.
        assert_eq!(runway.occupant().unwrap().as_str(), "plane-1");
    }

    #[test]
    fn test_free_returns_occupant() {
        let mut runway = Runway::new("runway-1");
        runway.assign(PlaneId::new("plane-1")).unwrap();

        assert_eq!(runway.free().unwrap().as_str(), "plane-1");
        assert!(runway.is_free());
    }

    #[test]
    fn test_free_is_idempotent() {
        let mut runway = Runway::new("runway-1");
        assert!(runway.free().is_none());
        assert!(runway.free().is_none());
        assert!(runway.is_free());
    }

    #[test]
    fn test_error_display() {
        let err = RunwayError::AlreadyOccupied {
            runway: RunwayId::new("runway-1"),
            occupant: PlaneId::new("plane-1"),
        };
        assert_eq!(
            format!("{}", err),
            "runway 'runway-1' is already occupied by plane 'plane-1'"
        );
    }
}
