//! Error types for galaxy loading.
//!
//! Only loading can fail. Stepping, jiggling, resetting and queries are total
//! over a valid galaxy.

use std::fmt;

use thiserror::Error;

/// Which structural invariant a system record broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureViolation {
    /// A neighbour index does not name a record in the description.
    NeighbourOutOfRange { neighbour: u32, count: usize },
    /// The record lists `neighbour`, but `neighbour` does not list it back.
    AsymmetricNeighbour { neighbour: u32 },
    /// The record lists itself as a neighbour.
    SelfNeighbour,
}

impl fmt::Display for StructureViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeighbourOutOfRange { neighbour, count } => write!(
                f,
                "neighbour index {neighbour} is out of range (galaxy has {count} systems)"
            ),
            Self::AsymmetricNeighbour { neighbour } => write!(
                f,
                "neighbour {neighbour} does not list this system as a neighbour"
            ),
            Self::SelfNeighbour => write!(f, "system lists itself as a neighbour"),
        }
    }
}

/// Root error type for galaxy loading.
#[derive(Error, Debug)]
pub enum GalaxyError {
    /// The description violates a graph invariant. No galaxy was built.
    #[error("invalid galaxy structure at system {record}: {violation}")]
    StructureInvalid {
        record: usize,
        violation: StructureViolation,
    },

    /// JSON text did not decode into the description shape.
    #[error("malformed galaxy description: {0}")]
    Description(#[from] serde_json::Error),
}

impl GalaxyError {
    /// The violated invariant, if this is a structural error.
    pub fn violation(&self) -> Option<StructureViolation> {
        match self {
            Self::StructureInvalid { violation, .. } => Some(*violation),
            Self::Description(_) => None,
        }
    }

    /// The index of the offending record, if this is a structural error.
    pub fn record(&self) -> Option<usize> {
        match self {
            Self::StructureInvalid { record, .. } => Some(*record),
            Self::Description(_) => None,
        }
    }
}

pub type GalaxyResult<T> = Result<T, GalaxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_error_message() {
        let err = GalaxyError::StructureInvalid {
            record: 2,
            violation: StructureViolation::NeighbourOutOfRange {
                neighbour: 5,
                count: 3,
            },
        };
        assert_eq!(
            err.to_string(),
            "invalid galaxy structure at system 2: neighbour index 5 is out of range (galaxy has 3 systems)"
        );
        assert_eq!(err.record(), Some(2));
    }

    #[test]
    fn test_description_error_has_no_record() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = GalaxyError::from(json_err);
        assert!(err.record().is_none());
        assert!(err.violation().is_none());
    }
}
