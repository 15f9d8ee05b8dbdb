//! Structural validation and system construction.
//!
//! Checks run in a fixed order over the whole description: neighbour indices
//! in range, then symmetry, then self-references. The first violation found
//! aborts the load; nothing is built from a description that fails.

use cgmath::Vector3;

use super::system::{System, SystemId};
use crate::description::{Color, GalaxyDescription, SystemRecord};
use crate::error::{GalaxyError, GalaxyResult, StructureViolation};

fn invalid(record: usize, violation: StructureViolation) -> GalaxyError {
    GalaxyError::StructureInvalid { record, violation }
}

/// Check the graph invariants of a description without building anything.
pub fn validate(description: &GalaxyDescription) -> GalaxyResult<()> {
    let records = &description.systems;
    let count = records.len();

    for (i, record) in records.iter().enumerate() {
        if let Some(&neighbour) = record.neighbours.iter().find(|&&n| n as usize >= count) {
            return Err(invalid(
                i,
                StructureViolation::NeighbourOutOfRange { neighbour, count },
            ));
        }
    }

    for (i, record) in records.iter().enumerate() {
        for &neighbour in &record.neighbours {
            if neighbour as usize == i {
                continue;
            }
            if !lists(&records[neighbour as usize], i) {
                return Err(invalid(
                    i,
                    StructureViolation::AsymmetricNeighbour { neighbour },
                ));
            }
        }
    }

    for (i, record) in records.iter().enumerate() {
        if lists(record, i) {
            return Err(invalid(i, StructureViolation::SelfNeighbour));
        }
    }

    Ok(())
}

fn lists(record: &SystemRecord, index: usize) -> bool {
    record.neighbours.iter().any(|&n| n as usize == index)
}

/// Validate a description and materialize its systems.
pub(crate) fn build_systems(description: &GalaxyDescription) -> GalaxyResult<Vec<System>> {
    validate(description)?;

    let systems = description
        .systems
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let mut neighbours: Vec<SystemId> = Vec::with_capacity(record.neighbours.len());
            for &n in &record.neighbours {
                let id = SystemId(n);
                if !neighbours.contains(&id) {
                    neighbours.push(id);
                }
            }
            if neighbours.len() != record.neighbours.len() {
                log::debug!(
                    "system {i} ({}) lists {} duplicate neighbour(s)",
                    record.name,
                    record.neighbours.len() - neighbours.len()
                );
            }

            System::new(
                SystemId(i as u32),
                record.name.clone(),
                Vector3::from(record.position),
                record.color.unwrap_or(Color::WHITE),
                record.constrained,
                neighbours,
            )
        })
        .collect();

    Ok(systems)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(neighbours: &[&[u32]]) -> GalaxyDescription {
        GalaxyDescription::new(
            neighbours
                .iter()
                .enumerate()
                .map(|(i, n)| {
                    SystemRecord::new(format!("S{i}"), [i as f32, 0.0, 0.0])
                        .with_neighbours(n.iter().copied())
                })
                .collect(),
        )
    }

    #[test]
    fn test_valid_chain() {
        assert!(validate(&desc(&[&[1], &[0, 2], &[1]])).is_ok());
    }

    #[test]
    fn test_empty_is_valid() {
        assert!(validate(&desc(&[])).is_ok());
        assert!(build_systems(&desc(&[])).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range() {
        let err = validate(&desc(&[&[1], &[0, 5], &[]])).unwrap_err();
        assert_eq!(err.record(), Some(1));
        assert_eq!(
            err.violation(),
            Some(StructureViolation::NeighbourOutOfRange {
                neighbour: 5,
                count: 3
            })
        );
    }

    #[test]
    fn test_asymmetric() {
        let err = validate(&desc(&[&[1], &[], &[]])).unwrap_err();
        assert_eq!(err.record(), Some(0));
        assert_eq!(
            err.violation(),
            Some(StructureViolation::AsymmetricNeighbour { neighbour: 1 })
        );
    }

    #[test]
    fn test_self_reference() {
        let err = validate(&desc(&[&[], &[1]])).unwrap_err();
        assert_eq!(err.record(), Some(1));
        assert_eq!(err.violation(), Some(StructureViolation::SelfNeighbour));
    }

    #[test]
    fn test_range_checked_before_symmetry() {
        // Record 0 is asymmetric, record 2 is out of range; range wins.
        let err = validate(&desc(&[&[1], &[], &[9]])).unwrap_err();
        assert_eq!(err.record(), Some(2));
        assert!(matches!(
            err.violation(),
            Some(StructureViolation::NeighbourOutOfRange { neighbour: 9, .. })
        ));
    }

    #[test]
    fn test_build_collapses_duplicates() {
        let systems = build_systems(&desc(&[&[1, 1, 2], &[0], &[0]])).unwrap();
        assert_eq!(systems[0].neighbours(), &[SystemId(1), SystemId(2)]);
    }

    #[test]
    fn test_build_initial_state() {
        let description = GalaxyDescription::new(vec![
            SystemRecord::new("A", [1.0, 2.0, 3.0])
                .with_neighbours([1])
                .constrained(true),
            SystemRecord::new("B", [4.0, 5.0, 6.0])
                .with_neighbours([0])
                .with_color(Color::new(0.5, 0.5, 0.0, 1.0)),
        ]);
        let systems = build_systems(&description).unwrap();

        assert_eq!(systems[0].id(), SystemId(0));
        assert_eq!(systems[0].position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(systems[0].original_position(), Vector3::new(1.0, 2.0, 3.0));
        assert!(systems[0].is_constrained());
        assert_eq!(systems[0].color(), Color::WHITE);
        assert_eq!(systems[1].color(), Color::new(0.5, 0.5, 0.0, 1.0));
        assert!(systems[1].has_neighbour(SystemId(0)));
    }
}
