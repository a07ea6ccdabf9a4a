//! Input validation for seating problems.
//!
//! Checks structural integrity of the roster, requirements, fixed seats
//! and capacity table before assignment. Detects:
//! - Duplicate names
//! - Requirements naming unknown people or fewer than two people
//! - Fixed seats for unknown people, in disabled groups, or past a group's end
//! - Gender targets larger than the group
//! - Fewer seats than people
//!
//! Every issue is collected; nothing short-circuits.

use crate::models::{CapacityTable, ConstraintSet, FixedPositions, Roster};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two people share a name; name lookups resolve to the first.
    DuplicateName,
    /// A requirement or fixed seat references an id outside the roster.
    UnknownPerson,
    /// A requirement has fewer than two members.
    UndersizedRequirement,
    /// A fixed seat points at a disabled or unknown group, or past its seats.
    InvalidFixedPosition,
    /// Gender targets exceed the group's seat count.
    InvalidTarget,
    /// Enabled seats cannot hold the whole roster.
    InsufficientSeats,
    /// Every group is disabled.
    NoEnabledGroups,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a seating problem.
///
/// Checks:
/// 1. No duplicate names
/// 2. Every requirement member is on the roster
/// 3. Every requirement has at least two members
/// 4. Every fixed seat belongs to a roster member, an enabled group, and a
///    seat within that group's total
/// 5. Gender targets fit their group
/// 6. At least one group is enabled
/// 7. Enabled seats cover the roster
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    roster: &Roster,
    constraints: &ConstraintSet,
    capacities: &CapacityTable,
    fixed: &FixedPositions,
) -> ValidationResult {
    let mut errors = Vec::new();

    for name in roster.duplicate_names() {
        errors.push(ValidationError::new(
            ValidationErrorKind::DuplicateName,
            format!("Duplicate name: {name}"),
        ));
    }

    for (index, req) in constraints.requirements().iter().enumerate() {
        let members = req.members();
        if members.len() < 2 {
            errors.push(ValidationError::new(
                ValidationErrorKind::UndersizedRequirement,
                format!(
                    "Requirement {} ({}) has {} member(s)",
                    index + 1,
                    req.kind(),
                    members.len()
                ),
            ));
        }
        for &p in members {
            if !roster.contains(p) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownPerson,
                    format!(
                        "Requirement {} ({}) references unknown person #{p}",
                        index + 1,
                        req.kind()
                    ),
                ));
            }
        }
    }

    for (person, pin) in fixed.iter() {
        if !roster.contains(person) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownPerson,
                format!("Fixed seat for unknown person #{person}"),
            ));
        }
        match capacities.get(pin.group) {
            Some(group) if group.enabled => {
                if pin.seat > group.total {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidFixedPosition,
                        format!(
                            "{}: group {} has only {} seat(s), not {}",
                            roster.label(person),
                            pin.group,
                            group.total,
                            pin.seat
                        ),
                    ));
                }
            }
            Some(_) => errors.push(ValidationError::new(
                ValidationErrorKind::InvalidFixedPosition,
                format!("{}: group {} is disabled", roster.label(person), pin.group),
            )),
            None => errors.push(ValidationError::new(
                ValidationErrorKind::InvalidFixedPosition,
                format!("{}: group {} does not exist", roster.label(person), pin.group),
            )),
        }
    }

    for (i, group) in capacities.groups().iter().enumerate() {
        if !group.enabled {
            continue;
        }
        let wanted = group.males.unwrap_or(0) + group.females.unwrap_or(0);
        if wanted > group.total {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTarget,
                format!(
                    "Group {} targets {wanted} people but has {} seat(s)",
                    i + 1,
                    group.total
                ),
            ));
        }
    }

    if capacities.enabled_count() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoEnabledGroups,
            "No group is enabled",
        ));
    } else if capacities.total_seats() < roster.len() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InsufficientSeats,
            format!(
                "{} seat(s) for {} people",
                capacities.total_seats(),
                roster.len()
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FixedPosition, GroupConfig, Requirement};

    fn sample_roster() -> Roster {
        Roster::new(
            vec!["Ari".into(), "Ben".into()],
            vec!["Cleo".into(), "Dana".into()],
        )
    }

    fn sample_caps() -> CapacityTable {
        CapacityTable::uniform(2, 2)
    }

    #[test]
    fn test_valid_input() {
        let c = ConstraintSet::new()
            .with_together(vec![1, 3])
            .with_separate(vec![2, 4]);
        let f = FixedPositions::new().with(1, 1, 1).unwrap();
        assert!(validate_input(&sample_roster(), &c, &sample_caps(), &f).is_ok());
    }

    #[test]
    fn test_duplicate_name() {
        let r = Roster::new(vec!["Sam".into()], vec!["Sam".into()]);
        let errors = validate_input(&r, &ConstraintSet::new(), &sample_caps(), &FixedPositions::new())
            .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateName));
    }

    #[test]
    fn test_bad_requirements() {
        let mut c = ConstraintSet::new().with_together(vec![1, 9]);
        c.push(Requirement::MustSeparate(vec![2]));
        let errors =
            validate_input(&sample_roster(), &c, &sample_caps(), &FixedPositions::new()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownPerson && e.message.contains("#9")));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UndersizedRequirement));
    }

    #[test]
    fn test_bad_fixed_positions() {
        let caps = CapacityTable::new(vec![GroupConfig::new(2), GroupConfig::disabled()])
            .with_group(GroupConfig::new(4));
        let mut f = FixedPositions::new();
        f.insert(1, FixedPosition::new(1, 3)).unwrap();
        f.insert(2, FixedPosition::new(2, 1)).unwrap();
        f.insert(3, FixedPosition::new(8, 1)).unwrap();
        f.insert(7, FixedPosition::new(3, 1)).unwrap();
        let errors = validate_input(&sample_roster(), &ConstraintSet::new(), &caps, &f).unwrap_err();
        let fixed_errors = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::InvalidFixedPosition)
            .count();
        assert_eq!(fixed_errors, 3);
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownPerson));
    }

    #[test]
    fn test_targets_and_seats() {
        let caps = CapacityTable::new(vec![GroupConfig::new(2).with_targets(2, 1)]);
        let errors = validate_input(
            &sample_roster(),
            &ConstraintSet::new(),
            &caps,
            &FixedPositions::new(),
        )
        .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidTarget));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InsufficientSeats));
    }

    #[test]
    fn test_no_enabled_groups() {
        let caps = CapacityTable::new(vec![GroupConfig::disabled()]);
        let errors = validate_input(
            &sample_roster(),
            &ConstraintSet::new(),
            &caps,
            &FixedPositions::new(),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::NoEnabledGroups);
    }
}
