//! Error types for the library boundary.
//!
//! Only misuse of the API surfaces as an `Err`. Placement conflicts and
//! constraint violations found while seating are recorded in the
//! [`RunLog`](crate::log::RunLog) instead.

use std::fmt;

use crate::models::{PersonId, Position};

/// Roster lookup failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// No person carries this name.
    UnknownName(String),
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownName(name) => write!(f, "name '{name}' is not on the roster"),
        }
    }
}

impl std::error::Error for RosterError {}

/// Failures while building a must-together / must-separate requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementError {
    /// One or more names did not resolve.
    UnknownNames(Vec<String>),
    /// A name contains a list separator.
    InvalidName(String),
    /// Fewer than two members.
    TooFewMembers(usize),
}

impl fmt::Display for RequirementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNames(names) => write!(f, "unknown names: {}", names.join(", ")),
            Self::InvalidName(name) => {
                write!(f, "name '{name}' must not contain ',' or ';'")
            }
            Self::TooFewMembers(n) => {
                write!(f, "a requirement needs at least two people, got {n}")
            }
        }
    }
}

impl std::error::Error for RequirementError {}

/// Failures while registering a fixed seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixedPositionError {
    /// Group and seat numbers are 1-based.
    ZeroIndex,
    /// The seat is already pinned to someone else.
    SeatTaken {
        group: usize,
        seat: usize,
        holder: PersonId,
    },
}

impl fmt::Display for FixedPositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroIndex => write!(f, "group and seat numbers start at 1"),
            Self::SeatTaken {
                group,
                seat,
                holder,
            } => write!(f, "group {group} seat {seat} is already pinned to #{holder}"),
        }
    }
}

impl std::error::Error for FixedPositionError {}

/// Failures of the move executor.
///
/// Positions are layout indices, displayed as `[group:seat]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The person does not occupy any seat.
    NotSeated(PersonId),
    /// The target does not exist in the layout.
    TargetOutOfRange(Position),
    /// No gender-valid swap chain reaches the target.
    Unreachable { from: Position, to: Position },
    /// A cross-group swap would exchange people of different gender.
    GenderMismatch { a: Position, b: Position },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSeated(id) => write!(f, "person #{id} is not seated"),
            Self::TargetOutOfRange(pos) => write!(f, "{pos} does not exist"),
            Self::Unreachable { from, to } => {
                write!(f, "no swap path from {from} to {to}")
            }
            Self::GenderMismatch { a, b } => {
                write!(f, "cross-group swap {a} <-> {b} needs people of the same gender")
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// Fatal configuration errors of an assignment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    /// Every group is disabled.
    NoEnabledGroups,
}

impl fmt::Display for AssignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEnabledGroups => write!(f, "no group is enabled"),
        }
    }
}

impl std::error::Error for AssignError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            RosterError::UnknownName("Kim".into()).to_string(),
            "name 'Kim' is not on the roster"
        );
        assert_eq!(
            RequirementError::TooFewMembers(1).to_string(),
            "a requirement needs at least two people, got 1"
        );
        let err = MoveError::Unreachable {
            from: Position::new(0, 1),
            to: Position::new(2, 0),
        };
        assert_eq!(err.to_string(), "no swap path from [0:1] to [2:0]");
        assert_eq!(AssignError::NoEnabledGroups.to_string(), "no group is enabled");
    }

    #[test]
    fn test_errors_are_std_errors() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&FixedPositionError::ZeroIndex);
        takes_error(&MoveError::NotSeated(3));
    }
}
