//! Post-hoc fixed-seat optimizer.
//!
//! # Algorithm
//!
//! 1. Lock every fixed seat whose person already sits there.
//! 2. Visit the remaining entries by ascending group number. Move each
//!    person to their seat along a swap chain that never enters a locked
//!    seat, then lock the seat.
//!
//! Locked seats are never disturbed, and cross-group exchanges keep each
//! group's gender counts, so a failed entry cannot become reachable on a
//! later call. A second call with no intervening mutation therefore moves
//! nobody and reports the same counts.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::error::MoveError;
use crate::log::{Phase, RunLog};
use crate::models::{FixedPosition, FixedPositions, Layout, PersonId, Position, Roster};
use crate::swap::move_person_avoiding;

/// Outcome counts of [`optimize_fixed_positions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeStats {
    /// Entries honored after the call.
    pub succeeded: usize,
    /// Entries that could not be honored.
    pub failed: usize,
}

/// Resolves a 1-based fixed seat to a layout position.
pub(crate) fn resolve_fixed(layout: &Layout, fixed: FixedPosition) -> Option<Position> {
    let group = layout.index_of_number(fixed.group)?;
    let pos = Position::new(group, fixed.seat.checked_sub(1)?);
    layout.contains_position(pos).then_some(pos)
}

/// People currently sitting at their pin.
pub(crate) fn honored_pins(layout: &Layout, fixed: &FixedPositions) -> BTreeSet<PersonId> {
    fixed
        .iter()
        .filter(|&(person, pin)| {
            resolve_fixed(layout, pin).is_some_and(|pos| layout.get(pos) == Some(person))
        })
        .map(|(person, _)| person)
        .collect()
}

/// Moves every fixed person to their pinned seat where a swap chain allows.
pub fn optimize_fixed_positions(
    layout: &mut Layout,
    roster: &Roster,
    fixed: &FixedPositions,
    log: &mut RunLog,
) -> OptimizeStats {
    let mut stats = OptimizeStats::default();
    let mut locked: HashSet<Position> = HashSet::new();
    let mut pending: Vec<(PersonId, FixedPosition, Position)> = Vec::new();

    for (person, pin) in fixed.by_group() {
        let Some(target) = resolve_fixed(layout, pin) else {
            stats.failed += 1;
            log.error(
                Phase::Optimize,
                format!(
                    "{}: group {} seat {} does not exist in the layout",
                    roster.label(person),
                    pin.group,
                    pin.seat
                ),
            );
            continue;
        };
        if layout.get(target) == Some(person) {
            stats.succeeded += 1;
            locked.insert(target);
        } else {
            pending.push((person, pin, target));
        }
    }

    for (person, pin, target) in pending {
        match move_person_avoiding(layout, roster, person, target, &locked, log) {
            Ok(swaps) => {
                stats.succeeded += 1;
                locked.insert(target);
                log.info(
                    Phase::Optimize,
                    format!(
                        "{} placed at group {} seat {} ({swaps} swap(s))",
                        roster.label(person),
                        pin.group,
                        pin.seat
                    ),
                );
            }
            Err(err) => {
                stats.failed += 1;
                let reason = match err {
                    MoveError::NotSeated(_) => "not seated",
                    MoveError::TargetOutOfRange(_) => "seat out of range",
                    MoveError::Unreachable { .. } => "no gender-preserving swap chain",
                    MoveError::GenderMismatch { .. } => "cross-group gender mismatch",
                };
                log.warn(
                    Phase::Optimize,
                    format!(
                        "{} cannot reach group {} seat {}: {reason}",
                        roster.label(person),
                        pin.group,
                        pin.seat
                    ),
                );
            }
        }
    }

    log.info(
        Phase::Optimize,
        format!(
            "fixed seats: {} honored, {} failed",
            stats.succeeded, stats.failed
        ),
    );
    stats
}
