//! Applies swap chains to a layout.

use std::collections::HashSet;

use super::{Swap, SwapPathFinder};
use crate::error::MoveError;
use crate::log::{Phase, RunLog};
use crate::models::{Layout, PersonId, Position, Roster};

/// Moves `person` to `target` along the shortest valid swap chain.
///
/// Returns the number of swaps applied (`0` when already there). The
/// layout is left untouched on error.
///
/// # Example
///
/// ```
/// use u_seating::log::RunLog;
/// use u_seating::models::{Layout, Position, Roster};
/// use u_seating::swap::move_person;
///
/// let roster = Roster::anonymous(2, 2);
/// let mut layout = Layout::from_rows(vec![vec![1, 3], vec![2, 4]]);
/// let mut log = RunLog::new();
///
/// let swaps = move_person(&mut layout, &roster, 1, Position::new(1, 1), &mut log).unwrap();
/// assert_eq!(swaps, 2);
/// assert_eq!(layout.find(1), Some(Position::new(1, 1)));
/// ```
pub fn move_person(
    layout: &mut Layout,
    roster: &Roster,
    person: PersonId,
    target: Position,
    log: &mut RunLog,
) -> Result<usize, MoveError> {
    move_person_avoiding(layout, roster, person, target, &HashSet::new(), log)
}

/// [`move_person`] with seats the chain must not enter.
pub(crate) fn move_person_avoiding(
    layout: &mut Layout,
    roster: &Roster,
    person: PersonId,
    target: Position,
    locked: &HashSet<Position>,
    log: &mut RunLog,
) -> Result<usize, MoveError> {
    let start = layout.find(person).ok_or(MoveError::NotSeated(person))?;
    if !layout.contains_position(target) {
        return Err(MoveError::TargetOutOfRange(target));
    }
    if start == target {
        return Ok(0);
    }

    let path = SwapPathFinder::new(layout, roster)
        .with_locked(locked.iter().copied())
        .find(start, target)
        .ok_or(MoveError::Unreachable {
            from: start,
            to: target,
        })?;

    // Work on a copy so a failed re-check leaves the caller's layout intact.
    let mut staged = layout.clone();
    for swap in &path {
        apply_swap(&mut staged, roster, *swap)?;
    }
    *layout = staged;

    log.info(
        Phase::Move,
        format!(
            "moved {} from {} to {} in {} swap(s)",
            roster.label(person),
            layout.describe(start),
            layout.describe(target),
            path.len()
        ),
    );
    Ok(path.len())
}

/// Exchanges the two seats of a swap.
///
/// Cross-group swaps require two occupants of the same gender.
pub fn apply_swap(layout: &mut Layout, roster: &Roster, swap: Swap) -> Result<(), MoveError> {
    for pos in [swap.from, swap.to] {
        if !layout.contains_position(pos) {
            return Err(MoveError::TargetOutOfRange(pos));
        }
    }
    if !swap.is_same_group() {
        let same_gender = match (layout.get(swap.from), layout.get(swap.to)) {
            (Some(a), Some(b)) => roster.gender(a) == roster.gender(b),
            _ => false,
        };
        if !same_gender {
            return Err(MoveError::GenderMismatch {
                a: swap.from,
                b: swap.to,
            });
        }
    }
    layout.swap(swap.from, swap.to);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeatGroup;

    // Males 1..=3, females 4..=6.
    fn roster() -> Roster {
        Roster::anonymous(3, 3)
    }

    #[test]
    fn test_move_already_in_place() {
        let r = roster();
        let mut layout = Layout::from_rows(vec![vec![1, 4]]);
        let mut log = RunLog::new();
        assert_eq!(
            move_person(&mut layout, &r, 4, Position::new(0, 1), &mut log),
            Ok(0)
        );
        assert!(log.is_empty());
    }

    #[test]
    fn test_move_within_group() {
        let r = roster();
        let mut layout = Layout::from_rows(vec![vec![1, 4, 2]]);
        let mut log = RunLog::new();
        let n = move_person(&mut layout, &r, 2, Position::new(0, 0), &mut log).unwrap();
        assert_eq!(n, 1);
        assert_eq!(layout.to_rows(), vec![vec![2, 4, 1]]);
        assert!(log.mentions(Phase::Move, "M2"));
    }

    #[test]
    fn test_move_into_empty_seat_of_other_group() {
        let r = roster();
        let mut layout = Layout::from_groups(vec![
            SeatGroup {
                number: 1,
                seats: vec![Some(1), Some(4)],
            },
            SeatGroup {
                number: 2,
                seats: vec![Some(2), None],
            },
        ]);
        let mut log = RunLog::new();
        let n = move_person(&mut layout, &r, 1, Position::new(1, 1), &mut log).unwrap();
        assert_eq!(n, 2);
        assert_eq!(layout.get(Position::new(1, 1)), Some(1));
        assert!(log.mentions(Phase::Move, "moved M1 from group 1 seat 1 to group 2 seat 2"));
        // Male 2 ends up in group 1; gender counts per group are unchanged.
        assert_eq!(layout.get(Position::new(0, 0)), Some(2));
        assert_eq!(layout.get(Position::new(1, 0)), None);
    }

    #[test]
    fn test_move_errors_leave_layout_unchanged() {
        let r = roster();
        let mut layout = Layout::from_rows(vec![vec![1, 4], vec![5, 6]]);
        let before = layout.clone();
        let mut log = RunLog::new();

        assert_eq!(
            move_person(&mut layout, &r, 3, Position::new(0, 0), &mut log),
            Err(MoveError::NotSeated(3))
        );
        assert_eq!(
            move_person(&mut layout, &r, 1, Position::new(5, 0), &mut log),
            Err(MoveError::TargetOutOfRange(Position::new(5, 0)))
        );
        assert_eq!(
            move_person(&mut layout, &r, 1, Position::new(1, 0), &mut log),
            Err(MoveError::Unreachable {
                from: Position::new(0, 0),
                to: Position::new(1, 0),
            })
        );
        assert_eq!(layout, before);
    }

    #[test]
    fn test_apply_swap_rechecks_gender() {
        let r = roster();
        let mut layout = Layout::from_rows(vec![vec![1], vec![4]]);
        let swap = Swap::new(Position::new(0, 0), Position::new(1, 0));
        assert_eq!(
            apply_swap(&mut layout, &r, swap),
            Err(MoveError::GenderMismatch {
                a: Position::new(0, 0),
                b: Position::new(1, 0),
            })
        );
        assert_eq!(layout.to_rows(), vec![vec![1], vec![4]]);
    }

    #[test]
    fn test_locked_seat_blocks_move() {
        let r = roster();
        let mut layout = Layout::from_rows(vec![vec![1, 4], vec![5, 2]]);
        let mut log = RunLog::new();
        let locked: HashSet<Position> = [Position::new(1, 1)].into_iter().collect();
        let res = move_person_avoiding(&mut layout, &r, 1, Position::new(1, 0), &locked, &mut log);
        assert!(matches!(res, Err(MoveError::Unreachable { .. })));
    }
}
