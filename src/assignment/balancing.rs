//! Repair loops: leader deduplication, must-separate repair, boarder spread.
//!
//! Every loop is bounded by an [`EngineConfig`](crate::EngineConfig) cap
//! and reports how it ended as a [`Convergence`].
//!
//! Fixed people (those seated at their pin) and seated leaders are immovable for the separate and
//! boarder repairs. All repair swaps trade two people of the same gender
//! in place, so the seat-order gender pattern of every group survives.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::log::{Phase, RunLog};
use crate::models::{ConstraintSet, Layout, PersonId, Position, Roster};

/// How a bounded repair loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Convergence {
    /// Target reached.
    Resolved { iterations: usize },
    /// A full iteration made no progress.
    Stalled { iterations: usize },
    /// The iteration cap was hit.
    GaveUp { iterations: usize },
}

impl Convergence {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Convergence::Resolved { .. })
    }

    pub fn iterations(&self) -> usize {
        match *self {
            Convergence::Resolved { iterations }
            | Convergence::Stalled { iterations }
            | Convergence::GaveUp { iterations } => iterations,
        }
    }
}

fn leader_counts(layout: &Layout, roster: &Roster) -> Vec<usize> {
    layout
        .groups()
        .iter()
        .map(|g| g.count_where(|p| roster.is_leader(p)))
        .collect()
}

/// Seats unseated leaders in leaderless groups, then moves surplus leaders
/// until every group has at most one.
pub(crate) fn balance_leaders<R: Rng + ?Sized>(
    layout: &mut Layout,
    roster: &Roster,
    fixed_people: &BTreeSet<PersonId>,
    max_iterations: usize,
    rng: &mut R,
    log: &mut RunLog,
) -> Convergence {
    let seated: HashSet<PersonId> = layout.person_to_group().into_keys().collect();
    let mut waiting: Vec<PersonId> = roster.leaders().filter(|p| !seated.contains(p)).collect();
    waiting.shuffle(rng);

    let counts = leader_counts(layout, roster);
    for gi in 0..layout.group_count() {
        if waiting.is_empty() {
            break;
        }
        if counts[gi] > 0 {
            continue;
        }
        let number = layout.groups()[gi].number;
        match layout.groups()[gi].first_empty() {
            Some(si) => {
                let leader = waiting.remove(0);
                layout.set(Position::new(gi, si), Some(leader));
                log.info(
                    Phase::Leaders,
                    format!("leader {} -> group {number} seat {}", roster.label(leader), si + 1),
                );
            }
            None => log.warn(
                Phase::Leaders,
                format!("group {number} has no empty seat for a leader"),
            ),
        }
    }
    for &leader in &waiting {
        log.warn(
            Phase::Leaders,
            format!("leader {} could not be seated", roster.label(leader)),
        );
    }

    let mut iterations = 0;
    loop {
        let counts = leader_counts(layout, roster);
        let surplus: Vec<usize> = (0..counts.len()).filter(|&g| counts[g] > 1).collect();
        let leaderless: Vec<usize> = (0..counts.len()).filter(|&g| counts[g] == 0).collect();

        if surplus.is_empty() {
            log.info(
                Phase::Leaders,
                format!("leader conflicts resolved after {iterations} iteration(s)"),
            );
            return Convergence::Resolved { iterations };
        }
        if leaderless.is_empty() {
            // Every group already has a leader; the extras have nowhere to go.
            log.info(
                Phase::Leaders,
                format!(
                    "more leaders than groups: {} group(s) keep extra leaders",
                    surplus.len()
                ),
            );
            return Convergence::Stalled { iterations };
        }
        if iterations >= max_iterations {
            log.warn(
                Phase::Leaders,
                format!("gave up on leader conflicts after {iterations} iteration(s)"),
            );
            return Convergence::GaveUp { iterations };
        }
        iterations += 1;

        let moved = move_surplus_leader(layout, roster, fixed_people, &surplus, &leaderless, log)
            || swap_surplus_leader(layout, roster, fixed_people, &surplus, &leaderless, log);
        if !moved {
            log.warn(
                Phase::Leaders,
                format!("leader conflicts stalled after {iterations} iteration(s)"),
            );
            return Convergence::Stalled { iterations };
        }
    }
}

fn movable_leaders(
    layout: &Layout,
    roster: &Roster,
    fixed_people: &BTreeSet<PersonId>,
    gi: usize,
) -> Vec<(usize, PersonId)> {
    layout.groups()[gi]
        .seats
        .iter()
        .enumerate()
        .filter_map(|(si, s)| s.map(|p| (si, p)))
        .filter(|&(_, p)| roster.is_leader(p) && !fixed_people.contains(&p))
        .collect()
}

fn move_surplus_leader(
    layout: &mut Layout,
    roster: &Roster,
    fixed_people: &BTreeSet<PersonId>,
    surplus: &[usize],
    leaderless: &[usize],
    log: &mut RunLog,
) -> bool {
    for &sg in surplus {
        for (si, leader) in movable_leaders(layout, roster, fixed_people, sg) {
            for &tg in leaderless {
                if let Some(ti) = layout.groups()[tg].first_empty() {
                    layout.set(Position::new(sg, si), None);
                    layout.set(Position::new(tg, ti), Some(leader));
                    log.info(
                        Phase::Leaders,
                        format!(
                            "moved leader {} from group {} to group {}",
                            roster.label(leader),
                            layout.groups()[sg].number,
                            layout.groups()[tg].number
                        ),
                    );
                    return true;
                }
            }
        }
    }
    false
}

fn swap_surplus_leader(
    layout: &mut Layout,
    roster: &Roster,
    fixed_people: &BTreeSet<PersonId>,
    surplus: &[usize],
    leaderless: &[usize],
    log: &mut RunLog,
) -> bool {
    for &sg in surplus {
        for (si, leader) in movable_leaders(layout, roster, fixed_people, sg) {
            let gender = roster.gender(leader);
            for &tg in leaderless {
                let partner = layout.groups()[tg]
                    .seats
                    .iter()
                    .enumerate()
                    .find_map(|(ti, s)| match *s {
                        Some(o)
                            if !roster.is_leader(o)
                                && !fixed_people.contains(&o)
                                && roster.gender(o) == gender =>
                        {
                            Some((ti, o))
                        }
                        _ => None,
                    });
                if let Some((ti, other)) = partner {
                    layout.swap(Position::new(sg, si), Position::new(tg, ti));
                    log.info(
                        Phase::Leaders,
                        format!(
                            "swapped leader {} (group {}) with {} (group {})",
                            roster.label(leader),
                            layout.groups()[sg].number,
                            roster.label(other),
                            layout.groups()[tg].number
                        ),
                    );
                    return true;
                }
            }
        }
    }
    false
}

/// Fixed people and every seated leader.
fn immovable(
    layout: &Layout,
    roster: &Roster,
    fixed_people: &BTreeSet<PersonId>,
) -> HashSet<PersonId> {
    let mut out: HashSet<PersonId> = fixed_people.iter().copied().collect();
    out.extend(
        layout
            .groups()
            .iter()
            .flat_map(|g| g.occupants())
            .filter(|&p| roster.is_leader(p)),
    );
    out
}

/// Members of `members` per group index, in member order.
fn members_by_group(layout: &Layout, members: &[PersonId]) -> BTreeMap<usize, Vec<PersonId>> {
    let group_of = layout.person_to_group();
    let mut out: BTreeMap<usize, Vec<PersonId>> = BTreeMap::new();
    for p in members {
        if let Some(&gi) = group_of.get(p) {
            out.entry(gi).or_default().push(*p);
        }
    }
    out
}

fn has_separate_violation(layout: &Layout, constraints: &ConstraintSet) -> bool {
    constraints
        .must_separate()
        .any(|m| members_by_group(layout, m).values().any(|v| v.len() > 1))
}

/// Swaps must-separate members out of shared groups.
///
/// Repeats full passes until one changes nothing, at most `max_passes`.
pub(crate) fn repair_must_separate<R: Rng + ?Sized>(
    layout: &mut Layout,
    roster: &Roster,
    constraints: &ConstraintSet,
    fixed_people: &BTreeSet<PersonId>,
    max_passes: usize,
    rng: &mut R,
    log: &mut RunLog,
) -> Convergence {
    let immovable = immovable(layout, roster, fixed_people);
    let mut warned: HashSet<PersonId> = HashSet::new();
    let mut passes = 0;

    loop {
        if passes >= max_passes {
            log.warn(
                Phase::Separate,
                format!("gave up on must-separate repair after {passes} pass(es)"),
            );
            return Convergence::GaveUp { iterations: passes };
        }
        passes += 1;

        let mut changed = false;
        for members in constraints.must_separate() {
            while separate_one(layout, roster, members, &immovable, &mut warned, rng, log) {
                changed = true;
            }
        }

        if !changed {
            return if has_separate_violation(layout, constraints) {
                log.warn(
                    Phase::Separate,
                    format!("must-separate repair stalled after {passes} pass(es)"),
                );
                Convergence::Stalled { iterations: passes }
            } else {
                log.info(
                    Phase::Separate,
                    format!("must-separate sets apart after {passes} pass(es)"),
                );
                Convergence::Resolved { iterations: passes }
            };
        }
    }
}

/// Performs the first valid swap for one set. Returns whether it swapped.
fn separate_one<R: Rng + ?Sized>(
    layout: &mut Layout,
    roster: &Roster,
    members: &[PersonId],
    immovable: &HashSet<PersonId>,
    warned: &mut HashSet<PersonId>,
    rng: &mut R,
    log: &mut RunLog,
) -> bool {
    let by_group = members_by_group(layout, members);

    for (&gi, in_group) in &by_group {
        if in_group.len() < 2 {
            continue;
        }
        for &person in &in_group[1..] {
            if immovable.contains(&person) {
                if warned.insert(person) {
                    log.warn(
                        Phase::Separate,
                        format!(
                            "{} is fixed or a leader and cannot leave group {}",
                            roster.label(person),
                            layout.groups()[gi].number
                        ),
                    );
                }
                continue;
            }

            let gender = roster.gender(person);
            let mut candidates: Vec<usize> = (0..layout.group_count())
                .filter(|g| !by_group.contains_key(g))
                .collect();
            candidates.shuffle(rng);

            for cg in candidates {
                let partners: Vec<(usize, PersonId)> = layout.groups()[cg]
                    .seats
                    .iter()
                    .enumerate()
                    .filter_map(|(si, s)| s.map(|o| (si, o)))
                    .filter(|&(_, o)| {
                        roster.gender(o) == gender
                            && !roster.is_leader(o)
                            && !immovable.contains(&o)
                            && !members.contains(&o)
                    })
                    .collect();
                let Some(&(ti, other)) = partners.choose(rng) else {
                    continue;
                };
                let Some(from) = layout.find(person) else {
                    continue;
                };
                layout.swap(from, Position::new(cg, ti));
                log.info(
                    Phase::Separate,
                    format!(
                        "swapped {} (group {}) with {} (group {}) for [{}]",
                        roster.label(person),
                        layout.groups()[gi].number,
                        roster.label(other),
                        layout.groups()[cg].number,
                        roster.label_list(members)
                    ),
                );
                return true;
            }

            if warned.insert(person) {
                log.warn(
                    Phase::Separate,
                    format!("no swap partner found for {}", roster.label(person)),
                );
            }
        }
    }
    false
}

/// Evens out boarders so the max-min spread is at most one.
pub(crate) fn balance_boarders(
    layout: &mut Layout,
    roster: &Roster,
    fixed_people: &BTreeSet<PersonId>,
    max_iterations: usize,
    log: &mut RunLog,
) -> Convergence {
    let immovable = immovable(layout, roster, fixed_people);
    let mut iterations = 0;

    loop {
        let counts: Vec<usize> = layout
            .groups()
            .iter()
            .map(|g| g.count_where(|p| roster.is_boarder(p)))
            .collect();
        let (Some(max), Some(min)) = (counts.iter().max(), counts.iter().min()) else {
            return Convergence::Resolved { iterations };
        };
        if max - min <= 1 {
            log.info(
                Phase::Boarders,
                format!("boarder spread {} after {iterations} iteration(s)", max - min),
            );
            return Convergence::Resolved { iterations };
        }
        if iterations >= max_iterations {
            log.warn(
                Phase::Boarders,
                format!("gave up on boarder balance after {iterations} iteration(s)"),
            );
            return Convergence::GaveUp { iterations };
        }
        iterations += 1;

        // First group holding the extreme count on each side.
        let hi = counts.iter().position(|c| c == max).unwrap_or(0);
        let lo = counts.iter().position(|c| c == min).unwrap_or(0);

        match find_boarder_swap(layout, roster, &immovable, hi, lo) {
            Some((a, b)) => {
                let (pa, pb) = (layout.get(a), layout.get(b));
                layout.swap(a, b);
                if let (Some(pa), Some(pb)) = (pa, pb) {
                    log.info(
                        Phase::Boarders,
                        format!(
                            "swapped boarder {} (group {}) with {} (group {})",
                            roster.label(pa),
                            layout.groups()[hi].number,
                            roster.label(pb),
                            layout.groups()[lo].number
                        ),
                    );
                }
            }
            None => {
                log.warn(
                    Phase::Boarders,
                    format!(
                        "boarder balance stalled at spread {} after {iterations} iteration(s)",
                        max - min
                    ),
                );
                return Convergence::Stalled { iterations };
            }
        }
    }
}

fn find_boarder_swap(
    layout: &Layout,
    roster: &Roster,
    immovable: &HashSet<PersonId>,
    hi: usize,
    lo: usize,
) -> Option<(Position, Position)> {
    let movable = |p: PersonId| !immovable.contains(&p);
    for (si, slot) in layout.groups()[hi].seats.iter().enumerate() {
        let Some(b) = *slot else { continue };
        if !roster.is_boarder(b) || !movable(b) {
            continue;
        }
        for (ti, other) in layout.groups()[lo].seats.iter().enumerate() {
            let Some(o) = *other else { continue };
            if !roster.is_boarder(o) && movable(o) && roster.gender(o) == roster.gender(b) {
                return Some((Position::new(hi, si), Position::new(lo, ti)));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeatGroup;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(17)
    }

    #[test]
    fn test_convergence_accessors() {
        assert!(Convergence::Resolved { iterations: 2 }.is_resolved());
        assert!(!Convergence::GaveUp { iterations: 5 }.is_resolved());
        assert_eq!(Convergence::Stalled { iterations: 3 }.iterations(), 3);
    }

    #[test]
    fn test_unseated_leader_takes_empty_seat() {
        let r = Roster::anonymous(2, 2).with_leaders([1, 2]);
        let mut layout = Layout::from_groups(vec![
            SeatGroup {
                number: 1,
                seats: vec![Some(1), Some(3)],
            },
            SeatGroup {
                number: 2,
                seats: vec![Some(4), None],
            },
        ]);
        let mut log = RunLog::new();
        let out = balance_leaders(&mut layout, &r, &BTreeSet::new(), 50, &mut rng(), &mut log);
        assert_eq!(out, Convergence::Resolved { iterations: 0 });
        assert_eq!(layout.get(Position::new(1, 1)), Some(2));
    }

    #[test]
    fn test_surplus_leader_moves_to_empty_seat() {
        let r = Roster::anonymous(3, 1).with_leaders([1, 2]);
        let mut layout = Layout::from_groups(vec![
            SeatGroup {
                number: 1,
                seats: vec![Some(1), Some(2)],
            },
            SeatGroup {
                number: 2,
                seats: vec![Some(3), None],
            },
        ]);
        let mut log = RunLog::new();
        let out = balance_leaders(&mut layout, &r, &BTreeSet::new(), 50, &mut rng(), &mut log);
        assert_eq!(out, Convergence::Resolved { iterations: 1 });
        assert_eq!(leader_counts(&layout, &r), vec![1, 1]);
        assert!(log.mentions(Phase::Leaders, "moved leader M1"));
    }

    #[test]
    fn test_surplus_leader_swaps_same_gender() {
        // Males 1..=3, females 4..=5; leaders 1 and 2 share group 1.
        let r = Roster::anonymous(3, 2).with_leaders([1, 2]);
        let mut layout = Layout::from_rows(vec![vec![1, 2, 4], vec![3, 5]]);
        let mut log = RunLog::new();
        let out = balance_leaders(&mut layout, &r, &BTreeSet::from([1]), 50, &mut rng(), &mut log);
        assert!(out.is_resolved());
        assert_eq!(layout.to_rows(), vec![vec![1, 3, 4], vec![2, 5]]);
    }

    #[test]
    fn test_leader_stall_and_give_up() {
        // Only females in group 2, male leaders cannot swap in.
        let r = Roster::anonymous(2, 2).with_leaders([1, 2]);
        let mut stalled = Layout::from_rows(vec![vec![1, 2], vec![3, 4]]);
        let mut log = RunLog::new();
        let out = balance_leaders(&mut stalled, &r, &BTreeSet::new(), 50, &mut rng(), &mut log);
        assert_eq!(out, Convergence::Stalled { iterations: 1 });
        assert!(log.mentions(Phase::Leaders, "stalled"));

        let mut capped = Layout::from_groups(vec![
            SeatGroup {
                number: 1,
                seats: vec![Some(1), Some(2)],
            },
            SeatGroup {
                number: 2,
                seats: vec![Some(3), None],
            },
        ]);
        let mut log = RunLog::new();
        let out = balance_leaders(&mut capped, &r, &BTreeSet::new(), 0, &mut rng(), &mut log);
        assert_eq!(out, Convergence::GaveUp { iterations: 0 });
        assert!(log.mentions(Phase::Leaders, "gave up"));
    }

    #[test]
    fn test_more_leaders_than_groups() {
        let r = Roster::anonymous(4, 0).with_leaders([1, 2, 3]);
        let mut layout = Layout::from_rows(vec![vec![1, 2], vec![3, 4]]);
        let mut log = RunLog::new();
        let out = balance_leaders(&mut layout, &r, &BTreeSet::new(), 50, &mut rng(), &mut log);
        assert_eq!(out, Convergence::Stalled { iterations: 0 });
        assert!(log.mentions(Phase::Leaders, "more leaders than groups"));
        assert!(!log.mentions(Phase::Leaders, "stalled"));
        assert_eq!(layout.to_rows(), vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_separate_swaps_with_same_gender_occupant() {
        // Males 1..=4, females 5..=9. {5, 6} share group 2; group 1 holds only
        // males and a female leader, so female 7 in group 3 is the only partner.
        let r = Roster::anonymous(4, 5).with_leader(8);
        let mut layout = Layout::from_rows(vec![vec![1, 2, 8], vec![3, 5, 6], vec![4, 7, 9]]);
        let c = ConstraintSet::new().with_separate(vec![5, 6]);
        let mut log = RunLog::new();
        let out = repair_must_separate(&mut layout, &r, &c, &BTreeSet::from([9]), 100, &mut rng(), &mut log);

        assert!(out.is_resolved());
        assert_eq!(layout.to_rows(), vec![vec![1, 2, 8], vec![3, 5, 7], vec![4, 6, 9]]);
        assert!(!has_separate_violation(&layout, &c));
    }

    #[test]
    fn test_separate_immovable_warned_once() {
        let r = Roster::anonymous(2, 2).with_leaders([1, 2]);
        let mut layout = Layout::from_rows(vec![vec![1, 2], vec![3, 4]]);
        let c = ConstraintSet::new()
            .with_separate(vec![1, 2])
            .with_separate(vec![2, 1]);
        let mut log = RunLog::new();
        let out = repair_must_separate(&mut layout, &r, &c, &BTreeSet::new(), 100, &mut rng(), &mut log);
        assert_eq!(out, Convergence::Stalled { iterations: 1 });
        let warnings = log
            .in_phase(Phase::Separate)
            .filter(|e| e.message.contains("cannot leave"))
            .count();
        assert_eq!(warnings, 2);
    }

    #[test]
    fn test_separate_pass_cap() {
        let r = Roster::anonymous(2, 2);
        let mut layout = Layout::from_rows(vec![vec![1, 2], vec![3, 4]]);
        let c = ConstraintSet::new().with_separate(vec![1, 2]);
        let mut log = RunLog::new();
        let out = repair_must_separate(&mut layout, &r, &c, &BTreeSet::new(), 0, &mut rng(), &mut log);
        assert_eq!(out, Convergence::GaveUp { iterations: 0 });
    }

    #[test]
    fn test_boarders_even_out() {
        // Males 1..=4, females 5..=8; boarders 1 and 2 share group 1.
        let r = Roster::anonymous(4, 4).with_boarders([1, 2, 5]);
        let mut layout = Layout::from_rows(vec![vec![1, 2, 5, 6], vec![3, 4, 7, 8]]);
        let mut log = RunLog::new();
        let out = balance_boarders(&mut layout, &r, &BTreeSet::new(), 100, &mut log);
        assert_eq!(out, Convergence::Resolved { iterations: 1 });
        assert_eq!(layout.to_rows(), vec![vec![3, 2, 5, 6], vec![1, 4, 7, 8]]);
    }

    #[test]
    fn test_boarders_stall_on_immovable() {
        let r = Roster::anonymous(4, 0).with_boarders([1, 2]).with_leaders([1, 2]);
        let mut layout = Layout::from_rows(vec![vec![1, 2], vec![3, 4]]);
        let mut log = RunLog::new();
        let out = balance_boarders(&mut layout, &r, &BTreeSet::new(), 100, &mut log);
        assert_eq!(out, Convergence::Stalled { iterations: 1 });
    }
}
