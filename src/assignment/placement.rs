//! Placement phases: fixed seats, must-together groups, gender-balanced fill.
//!
//! # Algorithm
//!
//! 1. **Fixed seats** by ascending group number. A non-fixed occupant of a
//!    pinned seat is displaced to the first empty seat of the same group,
//!    otherwise the first empty seat of the layout. Only people actually
//!    seated at their pin count as fixed for the later phases; a pin that
//!    was skipped leaves its person free.
//! 2. **Must-together**: each requirement claims one group drawn from a
//!    shuffled deck. Claimed groups are "constrained" and skipped by the
//!    gender quotas.
//! 3. **Gender fill**: shuffled free females fill each unconstrained
//!    group's female target, then males fill male targets. Leftovers are
//!    dealt round-robin, one per group per sweep, females first.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::log::{Phase, RunLog};
use crate::models::{
    CapacityTable, ConstraintSet, FixedPositions, Gender, Layout, PersonId, Position, Roster,
};
use crate::verification::resolve_fixed;

/// Pins every fixed person onto `layout`.
///
/// Works on a fresh or an existing layout: a person already seated
/// elsewhere is lifted from their old seat first. Returns the people
/// sitting at their pin afterwards.
///
/// # Example
///
/// ```
/// use u_seating::assignment::place_fixed_positions;
/// use u_seating::log::RunLog;
/// use u_seating::models::{FixedPositions, Layout, Position, Roster};
///
/// let roster = Roster::anonymous(2, 2);
/// let mut layout = Layout::from_rows(vec![vec![2, 3], vec![1, 4]]);
/// let fixed = FixedPositions::new().with(1, 1, 1).unwrap();
/// let mut log = RunLog::new();
///
/// // Group 1 is full, so person 2 moves into the seat person 1 vacated.
/// let placed = place_fixed_positions(&mut layout, &roster, &fixed, &mut log);
/// assert!(placed.contains(&1));
/// assert_eq!(layout.get(Position::new(0, 0)), Some(1));
/// assert_eq!(layout.get(Position::new(1, 0)), Some(2));
/// ```
pub fn place_fixed_positions(
    layout: &mut Layout,
    roster: &Roster,
    fixed: &FixedPositions,
    log: &mut RunLog,
) -> BTreeSet<PersonId> {
    let mut placed = BTreeSet::new();

    for (person, pin) in fixed.by_group() {
        let name = roster.label(person);
        if !roster.contains(person) {
            log.error(
                Phase::Fixed,
                format!("{name} is not on the roster; fixed seat skipped"),
            );
            continue;
        }
        if layout.index_of_number(pin.group).is_none() {
            log.error(
                Phase::Fixed,
                format!("{name}: group {} is not enabled", pin.group),
            );
            continue;
        }
        let Some(target) = resolve_fixed(layout, pin) else {
            log.error(
                Phase::Fixed,
                format!("{name}: group {} has no seat {}", pin.group, pin.seat),
            );
            continue;
        };

        let previous = layout.find(person);
        if previous == Some(target) {
            placed.insert(person);
            continue;
        }

        if let Some(occupant) = layout.get(target) {
            if fixed.contains(occupant) {
                log.error(
                    Phase::Fixed,
                    format!(
                        "{name}: {} is held by fixed {}",
                        layout.describe(target),
                        roster.label(occupant)
                    ),
                );
                continue;
            }
            if let Some(prev) = previous {
                layout.set(prev, None);
            }
            let dest = layout
                .group(target.group)
                .and_then(|g| g.first_empty())
                .map(|si| Position::new(target.group, si))
                .or_else(|| layout.first_empty());
            let Some(dest) = dest else {
                if let Some(prev) = previous {
                    layout.set(prev, Some(person));
                }
                log.error(
                    Phase::Fixed,
                    format!(
                        "{name}: nowhere to move {} out of {}",
                        roster.label(occupant),
                        layout.describe(target)
                    ),
                );
                continue;
            };
            layout.set(dest, Some(occupant));
            log.warn(
                Phase::Fixed,
                format!(
                    "displaced {} from {} to {}",
                    roster.label(occupant),
                    layout.describe(target),
                    layout.describe(dest)
                ),
            );
        } else if let Some(prev) = previous {
            layout.set(prev, None);
        }

        layout.set(target, Some(person));
        placed.insert(person);
        log.info(
            Phase::Fixed,
            format!("{name} fixed at {}", layout.describe(target)),
        );
    }

    placed
}

/// Seats every must-together requirement into its own group.
///
/// Members in `fixed_people` keep their pinned seat. Returns the layout
/// indices of the claimed groups.
pub(crate) fn place_must_together<R: Rng + ?Sized>(
    layout: &mut Layout,
    roster: &Roster,
    constraints: &ConstraintSet,
    fixed_people: &BTreeSet<PersonId>,
    rng: &mut R,
    log: &mut RunLog,
) -> BTreeSet<usize> {
    let mut deck: Vec<usize> = (0..layout.group_count()).collect();
    deck.shuffle(rng);
    let mut deck: VecDeque<usize> = deck.into();
    let mut constrained = BTreeSet::new();

    for members in constraints.must_together() {
        let names = roster.label_list(members);
        let Some(gi) = deck.pop_front() else {
            log.warn(
                Phase::Together,
                format!("no free group left for [{names}]; requirement dropped"),
            );
            continue;
        };
        constrained.insert(gi);
        let number = layout.groups()[gi].number;

        for &person in members {
            if !roster.contains(person) {
                log.error(Phase::Together, format!("#{person} is not on the roster"));
                continue;
            }
            if fixed_people.contains(&person) || layout.find(person).is_some() {
                continue;
            }
            match layout.groups()[gi].first_empty() {
                Some(si) => {
                    layout.set(Position::new(gi, si), Some(person));
                    log.info(
                        Phase::Together,
                        format!("{} -> group {number} seat {}", roster.label(person), si + 1),
                    );
                }
                None => {
                    log.warn(
                        Phase::Together,
                        format!("group {number} is full; rest of [{names}] left for later"),
                    );
                    break;
                }
            }
        }
    }

    constrained
}

/// Seats everyone still free, honoring per-group gender targets.
///
/// Returns the people that found no seat.
pub(crate) fn fill_by_gender<R: Rng + ?Sized>(
    layout: &mut Layout,
    roster: &Roster,
    capacities: &CapacityTable,
    constrained: &BTreeSet<usize>,
    rng: &mut R,
    log: &mut RunLog,
) -> Vec<PersonId> {
    let seated: HashSet<PersonId> = layout.person_to_group().into_keys().collect();
    let (mut males, mut females): (Vec<PersonId>, Vec<PersonId>) = roster
        .ids()
        .filter(|p| !seated.contains(p))
        .partition(|&p| roster.gender(p) == Gender::Male);
    males.shuffle(rng);
    females.shuffle(rng);
    let mut males: VecDeque<PersonId> = males.into();
    let mut females: VecDeque<PersonId> = females.into();

    for gender in [Gender::Female, Gender::Male] {
        let queue = match gender {
            Gender::Female => &mut females,
            Gender::Male => &mut males,
        };
        for gi in 0..layout.group_count() {
            if constrained.contains(&gi) {
                continue;
            }
            let number = layout.groups()[gi].number;
            let target = capacities.get(number).and_then(|c| match gender {
                Gender::Female => c.females,
                Gender::Male => c.males,
            });
            let Some(target) = target else { continue };
            let current = layout.groups()[gi].count_gender(roster, gender);
            let mut need = target.saturating_sub(current);
            while need > 0 {
                let Some(si) = layout.groups()[gi].first_empty() else { break };
                let Some(person) = queue.pop_front() else { break };
                layout.set(Position::new(gi, si), Some(person));
                need -= 1;
            }
            if need > 0 {
                log.warn(
                    Phase::Fill,
                    format!(
                        "group {number}: {need} {} seat(s) of the target left unfilled",
                        gender.code()
                    ),
                );
            }
        }
    }

    let mut unseated = Vec::new();
    for queue in [&mut females, &mut males] {
        deal_round_robin(layout, queue);
        unseated.extend(queue.drain(..));
    }

    for group in layout.groups() {
        log.info(
            Phase::Fill,
            format!(
                "group {}: {} M, {} F",
                group.number,
                group.count_gender(roster, Gender::Male),
                group.count_gender(roster, Gender::Female)
            ),
        );
    }
    for &person in &unseated {
        log.error(
            Phase::Fill,
            format!("no seat left for {}", roster.label(person)),
        );
    }
    unseated
}

/// One person per group per sweep into each group's first empty seat.
fn deal_round_robin(layout: &mut Layout, queue: &mut VecDeque<PersonId>) {
    while !queue.is_empty() {
        let mut progressed = false;
        for gi in 0..layout.group_count() {
            let Some(si) = layout.groups()[gi].first_empty() else { continue };
            let Some(person) = queue.pop_front() else { break };
            layout.set(Position::new(gi, si), Some(person));
            progressed = true;
        }
        if !progressed {
            break;
        }
    }
}
