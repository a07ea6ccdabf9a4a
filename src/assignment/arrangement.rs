//! Gender-contiguous seat order within a group.
//!
//! Fixed occupants keep their exact seat. Everyone else is shuffled by
//! gender and refilled into the lowest free indices, males first, so each
//! group reads `M.. F..` unless a pinned seat interrupts the run.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

use crate::log::{Phase, RunLog};
use crate::models::{Gender, Layout, PersonId, Roster};

/// Rebuilds the seat order of one group.
pub(crate) fn arrange_group<R: Rng + ?Sized>(
    layout: &mut Layout,
    gi: usize,
    roster: &Roster,
    fixed_people: &BTreeSet<PersonId>,
    rng: &mut R,
) {
    let group = layout.group_mut(gi);
    let mut rebuilt: Vec<Option<PersonId>> = vec![None; group.seats.len()];
    let mut males = Vec::new();
    let mut females = Vec::new();

    for (si, slot) in group.seats.iter().enumerate() {
        let Some(person) = *slot else { continue };
        if fixed_people.contains(&person) {
            rebuilt[si] = Some(person);
        } else if roster.gender(person) == Gender::Male {
            males.push(person);
        } else {
            females.push(person);
        }
    }
    males.shuffle(rng);
    females.shuffle(rng);

    let mut free = rebuilt
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_none())
        .map(|(i, _)| i)
        .collect::<Vec<_>>()
        .into_iter();
    for person in males.into_iter().chain(females) {
        if let Some(si) = free.next() {
            rebuilt[si] = Some(person);
        }
    }

    group.seats = rebuilt;
}

/// Rearranges every group and logs its gender distribution.
pub(crate) fn arrange_all<R: Rng + ?Sized>(
    layout: &mut Layout,
    roster: &Roster,
    fixed_people: &BTreeSet<PersonId>,
    rng: &mut R,
    log: &mut RunLog,
) {
    for gi in 0..layout.group_count() {
        arrange_group(layout, gi, roster, fixed_people, rng);
        let group = &layout.groups()[gi];
        let pattern = group.gender_pattern(roster);
        log.info(
            Phase::Arrange,
            format!(
                "group {}: {pattern} ({} M, {} F)",
                group.number,
                group.count_gender(roster, Gender::Male),
                group.count_gender(roster, Gender::Female)
            ),
        );
        if !group.is_gender_contiguous(roster) {
            log.warn(
                Phase::Arrange,
                format!("group {}: a fixed seat puts a male after a female", group.number),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, SeatGroup};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // Males 1..=3, females 4..=6.
    fn roster() -> Roster {
        Roster::anonymous(3, 3)
    }

    #[test]
    fn test_males_then_females() {
        let r = roster();
        let mut layout = Layout::from_rows(vec![vec![4, 1, 5, 2, 6, 3]]);
        let mut rng = StdRng::seed_from_u64(42);
        arrange_group(&mut layout, 0, &r, &BTreeSet::new(), &mut rng);
        assert_eq!(layout.groups()[0].gender_pattern(&r), "M M M F F F");
    }

    #[test]
    fn test_empty_seats_move_to_back() {
        let r = roster();
        let mut layout = Layout::from_groups(vec![SeatGroup {
            number: 1,
            seats: vec![None, Some(4), None, Some(1)],
        }]);
        let mut rng = StdRng::seed_from_u64(1);
        arrange_group(&mut layout, 0, &r, &BTreeSet::new(), &mut rng);
        assert_eq!(layout.groups()[0].seats, vec![Some(1), Some(4), None, None]);
    }

    #[test]
    fn test_fixed_keeps_index() {
        let r = roster();
        let mut layout = Layout::from_rows(vec![vec![4, 1, 5, 2]]);
        let mut rng = StdRng::seed_from_u64(3);
        let mut log = RunLog::new();
        arrange_all(&mut layout, &r, &BTreeSet::from([4]), &mut rng, &mut log);

        assert_eq!(layout.get(Position::new(0, 0)), Some(4));
        assert_eq!(layout.groups()[0].gender_pattern(&r), "F M M F");
        assert!(log.mentions(Phase::Arrange, "F M M F"));
        assert!(log.mentions(Phase::Arrange, "male after a female"));
    }
}
