//! Seating layout (solution) model.
//!
//! A layout maps every enabled group to an ordered sequence of seat slots.
//! Each slot holds a person or is empty. It is the single mutable artifact
//! of an assignment run.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{CapacityTable, Gender, PersonId, Roster};

/// A seat address inside a layout. Both indices are 0-based.
///
/// `group` indexes the layout's enabled groups, not the configured group
/// number. Displayed as raw indices, `[group:seat]`; use
/// [`Layout::describe`] for the configured numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub group: usize,
    pub seat: usize,
}

impl Position {
    pub fn new(group: usize, seat: usize) -> Self {
        Self { group, seat }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.group, self.seat)
    }
}

/// One group of seats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatGroup {
    /// Configured 1-based group number.
    pub number: usize,
    /// Seat slots in order.
    pub seats: Vec<Option<PersonId>>,
}

impl SeatGroup {
    /// An empty group with `total` seats.
    pub fn empty(number: usize, total: usize) -> Self {
        Self {
            number,
            seats: vec![None; total],
        }
    }

    /// Occupants in seat order, skipping empty seats.
    pub fn occupants(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.seats.iter().flatten().copied()
    }

    /// Number of occupied seats.
    pub fn occupied(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    /// Index of the first empty seat.
    pub fn first_empty(&self) -> Option<usize> {
        self.seats.iter().position(Option::is_none)
    }

    /// Seat index of a person.
    pub fn seat_of(&self, person: PersonId) -> Option<usize> {
        self.seats.iter().position(|s| *s == Some(person))
    }

    /// Whether the group seats this person.
    pub fn contains(&self, person: PersonId) -> bool {
        self.seat_of(person).is_some()
    }

    /// Occupants of a gender.
    pub fn count_gender(&self, roster: &Roster, gender: Gender) -> usize {
        self.occupants()
            .filter(|&p| roster.gender(p) == gender)
            .count()
    }

    /// Occupants matching a predicate.
    pub fn count_where(&self, pred: impl Fn(PersonId) -> bool) -> usize {
        self.occupants().filter(|&p| pred(p)).count()
    }

    /// Gender codes of the occupants in seat order, e.g. `"M M F"`.
    pub fn gender_pattern(&self, roster: &Roster) -> String {
        self.occupants()
            .map(|p| roster.gender(p).code().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether no male sits after a female.
    pub fn is_gender_contiguous(&self, roster: &Roster) -> bool {
        is_males_first(self.occupants().map(|p| roster.gender(p)))
    }
}

/// Whether a gender sequence matches `M*F*`.
pub(crate) fn is_males_first(genders: impl Iterator<Item = Gender>) -> bool {
    let mut seen_female = false;
    for g in genders {
        match g {
            Gender::Female => seen_female = true,
            Gender::Male if seen_female => return false,
            Gender::Male => {}
        }
    }
    true
}

/// A complete seating: enabled groups in configured order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    groups: Vec<SeatGroup>,
}

impl Layout {
    /// An empty layout with one group per enabled capacity entry.
    pub fn from_capacities(capacities: &CapacityTable) -> Self {
        let groups = capacities
            .groups()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.enabled)
            .map(|(i, c)| SeatGroup::empty(i + 1, c.total))
            .collect();
        Self { groups }
    }

    /// Builds a layout from explicit seat groups.
    pub fn from_groups(groups: Vec<SeatGroup>) -> Self {
        Self { groups }
    }

    /// Builds a fully occupied layout from id rows; groups are numbered 1.. in order.
    pub fn from_rows(rows: Vec<Vec<PersonId>>) -> Self {
        let groups = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| SeatGroup {
                number: i + 1,
                seats: row.into_iter().map(Some).collect(),
            })
            .collect();
        Self { groups }
    }

    /// Number of groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Whether the layout has no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All groups.
    pub fn groups(&self) -> &[SeatGroup] {
        &self.groups
    }

    /// A group by layout index.
    pub fn group(&self, index: usize) -> Option<&SeatGroup> {
        self.groups.get(index)
    }

    pub(crate) fn group_mut(&mut self, index: usize) -> &mut SeatGroup {
        &mut self.groups[index]
    }

    /// Layout index of a configured group number.
    pub fn index_of_number(&self, number: usize) -> Option<usize> {
        self.groups.iter().position(|g| g.number == number)
    }

    /// `pos` as `group N seat S`, with the configured group number and a
    /// 1-based seat.
    pub fn describe(&self, pos: Position) -> String {
        match self.groups.get(pos.group) {
            Some(g) => format!("group {} seat {}", g.number, pos.seat + 1),
            None => format!("missing group {pos}"),
        }
    }

    /// Whether `pos` addresses an existing seat.
    pub fn contains_position(&self, pos: Position) -> bool {
        self.groups
            .get(pos.group)
            .is_some_and(|g| pos.seat < g.seats.len())
    }

    /// Occupant of a seat. `None` for empty or missing seats.
    pub fn get(&self, pos: Position) -> Option<PersonId> {
        self.groups
            .get(pos.group)
            .and_then(|g| g.seats.get(pos.seat))
            .copied()
            .flatten()
    }

    /// Writes a seat slot. Panics if `pos` is out of range.
    pub(crate) fn set(&mut self, pos: Position, person: Option<PersonId>) {
        self.groups[pos.group].seats[pos.seat] = person;
    }

    /// Exchanges two seat slots. Panics if either position is out of range.
    pub(crate) fn swap(&mut self, a: Position, b: Position) {
        if a.group == b.group {
            self.groups[a.group].seats.swap(a.seat, b.seat);
        } else {
            let pa = self.groups[a.group].seats[a.seat];
            let pb = self.groups[b.group].seats[b.seat];
            self.groups[a.group].seats[a.seat] = pb;
            self.groups[b.group].seats[b.seat] = pa;
        }
    }

    /// Current seat of a person (linear scan).
    pub fn find(&self, person: PersonId) -> Option<Position> {
        self.groups.iter().enumerate().find_map(|(gi, g)| {
            g.seat_of(person).map(|si| Position::new(gi, si))
        })
    }

    /// First empty seat scanning groups in order.
    pub fn first_empty(&self) -> Option<Position> {
        self.groups
            .iter()
            .enumerate()
            .find_map(|(gi, g)| g.first_empty().map(|si| Position::new(gi, si)))
    }

    /// Group index of every seated person.
    pub fn person_to_group(&self) -> HashMap<PersonId, usize> {
        let mut map = HashMap::new();
        for (gi, g) in self.groups.iter().enumerate() {
            for p in g.occupants() {
                map.insert(p, gi);
            }
        }
        map
    }

    /// Number of seated people.
    pub fn seated_count(&self) -> usize {
        self.groups.iter().map(SeatGroup::occupied).sum()
    }

    /// Removes empty slots from every group.
    pub fn compact(&mut self) {
        for g in &mut self.groups {
            g.seats.retain(Option::is_some);
        }
    }

    /// Occupant ids per group, empty slots dropped.
    pub fn to_rows(&self) -> Vec<Vec<PersonId>> {
        self.groups
            .iter()
            .map(|g| g.occupants().collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupConfig;

    #[test]
    fn test_from_capacities_skips_disabled() {
        let caps = CapacityTable::new(vec![
            GroupConfig::new(2),
            GroupConfig::disabled(),
            GroupConfig::new(3),
        ]);
        let layout = Layout::from_capacities(&caps);
        assert_eq!(layout.group_count(), 2);
        assert_eq!(layout.groups()[1].number, 3);
        assert_eq!(layout.groups()[1].seats.len(), 3);
        assert_eq!(layout.index_of_number(3), Some(1));
        assert_eq!(layout.index_of_number(2), None);
    }

    #[test]
    fn test_find_and_swap() {
        let mut layout = Layout::from_rows(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(layout.find(4), Some(Position::new(1, 1)));
        layout.swap(Position::new(0, 0), Position::new(1, 1));
        assert_eq!(layout.to_rows(), vec![vec![4, 2], vec![3, 1]]);
        layout.swap(Position::new(0, 0), Position::new(0, 1));
        assert_eq!(layout.to_rows()[0], vec![2, 4]);
        assert_eq!(layout.find(9), None);
    }

    #[test]
    fn test_first_empty() {
        let mut layout = Layout::from_groups(vec![
            SeatGroup {
                number: 1,
                seats: vec![Some(1), Some(2)],
            },
            SeatGroup {
                number: 2,
                seats: vec![Some(3), None, None],
            },
        ]);
        assert_eq!(layout.first_empty(), Some(Position::new(1, 1)));
        layout.set(Position::new(1, 1), Some(4));
        layout.set(Position::new(1, 2), Some(5));
        assert_eq!(layout.first_empty(), None);
        assert_eq!(layout.seated_count(), 5);
    }

    #[test]
    fn test_compact() {
        let mut layout = Layout::from_groups(vec![SeatGroup {
            number: 1,
            seats: vec![None, Some(2), None, Some(1)],
        }]);
        layout.compact();
        assert_eq!(layout.groups()[0].seats, vec![Some(2), Some(1)]);
    }

    #[test]
    fn test_gender_pattern() {
        let roster = Roster::anonymous(2, 2);
        let ok = Layout::from_rows(vec![vec![2, 1, 4, 3]]);
        assert!(ok.groups()[0].is_gender_contiguous(&roster));
        assert_eq!(ok.groups()[0].gender_pattern(&roster), "M M F F");

        let bad = Layout::from_rows(vec![vec![3, 1]]);
        assert!(!bad.groups()[0].is_gender_contiguous(&roster));
        assert_eq!(bad.groups()[0].count_gender(&roster, Gender::Female), 1);
    }

    #[test]
    fn test_person_to_group() {
        let layout = Layout::from_rows(vec![vec![1, 3], vec![2]]);
        let map = layout.person_to_group();
        assert_eq!(map[&3], 0);
        assert_eq!(map[&2], 1);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(0, 2).to_string(), "[0:2]");
    }

    #[test]
    fn test_describe_uses_group_number() {
        let caps = CapacityTable::new(vec![
            GroupConfig::new(2),
            GroupConfig::disabled(),
            GroupConfig::new(2),
        ]);
        let layout = Layout::from_capacities(&caps);
        assert_eq!(layout.describe(Position::new(1, 1)), "group 3 seat 2");
        assert_eq!(layout.describe(Position::new(0, 0)), "group 1 seat 1");
        assert_eq!(layout.describe(Position::new(4, 0)), "missing group [4:0]");
    }
}
