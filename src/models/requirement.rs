//! Placement requirements and fixed seats.
//!
//! Hard constraints a seating must try to satisfy:
//! must-together sets, must-separate sets, and fixed (group, seat) pins.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{PersonId, Roster};
use crate::error::{FixedPositionError, RequirementError};

/// A co-location requirement over a set of people.
///
/// Sets may overlap across requirements; nothing is deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    /// All listed people end up in the same group.
    MustTogether(Vec<PersonId>),
    /// No two listed people end up in the same group.
    MustSeparate(Vec<PersonId>),
}

impl Requirement {
    /// Members of the requirement, in input order.
    pub fn members(&self) -> &[PersonId] {
        match self {
            Self::MustTogether(ids) | Self::MustSeparate(ids) => ids,
        }
    }

    /// Short human-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MustTogether(_) => "must-together",
            Self::MustSeparate(_) => "must-separate",
        }
    }
}

/// Ordered must-together and must-separate requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSet {
    requirements: Vec<Requirement>,
}

impl ConstraintSet {
    /// Creates an empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: adds a must-together requirement.
    pub fn with_together(mut self, ids: Vec<PersonId>) -> Self {
        self.requirements.push(Requirement::MustTogether(ids));
        self
    }

    /// Builder: adds a must-separate requirement.
    pub fn with_separate(mut self, ids: Vec<PersonId>) -> Self {
        self.requirements.push(Requirement::MustSeparate(ids));
        self
    }

    /// Adds a requirement.
    pub fn push(&mut self, requirement: Requirement) {
        self.requirements.push(requirement);
    }

    /// Removes and returns the requirement at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Requirement> {
        if index < self.requirements.len() {
            Some(self.requirements.remove(index))
        } else {
            None
        }
    }

    /// Resolves names against the roster and adds a must-together requirement.
    pub fn add_must_together_by_names<S: AsRef<str>>(
        &mut self,
        roster: &Roster,
        names: &[S],
    ) -> Result<(), RequirementError> {
        let ids = resolve_names(roster, names)?;
        self.requirements.push(Requirement::MustTogether(ids));
        Ok(())
    }

    /// Resolves names against the roster and adds a must-separate requirement.
    pub fn add_must_separate_by_names<S: AsRef<str>>(
        &mut self,
        roster: &Roster,
        names: &[S],
    ) -> Result<(), RequirementError> {
        let ids = resolve_names(roster, names)?;
        self.requirements.push(Requirement::MustSeparate(ids));
        Ok(())
    }

    /// All requirements in insertion order.
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Must-together member lists, in order.
    pub fn must_together(&self) -> impl Iterator<Item = &[PersonId]> {
        self.requirements.iter().filter_map(|r| match r {
            Requirement::MustTogether(ids) => Some(ids.as_slice()),
            Requirement::MustSeparate(_) => None,
        })
    }

    /// Must-separate member lists, in order.
    pub fn must_separate(&self) -> impl Iterator<Item = &[PersonId]> {
        self.requirements.iter().filter_map(|r| match r {
            Requirement::MustSeparate(ids) => Some(ids.as_slice()),
            Requirement::MustTogether(_) => None,
        })
    }

    /// Number of requirements.
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Whether there are no requirements.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}

fn resolve_names<S: AsRef<str>>(
    roster: &Roster,
    names: &[S],
) -> Result<Vec<PersonId>, RequirementError> {
    let mut ids = Vec::with_capacity(names.len());
    let mut unknown = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if name.contains(',') || name.contains(';') {
            return Err(RequirementError::InvalidName(name.to_string()));
        }
        match roster.id_of(name) {
            Some(id) => ids.push(id),
            None => unknown.push(name.to_string()),
        }
    }
    if !unknown.is_empty() {
        return Err(RequirementError::UnknownNames(unknown));
    }
    if ids.len() < 2 {
        return Err(RequirementError::TooFewMembers(ids.len()));
    }
    Ok(ids)
}

/// A pinned seat. Both numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedPosition {
    /// Configured group number.
    pub group: usize,
    /// Seat number within the group.
    pub seat: usize,
}

impl FixedPosition {
    pub fn new(group: usize, seat: usize) -> Self {
        Self { group, seat }
    }
}

/// Fixed seats keyed by person.
///
/// At most one person may be pinned to any (group, seat).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedPositions {
    entries: BTreeMap<PersonId, FixedPosition>,
}

impl FixedPositions {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins `person` to `position`.
    ///
    /// Returns the person's previous pin, if any. Fails if the seat is
    /// already pinned to someone else or a number is zero.
    pub fn insert(
        &mut self,
        person: PersonId,
        position: FixedPosition,
    ) -> Result<Option<FixedPosition>, FixedPositionError> {
        if position.group == 0 || position.seat == 0 {
            return Err(FixedPositionError::ZeroIndex);
        }
        if let Some((&holder, _)) = self
            .entries
            .iter()
            .find(|&(&p, &pos)| p != person && pos == position)
        {
            return Err(FixedPositionError::SeatTaken {
                group: position.group,
                seat: position.seat,
                holder,
            });
        }
        Ok(self.entries.insert(person, position))
    }

    /// Builder variant of [`insert`](Self::insert).
    pub fn with(
        mut self,
        person: PersonId,
        group: usize,
        seat: usize,
    ) -> Result<Self, FixedPositionError> {
        self.insert(person, FixedPosition::new(group, seat))?;
        Ok(self)
    }

    /// Removes a pin.
    pub fn remove(&mut self, person: PersonId) -> Option<FixedPosition> {
        self.entries.remove(&person)
    }

    /// Removes every pin.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Pin of a person.
    pub fn get(&self, person: PersonId) -> Option<FixedPosition> {
        self.entries.get(&person).copied()
    }

    /// Whether a person is pinned.
    pub fn contains(&self, person: PersonId) -> bool {
        self.entries.contains_key(&person)
    }

    /// Entries in ascending person order.
    pub fn iter(&self) -> impl Iterator<Item = (PersonId, FixedPosition)> + '_ {
        self.entries.iter().map(|(&p, &pos)| (p, pos))
    }

    /// Entries sorted by group number; ties keep person order.
    pub fn by_group(&self) -> Vec<(PersonId, FixedPosition)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by_key(|(_, pos)| pos.group);
        entries
    }

    /// Number of pins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no pins.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(
            vec!["Ari".into(), "Ben".into()],
            vec!["Cleo".into(), "Dana".into()],
        )
    }

    #[test]
    fn test_requirement_members() {
        let r = Requirement::MustSeparate(vec![5, 6]);
        assert_eq!(r.members(), &[5, 6]);
        assert_eq!(r.kind(), "must-separate");
    }

    #[test]
    fn test_constraint_set_order() {
        let c = ConstraintSet::new()
            .with_together(vec![1, 2])
            .with_separate(vec![3, 4])
            .with_together(vec![2, 3]);
        assert_eq!(c.len(), 3);
        let together: Vec<_> = c.must_together().collect();
        assert_eq!(together, vec![&[1, 2][..], &[2, 3][..]]);
        assert_eq!(c.must_separate().count(), 1);
    }

    #[test]
    fn test_remove_requirement() {
        let mut c = ConstraintSet::new().with_together(vec![1, 2]);
        assert_eq!(c.remove(3), None);
        assert_eq!(c.remove(0), Some(Requirement::MustTogether(vec![1, 2])));
        assert!(c.is_empty());
    }

    #[test]
    fn test_add_by_names() {
        let r = roster();
        let mut c = ConstraintSet::new();
        c.add_must_together_by_names(&r, &["Ari", " Dana "]).unwrap();
        assert_eq!(c.requirements()[0], Requirement::MustTogether(vec![1, 4]));

        let err = c.add_must_separate_by_names(&r, &["Ari", "Zed", "Yan"]);
        assert_eq!(
            err,
            Err(RequirementError::UnknownNames(vec!["Zed".into(), "Yan".into()]))
        );

        let err = c.add_must_separate_by_names(&r, &["Ben"]);
        assert_eq!(err, Err(RequirementError::TooFewMembers(1)));

        let err = c.add_must_separate_by_names(&r, &["Ben,Cleo"]);
        assert!(matches!(err, Err(RequirementError::InvalidName(_))));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_fixed_insert_and_replace() {
        let mut f = FixedPositions::new();
        assert_eq!(f.insert(1, FixedPosition::new(1, 1)), Ok(None));
        assert_eq!(
            f.insert(1, FixedPosition::new(2, 3)),
            Ok(Some(FixedPosition::new(1, 1)))
        );
        assert_eq!(f.get(1), Some(FixedPosition::new(2, 3)));
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn test_fixed_seat_taken() {
        let mut f = FixedPositions::new().with(1, 1, 1).unwrap();
        let err = f.insert(2, FixedPosition::new(1, 1));
        assert_eq!(
            err,
            Err(FixedPositionError::SeatTaken {
                group: 1,
                seat: 1,
                holder: 1
            })
        );
        assert_eq!(
            f.insert(2, FixedPosition::new(0, 1)),
            Err(FixedPositionError::ZeroIndex)
        );
    }

    #[test]
    fn test_fixed_by_group() {
        let f = FixedPositions::new()
            .with(1, 3, 1)
            .and_then(|f| f.with(2, 1, 2))
            .and_then(|f| f.with(3, 1, 1))
            .unwrap();
        let order: Vec<_> = f.by_group().into_iter().map(|(p, _)| p).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }
}
