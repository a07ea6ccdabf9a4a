//! People and the roster.
//!
//! Every person is identified by a 1-based integer id derived from their
//! position in the roster: the male list comes first (`1..=M`), then the
//! female list (`M+1..=M+F`). Gender is therefore a pure function of the id
//! and can never drift out of sync with the name lists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::RosterError;

/// Stable 1-based person identifier.
pub type PersonId = u32;

/// Gender derived from the id range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Single-letter code used in distribution logs.
    pub fn code(self) -> char {
        match self {
            Gender::Male => 'M',
            Gender::Female => 'F',
        }
    }
}

/// The population to seat, with role flags keyed by id.
///
/// # Example
///
/// ```
/// use u_seating::models::{Gender, Roster};
///
/// let roster = Roster::new(vec!["Alan".into(), "Bob".into()], vec!["Cleo".into()])
///     .with_leader(1)
///     .with_boarder(3);
///
/// assert_eq!(roster.gender(2), Gender::Male);
/// assert_eq!(roster.gender(3), Gender::Female);
/// assert_eq!(roster.id_of("Cleo"), Some(3));
/// assert!(roster.is_leader(1));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    male_names: Vec<String>,
    female_names: Vec<String>,
    leaders: BTreeSet<PersonId>,
    boarders: BTreeSet<PersonId>,
}

impl Roster {
    /// Creates a roster from the ordered male and female name lists.
    pub fn new(male_names: Vec<String>, female_names: Vec<String>) -> Self {
        Self {
            male_names,
            female_names,
            leaders: BTreeSet::new(),
            boarders: BTreeSet::new(),
        }
    }

    /// Creates a roster with generated names (`M1..`, `F1..`).
    pub fn anonymous(males: usize, females: usize) -> Self {
        Self::new(
            (1..=males).map(|i| format!("M{i}")).collect(),
            (1..=females).map(|i| format!("F{i}")).collect(),
        )
    }

    /// Marks a person as a group leader.
    pub fn with_leader(mut self, id: PersonId) -> Self {
        self.leaders.insert(id);
        self
    }

    /// Marks several people as group leaders.
    pub fn with_leaders(mut self, ids: impl IntoIterator<Item = PersonId>) -> Self {
        self.leaders.extend(ids);
        self
    }

    /// Marks a person as a boarder.
    pub fn with_boarder(mut self, id: PersonId) -> Self {
        self.boarders.insert(id);
        self
    }

    /// Marks several people as boarders.
    pub fn with_boarders(mut self, ids: impl IntoIterator<Item = PersonId>) -> Self {
        self.boarders.extend(ids);
        self
    }

    /// Marks the person with this name as a leader.
    pub fn mark_leader(&mut self, name: &str) -> Result<PersonId, RosterError> {
        let id = self.require_id(name)?;
        self.leaders.insert(id);
        Ok(id)
    }

    /// Marks the person with this name as a boarder.
    pub fn mark_boarder(&mut self, name: &str) -> Result<PersonId, RosterError> {
        let id = self.require_id(name)?;
        self.boarders.insert(id);
        Ok(id)
    }

    /// Number of male people (`M`).
    pub fn male_count(&self) -> usize {
        self.male_names.len()
    }

    /// Number of female people (`F`).
    pub fn female_count(&self) -> usize {
        self.female_names.len()
    }

    /// Total population.
    pub fn len(&self) -> usize {
        self.male_names.len() + self.female_names.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = PersonId> {
        1..=self.len() as PersonId
    }

    /// Whether `id` belongs to this roster.
    #[inline]
    pub fn contains(&self, id: PersonId) -> bool {
        id >= 1 && (id as usize) <= self.len()
    }

    /// Gender of a person. Ids outside the male range count as female.
    #[inline]
    pub fn gender(&self, id: PersonId) -> Gender {
        if id >= 1 && (id as usize) <= self.male_names.len() {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    /// Name of a person.
    pub fn name(&self, id: PersonId) -> Option<&str> {
        if !self.contains(id) {
            return None;
        }
        let idx = id as usize - 1;
        let m = self.male_names.len();
        if idx < m {
            Some(self.male_names[idx].as_str())
        } else {
            Some(self.female_names[idx - m].as_str())
        }
    }

    /// Name for log output, falling back to `#id`.
    pub fn label(&self, id: PersonId) -> String {
        match self.name(id) {
            Some(name) => name.to_string(),
            None => format!("#{id}"),
        }
    }

    /// Comma-separated labels, e.g. `"Ari, Ben"`.
    pub fn label_list(&self, ids: &[PersonId]) -> String {
        ids.iter()
            .map(|&p| self.label(p))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Id of the first person with this name.
    pub fn id_of(&self, name: &str) -> Option<PersonId> {
        self.male_names
            .iter()
            .chain(self.female_names.iter())
            .position(|n| n == name)
            .map(|i| i as PersonId + 1)
    }

    /// Like [`id_of`](Self::id_of) but returns an error for unknown names.
    pub fn require_id(&self, name: &str) -> Result<PersonId, RosterError> {
        self.id_of(name)
            .ok_or_else(|| RosterError::UnknownName(name.to_string()))
    }

    /// Names that appear more than once.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut dups = BTreeSet::new();
        for name in self.male_names.iter().chain(self.female_names.iter()) {
            if !seen.insert(name.as_str()) {
                dups.insert(name.as_str());
            }
        }
        dups.into_iter().collect()
    }

    /// Whether the person is a leader.
    #[inline]
    pub fn is_leader(&self, id: PersonId) -> bool {
        self.leaders.contains(&id)
    }

    /// Whether the person is a boarder.
    #[inline]
    pub fn is_boarder(&self, id: PersonId) -> bool {
        self.boarders.contains(&id)
    }

    /// Leader ids in ascending order.
    pub fn leaders(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.leaders.iter().copied()
    }

    /// Boarder ids in ascending order.
    pub fn boarders(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.boarders.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Roster {
        Roster::new(
            vec!["Ari".into(), "Ben".into(), "Cai".into()],
            vec!["Dana".into(), "Eve".into()],
        )
    }

    #[test]
    fn test_ids_and_gender() {
        let r = sample();
        assert_eq!(r.len(), 5);
        assert_eq!(r.male_count(), 3);
        assert_eq!(r.female_count(), 2);
        assert_eq!(r.ids().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(r.gender(1), Gender::Male);
        assert_eq!(r.gender(3), Gender::Male);
        assert_eq!(r.gender(4), Gender::Female);
        assert_eq!(r.gender(5), Gender::Female);
        assert!(!r.contains(0));
        assert!(!r.contains(6));
    }

    #[test]
    fn test_names() {
        let r = sample();
        assert_eq!(r.name(1), Some("Ari"));
        assert_eq!(r.name(4), Some("Dana"));
        assert_eq!(r.name(9), None);
        assert_eq!(r.label(9), "#9");
        assert_eq!(r.label_list(&[1, 9, 4]), "Ari, #9, Dana");
        assert_eq!(r.id_of("Eve"), Some(5));
        assert_eq!(r.id_of("Zed"), None);
        assert_eq!(
            r.require_id("Zed"),
            Err(RosterError::UnknownName("Zed".into()))
        );
    }

    #[test]
    fn test_roles_by_id_and_name() {
        let mut r = sample().with_leader(2).with_boarders([4, 5]);
        assert!(r.is_leader(2));
        assert!(!r.is_leader(1));
        assert_eq!(r.mark_leader("Dana"), Ok(4));
        assert!(r.is_leader(4));
        assert!(r.mark_boarder("Nobody").is_err());
        assert_eq!(r.leaders().collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(r.boarders().collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn test_duplicate_names() {
        let r = Roster::new(vec!["Sam".into(), "Lee".into()], vec!["Sam".into()]);
        assert_eq!(r.duplicate_names(), vec!["Sam"]);
        assert!(sample().duplicate_names().is_empty());
    }

    #[test]
    fn test_anonymous() {
        let r = Roster::anonymous(2, 1);
        assert_eq!(r.name(2), Some("M2"));
        assert_eq!(r.name(3), Some("F1"));
    }
}
