//! Personnel summary of a seating.
//!
//! Per-group head counts by gender and role, plus the totals and balance
//! indicators the verifier reasons about.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Group size | Occupied seats in the group |
//! | Males / Females | Occupants by gender |
//! | Leaders / Boarders | Occupants holding the role |
//! | Boarder spread | max − min boarders over groups |
//! | Empty seats | Unoccupied slots across the layout |
//! | Unseated | Roster members without a seat |

use serde::{Deserialize, Serialize};

use crate::models::{Gender, Layout, Roster};

/// Head counts of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStats {
    /// Configured 1-based group number.
    pub number: usize,
    pub size: usize,
    pub males: usize,
    pub females: usize,
    pub leaders: usize,
    pub boarders: usize,
}

/// Seating summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingKpi {
    pub groups: Vec<GroupStats>,
    pub total_seated: usize,
    pub total_males: usize,
    pub total_females: usize,
    pub total_leaders: usize,
    pub total_boarders: usize,
    /// max − min boarders per group.
    pub boarder_spread: usize,
    pub empty_seats: usize,
    pub unseated: usize,
}

impl SeatingKpi {
    /// Computes the summary of a layout.
    ///
    /// # Example
    ///
    /// ```
    /// use u_seating::assignment::SeatingKpi;
    /// use u_seating::models::{Layout, Roster};
    ///
    /// let roster = Roster::anonymous(2, 2).with_leader(1).with_boarders([3, 4]);
    /// let layout = Layout::from_rows(vec![vec![1, 3, 4], vec![2]]);
    ///
    /// let kpi = SeatingKpi::calculate(&layout, &roster);
    /// assert_eq!(kpi.groups[0].females, 2);
    /// assert_eq!(kpi.boarder_spread, 2);
    /// assert_eq!(kpi.unseated, 0);
    /// ```
    pub fn calculate(layout: &Layout, roster: &Roster) -> Self {
        let groups: Vec<GroupStats> = layout
            .groups()
            .iter()
            .map(|g| GroupStats {
                number: g.number,
                size: g.occupied(),
                males: g.count_gender(roster, Gender::Male),
                females: g.count_gender(roster, Gender::Female),
                leaders: g.count_where(|p| roster.is_leader(p)),
                boarders: g.count_where(|p| roster.is_boarder(p)),
            })
            .collect();

        let sum = |f: fn(&GroupStats) -> usize| groups.iter().map(f).sum::<usize>();
        let total_seated = sum(|g| g.size);
        let max_b = groups.iter().map(|g| g.boarders).max().unwrap_or(0);
        let min_b = groups.iter().map(|g| g.boarders).min().unwrap_or(0);
        let total_slots: usize = layout.groups().iter().map(|g| g.seats.len()).sum();

        let total_males = sum(|g| g.males);
        let total_females = sum(|g| g.females);
        let total_leaders = sum(|g| g.leaders);
        let total_boarders = sum(|g| g.boarders);

        Self {
            total_seated,
            total_males,
            total_females,
            total_leaders,
            total_boarders,
            boarder_spread: max_b - min_b,
            empty_seats: total_slots - total_seated,
            unseated: roster.len().saturating_sub(total_seated),
            groups,
        }
    }

    /// Whether every group has exactly one leader.
    pub fn leaders_balanced(&self) -> bool {
        self.groups.iter().all(|g| g.leaders == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeatGroup;

    #[test]
    fn test_kpi_counts() {
        let roster = Roster::anonymous(3, 3).with_leaders([1, 2]).with_boarder(6);
        let layout = Layout::from_groups(vec![
            SeatGroup {
                number: 1,
                seats: vec![Some(1), Some(4), None],
            },
            SeatGroup {
                number: 3,
                seats: vec![Some(2), Some(3), Some(5), Some(6)],
            },
        ]);
        let kpi = SeatingKpi::calculate(&layout, &roster);

        assert_eq!(kpi.groups[1].number, 3);
        assert_eq!(kpi.groups[1].males, 2);
        assert_eq!(kpi.groups[1].boarders, 1);
        assert_eq!(kpi.total_seated, 6);
        assert_eq!(kpi.total_leaders, 2);
        assert_eq!(kpi.boarder_spread, 1);
        assert_eq!(kpi.empty_seats, 1);
        assert_eq!(kpi.unseated, 0);
        assert!(kpi.leaders_balanced());
    }

    #[test]
    fn test_kpi_empty_layout() {
        let kpi = SeatingKpi::calculate(&Layout::default(), &Roster::anonymous(1, 1));
        assert_eq!(kpi.boarder_spread, 0);
        assert_eq!(kpi.unseated, 2);
        assert!(kpi.groups.is_empty());
    }
}
