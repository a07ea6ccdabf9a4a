//! Group capacity configuration.
//!
//! A group is a capacity-bounded set of seats. Groups are numbered from 1
//! in every user-facing message; disabled groups are skipped entirely by
//! the assignment engine.

use serde::{Deserialize, Serialize};

/// Configuration of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Whether the group takes part in assignment.
    pub enabled: bool,
    /// Number of seats.
    pub total: usize,
    /// Target number of males. `None` = unconstrained.
    pub males: Option<usize>,
    /// Target number of females. `None` = unconstrained.
    pub females: Option<usize>,
}

impl GroupConfig {
    /// An enabled group with `total` seats and no gender targets.
    pub fn new(total: usize) -> Self {
        Self {
            enabled: true,
            total,
            males: None,
            females: None,
        }
    }

    /// A disabled group.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            total: 0,
            males: None,
            females: None,
        }
    }

    /// Sets both gender targets.
    pub fn with_targets(mut self, males: usize, females: usize) -> Self {
        self.males = Some(males);
        self.females = Some(females);
        self
    }

    /// Sets the male target.
    pub fn with_males(mut self, males: usize) -> Self {
        self.males = Some(males);
        self
    }

    /// Sets the female target.
    pub fn with_females(mut self, females: usize) -> Self {
        self.females = Some(females);
        self
    }

    /// Enables or disables the group.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Per-group capacities, indexed by group number − 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityTable {
    groups: Vec<GroupConfig>,
}

impl CapacityTable {
    /// Number of configurable groups in the default table.
    pub const DEFAULT_GROUP_SLOTS: usize = 10;
    /// Groups enabled by default.
    pub const DEFAULT_ENABLED: usize = 9;
    /// Seats per group by default.
    pub const DEFAULT_SEATS: usize = 6;

    /// Creates a table from explicit configurations.
    pub fn new(groups: Vec<GroupConfig>) -> Self {
        Self { groups }
    }

    /// `count` enabled groups of `seats` seats each.
    pub fn uniform(count: usize, seats: usize) -> Self {
        Self::new(vec![GroupConfig::new(seats); count])
    }

    /// Appends a group configuration.
    pub fn with_group(mut self, config: GroupConfig) -> Self {
        self.groups.push(config);
        self
    }

    /// Configuration of a 1-based group number.
    pub fn get(&self, number: usize) -> Option<&GroupConfig> {
        number.checked_sub(1).and_then(|i| self.groups.get(i))
    }

    /// Mutable configuration of a 1-based group number.
    pub fn get_mut(&mut self, number: usize) -> Option<&mut GroupConfig> {
        number.checked_sub(1).and_then(move |i| self.groups.get_mut(i))
    }

    /// All configurations, including disabled ones.
    pub fn groups(&self) -> &[GroupConfig] {
        &self.groups
    }

    /// 1-based numbers of the enabled groups, ascending.
    pub fn enabled_numbers(&self) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.enabled)
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Number of enabled groups.
    pub fn enabled_count(&self) -> usize {
        self.groups.iter().filter(|g| g.enabled).count()
    }

    /// Seats across all enabled groups.
    pub fn total_seats(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| g.enabled)
            .map(|g| g.total)
            .sum()
    }
}

impl Default for CapacityTable {
    /// Ten group slots; the first nine enabled with six seats each.
    fn default() -> Self {
        let groups = (0..Self::DEFAULT_GROUP_SLOTS)
            .map(|i| {
                if i < Self::DEFAULT_ENABLED {
                    GroupConfig::new(Self::DEFAULT_SEATS)
                } else {
                    GroupConfig::disabled()
                }
            })
            .collect();
        Self { groups }
    }
}
