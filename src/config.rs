//! Engine configuration.
//!
//! Iteration ceilings for the repair loops. They guarantee termination
//! independent of convergence; hitting one is reported as
//! [`Convergence::GaveUp`](crate::assignment::Convergence::GaveUp).

use serde::{Deserialize, Serialize};

/// Tunables of a [`SeatingEngine`](crate::assignment::SeatingEngine).
///
/// # Example
///
/// ```
/// use u_seating::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "max_boarder_iterations": 10 }"#).unwrap();
/// assert_eq!(config.max_boarder_iterations, 10);
/// assert_eq!(config.max_leader_iterations, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cap on leader conflict-resolution iterations.
    pub max_leader_iterations: usize,
    /// Cap on boarder balancing iterations.
    pub max_boarder_iterations: usize,
    /// Cap on must-separate repair passes.
    pub max_separate_passes: usize,
}

impl EngineConfig {
    pub const DEFAULT_LEADER_ITERATIONS: usize = 50;
    pub const DEFAULT_BOARDER_ITERATIONS: usize = 100;
    pub const DEFAULT_SEPARATE_PASSES: usize = 100;

    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the leader iteration cap.
    pub fn with_max_leader_iterations(mut self, n: usize) -> Self {
        self.max_leader_iterations = n;
        self
    }

    /// Sets the boarder iteration cap.
    pub fn with_max_boarder_iterations(mut self, n: usize) -> Self {
        self.max_boarder_iterations = n;
        self
    }

    /// Sets the must-separate pass cap.
    pub fn with_max_separate_passes(mut self, n: usize) -> Self {
        self.max_separate_passes = n;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_leader_iterations: Self::DEFAULT_LEADER_ITERATIONS,
            max_boarder_iterations: Self::DEFAULT_BOARDER_ITERATIONS,
            max_separate_passes: Self::DEFAULT_SEPARATE_PASSES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.max_leader_iterations, 50);
        assert_eq!(c.max_boarder_iterations, 100);
        assert_eq!(c.max_separate_passes, 100);
    }

    #[test]
    fn test_builder() {
        let c = EngineConfig::new()
            .with_max_leader_iterations(3)
            .with_max_boarder_iterations(4)
            .with_max_separate_passes(5);
        assert_eq!(c.max_leader_iterations, 3);
        assert_eq!(c.max_boarder_iterations, 4);
        assert_eq!(c.max_separate_passes, 5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: EngineConfig = serde_json::from_str(r#"{"max_leader_iterations": 7}"#).unwrap();
        assert_eq!(c.max_leader_iterations, 7);
        assert_eq!(c.max_boarder_iterations, 100);
    }
}
