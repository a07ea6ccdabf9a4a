//! Seating engine.
//!
//! # Algorithm
//!
//! 1. Validate inputs (issues are logged, only "no enabled group" aborts).
//! 2. Pin fixed seats, displacing non-fixed occupants. Only people seated
//!    at their pin count as fixed from here on.
//! 3. Seat must-together requirements, one claimed group each.
//! 4. Fill the rest by gender targets, leftovers round-robin.
//! 5. Deduplicate leaders (bounded).
//! 6. Order each group males first, females last, around fixed seats.
//! 7. Repair must-separate sets by same-gender swaps (bounded).
//! 8. Balance boarders by same-gender swaps (bounded).
//! 9. Move fixed people onto their pins via swap chains, restore the seat
//!    order of groups the chains disturbed, verify, and compact.
//!
//! Greedy with bounded repair: it never backtracks, so infeasible or
//! conflicting requirements end as logged violations, not errors.
//!
//! # Complexity
//! Dominated by the optimizer: O(P · S²) for P fixed seats and S seats.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::arrangement::{arrange_all, arrange_group};
use super::balancing::{balance_boarders, balance_leaders, repair_must_separate, Convergence};
use super::placement::{fill_by_gender, place_fixed_positions, place_must_together};
use crate::config::EngineConfig;
use crate::error::AssignError;
use crate::log::{Phase, RunLog};
use crate::models::{
    is_males_first, CapacityTable, ConstraintSet, FixedPositions, Layout, PersonId, Roster,
};
use crate::validation::validate_input;
use crate::verification::{
    honored_pins, optimize_fixed_positions, verify, OptimizeStats, VerificationReport,
};

/// Input container for one assignment run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeatingRequest {
    /// People to seat.
    pub roster: Roster,
    /// Must-together and must-separate requirements.
    pub constraints: ConstraintSet,
    /// Group capacities.
    pub capacities: CapacityTable,
    /// Pinned seats.
    pub fixed: FixedPositions,
}

impl SeatingRequest {
    /// Creates a request with no requirements and no fixed seats.
    pub fn new(roster: Roster, capacities: CapacityTable) -> Self {
        Self {
            roster,
            constraints: ConstraintSet::new(),
            capacities,
            fixed: FixedPositions::new(),
        }
    }

    /// Sets the requirements.
    pub fn with_constraints(mut self, constraints: ConstraintSet) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the fixed seats.
    pub fn with_fixed(mut self, fixed: FixedPositions) -> Self {
        self.fixed = fixed;
        self
    }
}

/// Result of one assignment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatingOutcome {
    /// Final layout, empty seats removed.
    pub layout: Layout,
    /// Every decision of the run, in order.
    pub log: RunLog,
    /// Verification of the layout before compaction.
    pub verification: VerificationReport,
    /// Fixed-seat optimizer counts.
    pub optimize: OptimizeStats,
    /// How leader deduplication ended.
    pub leader_balance: Convergence,
    /// How must-separate repair ended.
    pub separate_repair: Convergence,
    /// How boarder balancing ended.
    pub boarder_balance: Convergence,
}

impl SeatingOutcome {
    /// Occupant ids per group.
    pub fn rows(&self) -> Vec<Vec<PersonId>> {
        self.layout.to_rows()
    }
}

/// Constraint-driven seating engine.
///
/// Stateless between runs; all randomness comes from the caller's RNG.
///
/// # Example
///
/// ```
/// use u_seating::assignment::{SeatingEngine, SeatingRequest};
/// use u_seating::models::{CapacityTable, ConstraintSet, Roster};
///
/// let roster = Roster::anonymous(3, 3);
/// let request = SeatingRequest::new(roster, CapacityTable::uniform(2, 3))
///     .with_constraints(ConstraintSet::new().with_separate(vec![1, 2]));
///
/// let outcome = SeatingEngine::new().assign_seeded(&request, 42).unwrap();
/// assert_eq!(outcome.layout.seated_count(), 6);
/// assert!(outcome.verification.passed());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SeatingEngine {
    config: EngineConfig,
}

impl SeatingEngine {
    /// Creates an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs an assignment with a reproducible `StdRng`.
    pub fn assign_seeded(
        &self,
        request: &SeatingRequest,
        seed: u64,
    ) -> Result<SeatingOutcome, AssignError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.assign(request, &mut rng)
    }

    /// Runs an assignment.
    ///
    /// Fails only when no group is enabled. Every other problem is logged
    /// and the best layout found is returned.
    pub fn assign<R: Rng + ?Sized>(
        &self,
        request: &SeatingRequest,
        rng: &mut R,
    ) -> Result<SeatingOutcome, AssignError> {
        let SeatingRequest {
            roster,
            constraints,
            capacities,
            fixed,
        } = request;

        let span = tracing::info_span!(
            "assign",
            people = roster.len(),
            groups = capacities.enabled_count()
        );
        let _guard = span.enter();

        if capacities.enabled_count() == 0 {
            tracing::error!("no group is enabled");
            return Err(AssignError::NoEnabledGroups);
        }

        let mut log = RunLog::new();
        if let Err(errors) = validate_input(roster, constraints, capacities, fixed) {
            for e in errors {
                log.warn(Phase::Validate, e.message);
            }
        }

        let mut layout = Layout::from_capacities(capacities);
        log.info(
            Phase::Fixed,
            format!(
                "seating {} people ({} M, {} F) into {} group(s), {} seat(s)",
                roster.len(),
                roster.male_count(),
                roster.female_count(),
                layout.group_count(),
                capacities.total_seats()
            ),
        );

        let fixed_people = place_fixed_positions(&mut layout, roster, fixed, &mut log);
        let constrained =
            place_must_together(&mut layout, roster, constraints, &fixed_people, rng, &mut log);
        fill_by_gender(&mut layout, roster, capacities, &constrained, rng, &mut log);

        let leader_balance = balance_leaders(
            &mut layout,
            roster,
            &fixed_people,
            self.config.max_leader_iterations,
            rng,
            &mut log,
        );
        arrange_all(&mut layout, roster, &fixed_people, rng, &mut log);
        let separate_repair = repair_must_separate(
            &mut layout,
            roster,
            constraints,
            &fixed_people,
            self.config.max_separate_passes,
            rng,
            &mut log,
        );
        let boarder_balance = balance_boarders(
            &mut layout,
            roster,
            &fixed_people,
            self.config.max_boarder_iterations,
            &mut log,
        );

        let optimize = optimize_fixed_positions(&mut layout, roster, fixed, &mut log);
        let pinned = honored_pins(&layout, fixed);
        for gi in 0..layout.group_count() {
            let group = &layout.groups()[gi];
            let loose = group
                .occupants()
                .filter(|p| !pinned.contains(p))
                .map(|p| roster.gender(p));
            if !is_males_first(loose) {
                let number = group.number;
                arrange_group(&mut layout, gi, roster, &pinned, rng);
                log.info(
                    Phase::Optimize,
                    format!(
                        "group {number} re-ordered: {}",
                        layout.groups()[gi].gender_pattern(roster)
                    ),
                );
            }
        }

        let verification = verify(&layout, roster, constraints, fixed);
        verification.write_to(&mut log);
        layout.compact();

        tracing::info!(
            seated = layout.seated_count(),
            failures = verification.failures().count(),
            "assignment finished"
        );

        Ok(SeatingOutcome {
            layout,
            log,
            verification,
            optimize,
            leader_balance,
            separate_repair,
            boarder_balance,
        })
    }
}
