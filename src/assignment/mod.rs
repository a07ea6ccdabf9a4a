//! Constraint-driven seat assignment.
//!
//! Builds a layout from scratch in ordered phases, then hands it to the
//! optimizer and verifier.
//!
//! # Algorithm
//!
//! `SeatingEngine` is a greedy constructor followed by bounded repair
//! loops. It makes no optimality claim: every requirement it cannot meet
//! is reported in the run log and the verification report.
//!
//! # KPI
//!
//! `SeatingKpi` summarises a layout: head counts per group by gender and
//! role, boarder spread, empty seats and unseated people.

mod arrangement;
mod balancing;
mod engine;
mod kpi;
mod placement;

pub use balancing::Convergence;
pub use engine::{SeatingEngine, SeatingOutcome, SeatingRequest};
pub use kpi::{GroupStats, SeatingKpi};
pub use placement::place_fixed_positions;
