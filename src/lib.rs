//! Group seating framework for the U-Engine ecosystem.
//!
//! Seats a roster of people into capacity-limited groups under fixed
//! seats, must-together and must-separate requirements, gender targets,
//! one-leader-per-group and even boarder spread, with males seated ahead
//! of females inside every group.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Roster`, `Gender`, `CapacityTable`,
//!   `ConstraintSet`, `FixedPositions`, `Layout`, `Position`
//! - **`assignment`**: `SeatingEngine` and its phases, `SeatingKpi`
//! - **`swap`**: Shortest gender-preserving swap chains and move execution
//! - **`verification`**: Fixed-seat optimizer and constraint verifier
//! - **`validation`**: Input integrity checks (duplicate names, bad references)
//! - **`config`**: Iteration caps of the repair loops
//! - **`log`**: Run log mirrored to `tracing`
//! - **`error`**: Error types of the public API
//!
//! # Example
//!
//! ```
//! use u_seating::assignment::{SeatingEngine, SeatingRequest};
//! use u_seating::models::{CapacityTable, FixedPositions, Roster};
//!
//! let roster = Roster::anonymous(5, 5).with_leaders([1, 6]);
//! let fixed = FixedPositions::new().with(2, 1, 1).unwrap();
//! let request = SeatingRequest::new(roster, CapacityTable::uniform(2, 5)).with_fixed(fixed);
//!
//! let outcome = SeatingEngine::new().assign_seeded(&request, 7).unwrap();
//! assert_eq!(outcome.layout.seated_count(), 10);
//! assert_eq!(outcome.optimize.failed, 0);
//! ```
//!
//! # References
//!
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.2 (BFS)
//! - Lewis (2015), "A Guide to Graph Colouring", Ch. 7 (seating as partitioning)

pub mod assignment;
pub mod config;
pub mod error;
pub mod log;
pub mod models;
pub mod swap;
pub mod validation;
pub mod verification;

pub use assignment::{SeatingEngine, SeatingOutcome, SeatingRequest};
pub use config::EngineConfig;
pub use error::{AssignError, FixedPositionError, MoveError, RequirementError, RosterError};
