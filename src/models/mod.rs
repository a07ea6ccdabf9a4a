//! Seating domain models.
//!
//! Provides the core data types for describing a seating problem and its
//! solution: who is being seated, where they may sit, which placements are
//! required, and the resulting layout.
//!
//! # Domain Mappings
//!
//! | u-seating | Classroom | Workshop | Event |
//! |-----------|-----------|----------|-------|
//! | Roster | Class list | Participants | Guests |
//! | Group | Table group | Breakout team | Table |
//! | Leader | Group monitor | Facilitator | Host |
//! | Boarder | Boarding student | Remote attendee | Out-of-town guest |
//! | Layout | Seating plan | Team roster | Table plan |

mod group;
mod layout;
mod person;
mod requirement;

pub use group::{CapacityTable, GroupConfig};
pub(crate) use layout::is_males_first;
pub use layout::{Layout, Position, SeatGroup};
pub use person::{Gender, PersonId, Roster};
pub use requirement::{ConstraintSet, FixedPosition, FixedPositions, Requirement};
