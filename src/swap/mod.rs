//! Swap-path search and move execution.
//!
//! Relocates one person to an arbitrary seat through a chain of pairwise
//! exchanges. Cross-group exchanges always trade two people of the same
//! gender, so the gender make-up of every group is preserved.
//!
//! # Components
//!
//! - [`SwapPathFinder`]: breadth-first search for the shortest chain
//! - [`move_person`]: finds and applies a chain, all or nothing
//! - [`apply_swap`]: one exchange with the cross-group gender check

mod executor;
mod path;

pub(crate) use executor::move_person_avoiding;
pub use executor::{apply_swap, move_person};
pub use path::{Swap, SwapPathFinder};
