//! Fixed-seat optimization and constraint verification.
//!
//! Runs after the assignment phases. The optimizer drives the swap-path
//! search to honor fixed seats the greedy phases could not guarantee; the
//! verifier then reports every hard constraint as pass, warn or fail.

mod optimizer;
mod verifier;

pub(crate) use optimizer::{honored_pins, resolve_fixed};
pub use optimizer::{optimize_fixed_positions, OptimizeStats};
pub use verifier::{verify, Check, CheckKind, CheckStatus, VerificationReport};
