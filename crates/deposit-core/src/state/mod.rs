//! Per-attempt state tracking for deposits.
//!
//! Every deposit attempt walks a fixed, linear sequence of stages and ends in
//! exactly one terminal stage. A new attempt starts a new machine; there is
//! no retry transition.

pub mod deposit;

pub use deposit::{DepositAttempt, DepositStage, StageError};
