//! Market-facing calculators layered on the fixed-point core: weighted
//! trade quoting, the time-decaying weight schedule, and pool-level
//! protocol-fee reconciliation. All of them are thin, sequential callers of
//! the core and keep no hidden state.

pub mod pool;
pub mod schedule;
pub mod swap;
