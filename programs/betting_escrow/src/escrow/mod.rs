//! # Escrow Core
//!
//! Pure settlement logic with no account or sysvar access. Time comes in as
//! `now`, the oracle comes in through [`OutcomeOracle`], so every rule can
//! be exercised without a validator.
//!
//! ```text
//!   ledger      open events, accept stakes, pool reads
//!   resolution  latch the outcome once (or refund one-sided events)
//!   settlement  pay each winner once, never more than the pool
//!   oracle      OutcomeOracle backed by the on-chain report account
//!   store       in-memory Ledger composing the above
//! ```

pub mod ledger;
pub mod oracle;
pub mod resolution;
pub mod settlement;
pub mod store;

pub use ledger::*;
pub use oracle::*;
pub use resolution::*;
pub use settlement::*;
pub use store::*;
