//! Instruction handlers for the betting escrow
//!
//! Each instruction represents an action a party can take:
//! - `initialize` - Record the oracle and collateral mint (once, at deployment)
//! - `create_event` - Open a new prediction event (permissionless)
//! - `place_stake` - Deposit collateral on YES or NO
//! - `post_outcome` - Report the outcome (oracle only)
//! - `resolve_event` - Latch the outcome or refund a one-sided event (permissionless)
//! - `claim` - Collect winnings or a refund
//! - `views` - Pool, participant and outcome queries

pub mod claim;
pub mod create_event;
pub mod initialize;
pub mod place_stake;
pub mod post_outcome;
pub mod resolve_event;
pub mod views;

pub use claim::*;
pub use create_event::*;
pub use initialize::*;
pub use place_stake::*;
pub use post_outcome::*;
pub use resolve_event::*;
pub use views::*;
