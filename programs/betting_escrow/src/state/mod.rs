//! State structures for the betting escrow

pub mod config;
pub mod event;
pub mod report;
pub mod stake;

pub use config::*;
pub use event::*;
pub use report::*;
pub use stake::*;
