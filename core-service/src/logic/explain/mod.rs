//! Explain Module - Explanation Engine
//!
//! Turns verdict, risk band and per-branch contributions into the ordered
//! `reasons` list shown to the user.

pub mod types;
pub mod phrases;
pub mod engine;

pub use types::{Contribution, ContributionKind, Direction};
pub use engine::{explain, select_top};
