//! Data models

pub mod scan;
pub mod history;

pub use scan::*;
pub use history::*;
