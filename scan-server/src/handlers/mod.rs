//! HTTP handlers

pub mod health;
pub mod config;
pub mod scan;
pub mod history;
pub mod reports;
