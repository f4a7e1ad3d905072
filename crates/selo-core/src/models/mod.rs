//! Data models for seals, fee tables and configuration.

pub mod config;
pub mod fees;
pub mod seal;
