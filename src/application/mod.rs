//! Application layer - Services that use ports.

pub mod reporter;
pub mod runner;
pub mod service;
