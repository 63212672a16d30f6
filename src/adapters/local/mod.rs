//! Local adapters for single-process deployment.

pub mod cleanup;
pub mod downloads;
pub mod http;
