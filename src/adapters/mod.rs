//! Adapters - Concrete implementations of ports.

pub mod local;
pub mod memory;
pub mod ytdlp;
