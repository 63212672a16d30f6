//! In-process adapters.

mod store;

pub use store::MemoryJobStore;
