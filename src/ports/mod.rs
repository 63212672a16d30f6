pub mod artifacts;
pub mod extractor;
pub mod repository;
