pub mod allocation;
pub mod field;
pub mod holding;
pub mod performance;
pub mod settings;
pub mod snapshot;
pub mod summary;
