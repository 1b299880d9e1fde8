pub mod allocation_service;
pub mod holding_service;
pub mod performance_service;
pub mod summary_service;
