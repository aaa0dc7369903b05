//! Infrastructure layer - External service implementations

pub mod assistant;
pub mod cache;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod storage;
