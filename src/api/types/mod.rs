//! HTTP API types

pub mod assistant;
pub mod error;
pub mod json;

pub use assistant::{ExtractFormDataRequest, ExtractFormDataResponse, SendMessageRequest};
pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
