/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed, classified API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod auth;
pub mod client;
pub mod error;
pub mod gateway;
pub mod user;

pub use error::{OnboardError, Result, ValidationError};
pub use gateway::ApiGateway;

pub use client::{ClientConfig, DEFAULT_BASE_URL, HeliosClient};
