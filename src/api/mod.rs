//! HTTP layer for request/response handling.
//!
//! Translates HTTP requests into resolver calls and formats responses.
//!
//! # Modules
//!
//! - [`dto`] - Response serialization types
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing

pub mod dto;
pub mod handlers;
pub mod middleware;
