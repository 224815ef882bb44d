//! Data Transfer Objects for API responses.

pub mod geo;
pub mod health;
