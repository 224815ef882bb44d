//! Application layer services implementing the resolution path.
//!
//! Services consume repository and cache traits and provide a narrow API for
//! HTTP handlers and the admin tool.
//!
//! # Available Services
//!
//! - [`services::link_resolver::LinkResolver`] - Cache-aside link lookup

pub mod services;
