//! Shared types, errors, and configuration for Folio.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - JWT service and auth payloads for the admin panel
//! - Pagination types for list endpoints
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, LoginRequest, LoginResponse};
pub use config::{AdminConfig, AppConfig, MediaConfig};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use types::{PageRequest, PageResponse};
