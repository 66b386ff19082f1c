//! Core business logic for Folio.
//!
//! This crate contains the domain services that sit between the HTTP layer
//! and the persistence layer:
//! - `media`: signed uploads and deletes against the media host
//! - `profile`: the singleton profile orchestrator and download URL builder

pub mod media;
pub mod profile;
