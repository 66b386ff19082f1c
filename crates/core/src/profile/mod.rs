//! Singleton profile domain.
//!
//! The site has exactly one profile row carrying the hero texts plus three
//! optional assets (photo, logo, CV document). The service orchestrates
//! asset uploads, the database upsert, and cleanup of superseded assets.

pub mod download;
mod error;
mod service;
mod types;

pub use error::ProfileError;
pub use service::{ProfileRepository, ProfileService};
pub use types::{
    AssetSlot, PROFILE_SINGLETON_ID, Profile, ProfileChanges, ProfileWithDownload,
    UpsertProfileInput,
};
