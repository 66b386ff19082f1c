//! Media host integration.
//!
//! Assets (profile photo, logo, CV document) are stored on a Cloudinary-style
//! media host. Uploads and deletes go through the signed REST API; delivery
//! happens via the public CDN URLs returned at upload time.

mod client;
mod error;

pub use client::{CloudinaryClient, MediaStorage, ResourceKind, StoredAsset};
pub use error::MediaError;
