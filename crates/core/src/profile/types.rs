//! Profile domain types.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::media::{ResourceKind, StoredAsset};

/// The profile table holds exactly one row, always with this id.
pub const PROFILE_SINGLETON_ID: i32 = 1;

/// The site owner's profile.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    /// Row id, always [`PROFILE_SINGLETON_ID`].
    pub id: i32,
    /// Owner's full name.
    pub full_name: String,
    /// Initials shown in the site logo.
    pub logo_initials: String,
    /// Contact phone number.
    pub phone: String,
    /// Hero section title.
    pub hero_title: String,
    /// Hero section description.
    pub hero_description: String,
    /// About section description.
    pub about_description: String,
    /// Photo delivery URL.
    pub photo_url: Option<String>,
    /// Photo storage id on the media host.
    pub photo_storage_id: Option<String>,
    /// Logo delivery URL.
    pub logo_url: Option<String>,
    /// Logo storage id on the media host.
    pub logo_storage_id: Option<String>,
    /// CV document delivery URL.
    pub document_url: Option<String>,
    /// CV document storage id on the media host.
    pub document_storage_id: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A profile together with its derived CV download URL.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileWithDownload {
    /// The stored profile.
    #[serde(flatten)]
    pub profile: Profile,
    /// Forced-download URL for the CV, when a document exists.
    pub document_download_url: Option<String>,
}

/// The three asset slots a profile can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSlot {
    /// Profile photo.
    Photo,
    /// Site logo.
    Logo,
    /// CV document.
    Document,
}

impl AssetSlot {
    /// Resource class for this slot on the media host.
    #[must_use]
    pub const fn kind(self) -> ResourceKind {
        match self {
            Self::Photo | Self::Logo => ResourceKind::Image,
            Self::Document => ResourceKind::Raw,
        }
    }

    /// Slot name, used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Logo => "logo",
            Self::Document => "document",
        }
    }
}

/// Input for the profile upsert.
///
/// Every field is optional; on an update, absent fields keep their stored
/// value. On first creation all text fields must be present.
#[derive(Debug, Default)]
pub struct UpsertProfileInput {
    /// Owner's full name.
    pub full_name: Option<String>,
    /// Initials shown in the site logo.
    pub logo_initials: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Hero section title.
    pub hero_title: Option<String>,
    /// Hero section description.
    pub hero_description: Option<String>,
    /// About section description.
    pub about_description: Option<String>,
    /// New photo bytes, if a photo was sent.
    pub photo: Option<Bytes>,
    /// New logo bytes, if a logo was sent.
    pub logo: Option<Bytes>,
    /// New CV document bytes, if one was sent.
    pub document: Option<Bytes>,
}

/// The set of columns an upsert will write.
///
/// Only fields that are `Some` are written; the rest keep their stored
/// value (or start as `NULL` on first creation for the asset slots).
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    /// New full name.
    pub full_name: Option<String>,
    /// New logo initials.
    pub logo_initials: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New hero title.
    pub hero_title: Option<String>,
    /// New hero description.
    pub hero_description: Option<String>,
    /// New about description.
    pub about_description: Option<String>,
    /// New photo asset.
    pub photo: Option<StoredAsset>,
    /// New logo asset.
    pub logo: Option<StoredAsset>,
    /// New CV document asset.
    pub document: Option<StoredAsset>,
}

impl ProfileChanges {
    /// True when nothing would be written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.logo_initials.is_none()
            && self.phone.is_none()
            && self.hero_title.is_none()
            && self.hero_description.is_none()
            && self.about_description.is_none()
            && self.photo.is_none()
            && self.logo.is_none()
            && self.document.is_none()
    }

    /// Returns the first text field that would be missing on first creation.
    #[must_use]
    pub const fn missing_required(&self) -> Option<&'static str> {
        if self.full_name.is_none() {
            Some("full_name")
        } else if self.logo_initials.is_none() {
            Some("logo_initials")
        } else if self.phone.is_none() {
            Some("phone")
        } else if self.hero_title.is_none() {
            Some("hero_title")
        } else if self.hero_description.is_none() {
            Some("hero_description")
        } else if self.about_description.is_none() {
            Some("about_description")
        } else {
            None
        }
    }

    /// Records a freshly uploaded asset for the given slot.
    pub fn set_asset(&mut self, slot: AssetSlot, asset: StoredAsset) {
        match slot {
            AssetSlot::Photo => self.photo = Some(asset),
            AssetSlot::Logo => self.logo = Some(asset),
            AssetSlot::Document => self.document = Some(asset),
        }
    }
}

impl Profile {
    /// Returns the stored storage id for the given slot, if any.
    #[must_use]
    pub fn storage_id(&self, slot: AssetSlot) -> Option<&str> {
        match slot {
            AssetSlot::Photo => self.photo_storage_id.as_deref(),
            AssetSlot::Logo => self.logo_storage_id.as_deref(),
            AssetSlot::Document => self.document_storage_id.as_deref(),
        }
    }
}
