//! Profile orchestration service.

use std::sync::Arc;

use tracing::{info, warn};

use super::download;
use super::error::ProfileError;
use super::types::{AssetSlot, Profile, ProfileChanges, ProfileWithDownload, UpsertProfileInput};
use crate::media::{MediaStorage, StoredAsset};

/// Media host folder holding all profile assets.
const ASSET_FOLDER: &str = "profile";

/// Repository for the singleton profile row.
pub trait ProfileRepository: Send + Sync {
    /// Fetches the profile row, if it exists.
    fn find_singleton(&self) -> impl Future<Output = Result<Option<Profile>, ProfileError>> + Send;

    /// Creates or updates the profile row with the given changes.
    fn upsert_singleton(
        &self,
        changes: ProfileChanges,
    ) -> impl Future<Output = Result<Profile, ProfileError>> + Send;

    /// Deletes the profile row. Returns false when no row existed.
    fn delete_singleton(&self) -> impl Future<Output = Result<bool, ProfileError>> + Send;
}

/// Service coordinating asset uploads, the profile upsert, and cleanup.
#[derive(Debug)]
pub struct ProfileService<R, M> {
    repo: Arc<R>,
    media: Arc<M>,
    cloud_name: String,
}

impl<R, M> ProfileService<R, M>
where
    R: ProfileRepository,
    M: MediaStorage + 'static,
{
    /// Creates a new profile service.
    pub fn new(repo: Arc<R>, media: Arc<M>, cloud_name: impl Into<String>) -> Self {
        Self {
            repo,
            media,
            cloud_name: cloud_name.into(),
        }
    }

    /// Returns the profile with its derived CV download URL.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::NotFound` when no profile has been created.
    pub async fn get_profile(&self) -> Result<ProfileWithDownload, ProfileError> {
        let profile = self
            .repo
            .find_singleton()
            .await?
            .ok_or(ProfileError::NotFound)?;
        Ok(self.with_download(profile))
    }

    /// Creates or updates the profile.
    ///
    /// New asset files are uploaded first; a failed upload is logged and the
    /// slot keeps its previous asset. If the database write fails, every
    /// asset uploaded in this call is deleted again before returning. On
    /// success, assets superseded by this call are deleted in the background.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Validation` when the profile does not exist yet
    /// and a required text field is missing, or `ProfileError::Store` when
    /// the persistence layer fails.
    pub async fn upsert_profile(
        &self,
        input: UpsertProfileInput,
    ) -> Result<ProfileWithDownload, ProfileError> {
        let mut changes = ProfileChanges {
            full_name: input.full_name,
            logo_initials: input.logo_initials,
            phone: input.phone,
            hero_title: input.hero_title,
            hero_description: input.hero_description,
            about_description: input.about_description,
            ..ProfileChanges::default()
        };

        let mut uploaded: Vec<(AssetSlot, StoredAsset)> = Vec::new();
        let files = [
            (AssetSlot::Photo, input.photo),
            (AssetSlot::Logo, input.logo),
            (AssetSlot::Document, input.document),
        ];
        for (slot, data) in files {
            let Some(data) = data else { continue };
            if data.is_empty() {
                continue;
            }
            match self.media.upload(data, ASSET_FOLDER, slot.kind()).await {
                Ok(asset) => {
                    info!(
                        slot = slot.as_str(),
                        storage_id = %asset.storage_id,
                        "uploaded profile asset"
                    );
                    uploaded.push((slot, asset.clone()));
                    changes.set_asset(slot, asset);
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        slot = slot.as_str(),
                        "asset upload failed, keeping previous asset"
                    );
                }
            }
        }

        let current = match self.repo.find_singleton().await {
            Ok(current) => current,
            Err(e) => {
                self.rollback_uploads(&uploaded).await;
                return Err(e);
            }
        };

        if current.is_none()
            && let Some(field) = changes.missing_required()
        {
            self.rollback_uploads(&uploaded).await;
            return Err(ProfileError::Validation { field });
        }

        if changes.is_empty()
            && let Some(profile) = current
        {
            return Ok(self.with_download(profile));
        }

        let saved = match self.repo.upsert_singleton(changes).await {
            Ok(saved) => saved,
            Err(e) => {
                self.rollback_uploads(&uploaded).await;
                return Err(e);
            }
        };

        if let Some(previous) = current {
            for (slot, asset) in &uploaded {
                if let Some(old_id) = previous.storage_id(*slot)
                    && old_id != asset.storage_id
                {
                    self.spawn_cleanup(*slot, old_id.to_string());
                }
            }
        }

        Ok(self.with_download(saved))
    }

    /// Deletes the profile and its stored assets.
    ///
    /// Asset deletion is best effort; a failed delete is logged and the row
    /// is removed regardless.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::NotFound` when no profile exists.
    pub async fn delete_profile(&self) -> Result<(), ProfileError> {
        let profile = self
            .repo
            .find_singleton()
            .await?
            .ok_or(ProfileError::NotFound)?;

        for slot in [AssetSlot::Photo, AssetSlot::Logo, AssetSlot::Document] {
            if let Some(storage_id) = profile.storage_id(slot)
                && let Err(e) = self.media.delete(storage_id, slot.kind()).await
            {
                warn!(error = %e, slot = slot.as_str(), "failed to delete profile asset");
            }
        }

        if self.repo.delete_singleton().await? {
            Ok(())
        } else {
            Err(ProfileError::NotFound)
        }
    }

    fn with_download(&self, profile: Profile) -> ProfileWithDownload {
        let document_download_url = download::make_download_url(
            &self.cloud_name,
            profile.document_storage_id.as_deref(),
            profile.document_url.as_deref(),
            Some(&profile.full_name),
        );
        ProfileWithDownload {
            profile,
            document_download_url,
        }
    }

    /// Deletes assets uploaded in the current call after a failed write.
    async fn rollback_uploads(&self, uploaded: &[(AssetSlot, StoredAsset)]) {
        for (slot, asset) in uploaded {
            if let Err(e) = self.media.delete(&asset.storage_id, slot.kind()).await {
                warn!(
                    error = %e,
                    slot = slot.as_str(),
                    storage_id = %asset.storage_id,
                    "failed to roll back uploaded asset"
                );
            }
        }
    }

    /// Deletes a superseded asset without blocking the response.
    fn spawn_cleanup(&self, slot: AssetSlot, storage_id: String) {
        let media = Arc::clone(&self.media);
        tokio::spawn(async move {
            if let Err(e) = media.delete(&storage_id, slot.kind()).await {
                warn!(
                    error = %e,
                    slot = slot.as_str(),
                    storage_id,
                    "failed to delete superseded asset"
                );
            }
        });
    }
}
