//! Profile repository for the singleton profile row.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::entities::profiles;
use folio_core::media::StoredAsset;
use folio_core::profile::{
    PROFILE_SINGLETON_ID, Profile, ProfileChanges, ProfileError,
    ProfileRepository as ProfileRepoTrait,
};

/// Profile repository implementation.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl ProfileRepository {
    /// Creates a new profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl ProfileRepoTrait for ProfileRepository {
    async fn find_singleton(&self) -> Result<Option<Profile>, ProfileError> {
        let model = profiles::Entity::find_by_id(PROFILE_SINGLETON_ID)
            .one(&*self.db)
            .await
            .map_err(|e| ProfileError::Store(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn upsert_singleton(&self, changes: ProfileChanges) -> Result<Profile, ProfileError> {
        let existing = profiles::Entity::find_by_id(PROFILE_SINGLETON_ID)
            .one(&*self.db)
            .await
            .map_err(|e| ProfileError::Store(e.to_string()))?;

        let now = Utc::now();
        let model = if let Some(model) = existing {
            let mut active: profiles::ActiveModel = model.into();
            if let Some(v) = changes.full_name {
                active.full_name = Set(v);
            }
            if let Some(v) = changes.logo_initials {
                active.logo_initials = Set(v);
            }
            if let Some(v) = changes.phone {
                active.phone = Set(v);
            }
            if let Some(v) = changes.hero_title {
                active.hero_title = Set(v);
            }
            if let Some(v) = changes.hero_description {
                active.hero_description = Set(v);
            }
            if let Some(v) = changes.about_description {
                active.about_description = Set(v);
            }
            if let Some(asset) = changes.photo {
                active.photo_url = Set(Some(asset.url));
                active.photo_storage_id = Set(Some(asset.storage_id));
            }
            if let Some(asset) = changes.logo {
                active.logo_url = Set(Some(asset.url));
                active.logo_storage_id = Set(Some(asset.storage_id));
            }
            if let Some(asset) = changes.document {
                active.document_url = Set(Some(asset.url));
                active.document_storage_id = Set(Some(asset.storage_id));
            }
            active.updated_at = Set(now.into());

            active
                .update(&*self.db)
                .await
                .map_err(|e| ProfileError::Store(e.to_string()))?
        } else {
            // The service validates the required set first; re-checking here
            // keeps an incomplete row out of the store no matter the caller.
            let (photo_url, photo_storage_id) = split_asset(changes.photo);
            let (logo_url, logo_storage_id) = split_asset(changes.logo);
            let (document_url, document_storage_id) = split_asset(changes.document);

            let active = profiles::ActiveModel {
                id: Set(PROFILE_SINGLETON_ID),
                full_name: Set(required(changes.full_name, "full_name")?),
                logo_initials: Set(required(changes.logo_initials, "logo_initials")?),
                phone: Set(required(changes.phone, "phone")?),
                hero_title: Set(required(changes.hero_title, "hero_title")?),
                hero_description: Set(required(changes.hero_description, "hero_description")?),
                about_description: Set(required(changes.about_description, "about_description")?),
                photo_url: Set(photo_url),
                photo_storage_id: Set(photo_storage_id),
                logo_url: Set(logo_url),
                logo_storage_id: Set(logo_storage_id),
                document_url: Set(document_url),
                document_storage_id: Set(document_storage_id),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };

            active
                .insert(&*self.db)
                .await
                .map_err(|e| ProfileError::Store(e.to_string()))?
        };

        Ok(to_domain(model))
    }

    async fn delete_singleton(&self) -> Result<bool, ProfileError> {
        let result = profiles::Entity::delete_by_id(PROFILE_SINGLETON_ID)
            .exec(&*self.db)
            .await
            .map_err(|e| ProfileError::Store(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ProfileError> {
    value.ok_or(ProfileError::Validation { field })
}

fn split_asset(asset: Option<StoredAsset>) -> (Option<String>, Option<String>) {
    match asset {
        Some(asset) => (Some(asset.url), Some(asset.storage_id)),
        None => (None, None),
    }
}

fn to_domain(model: profiles::Model) -> Profile {
    Profile {
        id: model.id,
        full_name: model.full_name,
        logo_initials: model.logo_initials,
        phone: model.phone,
        hero_title: model.hero_title,
        hero_description: model.hero_description,
        about_description: model.about_description,
        photo_url: model.photo_url,
        photo_storage_id: model.photo_storage_id,
        logo_url: model.logo_url,
        logo_storage_id: model.logo_storage_id,
        document_url: model.document_url,
        document_storage_id: model.document_storage_id,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;

    fn stored_model() -> profiles::Model {
        let now = Utc::now().into();
        profiles::Model {
            id: PROFILE_SINGLETON_ID,
            full_name: "Jane Doe".to_string(),
            logo_initials: "JD".to_string(),
            phone: "+1 555 0100".to_string(),
            hero_title: "Engineer".to_string(),
            hero_description: "Builds backends".to_string(),
            about_description: "About Jane".to_string(),
            photo_url: None,
            photo_storage_id: None,
            logo_url: None,
            logo_storage_id: None,
            document_url: Some("https://res.cloudinary.com/demo/raw/upload/v1/cv.pdf".to_string()),
            document_storage_id: Some("profile/cv".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    fn full_changes() -> ProfileChanges {
        ProfileChanges {
            full_name: Some("Jane Doe".to_string()),
            logo_initials: Some("JD".to_string()),
            phone: Some("+1 555 0100".to_string()),
            hero_title: Some("Engineer".to_string()),
            hero_description: Some("Builds backends".to_string()),
            about_description: Some("About Jane".to_string()),
            ..ProfileChanges::default()
        }
    }

    #[tokio::test]
    async fn test_find_singleton_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<profiles::Model>::new()])
            .into_connection();

        let repo = ProfileRepository::new(Arc::new(db));
        assert!(repo.find_singleton().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_singleton_maps_to_domain() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_model()]])
            .into_connection();

        let repo = ProfileRepository::new(Arc::new(db));
        let profile = repo.find_singleton().await.unwrap().unwrap();

        assert_eq!(profile.id, PROFILE_SINGLETON_ID);
        assert_eq!(profile.full_name, "Jane Doe");
        assert_eq!(profile.document_storage_id.as_deref(), Some("profile/cv"));
    }

    #[tokio::test]
    async fn test_upsert_creates_when_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<profiles::Model>::new()])
            .append_query_results([vec![stored_model()]])
            .into_connection();

        let repo = ProfileRepository::new(Arc::new(db));
        let profile = repo.upsert_singleton(full_changes()).await.unwrap();

        assert_eq!(profile.id, PROFILE_SINGLETON_ID);
    }

    #[tokio::test]
    async fn test_upsert_rejects_incomplete_create() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<profiles::Model>::new()])
            .into_connection();

        let repo = ProfileRepository::new(Arc::new(db));
        let result = repo.upsert_singleton(ProfileChanges::default()).await;

        assert!(matches!(
            result,
            Err(ProfileError::Validation { field: "full_name" })
        ));
    }

    #[tokio::test]
    async fn test_upsert_updates_existing() {
        let mut updated = stored_model();
        updated.hero_title = "Principal Engineer".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_model()]])
            .append_query_results([vec![updated]])
            .into_connection();

        let repo = ProfileRepository::new(Arc::new(db));
        let profile = repo
            .upsert_singleton(ProfileChanges {
                hero_title: Some("Principal Engineer".to_string()),
                ..ProfileChanges::default()
            })
            .await
            .unwrap();

        assert_eq!(profile.hero_title, "Principal Engineer");
    }

    #[tokio::test]
    async fn test_delete_singleton() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = ProfileRepository::new(Arc::new(db));
        assert!(repo.delete_singleton().await.unwrap());
        assert!(!repo.delete_singleton().await.unwrap());
    }
}
