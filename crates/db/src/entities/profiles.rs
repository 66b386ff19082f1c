//! `SeaORM` Entity for the singleton profiles table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub full_name: String,
    pub logo_initials: String,
    pub phone: String,
    pub hero_title: String,
    pub hero_description: String,
    pub about_description: String,
    pub photo_url: Option<String>,
    pub photo_storage_id: Option<String>,
    pub logo_url: Option<String>,
    pub logo_storage_id: Option<String>,
    pub document_url: Option<String>,
    pub document_storage_id: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
