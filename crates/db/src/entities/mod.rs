//! `SeaORM` entity definitions.

pub mod categories;
pub mod experiences;
pub mod profiles;
pub mod projects;
pub mod services;
pub mod social_links;
