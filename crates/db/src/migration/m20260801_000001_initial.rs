//! Initial schema for the portfolio backend.
//!
//! Creates the singleton profile table and the five catalog tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS social_links, services, experiences, projects, categories, profiles CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Singleton profile. The CHECK pins the row to id = 1.
CREATE TABLE profiles (
    id INTEGER PRIMARY KEY,
    full_name VARCHAR(120) NOT NULL,
    logo_initials VARCHAR(10) NOT NULL,
    phone VARCHAR(30) NOT NULL,
    hero_title VARCHAR(200) NOT NULL,
    hero_description TEXT NOT NULL,
    about_description TEXT NOT NULL,
    photo_url TEXT,
    photo_storage_id TEXT,
    logo_url TEXT,
    logo_storage_id TEXT,
    document_url TEXT,
    document_storage_id TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_profiles_singleton CHECK (id = 1)
);

CREATE TABLE categories (
    id SERIAL PRIMARY KEY,
    name VARCHAR(60) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE projects (
    id SERIAL PRIMARY KEY,
    title VARCHAR(200) NOT NULL,
    description TEXT NOT NULL,
    technologies TEXT NOT NULL,
    image_url TEXT,
    demo_url TEXT,
    github_url TEXT,
    category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
    featured BOOLEAN NOT NULL DEFAULT false,
    level VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_projects_category ON projects(category_id);
CREATE INDEX idx_projects_featured ON projects(featured) WHERE featured;

CREATE TABLE experiences (
    id SERIAL PRIMARY KEY,
    position VARCHAR(120) NOT NULL,
    company VARCHAR(120) NOT NULL,
    description TEXT NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE,
    is_current BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_experiences_dates CHECK (end_date IS NULL OR end_date >= start_date),
    CONSTRAINT chk_experiences_current CHECK (NOT is_current OR end_date IS NULL)
);

CREATE TABLE services (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    description TEXT NOT NULL,
    price NUMERIC(12, 2) NOT NULL CHECK (price >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE social_links (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    url VARCHAR(300) NOT NULL,
    icon VARCHAR(100) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";
