//! SQLite-backed project/version registry

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Connection, Row, params};
use tracing::{debug, info};

use crate::store::ProjectStore;
use crate::store::error::StoreError;
use crate::store::import::{ProjectSeed, VersionSeed};
use crate::store::models::{
    DocumentationType, PrivacyLevel, Project, Version, VersionType,
};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(db_path: &Path) -> Result<Self, StoreError> {
        info!("Opening registry database at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        debug!("Database connection established");

        let store = Self {
            conn: Mutex::new(conn),
        };

        store.create_schema()?;
        info!("Registry initialized");

        Ok(store)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        debug!("Creating database schema");

        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                slug TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                language TEXT NOT NULL DEFAULT 'en',
                repo_url TEXT,
                show_version_warning INTEGER NOT NULL DEFAULT 1,
                updated_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS versions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                slug TEXT NOT NULL,
                verbose_name TEXT NOT NULL,
                version_type TEXT NOT NULL DEFAULT 'unknown',
                privacy_level TEXT NOT NULL DEFAULT 'public',
                documentation_type TEXT NOT NULL DEFAULT 'sphinx',
                built INTEGER NOT NULL DEFAULT 0,
                active INTEGER NOT NULL DEFAULT 0,
                hidden INTEGER NOT NULL DEFAULT 0,
                has_pdf INTEGER NOT NULL DEFAULT 0,
                has_epub INTEGER NOT NULL DEFAULT 0,
                has_htmlzip INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                UNIQUE(project_id, slug)
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_versions_project_id ON versions(project_id)",
            [],
        )?;

        Ok(())
    }

    /// Insert or update a project, returning its id
    pub fn upsert_project(&self, seed: &ProjectSeed) -> Result<i64, StoreError> {
        let conn = self.lock_conn()?;
        let now = Self::current_timestamp_ms();

        conn.execute(
            r#"
            INSERT INTO projects (slug, name, language, repo_url, show_version_warning, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(slug) DO UPDATE SET
                name = excluded.name,
                language = excluded.language,
                repo_url = excluded.repo_url,
                show_version_warning = excluded.show_version_warning,
                updated_at = excluded.updated_at
            "#,
            params![
                seed.slug,
                seed.name,
                seed.language,
                seed.repo_url,
                seed.show_version_warning,
                now,
            ],
        )?;

        let id = conn.query_row(
            "SELECT id FROM projects WHERE slug = ?1",
            params![seed.slug],
            |row| row.get(0),
        )?;

        debug!("Upserted project {} (id {})", seed.slug, id);
        Ok(id)
    }

    /// Insert or update a version of a project, returning its id
    pub fn upsert_version(&self, project_id: i64, seed: &VersionSeed) -> Result<i64, StoreError> {
        let conn = self.lock_conn()?;
        let now = Self::current_timestamp_ms();

        conn.execute(
            r#"
            INSERT INTO versions (
                project_id, slug, verbose_name, version_type, privacy_level,
                documentation_type, built, active, hidden,
                has_pdf, has_epub, has_htmlzip, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT(project_id, slug) DO UPDATE SET
                verbose_name = excluded.verbose_name,
                version_type = excluded.version_type,
                privacy_level = excluded.privacy_level,
                documentation_type = excluded.documentation_type,
                built = excluded.built,
                active = excluded.active,
                hidden = excluded.hidden,
                has_pdf = excluded.has_pdf,
                has_epub = excluded.has_epub,
                has_htmlzip = excluded.has_htmlzip,
                updated_at = excluded.updated_at
            "#,
            params![
                project_id,
                seed.slug,
                seed.verbose_name,
                seed.version_type.as_str(),
                seed.privacy_level.as_str(),
                seed.documentation_type.as_str(),
                seed.built,
                seed.active,
                seed.hidden,
                seed.has_pdf,
                seed.has_epub,
                seed.has_htmlzip,
                now,
            ],
        )?;

        let id = conn.query_row(
            "SELECT id FROM versions WHERE project_id = ?1 AND slug = ?2",
            params![project_id, seed.slug],
            |row| row.get(0),
        )?;

        Ok(id)
    }

    fn versions_where(
        &self,
        predicate: &str,
        project_id: i64,
    ) -> Result<Vec<Version>, StoreError> {
        let conn = self.lock_conn()?;
        let sql = format!(
            r#"
            SELECT id, project_id, slug, verbose_name, version_type, privacy_level,
                   documentation_type, built, active, hidden, has_pdf, has_epub, has_htmlzip
            FROM versions
            WHERE project_id = ?1 AND {predicate}
            ORDER BY slug
            "#,
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![project_id], raw_version_row)?;

        let mut versions = Vec::new();
        for raw in rows {
            versions.push(raw?.try_into()?);
        }
        Ok(versions)
    }
}

impl ProjectStore for SqliteStore {
    fn project_by_slug(&self, slug: &str) -> Result<Option<Project>, StoreError> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, slug, name, language, repo_url, show_version_warning
            FROM projects
            WHERE slug = ?1
            "#,
        )?;

        let mut rows = stmt.query_map(params![slug], |row| {
            Ok(Project {
                id: row.get(0)?,
                slug: row.get(1)?,
                name: row.get(2)?,
                language: row.get(3)?,
                repo_url: row.get(4)?,
                show_version_warning: row.get(5)?,
            })
        })?;

        rows.next().transpose().map_err(StoreError::from)
    }

    fn version_by_slug(
        &self,
        project_id: i64,
        slug: &str,
    ) -> Result<Option<Version>, StoreError> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, project_id, slug, verbose_name, version_type, privacy_level,
                   documentation_type, built, active, hidden, has_pdf, has_epub, has_htmlzip
            FROM versions
            WHERE project_id = ?1 AND slug = ?2 COLLATE NOCASE
            "#,
        )?;

        let mut rows = stmt.query_map(params![project_id, slug], raw_version_row)?;

        match rows.next().transpose()? {
            Some(raw) => Ok(Some(raw.try_into()?)),
            None => Ok(None),
        }
    }

    fn eligible_versions(&self, project_id: i64) -> Result<Vec<Version>, StoreError> {
        self.versions_where(
            "version_type != 'external' AND privacy_level = 'public' \
             AND built = 1 AND active = 1",
            project_id,
        )
    }

    fn listed_versions(&self, project_id: i64) -> Result<Vec<Version>, StoreError> {
        self.versions_where(
            "version_type != 'external' AND privacy_level = 'public' \
             AND active = 1 AND hidden = 0",
            project_id,
        )
    }
}

/// Version row before enum columns are validated
struct RawVersion {
    id: i64,
    project_id: i64,
    slug: String,
    verbose_name: String,
    version_type: String,
    privacy_level: String,
    documentation_type: String,
    built: bool,
    active: bool,
    hidden: bool,
    has_pdf: bool,
    has_epub: bool,
    has_htmlzip: bool,
}

fn raw_version_row(row: &Row<'_>) -> rusqlite::Result<RawVersion> {
    Ok(RawVersion {
        id: row.get(0)?,
        project_id: row.get(1)?,
        slug: row.get(2)?,
        verbose_name: row.get(3)?,
        version_type: row.get(4)?,
        privacy_level: row.get(5)?,
        documentation_type: row.get(6)?,
        built: row.get(7)?,
        active: row.get(8)?,
        hidden: row.get(9)?,
        has_pdf: row.get(10)?,
        has_epub: row.get(11)?,
        has_htmlzip: row.get(12)?,
    })
}

impl TryFrom<RawVersion> for Version {
    type Error = StoreError;

    fn try_from(raw: RawVersion) -> Result<Self, Self::Error> {
        let version_type =
            VersionType::from_str(&raw.version_type).map_err(|_| StoreError::InvalidRow {
                field: "version_type",
                value: raw.version_type.clone(),
            })?;
        let privacy_level =
            PrivacyLevel::from_str(&raw.privacy_level).map_err(|_| StoreError::InvalidRow {
                field: "privacy_level",
                value: raw.privacy_level.clone(),
            })?;
        let documentation_type = DocumentationType::from_str(&raw.documentation_type)
            .map_err(|_| StoreError::InvalidRow {
                field: "documentation_type",
                value: raw.documentation_type.clone(),
            })?;

        Ok(Version {
            id: raw.id,
            project_id: raw.project_id,
            slug: raw.slug,
            verbose_name: raw.verbose_name,
            version_type,
            privacy_level,
            documentation_type,
            built: raw.built,
            active: raw.active,
            hidden: raw.hidden,
            has_pdf: raw.has_pdf,
            has_epub: raw.has_epub,
            has_htmlzip: raw.has_htmlzip,
        })
    }
}
