//! # Country Repository
//!
//! Database operations for countries.
//!
//! Codes are stored uppercase and unique, so a code lookup is a plain
//! equality match on the normalized code.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use geoprice_core::{Country, CountryChanges, CountryDraft};

const COUNTRY_COLUMNS: &str = "id, name, code, active, created_at, updated_at";

/// Repository for country database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.countries();
///
/// let all = repo.list().await?;
/// let turkey = repo.get_by_code("tr").await?;
/// ```
#[derive(Debug, Clone)]
pub struct CountryRepository {
    pool: SqlitePool,
}

impl CountryRepository {
    /// Creates a new CountryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CountryRepository { pool }
    }

    /// Lists every country, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Country>> {
        let countries = sqlx::query_as::<_, Country>(&format!(
            "SELECT {COUNTRY_COLUMNS} FROM countries ORDER BY name ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(countries)
    }

    /// Lists active countries, ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Country>> {
        let countries = sqlx::query_as::<_, Country>(&format!(
            "SELECT {COUNTRY_COLUMNS} FROM countries WHERE active = 1 ORDER BY name ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(countries)
    }

    /// Gets a country by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Country>> {
        let country = sqlx::query_as::<_, Country>(&format!(
            "SELECT {COUNTRY_COLUMNS} FROM countries WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(country)
    }

    /// Gets a country by code. The code is trimmed and uppercased first.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Country>> {
        let code = code.trim().to_ascii_uppercase();

        debug!(code = %code, "Looking up country by code");

        let country = sqlx::query_as::<_, Country>(&format!(
            "SELECT {COUNTRY_COLUMNS} FROM countries WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(country)
    }

    /// Returns true if a country with this ID exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM countries WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Inserts a validated country.
    ///
    /// ## Errors
    /// - `Validation(Duplicate)` if the code is already taken
    pub async fn create(&self, draft: &CountryDraft) -> DbResult<Country> {
        if self.code_taken(&draft.code, None).await? {
            return Err(DbError::duplicate("code", draft.code.clone()));
        }

        let now = Utc::now();

        let country = sqlx::query_as::<_, Country>(&format!(
            r#"
            INSERT INTO countries (name, code, active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING {COUNTRY_COLUMNS}
            "#
        ))
        .bind(&draft.name)
        .bind(&draft.code)
        .bind(draft.active)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("code", draft.code.clone()),
            other => other,
        })?;

        debug!(id = country.id, code = %country.code, "Country created");
        Ok(country)
    }

    /// Applies a validated partial update.
    ///
    /// ## Errors
    /// - `NotFound` if no country has this ID
    /// - `Validation(Duplicate)` if the new code belongs to another country
    pub async fn update(&self, id: i64, changes: &CountryChanges) -> DbResult<Country> {
        let mut country = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Country", id))?;

        if let Some(ref code) = changes.code {
            if self.code_taken(code, Some(id)).await? {
                return Err(DbError::duplicate("code", code.clone()));
            }
        }

        changes.apply_to(&mut country);
        country.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE countries
            SET name = ?1, code = ?2, active = ?3, updated_at = ?4
            WHERE id = ?5
            "#,
        )
        .bind(&country.name)
        .bind(&country.code)
        .bind(country.active)
        .bind(country.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        debug!(id, "Country updated");
        Ok(country)
    }

    /// Deletes a country. Its price rules go with it (ON DELETE CASCADE).
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM countries WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Country", id));
        }

        debug!(id, "Country deleted");
        Ok(())
    }

    /// Counts all countries.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn code_taken(&self, code: &str, except_id: Option<i64>) -> DbResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT id FROM countries WHERE code = ?1 AND id != ?2")
                .bind(code)
                .bind(except_id.unwrap_or(-1))
                .fetch_optional(&self.pool)
                .await?;

        Ok(found.is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
