//! # Price Rule Repository
//!
//! Database operations for price rules.
//!
//! ## Ordering
//! Every listing comes back in evaluation order:
//! `priority DESC, created_at DESC, id DESC`. That is the same order
//! `geoprice_core::resolver::rule_order` uses, so consumers that take the
//! first match of a listing agree with the resolver.
//!
//! ## Embedded Country
//! Admin-facing reads join `countries` and embed `{id, name, code}`:
//! ```text
//! price_rules r LEFT JOIN countries c ON c.id = r.country_id
//!        │                     │
//!        ▼                     ▼
//!   PriceRule          CountrySummary (None if the join misses)
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use geoprice_core::{
    CountrySummary, PriceRule, PriceRuleChanges, PriceRuleDraft, PriceRuleWithCountry, RuleFilter,
};

const RULE_COLUMNS: &str = r#"
    r.id AS id,
    r.country_id AS country_id,
    r.rule_type AS rule_type,
    r.value AS value,
    r.product_category AS product_category,
    r.product_id AS product_id,
    r.min_order_value AS min_order_value,
    r.active AS active,
    r.description AS description,
    r.priority AS priority,
    r.created_at AS created_at,
    r.updated_at AS updated_at
"#;

const EVALUATION_ORDER: &str = "ORDER BY r.priority DESC, r.created_at DESC, r.id DESC";

/// A rule row joined with its country's name and code.
#[derive(Debug, sqlx::FromRow)]
struct RuleWithCountryRow {
    #[sqlx(flatten)]
    rule: PriceRule,
    country_name: Option<String>,
    country_code: Option<String>,
}

impl From<RuleWithCountryRow> for PriceRuleWithCountry {
    fn from(row: RuleWithCountryRow) -> Self {
        let country = match (row.country_name, row.country_code) {
            (Some(name), Some(code)) => Some(CountrySummary {
                id: row.rule.country_id,
                name,
                code,
            }),
            _ => None,
        };

        PriceRuleWithCountry {
            rule: row.rule,
            country,
        }
    }
}

/// Repository for price rule database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.price_rules();
///
/// // Admin listing with embedded countries
/// let rules = repo.list(RuleFilter::default()).await?;
///
/// // What the storefront resolves against
/// let active = repo.list_active_for_country(country.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PriceRuleRepository {
    pool: SqlitePool,
}

impl PriceRuleRepository {
    /// Creates a new PriceRuleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PriceRuleRepository { pool }
    }

    /// Lists rules with their embedded country.
    ///
    /// `filter.active` and `filter.country_id` narrow the listing when set.
    pub async fn list(&self, filter: RuleFilter) -> DbResult<Vec<PriceRuleWithCountry>> {
        debug!(?filter, "Listing price rules");

        let rows = sqlx::query_as::<_, RuleWithCountryRow>(&format!(
            r#"
            SELECT {RULE_COLUMNS}, c.name AS country_name, c.code AS country_code
            FROM price_rules r
            LEFT JOIN countries c ON c.id = r.country_id
            WHERE (?1 IS NULL OR r.active = ?1)
              AND (?2 IS NULL OR r.country_id = ?2)
            {EVALUATION_ORDER}
            "#
        ))
        .bind(filter.active)
        .bind(filter.country_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PriceRuleWithCountry::from).collect())
    }

    /// Lists all rules (active and inactive) of one country.
    ///
    /// ## Errors
    /// - `NotFound` if the country does not exist
    pub async fn list_for_country(&self, country_id: i64) -> DbResult<Vec<PriceRule>> {
        if !self.country_exists(country_id).await? {
            return Err(DbError::not_found("Country", country_id));
        }

        let rules = sqlx::query_as::<_, PriceRule>(&format!(
            "SELECT {RULE_COLUMNS} FROM price_rules r WHERE r.country_id = ?1 {EVALUATION_ORDER}"
        ))
        .bind(country_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rules)
    }

    /// Lists the active rules of one country, in evaluation order.
    pub async fn list_active_for_country(&self, country_id: i64) -> DbResult<Vec<PriceRule>> {
        let rules = sqlx::query_as::<_, PriceRule>(&format!(
            r#"
            SELECT {RULE_COLUMNS}
            FROM price_rules r
            WHERE r.country_id = ?1 AND r.active = 1
            {EVALUATION_ORDER}
            "#
        ))
        .bind(country_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(country_id, count = rules.len(), "Loaded active price rules");
        Ok(rules)
    }

    /// Gets a rule with its embedded country.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<PriceRuleWithCountry>> {
        let row = sqlx::query_as::<_, RuleWithCountryRow>(&format!(
            r#"
            SELECT {RULE_COLUMNS}, c.name AS country_name, c.code AS country_code
            FROM price_rules r
            LEFT JOIN countries c ON c.id = r.country_id
            WHERE r.id = ?1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PriceRuleWithCountry::from))
    }

    /// Inserts a validated rule and returns it with its country.
    ///
    /// ## Errors
    /// - `Validation(InvalidCountryId)` if `country_id` names no country
    pub async fn create(&self, draft: &PriceRuleDraft) -> DbResult<PriceRuleWithCountry> {
        if !self.country_exists(draft.country_id).await? {
            return Err(DbError::invalid_country());
        }

        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO price_rules (
                country_id, rule_type, value, product_category, product_id,
                min_order_value, active, description, priority, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            RETURNING id
            "#,
        )
        .bind(draft.country_id)
        .bind(draft.rule_type)
        .bind(draft.value)
        .bind(&draft.product_category)
        .bind(&draft.product_id)
        .bind(draft.min_order_value)
        .bind(draft.active)
        .bind(&draft.description)
        .bind(draft.priority)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::ForeignKeyViolation { .. } => DbError::invalid_country(),
            other => other,
        })?;

        debug!(id, country_id = draft.country_id, "Price rule created");
        self.fetch_with_country(id).await
    }

    /// Applies a validated partial update.
    ///
    /// ## Errors
    /// - `NotFound` if no rule has this ID
    /// - `Validation(InvalidCountryId)` if a new `country_id` names no country
    pub async fn update(&self, id: i64, changes: &PriceRuleChanges) -> DbResult<PriceRuleWithCountry> {
        let mut rule = self
            .get_by_id(id)
            .await?
            .map(|listed| listed.rule)
            .ok_or_else(|| DbError::not_found("Price rule", id))?;

        if let Some(country_id) = changes.country_id {
            if !self.country_exists(country_id).await? {
                return Err(DbError::invalid_country());
            }
        }

        rule.apply(changes);
        rule.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE price_rules
            SET country_id = ?1, rule_type = ?2, value = ?3, product_category = ?4,
                product_id = ?5, min_order_value = ?6, active = ?7, description = ?8,
                priority = ?9, updated_at = ?10
            WHERE id = ?11
            "#,
        )
        .bind(rule.country_id)
        .bind(rule.rule_type)
        .bind(rule.value)
        .bind(&rule.product_category)
        .bind(&rule.product_id)
        .bind(rule.min_order_value)
        .bind(rule.active)
        .bind(&rule.description)
        .bind(rule.priority)
        .bind(rule.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        debug!(id, "Price rule updated");
        self.fetch_with_country(id).await
    }

    /// Deletes a rule.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM price_rules WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Price rule", id));
        }

        debug!(id, "Price rule deleted");
        Ok(())
    }

    /// Counts all rules.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM price_rules")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn fetch_with_country(&self, id: i64) -> DbResult<PriceRuleWithCountry> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Price rule", id))
    }

    async fn country_exists(&self, country_id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM countries WHERE id = ?1")
            .bind(country_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use geoprice_core::{
        Country, CountryDraft, PriceRuleChanges, PriceRuleDraft, RuleFilter, RuleType,
        ValidationError,
    };

    async fn setup() -> (Database, Country) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let country = db
            .countries()
            .create(&CountryDraft {
                name: "Turkey".to_string(),
                code: "TR".to_string(),
                active: true,
            })
            .await
            .unwrap();
        (db, country)
    }

    fn draft(country_id: i64, priority: i64) -> PriceRuleDraft {
        PriceRuleDraft {
            country_id,
            rule_type: RuleType::Percentage,
            value: 5.0,
            product_category: "all".to_string(),
            product_id: None,
            min_order_value: 0.0,
            active: true,
            description: Some(String::new()),
            priority,
        }
    }

    #[tokio::test]
    async fn test_create_embeds_country() {
        let (db, tr) = setup().await;

        let created = db.price_rules().create(&draft(tr.id, 10)).await.unwrap();

        assert!(created.rule.id > 0);
        assert_eq!(created.rule.rule_type, RuleType::Percentage);
        assert_eq!(created.rule.description.as_deref(), Some(""));
        let country = created.country.unwrap();
        assert_eq!(country.code, "TR");
        assert_eq!(country.id, tr.id);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_country() {
        let (db, _) = setup().await;

        let err = db.price_rules().create(&draft(999, 0)).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::InvalidCountryId)
        ));
    }

    #[tokio::test]
    async fn test_listing_is_in_evaluation_order() {
        let (db, tr) = setup().await;
        let repo = db.price_rules();

        let low = repo.create(&draft(tr.id, 1)).await.unwrap();
        let high = repo.create(&draft(tr.id, 9)).await.unwrap();
        let tied_newer = repo.create(&draft(tr.id, 1)).await.unwrap();

        let ids: Vec<i64> = repo
            .list_for_country(tr.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![high.rule.id, tied_newer.rule.id, low.rule.id]);
    }

    #[tokio::test]
    async fn test_active_filters() {
        let (db, tr) = setup().await;
        let repo = db.price_rules();

        repo.create(&draft(tr.id, 1)).await.unwrap();
        repo.create(&PriceRuleDraft {
            active: false,
            ..draft(tr.id, 2)
        })
        .await
        .unwrap();

        assert_eq!(repo.list_active_for_country(tr.id).await.unwrap().len(), 1);
        assert_eq!(repo.list_for_country(tr.id).await.unwrap().len(), 2);

        let inactive = repo
            .list(RuleFilter {
                active: Some(false),
                country_id: None,
            })
            .await
            .unwrap();
        assert_eq!(inactive.len(), 1);
        assert!(!inactive[0].rule.active);

        let none = repo
            .list(RuleFilter {
                active: None,
                country_id: Some(tr.id + 1),
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_list_for_unknown_country() {
        let (db, _) = setup().await;

        let err = db.price_rules().list_for_country(404).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_partial() {
        let (db, tr) = setup().await;
        let repo = db.price_rules();

        let created = repo
            .create(&PriceRuleDraft {
                product_id: Some("SKU-1".to_string()),
                ..draft(tr.id, 0)
            })
            .await
            .unwrap();

        let updated = repo
            .update(
                created.rule.id,
                &PriceRuleChanges {
                    rule_type: Some(RuleType::Fixed),
                    value: Some(-2.5),
                    product_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.rule.rule_type, RuleType::Fixed);
        assert_eq!(updated.rule.value, -2.5);
        assert_eq!(updated.rule.product_id, None);
        assert_eq!(updated.rule.priority, 0);
        assert_eq!(updated.rule.created_at, created.rule.created_at);

        let err = repo
            .update(
                created.rule.id,
                &PriceRuleChanges {
                    country_id: Some(777),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = repo.update(12345, &PriceRuleChanges::default()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_country_delete_cascades() {
        let (db, tr) = setup().await;

        let rule = db.price_rules().create(&draft(tr.id, 0)).await.unwrap();
        db.countries().delete(tr.id).await.unwrap();

        assert!(db.price_rules().get_by_id(rule.rule.id).await.unwrap().is_none());
        assert_eq!(db.price_rules().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let (db, tr) = setup().await;
        let repo = db.price_rules();

        let rule = repo.create(&draft(tr.id, 0)).await.unwrap();
        repo.delete(rule.rule.id).await.unwrap();

        assert!(matches!(
            repo.delete(rule.rule.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
