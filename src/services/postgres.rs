use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{EmploymentKind, Organization, Posting, SeniorityLevel, UnknownVariant};

/// Errors that can occur when reading the catalog from PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Invalid row in {table} (id {id}): {source}")]
    InvalidRow {
        table: &'static str,
        id: i64,
        #[source]
        source: UnknownVariant,
    },
}

/// PostgreSQL catalog provider
///
/// Reads organizations and active postings to build catalog snapshots.
/// The schema is owned by the catalog store:
///
/// - `organizations(id BIGINT, name TEXT, description TEXT, industry TEXT, location TEXT, website TEXT)`
/// - `postings(id BIGINT, title TEXT, description TEXT, organization_id BIGINT, location TEXT,
///   salary_min BIGINT, salary_max BIGINT, employment_kind TEXT, seniority TEXT,
///   required_skills TEXT[], preferred_skills TEXT[], posted_at TIMESTAMPTZ, is_active BOOLEAN)`
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Create a new catalog provider from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new catalog provider from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL catalog");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Fetch all organizations
    pub async fn fetch_organizations(&self) -> Result<Vec<Organization>, PostgresError> {
        let query = r#"
            SELECT id, name, description, industry, location, website
            FROM organizations
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let organizations: Vec<Organization> = rows
            .iter()
            .map(|row| Organization {
                id: row.get("id"),
                name: row.get("name"),
                description: row.get("description"),
                industry: row.get("industry"),
                location: row.get("location"),
                website: row.get("website"),
            })
            .collect();

        tracing::debug!("Fetched {} organizations", organizations.len());

        Ok(organizations)
    }

    /// Fetch all active postings
    pub async fn fetch_postings(&self) -> Result<Vec<Posting>, PostgresError> {
        let query = r#"
            SELECT id, title, description, organization_id, location,
                   salary_min, salary_max, employment_kind, seniority,
                   required_skills, preferred_skills, posted_at
            FROM postings
            WHERE is_active = TRUE
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let postings = rows
            .iter()
            .map(posting_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Fetched {} active postings", postings.len());

        Ok(postings)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn posting_from_row(row: &PgRow) -> Result<Posting, PostgresError> {
    let id: i64 = row.try_get("id")?;

    let invalid = |source: UnknownVariant| PostgresError::InvalidRow {
        table: "postings",
        id,
        source,
    };

    let employment_kind: String = row.try_get("employment_kind")?;
    let seniority: String = row.try_get("seniority")?;
    let required_skills: Option<Vec<String>> = row.try_get("required_skills")?;
    let preferred_skills: Option<Vec<String>> = row.try_get("preferred_skills")?;
    let description: Option<String> = row.try_get("description")?;

    Ok(Posting {
        id,
        title: row.try_get("title")?,
        description: description.unwrap_or_default(),
        organization_id: row.try_get("organization_id")?,
        location: row.try_get("location")?,
        salary_min: row.try_get("salary_min")?,
        salary_max: row.try_get("salary_max")?,
        employment_kind: employment_kind.parse::<EmploymentKind>().map_err(invalid)?,
        seniority: seniority.parse::<SeniorityLevel>().map_err(invalid)?,
        required_skills: required_skills.unwrap_or_default(),
        preferred_skills: preferred_skills.unwrap_or_default(),
        posted_at: row.try_get("posted_at")?,
    })
}
