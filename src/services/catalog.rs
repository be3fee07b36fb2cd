use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::{CatalogSnapshot, RecommendError};
use crate::models::{Organization, Posting};
use crate::services::postgres::{PostgresCatalog, PostgresError};

/// Errors that can occur when fetching the catalog or building a snapshot
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PostgreSQL catalog error: {0}")]
    Postgres(#[from] PostgresError),

    #[error("Snapshot rejected: {0}")]
    Snapshot(#[from] RecommendError),
}

/// Raw catalog contents as supplied by a provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub postings: Vec<Posting>,
}

impl CatalogData {
    /// Build an immutable snapshot
    ///
    /// In strict mode any invalid posting fails the build; otherwise invalid
    /// postings are dropped and logged.
    pub fn into_snapshot(self, strict: bool) -> Result<CatalogSnapshot, CatalogError> {
        if strict {
            return Ok(CatalogSnapshot::build(self.organizations, self.postings)?);
        }

        let (snapshot, rejected) =
            CatalogSnapshot::build_lenient(self.organizations, self.postings)?;
        if !rejected.is_empty() {
            tracing::warn!(
                "Dropped {} invalid postings while building snapshot",
                rejected.len()
            );
        }
        Ok(snapshot)
    }
}

/// Catalog provider feeding snapshot builds
#[derive(Clone)]
pub enum CatalogSource {
    /// JSON document with `organizations` and `postings` arrays
    File(PathBuf),
    Postgres(PostgresCatalog),
}

impl CatalogSource {
    /// Stable key identifying this source in the snapshot cache
    pub fn cache_key(&self) -> String {
        match self {
            CatalogSource::File(path) => format!("file:{}", path.display()),
            CatalogSource::Postgres(_) => "postgres".to_string(),
        }
    }

    /// Fetch the current catalog contents
    pub async fn fetch(&self) -> Result<CatalogData, CatalogError> {
        match self {
            CatalogSource::File(path) => load_catalog_file(path).await,
            CatalogSource::Postgres(catalog) => {
                let organizations = catalog.fetch_organizations().await?;
                let postings = catalog.fetch_postings().await?;
                Ok(CatalogData {
                    organizations,
                    postings,
                })
            }
        }
    }

    /// Whether the underlying store is reachable
    pub async fn health_check(&self) -> Result<bool, CatalogError> {
        match self {
            CatalogSource::File(path) => {
                tokio::fs::try_exists(path)
                    .await
                    .map_err(|source| CatalogError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            CatalogSource::Postgres(catalog) => Ok(catalog.health_check().await?),
        }
    }
}

/// Read a JSON catalog file
pub async fn load_catalog_file(path: &Path) -> Result<CatalogData, CatalogError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let data: CatalogData = serde_json::from_slice(&bytes)?;

    tracing::debug!(
        "Loaded catalog file {}: {} organizations, {} postings",
        path.display(),
        data.organizations.len(),
        data.postings.len()
    );

    Ok(data)
}
