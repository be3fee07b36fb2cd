// Service exports
pub mod cache;
pub mod catalog;
pub mod llm;
pub mod postgres;
pub mod recommendations;

pub use cache::{CacheStats, SnapshotCache};
pub use catalog::{load_catalog_file, CatalogData, CatalogError, CatalogSource};
pub use llm::{GenerationOptions, LlmClient, LlmError};
pub use postgres::{PostgresCatalog, PostgresError};
pub use recommendations::{RecommendationService, ServiceError};
