// Recommendation core exports
pub mod error;
pub mod gaps;
pub mod matcher;
pub mod normalizer;
pub mod recommend;
pub mod snapshot;

pub use error::RecommendError;
pub use gaps::analyze_gaps;
pub use matcher::Matcher;
pub use normalizer::{normalize, normalize_all};
pub use recommend::recommend;
pub use snapshot::{CatalogSnapshot, PostingFilter};
