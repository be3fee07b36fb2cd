//! Vacancy Match - skill-based job posting recommendations
//!
//! Ranks job postings against a user's skills and seniority, and derives the
//! skills the user would need for the best matches. The core works on an
//! immutable catalog snapshot and performs no I/O; the service layer loads
//! catalogs, caches snapshots and talks to the text-generation API.

pub mod config;
pub mod core;
pub mod models;
pub mod narrative;
pub mod services;

// Re-export commonly used types
pub use core::{analyze_gaps, normalize, recommend, CatalogSnapshot, Matcher, PostingFilter, RecommendError};
pub use models::{MatchResult, Organization, Posting, Recommendation, ScoringWeights, SeniorityLevel, SkillGap, UserProfile};
