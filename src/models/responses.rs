use serde::{Deserialize, Serialize};

use crate::models::domain::{EmploymentKind, Organization, Posting, SeniorityLevel, SkillGap};

/// Match result enriched with the posting details shown to users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPosting {
    #[serde(rename = "postingId")]
    pub posting_id: i64,
    pub title: String,
    #[serde(rename = "organizationName")]
    pub organization_name: String,
    pub location: Option<String>,
    pub seniority: SeniorityLevel,
    #[serde(rename = "employmentKind")]
    pub employment_kind: EmploymentKind,
    #[serde(rename = "salaryMin")]
    pub salary_min: Option<i64>,
    #[serde(rename = "salaryMax")]
    pub salary_max: Option<i64>,
    pub score: u32,
    #[serde(rename = "matchedRequired")]
    pub matched_required: Vec<String>,
    #[serde(rename = "matchedPreferred")]
    pub matched_preferred: Vec<String>,
    #[serde(rename = "seniorityAligned")]
    pub seniority_aligned: bool,
}

/// Posting together with the organization offering it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingDetails {
    #[serde(flatten)]
    pub posting: Posting,
    pub organization: Option<Organization>,
}

/// Response for a recommendation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub matches: Vec<RankedPosting>,
    pub gaps: Vec<SkillGap>,
    #[serde(rename = "totalPostings")]
    pub total_postings: usize,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Reply from the career assistant
///
/// `suggested_postings` and `skill_recommendations` come from the
/// recommendation core, not from the generated text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(rename = "suggestedPostings")]
    pub suggested_postings: Vec<i64>,
    #[serde(rename = "skillRecommendations")]
    pub skill_recommendations: Vec<String>,
}

/// Catalog health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub postings: usize,
    pub organizations: usize,
    #[serde(rename = "snapshotBuiltAt")]
    pub snapshot_built_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "cachedSnapshots")]
    pub cached_snapshots: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
