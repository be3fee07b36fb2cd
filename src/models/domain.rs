use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::normalizer::normalize;

/// Organization owning one or more postings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Job posting as supplied by the catalog store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "organizationId")]
    pub organization_id: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "salaryMin", default)]
    pub salary_min: Option<i64>,
    #[serde(rename = "salaryMax", default)]
    pub salary_max: Option<i64>,
    #[serde(rename = "employmentKind")]
    pub employment_kind: EmploymentKind,
    pub seniority: SeniorityLevel,
    #[serde(rename = "requiredSkills", default)]
    pub required_skills: Vec<String>,
    #[serde(rename = "preferredSkills", default)]
    pub preferred_skills: Vec<String>,
    #[serde(rename = "postedAt", default)]
    pub posted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Employment kind of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentKind {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl EmploymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentKind::FullTime => "full_time",
            EmploymentKind::PartTime => "part_time",
            EmploymentKind::Contract => "contract",
            EmploymentKind::Internship => "internship",
        }
    }
}

impl fmt::Display for EmploymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmploymentKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "full_time" | "full-time" | "fulltime" | "full time" => Ok(EmploymentKind::FullTime),
            "part_time" | "part-time" | "parttime" | "part time" => Ok(EmploymentKind::PartTime),
            "contract" => Ok(EmploymentKind::Contract),
            "internship" => Ok(EmploymentKind::Internship),
            _ => Err(UnknownVariant::new("employment kind", s)),
        }
    }
}

/// Seniority level shared by postings and user profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeniorityLevel {
    Junior,
    Middle,
    Senior,
    Lead,
}

impl SeniorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeniorityLevel::Junior => "junior",
            SeniorityLevel::Middle => "middle",
            SeniorityLevel::Senior => "senior",
            SeniorityLevel::Lead => "lead",
        }
    }

    /// Parse a caller-supplied level, mapping unrecognized values to `None`
    pub fn parse_lenient(value: &str) -> Option<Self> {
        value.parse().ok()
    }
}

impl fmt::Display for SeniorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeniorityLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "junior" => Ok(SeniorityLevel::Junior),
            "middle" | "mid" => Ok(SeniorityLevel::Middle),
            "senior" => Ok(SeniorityLevel::Senior),
            "lead" => Ok(SeniorityLevel::Lead),
            _ => Err(UnknownVariant::new("seniority level", s)),
        }
    }
}

/// Raised when a string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Per-request user profile
///
/// Skills are kept as supplied; the matcher normalizes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub seniority: Option<SeniorityLevel>,
}

impl UserProfile {
    pub fn new<I, S>(skills: I, seniority: Option<SeniorityLevel>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skills: skills.into_iter().map(Into::into).collect(),
            seniority,
        }
    }

    /// Build a profile from raw caller input; an unrecognized level counts as unset
    pub fn from_raw<I, S>(skills: I, seniority: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(skills, seniority.and_then(SeniorityLevel::parse_lenient))
    }
}

/// Scored posting returned by the matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "postingId")]
    pub posting_id: i64,
    pub score: u32,
    #[serde(rename = "matchedRequired")]
    pub matched_required: Vec<String>,
    #[serde(rename = "matchedPreferred")]
    pub matched_preferred: Vec<String>,
    #[serde(rename = "seniorityAligned")]
    pub seniority_aligned: bool,
}

/// Skill required by matched postings but missing from the profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    pub count: usize,
}

/// Combined output of the recommendation facade
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub matches: Vec<MatchResult>,
    pub gaps: Vec<SkillGap>,
}

/// Scoring weights
///
/// Unsigned so that adding a matching skill can never lower a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub required: u32,
    pub preferred: u32,
    pub seniority_bonus: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            required: 2,
            preferred: 1,
            seniority_bonus: 1,
        }
    }
}
