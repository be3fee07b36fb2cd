// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{EmploymentKind, MatchResult, Organization, Posting, Recommendation, ScoringWeights, SeniorityLevel, SkillGap, UnknownVariant, UserProfile};
pub use requests::{ChatMessage, ChatRequest, ChatRole, RecommendRequest};
pub use responses::{ChatReply, HealthResponse, PostingDetails, RankedPosting, RecommendResponse};
