use std::sync::Arc;
use thiserror::Error;
use validator::Validate;

use crate::config::RecommendSettings;
use crate::core::{recommend, CatalogSnapshot, Matcher, PostingFilter, RecommendError};
use crate::models::{
    MatchResult, Organization, Posting, PostingDetails, RankedPosting, Recommendation,
    RecommendRequest, RecommendResponse, UserProfile,
};
use crate::services::cache::{CacheStats, SnapshotCache};
use crate::services::catalog::{CatalogError, CatalogSource};

/// Errors surfaced by the recommendation service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Request validation failed: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    #[error("Catalog unavailable: {0}")]
    Catalog(Arc<CatalogError>),

    #[error(transparent)]
    Recommend(#[from] RecommendError),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },
}

impl From<Arc<CatalogError>> for ServiceError {
    fn from(value: Arc<CatalogError>) -> Self {
        ServiceError::Catalog(value)
    }
}

impl From<CatalogError> for ServiceError {
    fn from(value: CatalogError) -> Self {
        ServiceError::Catalog(Arc::new(value))
    }
}

/// Recommendation service
///
/// Owns the catalog provider, the snapshot cache and the matcher; every
/// request runs against an immutable shared snapshot.
#[derive(Clone)]
pub struct RecommendationService {
    source: CatalogSource,
    cache: SnapshotCache,
    matcher: Matcher,
    settings: RecommendSettings,
    strict: bool,
}

impl RecommendationService {
    pub fn new(
        source: CatalogSource,
        cache: SnapshotCache,
        matcher: Matcher,
        settings: RecommendSettings,
        strict: bool,
    ) -> Self {
        Self {
            source,
            cache,
            matcher,
            settings,
            strict,
        }
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Current catalog snapshot, built from the provider on a cache miss
    pub async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, ServiceError> {
        let source = self.source.clone();
        let strict = self.strict;

        let snapshot = self
            .cache
            .get_or_build(&self.source.cache_key(), async move {
                let data = source.fetch().await?;
                data.into_snapshot(strict)
            })
            .await?;

        Ok(snapshot)
    }

    /// Drop the cached snapshot so the next request sees fresh catalog data
    pub async fn refresh(&self) {
        self.cache.invalidate(&self.source.cache_key()).await;
    }

    /// Validate the request, rank postings and describe the skill gaps
    pub async fn recommend(
        &self,
        request: &RecommendRequest,
    ) -> Result<RecommendResponse, ServiceError> {
        request.validate()?;

        let profile = request.profile();
        let (top_k, top_n) = self.limits(request);

        tracing::info!(
            "Recommending for {} skills (seniority: {:?}, top_k: {}, top_n: {})",
            profile.skills.len(),
            profile.seniority,
            top_k,
            top_n
        );

        let snapshot = self.snapshot().await?;
        let recommendation = self.recommend_profile(&profile, &snapshot, top_k, top_n)?;

        let response = build_response(&snapshot, recommendation);

        tracing::info!(
            "Returning {} matches and {} gaps (from {} postings)",
            response.matches.len(),
            response.gaps.len(),
            response.total_postings
        );

        Ok(response)
    }

    /// Run the recommendation core against an explicit snapshot
    pub fn recommend_profile(
        &self,
        profile: &UserProfile,
        snapshot: &CatalogSnapshot,
        top_k: usize,
        top_n: usize,
    ) -> Result<Recommendation, RecommendError> {
        recommend(&self.matcher, profile, snapshot, top_k, top_n)
    }

    /// Single posting with its organization
    pub async fn posting(&self, id: i64) -> Result<PostingDetails, ServiceError> {
        let snapshot = self.snapshot().await?;
        let posting = snapshot
            .posting(id)
            .ok_or(ServiceError::NotFound { kind: "posting", id })?;

        Ok(PostingDetails {
            posting: posting.clone(),
            organization: snapshot.organization_for_posting(id).cloned(),
        })
    }

    /// All organizations, by ascending id
    pub async fn organizations(&self) -> Result<Vec<Organization>, ServiceError> {
        let snapshot = self.snapshot().await?;
        let mut organizations: Vec<Organization> = snapshot.organizations().cloned().collect();
        organizations.sort_by_key(|o| o.id);
        Ok(organizations)
    }

    pub async fn organization(&self, id: i64) -> Result<Organization, ServiceError> {
        let snapshot = self.snapshot().await?;
        snapshot
            .organization_of(id)
            .cloned()
            .ok_or(ServiceError::NotFound { kind: "organization", id })
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Filtered catalog listing
    pub async fn postings(&self, filter: &PostingFilter) -> Result<Vec<Posting>, ServiceError> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot.filter(filter).into_iter().cloned().collect())
    }

    /// Effective limits: request values or configured defaults, top_k capped
    pub fn limits(&self, request: &RecommendRequest) -> (usize, usize) {
        let top_k = request
            .top_k
            .map(usize::from)
            .unwrap_or(self.settings.default_top_k)
            .min(self.settings.max_top_k);
        let top_n = request
            .top_n
            .map(usize::from)
            .unwrap_or(self.settings.default_top_n);
        (top_k, top_n)
    }
}

/// Attach posting and organization details to each match
pub fn build_response(snapshot: &CatalogSnapshot, recommendation: Recommendation) -> RecommendResponse {
    let matches = recommendation
        .matches
        .into_iter()
        .filter_map(|m| rank_posting(snapshot, m))
        .collect();

    RecommendResponse {
        matches,
        gaps: recommendation.gaps,
        total_postings: snapshot.len(),
        generated_at: chrono::Utc::now(),
    }
}

fn rank_posting(snapshot: &CatalogSnapshot, matched: MatchResult) -> Option<RankedPosting> {
    let posting = snapshot.posting(matched.posting_id)?;
    let organization_name = snapshot
        .organization_of(posting.organization_id)
        .map(|o| o.name.clone())
        .unwrap_or_default();

    Some(RankedPosting {
        posting_id: posting.id,
        title: posting.title.clone(),
        organization_name,
        location: posting.location.clone(),
        seniority: posting.seniority,
        employment_kind: posting.employment_kind,
        salary_min: posting.salary_min,
        salary_max: posting.salary_max,
        score: matched.score,
        matched_required: matched.matched_required,
        matched_preferred: matched.matched_preferred,
        seniority_aligned: matched.seniority_aligned,
    })
}
