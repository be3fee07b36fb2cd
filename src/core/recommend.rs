use crate::core::error::RecommendError;
use crate::core::gaps::analyze_gaps;
use crate::core::matcher::Matcher;
use crate::core::snapshot::CatalogSnapshot;
use crate::models::{Recommendation, UserProfile};

/// Rank postings, then derive skill gaps from the ranked set
///
/// Pure composition of [`Matcher::find_matches`] and [`analyze_gaps`];
/// errors from either step are returned unchanged.
pub fn recommend(
    matcher: &Matcher,
    profile: &UserProfile,
    snapshot: &CatalogSnapshot,
    top_k: usize,
    top_n: usize,
) -> Result<Recommendation, RecommendError> {
    let matches = matcher.find_matches(profile, snapshot, top_k)?;
    let gaps = analyze_gaps(&matches, snapshot, profile, top_n)?;

    Ok(Recommendation { matches, gaps })
}
