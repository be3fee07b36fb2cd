use std::collections::HashMap;

use crate::core::error::RecommendError;
use crate::core::normalizer::skill_set;
use crate::core::snapshot::CatalogSnapshot;
use crate::models::{MatchResult, SkillGap, UserProfile};

/// Derive the skills the profile lacks for its matched postings
///
/// Only required skills count; preferred skills are nice-to-have and are
/// left out. Each matched posting contributes at most once per skill.
/// Ordering is count descending, then skill ascending, truncated to `top_n`.
///
/// # Errors
/// - `RecommendError::InvalidArgument` when `top_n` is zero
/// - `RecommendError::Validation` when a match names a posting the snapshot lacks
pub fn analyze_gaps(
    matches: &[MatchResult],
    snapshot: &CatalogSnapshot,
    profile: &UserProfile,
    top_n: usize,
) -> Result<Vec<SkillGap>, RecommendError> {
    if top_n < 1 {
        return Err(RecommendError::invalid_argument(format!(
            "top_n must be at least 1, got {}",
            top_n
        )));
    }

    let held = skill_set(&profile.skills);
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for matched in matches {
        let index = snapshot.index_of(matched.posting_id).ok_or_else(|| {
            RecommendError::validation(format!(
                "match references posting {} absent from the snapshot",
                matched.posting_id
            ))
        })?;

        for skill in &index.required {
            if !held.contains(&skill.key) {
                *counts.entry(skill.key.as_str()).or_insert(0) += 1;
            }
        }
    }

    let mut gaps: Vec<SkillGap> = counts
        .into_iter()
        .map(|(skill, count)| SkillGap {
            skill: skill.to_string(),
            count,
        })
        .collect();

    gaps.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.skill.cmp(&b.skill)));
    gaps.truncate(top_n);

    Ok(gaps)
}
