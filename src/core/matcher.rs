use std::collections::HashSet;

use crate::core::error::RecommendError;
use crate::core::normalizer::skill_set;
use crate::core::snapshot::{CatalogSnapshot, SkillIndex};
use crate::models::{MatchResult, Posting, ScoringWeights, UserProfile};

/// Scores postings against a user profile and ranks them
///
/// # Scoring
/// score = required_weight * |required ∩ profile|
///       + preferred_weight * |preferred ∩ profile|
///       + seniority_bonus (only when the profile level equals the posting level)
///
/// With the default weights (2, 1, +1) a middle-level profile holding three of
/// a middle posting's required skills scores 2 * 3 + 1 = 7.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    /// Rank postings of the snapshot for the given profile
    ///
    /// Postings scoring zero are discarded. Ordering is score descending,
    /// then posting id ascending, truncated to `top_k`.
    ///
    /// # Errors
    /// `RecommendError::InvalidArgument` when `top_k` is zero.
    pub fn find_matches(
        &self,
        profile: &UserProfile,
        snapshot: &CatalogSnapshot,
        top_k: usize,
    ) -> Result<Vec<MatchResult>, RecommendError> {
        if top_k < 1 {
            return Err(RecommendError::invalid_argument(format!(
                "top_k must be at least 1, got {}",
                top_k
            )));
        }

        let profile_skills = skill_set(&profile.skills);

        let mut matches: Vec<MatchResult> = snapshot
            .indexed()
            .filter_map(|(posting, index)| self.score_posting(posting, index, &profile_skills, profile))
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.posting_id.cmp(&b.posting_id))
        });
        matches.truncate(top_k);

        tracing::debug!(
            "Matched {} of {} postings (top_k: {})",
            matches.len(),
            snapshot.len(),
            top_k
        );

        Ok(matches)
    }

    /// Score a single posting; `None` when nothing matched
    fn score_posting(
        &self,
        posting: &Posting,
        index: &SkillIndex,
        profile_skills: &HashSet<String>,
        profile: &UserProfile,
    ) -> Option<MatchResult> {
        let matched_required: Vec<String> = index
            .required
            .iter()
            .filter(|skill| profile_skills.contains(&skill.key))
            .map(|skill| skill.display.clone())
            .collect();

        let matched_preferred: Vec<String> = index
            .preferred
            .iter()
            .filter(|skill| profile_skills.contains(&skill.key))
            .map(|skill| skill.display.clone())
            .collect();

        let seniority_aligned = profile.seniority == Some(posting.seniority);

        // Scores cap at u32::MAX
        let mut score = weighted(self.weights.required, matched_required.len())
            .saturating_add(weighted(self.weights.preferred, matched_preferred.len()));
        if seniority_aligned {
            score = score.saturating_add(self.weights.seniority_bonus);
        }

        if score == 0 {
            return None;
        }

        tracing::trace!("Posting {} scored {}", posting.id, score);

        Some(MatchResult {
            posting_id: posting.id,
            score,
            matched_required,
            matched_preferred,
            seniority_aligned,
        })
    }
}

fn weighted(weight: u32, matched: usize) -> u32 {
    let matched = u32::try_from(matched).unwrap_or(u32::MAX);
    weight.saturating_mul(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmploymentKind, Organization, SeniorityLevel};

    fn create_posting(
        id: i64,
        required: &[&str],
        preferred: &[&str],
        seniority: SeniorityLevel,
    ) -> Posting {
        Posting {
            id,
            title: format!("Posting {}", id),
            description: String::new(),
            organization_id: 1,
            location: None,
            salary_min: None,
            salary_max: None,
            employment_kind: EmploymentKind::FullTime,
            seniority,
            required_skills: required.iter().map(|s| s.to_string()).collect(),
            preferred_skills: preferred.iter().map(|s| s.to_string()).collect(),
            posted_at: None,
        }
    }

    fn create_snapshot(postings: Vec<Posting>) -> CatalogSnapshot {
        let organization = Organization {
            id: 1,
            name: "TechCorp".to_string(),
            description: None,
            industry: None,
            location: None,
            website: None,
        };
        CatalogSnapshot::build(vec![organization], postings).unwrap()
    }

    #[test]
    fn test_score_with_seniority_bonus() {
        let snapshot = create_snapshot(vec![create_posting(
            1,
            &["Python", "Django", "PostgreSQL", "REST API"],
            &["Docker"],
            SeniorityLevel::Middle,
        )]);
        let profile = UserProfile::new(
            ["Python", "Django", "PostgreSQL"],
            Some(SeniorityLevel::Middle),
        );

        let matches = Matcher::with_default_weights()
            .find_matches(&profile, &snapshot, 5)
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].score, 7);
        assert_eq!(matches[0].matched_required, vec!["Python", "Django", "PostgreSQL"]);
        assert!(matches[0].matched_preferred.is_empty());
        assert!(matches[0].seniority_aligned);
    }

    #[test]
    fn test_preferred_skills_weigh_less() {
        let snapshot = create_snapshot(vec![
            create_posting(1, &["Rust"], &[], SeniorityLevel::Senior),
            create_posting(2, &[], &["Rust"], SeniorityLevel::Senior),
        ]);
        let profile = UserProfile::new(["rust"], None);

        let matches = Matcher::with_default_weights()
            .find_matches(&profile, &snapshot, 5)
            .unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].posting_id, matches[0].score), (1, 2));
        assert_eq!((matches[1].posting_id, matches[1].score), (2, 1));
    }

    #[test]
    fn test_ties_break_on_lower_id() {
        let snapshot = create_snapshot(vec![
            create_posting(4, &["Go", "SQL"], &["Linux"], SeniorityLevel::Junior),
            create_posting(1, &["Go", "SQL"], &["Linux"], SeniorityLevel::Junior),
        ]);
        let profile = UserProfile::new(["Go", "SQL", "Linux"], None);

        let matches = Matcher::with_default_weights()
            .find_matches(&profile, &snapshot, 1)
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].score, 5);
        assert_eq!(matches[0].posting_id, 1);
    }

    #[test]
    fn test_seniority_only_match_counts() {
        let snapshot = create_snapshot(vec![create_posting(1, &["Java"], &[], SeniorityLevel::Lead)]);
        let profile = UserProfile::new(Vec::<String>::new(), Some(SeniorityLevel::Lead));

        let matches = Matcher::with_default_weights()
            .find_matches(&profile, &snapshot, 3)
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].score, 1);
        assert!(matches[0].matched_required.is_empty());
    }

    #[test]
    fn test_zero_scores_discarded() {
        let snapshot = create_snapshot(vec![create_posting(1, &["Java"], &[], SeniorityLevel::Lead)]);
        let profile = UserProfile::new(["Haskell"], Some(SeniorityLevel::Junior));

        let matches = Matcher::with_default_weights()
            .find_matches(&profile, &snapshot, 3)
            .unwrap();

        assert!(matches.is_empty());
    }

    #[test]
    fn test_top_k_zero_is_invalid() {
        let snapshot = create_snapshot(vec![]);
        let result = Matcher::with_default_weights().find_matches(&UserProfile::default(), &snapshot, 0);
        assert!(matches!(result, Err(RecommendError::InvalidArgument(_))));
    }

    #[test]
    fn test_custom_weights() {
        let snapshot = create_snapshot(vec![create_posting(
            1,
            &["Python"],
            &["Docker"],
            SeniorityLevel::Middle,
        )]);
        let profile = UserProfile::new(["Python", "Docker"], Some(SeniorityLevel::Middle));
        let matcher = Matcher::new(ScoringWeights {
            required: 3,
            preferred: 2,
            seniority_bonus: 5,
        });

        let matches = matcher.find_matches(&profile, &snapshot, 1).unwrap();
        assert_eq!(matches[0].score, 10);
    }

    #[test]
    fn test_large_weights_saturate() {
        let snapshot = create_snapshot(vec![
            create_posting(1, &["a", "b"], &[], SeniorityLevel::Senior),
            create_posting(2, &["a"], &[], SeniorityLevel::Senior),
        ]);
        let matcher = Matcher::new(ScoringWeights {
            required: u32::MAX / 2 + 1,
            preferred: 1,
            seniority_bonus: u32::MAX,
        });

        let one = matcher
            .find_matches(&UserProfile::new(["a"], None), &snapshot, 5)
            .unwrap();
        let two = matcher
            .find_matches(&UserProfile::new(["a", "b"], Some(SeniorityLevel::Senior)), &snapshot, 5)
            .unwrap();

        assert_eq!(one[0].score, u32::MAX / 2 + 1);
        assert_eq!(two[0].posting_id, 1);
        assert_eq!(two[0].score, u32::MAX);
        assert!(two[0].score >= one[0].score);
    }
}
