use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::core::error::RecommendError;
use crate::core::normalizer::{normalize, skill_set};
use crate::models::{EmploymentKind, Organization, Posting, SeniorityLevel};

/// One skill of a posting: the spelling shown to users and its normalized key
#[derive(Debug, Clone)]
pub(crate) struct IndexedSkill {
    pub display: String,
    pub key: String,
}

/// Normalized skill index of one posting
#[derive(Debug, Clone, Default)]
pub(crate) struct SkillIndex {
    pub required: Vec<IndexedSkill>,
    pub preferred: Vec<IndexedSkill>,
    pub combined: HashSet<String>,
}

impl SkillIndex {
    fn build(posting: &Posting) -> Self {
        let required = index_skills(&posting.required_skills);
        let preferred = index_skills(&posting.preferred_skills);
        let combined = required
            .iter()
            .chain(preferred.iter())
            .map(|s| s.key.clone())
            .collect();

        Self {
            required,
            preferred,
            combined,
        }
    }
}

/// Dedup a posting's skills by normalized key, keeping the first spelling
fn index_skills(skills: &[String]) -> Vec<IndexedSkill> {
    let mut seen = HashSet::new();
    skills
        .iter()
        .filter_map(|raw| {
            let key = normalize(raw);
            if key.is_empty() || !seen.insert(key.clone()) {
                return None;
            }
            Some(IndexedSkill {
                display: raw.trim().to_string(),
                key,
            })
        })
        .collect()
}

/// Immutable point-in-time view of the catalog
///
/// There are no mutation methods: a refresh builds a new snapshot, and
/// readers share it (usually behind an `Arc`) across threads.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    postings: Vec<Posting>,
    indexes: Vec<SkillIndex>,
    positions: HashMap<i64, usize>,
    organizations: HashMap<i64, Organization>,
    built_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    /// Build a snapshot, failing on the first invalid input
    ///
    /// Rejects dangling organization references, duplicate identifiers and
    /// inverted salary bounds with `RecommendError::Validation`.
    pub fn build(
        organizations: Vec<Organization>,
        postings: Vec<Posting>,
    ) -> Result<Self, RecommendError> {
        let organizations = index_organizations(organizations)?;

        let mut seen_ids = HashSet::with_capacity(postings.len());
        for posting in &postings {
            validate_posting(posting, &organizations, &mut seen_ids)?;
        }

        Ok(Self::assemble(organizations, postings))
    }

    /// Build a snapshot, dropping invalid postings instead of failing
    ///
    /// Returns the snapshot together with the rejected posting ids and the
    /// reason each was dropped. Duplicate organization ids still fail.
    pub fn build_lenient(
        organizations: Vec<Organization>,
        postings: Vec<Posting>,
    ) -> Result<(Self, Vec<(i64, RecommendError)>), RecommendError> {
        let organizations = index_organizations(organizations)?;

        let mut seen_ids = HashSet::with_capacity(postings.len());
        let mut rejected = Vec::new();
        let mut accepted = Vec::with_capacity(postings.len());

        for posting in postings {
            match validate_posting(&posting, &organizations, &mut seen_ids) {
                Ok(()) => accepted.push(posting),
                Err(e) => {
                    tracing::warn!("Dropping posting {} from snapshot: {}", posting.id, e);
                    rejected.push((posting.id, e));
                }
            }
        }

        Ok((Self::assemble(organizations, accepted), rejected))
    }

    fn assemble(organizations: HashMap<i64, Organization>, postings: Vec<Posting>) -> Self {
        let indexes = postings.iter().map(SkillIndex::build).collect();
        let positions = postings
            .iter()
            .enumerate()
            .map(|(position, posting)| (posting.id, position))
            .collect();

        tracing::debug!(
            "Built catalog snapshot: {} postings, {} organizations",
            postings.len(),
            organizations.len()
        );

        Self {
            postings,
            indexes,
            positions,
            organizations,
            built_at: Utc::now(),
        }
    }

    /// All postings, in the order supplied by the catalog provider
    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    pub fn posting(&self, id: i64) -> Option<&Posting> {
        self.positions.get(&id).map(|&position| &self.postings[position])
    }

    pub fn organization_of(&self, id: i64) -> Option<&Organization> {
        self.organizations.get(&id)
    }

    /// Organization owning the given posting
    pub fn organization_for_posting(&self, posting_id: i64) -> Option<&Organization> {
        self.posting(posting_id)
            .and_then(|posting| self.organization_of(posting.organization_id))
    }

    pub fn organizations(&self) -> impl Iterator<Item = &Organization> {
        self.organizations.values()
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Postings paired with their skill index
    pub(crate) fn indexed(&self) -> impl Iterator<Item = (&Posting, &SkillIndex)> {
        self.postings.iter().zip(self.indexes.iter())
    }

    pub(crate) fn index_of(&self, posting_id: i64) -> Option<&SkillIndex> {
        self.positions
            .get(&posting_id)
            .map(|&position| &self.indexes[position])
    }

    /// Postings satisfying every constraint of the filter, by ascending id
    pub fn filter(&self, filter: &PostingFilter) -> Vec<&Posting> {
        let wanted_skills = skill_set(&filter.skills);
        let location = filter.location.as_deref().map(normalize);

        let mut found: Vec<&Posting> = self
            .indexed()
            .filter(|(posting, index)| {
                if let Some(location) = &location {
                    let posting_location = posting.location.as_deref().map(normalize);
                    if posting_location.as_ref() != Some(location) {
                        return false;
                    }
                }

                if filter.seniority.is_some_and(|level| level != posting.seniority) {
                    return false;
                }

                if filter
                    .employment_kind
                    .is_some_and(|kind| kind != posting.employment_kind)
                {
                    return false;
                }

                if filter
                    .organization_id
                    .is_some_and(|org| org != posting.organization_id)
                {
                    return false;
                }

                if let Some(min_salary) = filter.min_salary {
                    match posting.salary_max.or(posting.salary_min) {
                        Some(top) if top >= min_salary => {}
                        _ => return false,
                    }
                }

                wanted_skills.is_empty() || wanted_skills.iter().any(|s| index.combined.contains(s))
            })
            .map(|(posting, _)| posting)
            .collect();

        found.sort_by_key(|posting| posting.id);
        found
    }
}

/// Listing filter over a snapshot; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct PostingFilter {
    pub location: Option<String>,
    pub seniority: Option<SeniorityLevel>,
    pub employment_kind: Option<EmploymentKind>,
    pub organization_id: Option<i64>,
    /// Matches postings listing any of these skills
    pub skills: Vec<String>,
    pub min_salary: Option<i64>,
}

fn index_organizations(
    organizations: Vec<Organization>,
) -> Result<HashMap<i64, Organization>, RecommendError> {
    let mut indexed = HashMap::with_capacity(organizations.len());
    for organization in organizations {
        let id = organization.id;
        if indexed.insert(id, organization).is_some() {
            return Err(RecommendError::validation(format!(
                "duplicate organization id {}",
                id
            )));
        }
    }
    Ok(indexed)
}

fn validate_posting(
    posting: &Posting,
    organizations: &HashMap<i64, Organization>,
    seen_ids: &mut HashSet<i64>,
) -> Result<(), RecommendError> {
    if !organizations.contains_key(&posting.organization_id) {
        return Err(RecommendError::validation(format!(
            "posting {} references unknown organization {}",
            posting.id, posting.organization_id
        )));
    }

    if let (Some(min), Some(max)) = (posting.salary_min, posting.salary_max) {
        if min > max {
            return Err(RecommendError::validation(format!(
                "posting {} has salary_min {} above salary_max {}",
                posting.id, min, max
            )));
        }
    }

    if !seen_ids.insert(posting.id) {
        return Err(RecommendError::validation(format!(
            "duplicate posting id {}",
            posting.id
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn organization(id: i64) -> Organization {
        Organization {
            id,
            name: format!("Org {}", id),
            description: None,
            industry: None,
            location: None,
            website: None,
        }
    }

    fn posting(id: i64, organization_id: i64, required: &[&str], preferred: &[&str]) -> Posting {
        Posting {
            id,
            title: format!("Posting {}", id),
            description: String::new(),
            organization_id,
            location: Some("Berlin".to_string()),
            salary_min: Some(1000),
            salary_max: Some(2000),
            employment_kind: EmploymentKind::FullTime,
            seniority: SeniorityLevel::Middle,
            required_skills: required.iter().map(|s| s.to_string()).collect(),
            preferred_skills: preferred.iter().map(|s| s.to_string()).collect(),
            posted_at: None,
        }
    }

    #[test]
    fn test_build_indexes_skills() {
        let snapshot = CatalogSnapshot::build(
            vec![organization(1)],
            vec![posting(1, 1, &["Python", " python ", "Git"], &["Docker"])],
        )
        .unwrap();

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.index_of(99).is_none());

        let index = snapshot.index_of(1).unwrap();
        assert!(index.combined.contains("python"));
        assert!(index.combined.contains("docker"));
        assert!(!index.combined.contains("rust"));
        assert_eq!(index.required.len(), 2);
        assert_eq!(index.required[0].display, "Python");
    }

    #[test]
    fn test_build_rejects_dangling_organization() {
        let result = CatalogSnapshot::build(vec![organization(1)], vec![posting(1, 2, &[], &[])]);
        assert!(matches!(result, Err(RecommendError::Validation(_))));
    }

    #[test]
    fn test_build_rejects_duplicates_and_bad_salary() {
        let duplicate = CatalogSnapshot::build(
            vec![organization(1)],
            vec![posting(1, 1, &[], &[]), posting(1, 1, &[], &[])],
        );
        assert!(matches!(duplicate, Err(RecommendError::Validation(_))));

        let mut inverted = posting(2, 1, &[], &[]);
        inverted.salary_min = Some(5000);
        let salary = CatalogSnapshot::build(vec![organization(1)], vec![inverted]);
        assert!(matches!(salary, Err(RecommendError::Validation(_))));

        let orgs = CatalogSnapshot::build(vec![organization(1), organization(1)], vec![]);
        assert!(matches!(orgs, Err(RecommendError::Validation(_))));
    }

    #[test]
    fn test_build_lenient_drops_invalid_postings() {
        let (snapshot, rejected) = CatalogSnapshot::build_lenient(
            vec![organization(1)],
            vec![posting(1, 1, &[], &[]), posting(2, 9, &[], &[])],
        )
        .unwrap();

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.posting(1).is_some());
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].0, 2);
    }

    #[test]
    fn test_organization_lookup() {
        let snapshot =
            CatalogSnapshot::build(vec![organization(3)], vec![posting(5, 3, &[], &[])]).unwrap();

        assert_eq!(snapshot.organization_of(3).unwrap().name, "Org 3");
        assert!(snapshot.organization_of(4).is_none());
        assert_eq!(snapshot.organization_for_posting(5).unwrap().id, 3);
    }

    #[test]
    fn test_filter() {
        let mut senior = posting(3, 2, &["Rust"], &[]);
        senior.seniority = SeniorityLevel::Senior;
        senior.location = Some("Paris".to_string());
        senior.salary_max = Some(9000);

        let snapshot = CatalogSnapshot::build(
            vec![organization(1), organization(2)],
            vec![posting(2, 1, &["Python"], &["Docker"]), senior, posting(1, 1, &["Go"], &[])],
        )
        .unwrap();

        let all: Vec<i64> = snapshot
            .filter(&PostingFilter::default())
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(all, vec![1, 2, 3]);

        let by_location = snapshot.filter(&PostingFilter {
            location: Some("paris".to_string()),
            ..Default::default()
        });
        assert_eq!(by_location.len(), 1);
        assert_eq!(by_location[0].id, 3);

        let by_skill = snapshot.filter(&PostingFilter {
            skills: vec!["DOCKER".to_string(), "go".to_string()],
            ..Default::default()
        });
        let ids: Vec<i64> = by_skill.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let by_level_and_org = snapshot.filter(&PostingFilter {
            seniority: Some(SeniorityLevel::Middle),
            organization_id: Some(1),
            ..Default::default()
        });
        assert_eq!(by_level_and_org.len(), 2);

        let by_salary = snapshot.filter(&PostingFilter {
            min_salary: Some(5000),
            ..Default::default()
        });
        assert_eq!(by_salary.len(), 1);
        assert_eq!(by_salary[0].id, 3);
    }
}
