// Unit tests for the recommendation core

use vacancy_match::core::{analyze_gaps, normalize, recommend, CatalogSnapshot, Matcher, RecommendError};
use vacancy_match::models::{EmploymentKind, Organization, Posting, SeniorityLevel, UserProfile};

const SKILL_POOL: [&str; 8] = ["Python", "Rust", "Go", "SQL", "Docker", "Kafka", "React", "Git"];

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

fn posting(
    id: i64,
    required: &[&str],
    preferred: &[&str],
    seniority: SeniorityLevel,
) -> Posting {
    Posting {
        id,
        title: format!("Posting {}", id),
        description: "Test posting".to_string(),
        organization_id: 1,
        location: Some("Remote".to_string()),
        salary_min: None,
        salary_max: None,
        employment_kind: EmploymentKind::FullTime,
        seniority,
        required_skills: required.iter().map(|s| s.to_string()).collect(),
        preferred_skills: preferred.iter().map(|s| s.to_string()).collect(),
        posted_at: None,
    }
}

/// Deterministic catalog with overlapping skills and repeated scores
fn generated_snapshot() -> CatalogSnapshot {
    let levels = [
        SeniorityLevel::Junior,
        SeniorityLevel::Middle,
        SeniorityLevel::Senior,
        SeniorityLevel::Lead,
    ];

    let postings = (0..24)
        .rev()
        .map(|i: usize| {
            let required: Vec<&str> = (0..3).map(|j| SKILL_POOL[(i + j) % SKILL_POOL.len()]).collect();
            let preferred: Vec<&str> = vec![SKILL_POOL[(i * 3) % SKILL_POOL.len()]];
            posting(i as i64 + 1, &required, &preferred, levels[i % levels.len()])
        })
        .collect();

    CatalogSnapshot::build(vec![organization(1)], postings).unwrap()
}

fn profiles() -> Vec<UserProfile> {
    vec![
        UserProfile::new(["python"], None),
        UserProfile::new(["Rust", " GO ", "sql"], Some(SeniorityLevel::Senior)),
        UserProfile::new(["Docker", "Kafka", "React", "Git"], Some(SeniorityLevel::Junior)),
        UserProfile::new(Vec::<String>::new(), Some(SeniorityLevel::Lead)),
        UserProfile::new(["COBOL"], None),
    ]
}

#[test]
fn test_scenario_middle_python_developer() {
    let snapshot = CatalogSnapshot::build(
        vec![organization(1)],
        vec![posting(
            1,
            &["Python", "Django", "PostgreSQL", "REST API"],
            &["Docker"],
            SeniorityLevel::Middle,
        )],
    )
    .unwrap();
    let profile = UserProfile::from_raw(["Python", "Django", "PostgreSQL"], Some("middle"));

    let matches = Matcher::with_default_weights()
        .find_matches(&profile, &snapshot, 5)
        .unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].posting_id, 1);
    assert_eq!(matches[0].score, 7);
}

#[test]
fn test_scenario_tie_returns_lower_id() {
    let snapshot = CatalogSnapshot::build(
        vec![organization(1)],
        vec![
            posting(4, &["Go", "SQL"], &["Linux"], SeniorityLevel::Senior),
            posting(1, &["Go", "SQL"], &["Linux"], SeniorityLevel::Senior),
        ],
    )
    .unwrap();
    let profile = UserProfile::new(["Go", "SQL", "Linux"], None);

    let matches = Matcher::with_default_weights()
        .find_matches(&profile, &snapshot, 1)
        .unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].score, 5);
    assert_eq!(matches[0].posting_id, 1);
}

#[test]
fn test_scenario_empty_profile() {
    let matches = Matcher::with_default_weights()
        .find_matches(&UserProfile::default(), &generated_snapshot(), 5)
        .unwrap();
    assert!(matches.is_empty());
}

#[test]
fn test_scenario_single_gap() {
    let snapshot = CatalogSnapshot::build(
        vec![organization(1)],
        vec![posting(1, &["Python", "Git"], &[], SeniorityLevel::Junior)],
    )
    .unwrap();
    let profile = UserProfile::new(["Python"], None);

    let matches = Matcher::with_default_weights()
        .find_matches(&profile, &snapshot, 5)
        .unwrap();
    let gaps = analyze_gaps(&matches, &snapshot, &profile, 5).unwrap();

    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].skill, "git");
    assert_eq!(gaps[0].count, 1);
}

#[test]
fn test_scores_always_positive_and_ordered() {
    let snapshot = generated_snapshot();
    let matcher = Matcher::with_default_weights();

    for profile in profiles() {
        let matches = matcher.find_matches(&profile, &snapshot, 10).unwrap();
        assert!(matches.len() <= 10);

        for m in &matches {
            assert!(m.score > 0, "posting {} returned with zero score", m.posting_id);
        }
        for pair in matches.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.score > b.score || (a.score == b.score && a.posting_id < b.posting_id),
                "bad ordering: {:?} before {:?}",
                (a.posting_id, a.score),
                (b.posting_id, b.score)
            );
        }
    }
}

#[test]
fn test_matching_is_deterministic() {
    let snapshot = generated_snapshot();
    let matcher = Matcher::with_default_weights();

    for profile in profiles() {
        let first = matcher.find_matches(&profile, &snapshot, 24).unwrap();
        let second = matcher.find_matches(&profile, &snapshot, 24).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_adding_required_skill_never_lowers_score() {
    let snapshot = generated_snapshot();
    let matcher = Matcher::with_default_weights();

    for base in profiles() {
        let before = matcher.find_matches(&base, &snapshot, 24).unwrap();

        for target in snapshot.postings() {
            for skill in &target.required_skills {
                let mut extended = base.clone();
                extended.skills.push(skill.clone());
                let after = matcher.find_matches(&extended, &snapshot, 24).unwrap();

                let score_of = |results: &[vacancy_match::MatchResult]| {
                    results
                        .iter()
                        .find(|m| m.posting_id == target.id)
                        .map(|m| m.score)
                        .unwrap_or(0)
                };
                assert!(score_of(&after) >= score_of(&before));
                assert!(score_of(&after) > 0);
            }
        }
    }
}

#[test]
fn test_gaps_never_contain_profile_skills() {
    let snapshot = generated_snapshot();
    let matcher = Matcher::with_default_weights();

    for profile in profiles() {
        let result = recommend(&matcher, &profile, &snapshot, 10, 10).unwrap();
        let held: Vec<String> = profile.skills.iter().map(|s| normalize(s)).collect();

        for gap in &result.gaps {
            assert!(!held.contains(&gap.skill), "gap {} is held by the profile", gap.skill);
            assert!(gap.count >= 1 && gap.count <= result.matches.len());
        }
        for pair in result.gaps.windows(2) {
            assert!(
                pair[0].count > pair[1].count
                    || (pair[0].count == pair[1].count && pair[0].skill < pair[1].skill)
            );
        }
    }
}

#[test]
fn test_invalid_limits() {
    let snapshot = generated_snapshot();
    let profile = UserProfile::new(["Rust"], None);

    assert!(matches!(
        Matcher::default().find_matches(&profile, &snapshot, 0),
        Err(RecommendError::InvalidArgument(_))
    ));
    assert!(matches!(
        recommend(&Matcher::default(), &profile, &snapshot, 3, 0),
        Err(RecommendError::InvalidArgument(_))
    ));
}

#[test]
fn test_dangling_organization_rejected() {
    let mut orphan = posting(9, &["Rust"], &[], SeniorityLevel::Lead);
    orphan.organization_id = 42;

    let result = CatalogSnapshot::build(vec![organization(1)], vec![orphan]);
    assert!(matches!(result, Err(RecommendError::Validation(_))));
}

#[test]
fn test_snapshot_shared_across_threads() {
    let snapshot = std::sync::Arc::new(generated_snapshot());
    let matcher = Matcher::with_default_weights();
    let expected = matcher
        .find_matches(&UserProfile::new(["Rust", "SQL"], None), &snapshot, 5)
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let snapshot = snapshot.clone();
            let matcher = matcher.clone();
            std::thread::spawn(move || {
                matcher
                    .find_matches(&UserProfile::new(["Rust", "SQL"], None), &snapshot, 5)
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
