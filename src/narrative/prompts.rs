use std::fmt::Write;

use crate::core::CatalogSnapshot;
use crate::models::{Recommendation, UserProfile};

pub const ASSISTANT_PROMPT: &str = "You are a helpful assistant for a job board listing vacancies and companies.
Your job:
1. Help users find vacancies that fit their skills, experience and preferences
2. Answer questions about vacancies, companies, requirements and working conditions
3. Recommend skills worth developing for specific vacancies

Be friendly, professional and concise. When the user asks about vacancies, rely on the
vacancy list and the ranked matches below; never invent vacancies or ids.
Reply in the language the user writes in.";

/// System prompt listing the first `limit` postings of the catalog by id
pub fn catalog_prompt(snapshot: &CatalogSnapshot, limit: usize) -> String {
    let mut prompt = String::from(ASSISTANT_PROMPT);
    if snapshot.is_empty() || limit == 0 {
        return prompt;
    }

    let mut postings: Vec<_> = snapshot.postings().iter().collect();
    postings.sort_by_key(|p| p.id);

    prompt.push_str("\n\nAvailable vacancies:\n");
    for posting in postings.into_iter().take(limit) {
        let organization = snapshot
            .organization_of(posting.organization_id)
            .map(|o| o.name.as_str())
            .unwrap_or("N/A");
        let _ = writeln!(
            prompt,
            "- ID {}: {} at {}. Skills: {}. Level: {}",
            posting.id,
            posting.title,
            organization,
            posting.required_skills.join(", "),
            posting.seniority
        );
    }

    prompt
}

/// Grounding message carrying the profile and the core's ranked output
pub fn grounding_prompt(
    profile: &UserProfile,
    recommendation: &Recommendation,
    snapshot: &CatalogSnapshot,
) -> String {
    let mut prompt = String::from("User information:\n");

    let skills = profile
        .skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();
    if skills.is_empty() {
        prompt.push_str("Skills: not specified\n");
    } else {
        let _ = writeln!(prompt, "Skills: {}", skills.join(", "));
    }
    match profile.seniority {
        Some(level) => {
            let _ = writeln!(prompt, "Experience level: {}", level);
        }
        None => prompt.push_str("Experience level: not specified\n"),
    }

    if recommendation.matches.is_empty() {
        prompt.push_str("\nNo vacancy matches the user's skills yet.\n");
    } else {
        prompt.push_str("\nBest matching vacancies (highest score first):\n");
        for matched in &recommendation.matches {
            let title = snapshot
                .posting(matched.posting_id)
                .map(|p| p.title.as_str())
                .unwrap_or("unknown");
            let mut matched_skills = matched.matched_required.clone();
            matched_skills.extend(matched.matched_preferred.iter().cloned());
            let _ = writeln!(
                prompt,
                "- ID {}: {} (score {}; matched: {})",
                matched.posting_id,
                title,
                matched.score,
                if matched_skills.is_empty() {
                    "experience level only".to_string()
                } else {
                    matched_skills.join(", ")
                }
            );
        }
    }

    if !recommendation.gaps.is_empty() {
        prompt.push_str("\nSkills to develop (required by matched vacancies, missing from the profile):\n");
        for gap in &recommendation.gaps {
            let noun = if gap.count == 1 { "vacancy" } else { "vacancies" };
            let _ = writeln!(prompt, "- {} (required by {} {})", gap.skill, gap.count, noun);
        }
    }

    prompt
}
