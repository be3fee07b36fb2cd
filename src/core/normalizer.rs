use std::collections::HashSet;

/// Canonicalize a free-text skill token for comparison
///
/// Trims leading/trailing Unicode whitespace, then applies Rust's
/// `str::to_lowercase` (Unicode default case mapping, no locale rules).
/// `"  PostgreSQL "` becomes `"postgresql"`. Empty input yields an empty string.
#[inline]
pub fn normalize(token: &str) -> String {
    token.trim().to_lowercase()
}

/// Normalize a sequence of tokens, dropping empties and duplicates
///
/// First-seen order is preserved.
pub fn normalize_all<I, S>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .map(|token| normalize(token.as_ref()))
        .filter(|skill| !skill.is_empty() && seen.insert(skill.clone()))
        .collect()
}

/// Normalized skill set used for O(1) membership tests
pub fn skill_set<I, S>(tokens: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    normalize_all(tokens).into_iter().collect()
}
