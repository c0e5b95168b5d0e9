use std::collections::BTreeSet;

/// Lowercases and trims each skill, dropping blank entries. Order is preserved.
pub fn normalize_skills<S: AsRef<str>>(skills: &[S]) -> Vec<String> {
    skills
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Normalized skills as an ordered set, so downstream lists come out sorted.
pub fn skill_set<S: AsRef<str>>(skills: &[S]) -> BTreeSet<String> {
    normalize_skills(skills).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims() {
        let skills = vec!["  Python ", "RUST", "Machine Learning"];
        assert_eq!(
            normalize_skills(&skills),
            vec!["python", "rust", "machine learning"]
        );
    }

    #[test]
    fn test_drops_blank_entries() {
        let skills = vec!["", "   ", "\t", "go"];
        assert_eq!(normalize_skills(&skills), vec!["go"]);
    }

    #[test]
    fn test_keeps_duplicates_until_set_conversion() {
        let skills = vec!["Python", "python ", "PYTHON"];
        assert_eq!(normalize_skills(&skills).len(), 3);
        assert_eq!(skill_set(&skills).len(), 1);
    }
}
