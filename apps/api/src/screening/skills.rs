use crate::screening::normalize::skill_set;

/// Share of the skills score carried by required skills.
const REQUIRED_WEIGHT: f64 = 0.8;
/// Share of the skills score carried by preferred skills.
const PREFERRED_WEIGHT: f64 = 0.2;

/// Skills comparison between a resume and the criteria.
/// All lists hold normalized (lowercase, trimmed) skills in sorted order.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillsMatch {
    /// 0 – 100, unrounded.
    pub score: f64,
    pub matched_required: Vec<String>,
    pub matched_preferred: Vec<String>,
    pub missing_required: Vec<String>,
}

/// Set-based skills match.
///
/// An empty required list yields a required component of 0, not 1: the
/// denominator is `max(|required|, 1)`. With no required skills the score is
/// therefore capped at the preferred share (20).
pub fn match_skills<S: AsRef<str>>(
    resume_skills: &[S],
    required: &[S],
    preferred: &[S],
) -> SkillsMatch {
    let resume = skill_set(resume_skills);
    let required = skill_set(required);
    let preferred = skill_set(preferred);

    let matched_required: Vec<String> = required.intersection(&resume).cloned().collect();
    let matched_preferred: Vec<String> = preferred.intersection(&resume).cloned().collect();
    let missing_required: Vec<String> = required.difference(&resume).cloned().collect();

    let required_score = matched_required.len() as f64 / required.len().max(1) as f64;
    let preferred_score = if preferred.is_empty() {
        0.0
    } else {
        matched_preferred.len() as f64 / preferred.len() as f64
    };

    SkillsMatch {
        score: (required_score * REQUIRED_WEIGHT + preferred_score * PREFERRED_WEIGHT) * 100.0,
        matched_required,
        matched_preferred,
        missing_required,
    }
}
