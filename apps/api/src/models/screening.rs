use serde::{Deserialize, Serialize};

/// Hiring requirements a batch of resumes is scored against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreeningCriteria {
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub min_years_experience: Option<i32>,
    #[serde(default)]
    pub required_education_level: Option<String>,
    /// Accepted and echoed back, not consumed by scoring.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Outcome of screening one resume. Built fresh per call, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    /// Generated per screening; not stable across repeated screenings.
    pub resume_id: String,
    pub candidate_name: String,
    pub candidate_email: String,
    pub overall_score: f64,
    pub skills_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub matched_required_skills: Vec<String>,
    pub matched_preferred_skills: Vec<String>,
    pub missing_required_skills: Vec<String>,
    pub recommendations: Vec<String>,
    pub qualified: bool,
}
