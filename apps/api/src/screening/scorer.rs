use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::models::resume::Resume;
use crate::models::screening::{ScreeningCriteria, ScreeningResult};
use crate::screening::education::score_education;
use crate::screening::experience::{score_experience, EntryCountEstimator, ExperienceEstimator};
use crate::screening::recommendations::build_recommendations;
use crate::screening::skills::match_skills;

/// Overall score needed (with no missing required skills) to qualify.
pub const QUALIFYING_SCORE: f64 = 60.0;

/// Ceiling of the accomplishments bonus, in score points.
const MAX_ACCOMPLISHMENTS_BONUS: f64 = 10.0;
/// Characters of accomplishments text per bonus point.
const CHARS_PER_BONUS_POINT: f64 = 50.0;

/// Relative weight of each sub-score in the overall score.
///
/// `accomplishments` is carried for configuration parity but is not used as a
/// multiplier; the accomplishments bonus is length-based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub accomplishments: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.4,
            experience: 0.3,
            education: 0.2,
            accomplishments: 0.1,
        }
    }
}

/// Stateless scoring engine: weights and experience strategy are fixed at construction.
#[derive(Clone)]
pub struct Screener {
    weights: ScoringWeights,
    estimator: Arc<dyn ExperienceEstimator>,
}

impl Default for Screener {
    fn default() -> Self {
        Self::new(ScoringWeights::default(), Arc::new(EntryCountEstimator))
    }
}

impl Screener {
    pub fn new(weights: ScoringWeights, estimator: Arc<dyn ExperienceEstimator>) -> Self {
        Self { weights, estimator }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn estimator_name(&self) -> &'static str {
        self.estimator.name()
    }

    /// Scores one resume against the criteria. Pure apart from the fresh `resume_id`.
    pub fn screen_resume(&self, resume: &Resume, criteria: &ScreeningCriteria) -> ScreeningResult {
        let skills = match_skills(
            &resume.technical_skills.all(),
            &criteria.required_skills,
            &criteria.preferred_skills,
        );
        let education_score = score_education(
            &resume.education,
            criteria.required_education_level.as_deref(),
        );
        let total_years = self.estimator.estimate_years(&resume.experience);
        let experience_score = score_experience(total_years, criteria.min_years_experience);

        let weighted = skills.score * self.weights.skills
            + experience_score * self.weights.experience
            + education_score * self.weights.education;
        // Verdict and recommendations read the reported (rounded) score.
        let overall_score = round2(
            (weighted + accomplishments_bonus(&resume.key_accomplishments)).clamp(0.0, 100.0),
        );

        let qualified = skills.missing_required.is_empty() && overall_score >= QUALIFYING_SCORE;
        let (education_score, experience_score) = (round2(education_score), round2(experience_score));
        let recommendations = build_recommendations(
            &skills.missing_required,
            education_score,
            experience_score,
            overall_score,
        );

        debug!(
            candidate = %resume.email,
            overall_score,
            total_years,
            qualified,
            "Screened resume"
        );

        ScreeningResult {
            resume_id: Uuid::new_v4().to_string(),
            candidate_name: resume.name.clone(),
            candidate_email: resume.email.clone(),
            overall_score,
            skills_score: round2(skills.score),
            experience_score,
            education_score,
            matched_required_skills: skills.matched_required,
            matched_preferred_skills: skills.matched_preferred,
            missing_required_skills: skills.missing_required,
            recommendations,
            qualified,
        }
    }
}

/// One point per 50 characters of accomplishments text, capped at 10.
pub fn accomplishments_bonus(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    (text.chars().count() as f64 / CHARS_PER_BONUS_POINT).min(MAX_ACCOMPLISHMENTS_BONUS)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Education, Experience, TechnicalSkills};
    use crate::screening::experience::DateRangeEstimator;

    fn make_resume(skills: &[&str], degrees: &[&str], jobs: usize, accomplishments: &str) -> Resume {
        Resume {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            links: vec![],
            experience: (0..jobs)
                .map(|i| Experience {
                    company: format!("Company {i}"),
                    title: "Engineer".to_string(),
                    description: None,
                    start_date: None,
                    end_date: None,
                })
                .collect(),
            education: degrees
                .iter()
                .map(|d| Education {
                    institution: "Tech University".to_string(),
                    degree: d.to_string(),
                    start_date: None,
                    end_date: None,
                })
                .collect(),
            technical_skills: TechnicalSkills {
                programming_languages: skills.iter().map(|s| s.to_string()).collect(),
                frameworks: vec![],
                skills: vec![],
            },
            key_accomplishments: accomplishments.to_string(),
        }
    }

    fn criteria(required: &[&str], preferred: &[&str]) -> ScreeningCriteria {
        ScreeningCriteria {
            required_skills: required.iter().map(|s| s.to_string()).collect(),
            preferred_skills: preferred.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_match_without_requirements_is_strong() {
        let resume = make_resume(&["Python", "Java"], &["BSc"], 1, "");
        let result = Screener::default().screen_resume(&resume, &criteria(&["python"], &[]));

        // 80 * 0.4 + 100 * 0.3 + 100 * 0.2
        assert_eq!(result.skills_score, 80.0);
        assert_eq!(result.overall_score, 82.0);
        assert_eq!(result.matched_required_skills, vec!["python"]);
        assert!(result.missing_required_skills.is_empty());
        assert!(result.qualified);
        assert_eq!(
            result.recommendations,
            vec!["Strong candidate - recommended for interview"]
        );
    }

    #[test]
    fn test_missing_required_skill_disqualifies() {
        let resume = make_resume(&["Python"], &[], 3, &"x".repeat(500));
        let result =
            Screener::default().screen_resume(&resume, &criteria(&["python", "rust"], &[]));

        assert_eq!(result.missing_required_skills, vec!["rust"]);
        // 40 * 0.4 + 30 + 20 + 10 bonus = 76
        assert_eq!(result.overall_score, 76.0);
        assert!(!result.qualified);
        assert_eq!(
            result.recommendations[0],
            "Missing required skills: rust"
        );
    }

    #[test]
    fn test_low_score_disqualifies_even_with_all_skills() {
        let resume = make_resume(&[], &[], 0, "");
        let mut c = criteria(&[], &[]);
        c.min_years_experience = Some(5);
        c.required_education_level = Some("master".to_string());
        let result = Screener::default().screen_resume(&resume, &c);

        assert!(result.missing_required_skills.is_empty());
        assert_eq!(result.overall_score, 0.0);
        assert!(!result.qualified);
        assert_eq!(
            result.recommendations,
            vec![
                "Education level below preferred requirement",
                "Experience level below minimum requirement",
                "Below minimum requirements",
            ]
        );
    }

    #[test]
    fn test_qualified_iff_no_missing_and_score_at_least_sixty() {
        let screener = Screener::default();
        let cases = [
            (make_resume(&["go"], &[], 0, ""), criteria(&["go"], &[])),
            (make_resume(&[], &[], 0, ""), criteria(&["go"], &[])),
            (make_resume(&["go", "sql"], &["PhD"], 4, "shipped"), criteria(&["go"], &["sql"])),
            (make_resume(&["Rust"], &[], 0, ""), criteria(&[], &[])),
        ];
        for (resume, c) in cases {
            let result = screener.screen_resume(&resume, &c);
            let expected = result.missing_required_skills.is_empty() && result.overall_score >= 60.0;
            assert_eq!(result.qualified, expected, "{result:?}");
        }

        // 6/7 preferred, full experience, 157 chars of accomplishments: 59.9971 before rounding
        let resume = make_resume(&["a", "b", "c", "d", "e", "f"], &[], 1, &"x".repeat(157));
        let mut c = criteria(&[], &["a", "b", "c", "d", "e", "f", "g"]);
        c.min_years_experience = Some(1);
        let result = screener.screen_resume(&resume, &c);
        assert_eq!(result.overall_score, 60.0);
        assert!(result.qualified);
        assert_eq!(
            result.recommendations,
            vec!["Good candidate - consider for screening call"]
        );
    }

    #[test]
    fn test_accomplishments_bonus_is_length_based_and_capped() {
        assert_eq!(accomplishments_bonus(""), 0.0);
        assert!((accomplishments_bonus(&"a".repeat(100)) - 2.0).abs() < 1e-9);
        assert_eq!(accomplishments_bonus(&"a".repeat(5000)), 10.0);
    }

    #[test]
    fn test_overall_is_capped_at_hundred() {
        let resume = make_resume(&["rust"], &["PhD"], 5, &"a".repeat(1000));
        let result = Screener::default().screen_resume(&resume, &criteria(&["rust"], &["rust"]));
        assert_eq!(result.overall_score, 100.0);
    }

    #[test]
    fn test_scores_stay_in_range_with_extreme_weights() {
        let weights = ScoringWeights {
            skills: 5.0,
            experience: 5.0,
            education: 5.0,
            accomplishments: 0.0,
        };
        let screener = Screener::new(weights, Arc::new(EntryCountEstimator));
        let resume = make_resume(&["rust"], &[], 1, "led things");
        let result = screener.screen_resume(&resume, &criteria(&["rust"], &[]));

        for score in [
            result.overall_score,
            result.skills_score,
            result.experience_score,
            result.education_score,
        ] {
            assert!((0.0..=100.0).contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn test_scores_rounded_to_two_decimals() {
        // required 1/3 → 26.666… skills score
        let resume = make_resume(&["a"], &[], 0, "");
        let result = Screener::default().screen_resume(&resume, &criteria(&["a", "b", "c"], &[]));
        assert_eq!(result.skills_score, 26.67);
    }

    #[test]
    fn test_repeated_screening_is_idempotent_except_id() {
        let resume = make_resume(&["python", "sql"], &["Master of Science"], 2, "Built a data platform");
        let mut c = criteria(&["python"], &["sql", "spark"]);
        c.min_years_experience = Some(6);
        c.required_education_level = Some("phd".to_string());

        let screener = Screener::default();
        let first = screener.screen_resume(&resume, &c);
        let second = screener.screen_resume(&resume, &c);

        assert_ne!(first.resume_id, second.resume_id);
        assert_eq!(
            ScreeningResult {
                resume_id: String::new(),
                ..first
            },
            ScreeningResult {
                resume_id: String::new(),
                ..second
            }
        );
    }

    #[test]
    fn test_estimator_strategy_is_swappable() {
        let mut resume = make_resume(&[], &[], 0, "");
        resume.experience.push(Experience {
            company: "Acme".to_string(),
            title: "Engineer".to_string(),
            description: None,
            start_date: Some("2014".to_string()),
            end_date: Some("2024".to_string()),
        });
        let mut c = criteria(&[], &[]);
        c.min_years_experience = Some(8);

        let by_count = Screener::default().screen_resume(&resume, &c);
        assert_eq!(by_count.experience_score, 25.0);

        let estimator = DateRangeEstimator::with_reference_date(
            chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        let by_dates = Screener::new(ScoringWeights::default(), Arc::new(estimator))
            .screen_resume(&resume, &c);
        assert_eq!(by_dates.experience_score, 100.0);
    }
}
