/// Builds the ordered guidance list for a screened candidate.
///
/// Every applicable note is included, followed by exactly one verdict line.
pub fn build_recommendations(
    missing_required: &[String],
    education_score: f64,
    experience_score: f64,
    overall_score: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !missing_required.is_empty() {
        recommendations.push(format!(
            "Missing required skills: {}",
            missing_required.join(", ")
        ));
    }
    if education_score < 80.0 {
        recommendations.push("Education level below preferred requirement".to_string());
    }
    if experience_score < 70.0 {
        recommendations.push("Experience level below minimum requirement".to_string());
    }

    let verdict = if overall_score >= 80.0 {
        "Strong candidate - recommended for interview"
    } else if overall_score >= 60.0 {
        "Good candidate - consider for screening call"
    } else {
        "Below minimum requirements"
    };
    recommendations.push(verdict.to_string());

    recommendations
}
