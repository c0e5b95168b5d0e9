use crate::models::resume::Education;

/// Ordinal education levels used for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EducationLevel {
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

/// Vocabulary scanned against degree text, in match order.
const VOCABULARY: &[(&str, EducationLevel)] = &[
    ("high school", EducationLevel::HighSchool),
    ("associate", EducationLevel::Associate),
    ("bachelor", EducationLevel::Bachelor),
    ("master", EducationLevel::Master),
    ("phd", EducationLevel::Doctorate),
    ("doctorate", EducationLevel::Doctorate),
];

impl EducationLevel {
    pub fn ordinal(self) -> u8 {
        match self {
            EducationLevel::HighSchool => 1,
            EducationLevel::Associate => 2,
            EducationLevel::Bachelor => 3,
            EducationLevel::Master => 4,
            EducationLevel::Doctorate => 5,
        }
    }

    /// Exact (case-insensitive) vocabulary lookup for a criteria requirement.
    pub fn from_requirement(requirement: &str) -> Option<Self> {
        let key = requirement.trim().to_lowercase();
        VOCABULARY
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, level)| *level)
    }

    /// First vocabulary term contained in the degree text.
    pub fn detect(degree: &str) -> Option<Self> {
        let degree = degree.to_lowercase();
        VOCABULARY
            .iter()
            .find(|(name, _)| degree.contains(name))
            .map(|(_, level)| *level)
    }
}

/// Highest ordinal found across the candidate's education entries, 0 if none match.
pub fn highest_ordinal(education: &[Education]) -> u8 {
    education
        .iter()
        .filter_map(|entry| EducationLevel::detect(&entry.degree))
        .map(EducationLevel::ordinal)
        .max()
        .unwrap_or(0)
}

/// Education score in 0 – 100.
///
/// No requirement, or a requirement outside the vocabulary, scores 100.
pub fn score_education(education: &[Education], required_level: Option<&str>) -> f64 {
    let Some(required) = required_level.and_then(EducationLevel::from_requirement) else {
        return 100.0;
    };

    let required = required.ordinal();
    let candidate = highest_ordinal(education);

    if candidate >= required {
        100.0
    } else {
        candidate as f64 / required as f64 * 100.0
    }
}
