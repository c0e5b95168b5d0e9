use serde::{Deserialize, Serialize};

/// A single work history entry as returned by the extraction provider.
/// Dates are free text ("2019", "Jan 2020", "Present") and are never parsed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSkills {
    #[serde(default)]
    pub programming_languages: Vec<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl TechnicalSkills {
    /// Languages, frameworks and general skills as one flat list. Duplicates are kept.
    pub fn all(&self) -> Vec<String> {
        self.programming_languages
            .iter()
            .chain(&self.frameworks)
            .chain(&self.skills)
            .cloned()
            .collect()
    }
}

/// Structured candidate record produced by the extraction provider.
///
/// Every optional part of the schema carries its default here, at the
/// deserialization boundary, so scoring code never probes for missing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub technical_skills: TechnicalSkills,
    #[serde(default)]
    pub key_accomplishments: String,
}
