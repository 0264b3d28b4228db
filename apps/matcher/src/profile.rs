//! Raw candidate profiles and their normalized form.
//!
//! `RawProfile` is externally supplied and best-effort: only `id` is
//! required. Flattening renders every optional sub-field as an empty string
//! or list — it must never fail on missing data.

use serde::{Deserialize, Serialize};

use crate::facets::FacetSheet;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub proficiency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub school_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub start_year: Option<i32>,
    /// Absent for current positions — rendered as "Present".
    #[serde(default)]
    pub end_year: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillEntry {
    #[serde(default)]
    pub name: Option<String>,
}

/// One candidate record as supplied by the caller. `id` is the only stable
/// key; everything else may be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProfile {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub positions: Vec<PositionEntry>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl RawProfile {
    /// Renders the profile as one flat text block for the extraction prompt.
    pub fn flattened_text(&self) -> String {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string();

        let languages = self
            .languages
            .iter()
            .map(|l| {
                format!(
                    "{} ({})",
                    l.name.as_deref().unwrap_or(""),
                    l.proficiency.as_deref().unwrap_or("")
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        let education = self
            .education
            .iter()
            .map(|e| {
                format!(
                    "{} in {} at {}",
                    e.degree.as_deref().unwrap_or(""),
                    e.field_of_study.as_deref().unwrap_or(""),
                    e.school_name.as_deref().unwrap_or("")
                )
            })
            .collect::<Vec<_>>()
            .join("; ");

        let experience = self
            .positions
            .iter()
            .map(|p| {
                let start = p
                    .start_year
                    .map(|y| y.to_string())
                    .unwrap_or_default();
                let end = p
                    .end_year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "Present".to_string());
                format!(
                    "{} at {} ({start}-{end})",
                    p.title.as_deref().unwrap_or(""),
                    p.company_name.as_deref().unwrap_or("")
                )
            })
            .collect::<Vec<_>>()
            .join("; ");

        let skills = self
            .skills
            .iter()
            .filter_map(|s| s.name.as_deref())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Name: {name}\nHeadline: {headline}\nLocation: {location}\n\
             Languages: {languages}\nEducation: {education}\n\
             Experience: {experience}\nSkills: {skills}\nSummary: {summary}",
            headline = self.headline.as_deref().unwrap_or(""),
            location = self.location.as_deref().unwrap_or(""),
            summary = self.summary.as_deref().unwrap_or(""),
        )
    }
}

/// A profile after facet extraction. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedProfile {
    pub id: String,
    pub flattened_text: String,
    pub facet_extraction: FacetSheet,
}
