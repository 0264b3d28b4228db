//! Facet Schema — the closed set of comparison dimensions and the JSON shape
//! every extraction stage produces.

use serde::{Deserialize, Serialize};

/// One of the six fixed comparison dimensions.
///
/// This is intentionally a closed enum rather than free-form strings: every
/// stage that keys results by facet iterates `Facet::ALL`, so a facet can
/// never be silently dropped or misspelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Location,
    Language,
    Education,
    Position,
    Skills,
    Certifications,
}

impl Facet {
    pub const ALL: [Facet; 6] = [
        Facet::Location,
        Facet::Language,
        Facet::Education,
        Facet::Position,
        Facet::Skills,
        Facet::Certifications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Location => "location",
            Facet::Language => "language",
            Facet::Education => "education",
            Facet::Position => "position",
            Facet::Skills => "skills",
            Facet::Certifications => "certifications",
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The facet-structured JSON object both extraction prompts ask the model for:
/// six keys, each an array of strings.
///
/// Used for per-profile facet extraction and for the requirement set derived
/// from the job description. Every field defaults to empty so a model response
/// that omits a key still deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetSheet {
    #[serde(default)]
    pub location: Vec<String>,
    #[serde(default)]
    pub language: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub position: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

impl FacetSheet {
    pub fn get(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Location => &self.location,
            Facet::Language => &self.language,
            Facet::Education => &self.education,
            Facet::Position => &self.position,
            Facet::Skills => &self.skills,
            Facet::Certifications => &self.certifications,
        }
    }
}
