//! Facet Matcher — scores each (facet, profile) pair against the requirement
//! set, one completion request per pair.
//!
//! All pairs are independent units of work: the six facets fan out
//! concurrently with the per-profile fan-out inside each facet, bounded by a
//! single in-flight limit. A failed unit degrades to the zero-score
//! placeholder; it never aborts sibling comparisons.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::MatchError;
use crate::extract::extract_json_as;
use crate::facets::{Facet, FacetSheet};
use crate::llm::prompts::{bullet_list, fill, FACET_MATCH_TEMPLATE};
use crate::llm::{ChatMessage, CompletionClient};
use crate::normalizer::MAX_IN_FLIGHT;
use crate::profile::NormalizedProfile;

/// facet -> profile id -> result. Each comparison unit owns a disjoint
/// (facet, profileId) key; the table is filled by the single consumer of the
/// joined fan-out, so no lock is needed.
pub type FacetResultTable = HashMap<Facet, HashMap<String, FacetResult>>;

/// Outcome of one facet comparison for one profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetResult {
    pub match_percentage: f64,
    #[serde(default)]
    pub relevant_content: Vec<String>,
    #[serde(default)]
    pub explanation: String,
}

impl FacetResult {
    /// Zero-score substitute for a comparison unit that failed. The table
    /// never omits an entry for an attempted comparison.
    pub fn placeholder() -> Self {
        Self {
            match_percentage: 0.0,
            relevant_content: Vec::new(),
            explanation: "Comparison failed; no score could be produced for this facet."
                .to_string(),
        }
    }

    /// Model output is untrusted: scores outside [0, 100] (or NaN) are
    /// clamped rather than treated as failures.
    fn clamped(mut self) -> Self {
        if !self.match_percentage.is_finite() {
            self.match_percentage = 0.0;
        }
        self.match_percentage = self.match_percentage.clamp(0.0, 100.0);
        self
    }
}

/// Scores one (facet, profile) pair. Any completion or extraction failure is
/// absorbed into the placeholder here, at the unit boundary.
async fn match_unit(
    client: &dyn CompletionClient,
    facet: Facet,
    requirements: &FacetSheet,
    profile: &NormalizedProfile,
) -> FacetResult {
    let prompt = fill(
        FACET_MATCH_TEMPLATE,
        &[
            ("{facet}", facet.as_str()),
            ("{requirements}", &bullet_list(requirements.get(facet))),
            (
                "{profile_content}",
                &bullet_list(profile.facet_extraction.get(facet)),
            ),
        ],
    );

    let outcome: Result<FacetResult, MatchError> = async {
        let response = client.complete(&[ChatMessage::user(prompt)]).await?;
        Ok(extract_json_as::<FacetResult>(&response)?)
    }
    .await;

    match outcome {
        Ok(result) => {
            let result = result.clamped();
            debug!(
                "facet {} scored {} for profile {}",
                facet, result.match_percentage, profile.id
            );
            result
        }
        Err(e) => {
            warn!(
                "facet {} comparison failed for profile {}: {e}",
                facet, profile.id
            );
            FacetResult::placeholder()
        }
    }
}

/// Scores one facet across all profiles concurrently. Infallible: failed
/// units appear as placeholders.
pub async fn match_facet(
    client: Arc<dyn CompletionClient>,
    facet: Facet,
    requirements: &FacetSheet,
    profiles: &[NormalizedProfile],
) -> HashMap<String, FacetResult> {
    stream::iter(profiles)
        .map(|profile| {
            let client = Arc::clone(&client);
            async move {
                let result = match_unit(client.as_ref(), facet, requirements, profile).await;
                (profile.id.clone(), result)
            }
        })
        .buffer_unordered(MAX_IN_FLIGHT)
        .collect()
        .await
}

/// Fans out all six facets crossed with all profiles as one flat stream of
/// comparison units, bounded by a single in-flight limit, and joins them into
/// the result table. Returning from this function is the synchronization
/// barrier before aggregation.
pub async fn match_all_facets(
    client: Arc<dyn CompletionClient>,
    requirements: &FacetSheet,
    profiles: &[NormalizedProfile],
) -> FacetResultTable {
    let units = Facet::ALL
        .iter()
        .flat_map(|facet| profiles.iter().map(move |profile| (*facet, profile)));

    let results: Vec<(Facet, String, FacetResult)> = stream::iter(units)
        .map(|(facet, profile)| {
            let client = Arc::clone(&client);
            async move {
                let result = match_unit(client.as_ref(), facet, requirements, profile).await;
                (facet, profile.id.clone(), result)
            }
        })
        .buffer_unordered(MAX_IN_FLIGHT)
        .collect()
        .await;

    let mut table: FacetResultTable = HashMap::new();
    for (facet, profile_id, result) in results {
        table.entry(facet).or_default().insert(profile_id, result);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionError;
    use async_trait::async_trait;

    /// Always returns the same well-formed score.
    struct FixedScoreClient(f64);

    #[async_trait]
    impl CompletionClient for FixedScoreClient {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, CompletionError> {
            Ok(format!(
                r#"{{"matchPercentage": {}, "relevantContent": [], "explanation": "fixed"}}"#,
                self.0
            ))
        }
    }

    fn normalized(id: &str) -> NormalizedProfile {
        NormalizedProfile {
            id: id.to_string(),
            flattened_text: String::new(),
            facet_extraction: FacetSheet::default(),
        }
    }

    #[tokio::test]
    async fn test_match_facet_keys_results_by_profile_id() {
        let client: Arc<dyn CompletionClient> = Arc::new(FixedScoreClient(75.0));
        let profiles = vec![normalized("a"), normalized("b")];
        let results = match_facet(client, Facet::Skills, &FacetSheet::default(), &profiles).await;

        assert_eq!(results.len(), 2);
        assert!((results["a"].match_percentage - 75.0).abs() < f64::EPSILON);
        assert!((results["b"].match_percentage - 75.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_match_all_facets_fills_every_disjoint_key() {
        let client: Arc<dyn CompletionClient> = Arc::new(FixedScoreClient(60.0));
        let profiles = vec![normalized("a"), normalized("b"), normalized("c")];
        let table = match_all_facets(client, &FacetSheet::default(), &profiles).await;

        assert_eq!(table.len(), 6);
        for facet in Facet::ALL {
            let by_profile = &table[&facet];
            assert_eq!(by_profile.len(), 3);
            for profile in &profiles {
                assert!((by_profile[&profile.id].match_percentage - 60.0).abs() < f64::EPSILON);
            }
        }
    }

    #[tokio::test]
    async fn test_match_all_facets_clamps_out_of_range_scores() {
        let client: Arc<dyn CompletionClient> = Arc::new(FixedScoreClient(250.0));
        let profiles = vec![normalized("a")];
        let table = match_all_facets(client, &FacetSheet::default(), &profiles).await;
        assert!((table[&Facet::Location]["a"].match_percentage - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_facet_result_deserializes_camel_case() {
        let json = r#"{
            "matchPercentage": 85,
            "relevantContent": ["Java", "Spring"],
            "explanation": "Strong overlap."
        }"#;
        let result: FacetResult = serde_json::from_str(json).unwrap();
        assert!((result.match_percentage - 85.0).abs() < f64::EPSILON);
        assert_eq!(result.relevant_content.len(), 2);
    }

    #[test]
    fn test_facet_result_tolerates_missing_optional_fields() {
        let result: FacetResult = serde_json::from_str(r#"{"matchPercentage": 40}"#).unwrap();
        assert!(result.relevant_content.is_empty());
        assert!(result.explanation.is_empty());
    }

    #[test]
    fn test_clamp_pulls_out_of_range_scores_into_bounds() {
        let high = FacetResult {
            match_percentage: 250.0,
            relevant_content: vec![],
            explanation: String::new(),
        };
        assert!((high.clamped().match_percentage - 100.0).abs() < f64::EPSILON);

        let low = FacetResult {
            match_percentage: -3.0,
            relevant_content: vec![],
            explanation: String::new(),
        };
        assert!(low.clamped().match_percentage.abs() < f64::EPSILON);

        let nan = FacetResult {
            match_percentage: f64::NAN,
            relevant_content: vec![],
            explanation: String::new(),
        };
        assert!(nan.clamped().match_percentage.abs() < f64::EPSILON);
    }

    #[test]
    fn test_placeholder_is_zero_scored_with_explanation() {
        let placeholder = FacetResult::placeholder();
        assert!(placeholder.match_percentage.abs() < f64::EPSILON);
        assert!(!placeholder.explanation.is_empty());
    }
}
