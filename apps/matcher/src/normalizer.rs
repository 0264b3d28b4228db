//! Profile Normalizer — turns each raw profile into a flattened text summary
//! plus a facet-structured extraction, via one completion call per profile.
//!
//! Failures here are contained at per-profile granularity: a profile whose
//! completion or extraction fails is logged and dropped from the run; it
//! never aborts its siblings.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::errors::MatchError;
use crate::extract::extract_json_as;
use crate::facets::FacetSheet;
use crate::llm::prompts::{fill, PROFILE_EXTRACTION_TEMPLATE};
use crate::llm::{ChatMessage, CompletionClient};
use crate::profile::{NormalizedProfile, RawProfile};

/// Upper bound on simultaneously in-flight completion requests per stage.
pub(crate) const MAX_IN_FLIGHT: usize = 8;

/// Normalizes a single profile. One completion request, response decoded
/// through the resilient JSON extractor.
pub async fn normalize_profile(
    client: &dyn CompletionClient,
    profile: &RawProfile,
) -> Result<NormalizedProfile, MatchError> {
    let flattened_text = profile.flattened_text();
    let prompt = fill(
        PROFILE_EXTRACTION_TEMPLATE,
        &[("{profile_text}", flattened_text.as_str())],
    );

    let response = client.complete(&[ChatMessage::user(prompt)]).await?;
    let facet_extraction: FacetSheet = extract_json_as(&response)?;

    Ok(NormalizedProfile {
        id: profile.id.clone(),
        flattened_text,
        facet_extraction,
    })
}

/// Normalizes all profiles concurrently (bounded in-flight), preserving the
/// caller's ordering. Profiles with a blank id are dropped before any
/// completion call; profiles whose normalization fails are dropped with a
/// warning. Neither case is fatal to the run.
pub async fn normalize_profiles(
    client: Arc<dyn CompletionClient>,
    profiles: Vec<RawProfile>,
) -> Vec<NormalizedProfile> {
    let total = profiles.len();

    let candidates: Vec<RawProfile> = profiles
        .into_iter()
        .filter(|p| {
            if p.id.trim().is_empty() {
                warn!("dropping profile with blank id before normalization");
                false
            } else {
                true
            }
        })
        .collect();

    // `buffered` (not `buffer_unordered`) keeps input order, so downstream
    // tie-breaking stays stable across runs.
    let normalized: Vec<NormalizedProfile> = stream::iter(candidates)
        .map(|profile| {
            let client = Arc::clone(&client);
            async move {
                match normalize_profile(client.as_ref(), &profile).await {
                    Ok(normalized) => Some(normalized),
                    Err(e) => {
                        warn!("profile {} excluded from run: {e}", profile.id);
                        None
                    }
                }
            }
        })
        .buffered(MAX_IN_FLIGHT)
        .filter_map(|outcome| async move { outcome })
        .collect()
        .await;

    info!("normalized {}/{} profiles", normalized.len(), total);
    normalized
}
