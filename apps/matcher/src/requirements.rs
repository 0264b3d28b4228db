//! Requirement Extractor — derives the facet-structured requirement set from
//! the job description. Issued once per run; every downstream comparison
//! depends on it, so failure here is fatal and propagates.

use tracing::info;

use crate::errors::MatchError;
use crate::extract::extract_json_as;
use crate::facets::{Facet, FacetSheet};
use crate::llm::prompts::{fill, REQUIREMENT_EXTRACTION_TEMPLATE};
use crate::llm::{ChatMessage, CompletionClient};

pub async fn extract_requirements(
    client: &dyn CompletionClient,
    job_description: &str,
) -> Result<FacetSheet, MatchError> {
    let prompt = fill(
        REQUIREMENT_EXTRACTION_TEMPLATE,
        &[("{job_description}", job_description)],
    );

    let response = client.complete(&[ChatMessage::user(prompt)]).await?;
    let requirements: FacetSheet = extract_json_as(&response)?;

    let populated = Facet::ALL
        .iter()
        .filter(|f| !requirements.get(**f).is_empty())
        .count();
    info!("requirement extraction produced content for {populated}/6 facets");

    Ok(requirements)
}
