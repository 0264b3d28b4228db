//! Pipeline Orchestrator — sequences the analysis stages and propagates state.
//!
//! Flow: validate input → normalize profiles (concurrent, per-profile
//! failures contained) → extract requirements (fatal on failure) → six-facet
//! fan-out (per-unit failures contained) → aggregate → ranked reports.
//!
//! The stage machine is strictly linear. Retries happen inside the completion
//! clients at per-request granularity, never at the stage level.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::aggregate::{aggregate, MatchReport};
use crate::errors::MatchError;
use crate::llm::CompletionClient;
use crate::matcher::match_all_facets;
use crate::normalizer::normalize_profiles;
use crate::profile::RawProfile;
use crate::requirements::extract_requirements;

/// The linear stage machine. Each transition is logged; there is no
/// branching and no stage-level retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Initialized,
    ProfilesProcessed,
    RequirementsExtracted,
    Complete,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Initialized => "initialized",
            Stage::ProfilesProcessed => "profiles_processed",
            Stage::RequirementsExtracted => "requirements_extracted",
            Stage::Complete => "complete",
        };
        f.write_str(name)
    }
}

struct StageTracker {
    current: Stage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            current: Stage::Start,
        }
    }

    fn advance(&mut self, next: Stage) {
        info!("stage transition: {} -> {}", self.current, next);
        self.current = next;
    }
}

/// Where the raw profiles come from: a file holding a JSON array, or an
/// in-memory array supplied directly.
#[derive(Debug, Clone)]
pub enum ProfilesSource {
    Path(PathBuf),
    Inline(Vec<RawProfile>),
}

impl ProfilesSource {
    /// Resolves the source into raw profiles. The resolved value must be a
    /// JSON array (`InvalidInput` otherwise); individual malformed elements
    /// are dropped with a warning, not fatal.
    fn resolve(self) -> Result<Vec<RawProfile>, MatchError> {
        match self {
            ProfilesSource::Inline(profiles) => Ok(profiles),
            ProfilesSource::Path(path) => {
                let text = std::fs::read_to_string(&path)?;
                let value: Value = serde_json::from_str(&text).map_err(|e| {
                    MatchError::InvalidInput(format!(
                        "profiles file {} is not valid JSON: {e}",
                        path.display()
                    ))
                })?;
                let Value::Array(items) = value else {
                    return Err(MatchError::InvalidInput(format!(
                        "profiles file {} must contain a JSON array",
                        path.display()
                    )));
                };

                let total = items.len();
                let profiles: Vec<RawProfile> = items
                    .into_iter()
                    .enumerate()
                    .filter_map(|(index, item)| {
                        match serde_json::from_value::<RawProfile>(item) {
                            Ok(profile) => Some(profile),
                            Err(e) => {
                                warn!("dropping malformed profile at index {index}: {e}");
                                None
                            }
                        }
                    })
                    .collect();
                info!("loaded {}/{} profiles from {}", profiles.len(), total, path.display());
                Ok(profiles)
            }
        }
    }
}

/// Runs the full matching pipeline and returns the ranked reports.
///
/// Fatal errors (empty job description, non-array profiles source,
/// requirement-extraction failure, aggregation contract violation) propagate;
/// per-profile and per-(facet, profile) failures degrade to placeholders
/// inside their stages. No partial result is ever returned on fatal failure.
pub async fn match_candidates(
    client: Arc<dyn CompletionClient>,
    job_description: &str,
    profiles_source: ProfilesSource,
) -> Result<Vec<MatchReport>, MatchError> {
    let mut stage = StageTracker::new();

    if job_description.trim().is_empty() {
        return Err(MatchError::InvalidInput(
            "job description must be a non-empty string".to_string(),
        ));
    }
    let raw_profiles = profiles_source.resolve()?;
    stage.advance(Stage::Initialized);

    let profiles = normalize_profiles(Arc::clone(&client), raw_profiles).await;
    stage.advance(Stage::ProfilesProcessed);

    let requirements = extract_requirements(client.as_ref(), job_description).await?;
    stage.advance(Stage::RequirementsExtracted);

    let table = match_all_facets(Arc::clone(&client), &requirements, &profiles).await;
    let reports = aggregate(&profiles, &table)?;
    stage.advance(Stage::Complete);

    info!("pipeline complete: {} profiles ranked", reports.len());
    Ok(reports)
}
