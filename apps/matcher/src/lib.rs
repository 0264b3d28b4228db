//! Facet-based candidate/job matching pipeline.
//!
//! Decomposes a job description and a set of candidate profiles into six
//! comparison facets, scores every (facet, profile) pair independently
//! through a text-completion provider, and aggregates the scores into a
//! ranked report. Per-unit failures degrade to zero-score placeholders; only
//! stage-level failures abort a run.

pub mod aggregate;
pub mod config;
pub mod errors;
pub mod extract;
pub mod facets;
pub mod llm;
pub mod matcher;
pub mod normalizer;
pub mod pipeline;
pub mod profile;
pub mod report;
pub mod requirements;

pub use aggregate::{aggregate as aggregate_results, MatchReport};
pub use errors::MatchError;
pub use facets::{Facet, FacetSheet};
pub use llm::{build_client, ChatMessage, ChatRole, CompletionClient, CompletionError};
pub use matcher::{FacetResult, FacetResultTable};
pub use pipeline::{match_candidates, ProfilesSource, Stage};
pub use profile::{NormalizedProfile, RawProfile};
pub use report::write_report;
