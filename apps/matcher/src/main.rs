use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use facet_matcher::config::Config;
use facet_matcher::llm::build_client;
use facet_matcher::pipeline::{match_candidates, ProfilesSource};
use facet_matcher::report::write_report;

/// Ranks candidate profiles against a job description using an LLM-backed
/// facet analysis pipeline.
#[derive(Debug, Parser)]
#[command(name = "facet-matcher", version)]
struct Args {
    /// Path to a plain-text job description
    job_description: PathBuf,

    /// Path to a JSON array of candidate profiles
    profiles: PathBuf,

    /// Directory the analysis report is written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("facet_matcher={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting facet-matcher v{}", env!("CARGO_PKG_VERSION"));
    info!("Provider: {:?}", config.provider);

    let job_description = std::fs::read_to_string(&args.job_description)
        .with_context(|| format!("reading {}", args.job_description.display()))?;

    let client = build_client(&config);

    let reports = match match_candidates(
        Arc::clone(&client),
        &job_description,
        ProfilesSource::Path(args.profiles),
    )
    .await
    {
        Ok(reports) => reports,
        Err(e) => {
            error!("matching run failed: {e}");
            std::process::exit(1);
        }
    };

    let path = write_report(&reports, &args.out_dir)?;
    info!("report: {}", path.display());

    for report in reports.iter().take(5) {
        info!(
            "  {} — overall match {:.1}%",
            report.profile_id, report.overall_match
        );
    }

    Ok(())
}
