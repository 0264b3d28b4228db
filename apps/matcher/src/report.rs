//! Report artifact — the single persisted output of a successful run.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::aggregate::MatchReport;
use crate::errors::MatchError;

/// Serializes the ranked reports as pretty-printed JSON to
/// `<YYYY-MM-DD_HH-MM-SS>_analysis_report.json` in `dir`, using local
/// wall-clock time at completion. Returns the written path.
pub fn write_report(reports: &[MatchReport], dir: &Path) -> Result<PathBuf, MatchError> {
    let filename = format!(
        "{}_analysis_report.json",
        Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let path = dir.join(filename);

    let json = serde_json::to_string_pretty(reports)?;
    std::fs::write(&path, json)?;

    info!("analysis report written to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::Facet;
    use crate::matcher::FacetResult;
    use std::collections::BTreeMap;

    fn sample_report() -> MatchReport {
        let section_matches: BTreeMap<Facet, FacetResult> = Facet::ALL
            .iter()
            .map(|f| (*f, FacetResult::placeholder()))
            .collect();
        MatchReport {
            profile_id: "p1".to_string(),
            section_matches,
            overall_match: 0.0,
        }
    }

    #[test]
    fn test_report_filename_shape_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&[sample_report()], dir.path()).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("_analysis_report.json"));
        // YYYY-MM-DD_HH-MM-SS prefix: 19 chars, with separators in place
        let stamp = &name[..19];
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[10..11], "_");
        assert_eq!(&stamp[13..14], "-");

        let body = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed[0]["profileId"], "p1");
        // pretty-printed, not minified
        assert!(body.contains('\n'));
    }

    #[test]
    fn test_empty_ranking_still_writes_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&[], dir.path()).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body.trim(), "[]");
    }
}
