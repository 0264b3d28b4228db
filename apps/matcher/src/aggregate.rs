//! Aggregator — folds the per-facet result table into a ranked report list.
//!
//! Pure function of its inputs: no I/O, no model calls. Missing table
//! entries degrade to the zero-score placeholder; the only fatal condition
//! is a structurally invalid profile sequence.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::errors::MatchError;
use crate::facets::Facet;
use crate::matcher::{FacetResult, FacetResultTable};
use crate::profile::NormalizedProfile;

/// Number of facets in every mean. Fixed: facets that were never attempted
/// still count as zero in the denominator.
const FACET_COUNT: f64 = Facet::ALL.len() as f64;

/// Final per-profile report entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub profile_id: String,
    pub section_matches: BTreeMap<Facet, FacetResult>,
    pub overall_match: f64,
}

/// Builds one report entry per profile and ranks them by `overall_match`
/// descending. Ties keep the relative order of `profiles`.
pub fn aggregate(
    profiles: &[NormalizedProfile],
    table: &FacetResultTable,
) -> Result<Vec<MatchReport>, MatchError> {
    let mut seen = HashSet::new();
    for profile in profiles {
        if !seen.insert(profile.id.as_str()) {
            return Err(MatchError::Aggregation(format!(
                "duplicate profile id '{}' in normalized sequence",
                profile.id
            )));
        }
    }

    let mut reports: Vec<MatchReport> = profiles
        .iter()
        .map(|profile| {
            let section_matches: BTreeMap<Facet, FacetResult> = Facet::ALL
                .iter()
                .map(|facet| {
                    let result = table
                        .get(facet)
                        .and_then(|by_profile| by_profile.get(&profile.id))
                        .cloned()
                        .unwrap_or_else(FacetResult::placeholder);
                    (*facet, result)
                })
                .collect();

            let overall_match = section_matches
                .values()
                .map(|r| r.match_percentage)
                .sum::<f64>()
                / FACET_COUNT;

            MatchReport {
                profile_id: profile.id.clone(),
                section_matches,
                overall_match,
            }
        })
        .collect();

    // Stable sort: equal scores keep input order.
    reports.sort_by(|a, b| {
        b.overall_match
            .partial_cmp(&a.overall_match)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn normalized(id: &str) -> NormalizedProfile {
        NormalizedProfile {
            id: id.to_string(),
            flattened_text: String::new(),
            facet_extraction: Default::default(),
        }
    }

    fn scored(pct: f64) -> FacetResult {
        FacetResult {
            match_percentage: pct,
            relevant_content: vec![],
            explanation: "scored".to_string(),
        }
    }

    fn full_table(entries: &[(&str, f64)]) -> FacetResultTable {
        let mut table = FacetResultTable::new();
        for facet in Facet::ALL {
            let mut by_profile = HashMap::new();
            for (id, pct) in entries {
                by_profile.insert(id.to_string(), scored(*pct));
            }
            table.insert(facet, by_profile);
        }
        table
    }

    #[test]
    fn test_overall_match_is_mean_of_six_facets() {
        let profiles = vec![normalized("p1")];
        let reports = aggregate(&profiles, &full_table(&[("p1", 60.0)])).unwrap();
        assert_eq!(reports.len(), 1);
        assert!((reports[0].overall_match - 60.0).abs() < f64::EPSILON);
        assert_eq!(reports[0].section_matches.len(), 6);
    }

    #[test]
    fn test_missing_facet_counts_as_zero_not_excluded() {
        let profiles = vec![normalized("p1")];
        let mut table = full_table(&[("p1", 60.0)]);
        table.remove(&Facet::Certifications);

        let reports = aggregate(&profiles, &table).unwrap();
        // 5 * 60 / 6, not 5 * 60 / 5
        assert!((reports[0].overall_match - 50.0).abs() < 1e-9);
        let placeholder = &reports[0].section_matches[&Facet::Certifications];
        assert!(placeholder.match_percentage.abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_profile_entry_defaults_to_placeholder() {
        let profiles = vec![normalized("p1"), normalized("p2")];
        let table = full_table(&[("p1", 80.0)]); // p2 absent everywhere

        let reports = aggregate(&profiles, &table).unwrap();
        let p2 = reports.iter().find(|r| r.profile_id == "p2").unwrap();
        assert!(p2.overall_match.abs() < f64::EPSILON);
        assert_eq!(p2.section_matches.len(), 6);
    }

    #[test]
    fn test_reports_sorted_descending() {
        let profiles = vec![normalized("low"), normalized("high"), normalized("mid")];
        let mut table = FacetResultTable::new();
        for facet in Facet::ALL {
            let mut by_profile = HashMap::new();
            by_profile.insert("low".to_string(), scored(10.0));
            by_profile.insert("high".to_string(), scored(90.0));
            by_profile.insert("mid".to_string(), scored(50.0));
            table.insert(facet, by_profile);
        }

        let reports = aggregate(&profiles, &table).unwrap();
        let ids: Vec<&str> = reports.iter().map(|r| r.profile_id.as_str()).collect();
        assert_eq!(ids, ["high", "mid", "low"]);
        for pair in reports.windows(2) {
            assert!(pair[0].overall_match >= pair[1].overall_match);
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let profiles = vec![normalized("a"), normalized("b"), normalized("c")];
        let table = full_table(&[("a", 50.0), ("b", 50.0), ("c", 50.0)]);

        let reports = aggregate(&profiles, &table).unwrap();
        let ids: Vec<&str> = reports.iter().map(|r| r.profile_id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_profile_ids_are_an_aggregation_error() {
        let profiles = vec![normalized("p1"), normalized("p1")];
        let err = aggregate(&profiles, &FacetResultTable::new()).unwrap_err();
        assert!(matches!(err, MatchError::Aggregation(_)));
    }

    #[test]
    fn test_empty_profiles_produce_empty_ranking() {
        let reports = aggregate(&[], &FacetResultTable::new()).unwrap();
        assert!(reports.is_empty());
    }

    #[test]
    fn test_report_serializes_camel_case_with_facet_keys() {
        let profiles = vec![normalized("p1")];
        let reports = aggregate(&profiles, &full_table(&[("p1", 42.0)])).unwrap();
        let json = serde_json::to_value(&reports[0]).unwrap();
        assert_eq!(json["profileId"], "p1");
        assert!(json["sectionMatches"]["skills"]["matchPercentage"].is_number());
        assert!((json["overallMatch"].as_f64().unwrap() - 42.0).abs() < 1e-9);
    }
}
