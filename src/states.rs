//! Jurisdiction records: the per-state configuration that drives a batch.
//!
//! The original deployment duplicated this table verbatim inside both
//! pipeline scripts. Here it lives once, in `data/states.json`, embedded
//! into the binary at compile time and parsed on first use. A caller can
//! substitute its own table with [`load`] — the file format is the same
//! serde shape as the embedded one.

use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::ContractGenError;

/// One of the four text artifacts requested per jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    /// The contract body: headed prose sections.
    Contract,
    /// The rate schedule table.
    Rates,
    /// The service area coverage table.
    ServiceAreas,
    /// The performance standards table.
    Performance,
}

impl ContentKind {
    /// All four kinds in the order the batch driver requests them.
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Contract,
        ContentKind::Rates,
        ContentKind::ServiceAreas,
        ContentKind::Performance,
    ];

    /// Human-readable label used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Contract => "contract body",
            ContentKind::Rates => "rate schedule",
            ContentKind::ServiceAreas => "service areas",
            ContentKind::Performance => "performance standards",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named organisation and the city it operates from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub city: String,
}

/// Operational facts about the transportation provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDetails {
    pub fleet_size: u32,
    pub operating_hours: String,
    pub driver_count: u32,
    /// Term description, e.g. "2-year contract with 1-year renewal option".
    pub term: String,
}

/// Immutable per-jurisdiction input. One record consumes the full
/// pipeline per batch iteration; nothing here is ever mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionRecord {
    /// Full state name, e.g. "Florida".
    pub state: String,
    /// Postal abbreviation, e.g. "FL". Used in output filenames.
    pub abbrev: String,
    /// The contracting health agency.
    pub agency: Organization,
    /// The transportation provider.
    pub provider: Organization,
    /// Ordered list of covered service regions.
    pub service_regions: Vec<String>,
    /// Contract date as prose, e.g. "March 15, 2024".
    pub contract_date: String,
    pub details: ProviderDetails,
}

impl JurisdictionRecord {
    /// Service regions joined for prompt embedding: "A, B, C".
    pub fn regions_joined(&self) -> String {
        self.service_regions.join(", ")
    }

    /// Document title for this jurisdiction's contract.
    pub fn document_title(&self) -> String {
        format!("Transportation Services Contract - {}", self.state)
    }
}

static BUILTIN: Lazy<Vec<JurisdictionRecord>> = Lazy::new(|| {
    // The embedded table is checked by unit tests; a parse failure here is
    // a build defect, not a runtime condition.
    serde_json::from_str(include_str!("../data/states.json"))
        .expect("embedded data/states.json is valid")
});

/// The built-in 13-state configuration table.
pub fn builtin() -> &'static [JurisdictionRecord] {
    &BUILTIN
}

/// Load a jurisdiction table from a JSON file of the same shape as the
/// embedded `data/states.json`.
pub fn load(path: &Path) -> Result<Vec<JurisdictionRecord>, ContractGenError> {
    let text =
        std::fs::read_to_string(path).map_err(|_| ContractGenError::StatesFileNotFound {
            path: path.to_path_buf(),
        })?;
    serde_json::from_str(&text).map_err(|e| ContractGenError::StatesFileInvalid {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Restrict `records` to the given comma-separated abbreviation filter
/// (case-insensitive). An empty filter keeps everything.
pub fn filter_by_abbrev(
    records: Vec<JurisdictionRecord>,
    only: &str,
) -> Result<Vec<JurisdictionRecord>, ContractGenError> {
    let only = only.trim();
    if only.is_empty() {
        return Ok(records);
    }
    let wanted: Vec<String> = only
        .split(',')
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    let available = records
        .iter()
        .map(|r| r.abbrev.clone())
        .collect::<Vec<_>>()
        .join(", ");
    let filtered: Vec<JurisdictionRecord> = records
        .into_iter()
        .filter(|r| wanted.contains(&r.abbrev.to_ascii_uppercase()))
        .collect();
    if filtered.is_empty() {
        return Err(ContractGenError::NoMatchingStates {
            filter: only.to_string(),
            available,
        });
    }
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_loads_all_states() {
        let states = builtin();
        assert_eq!(states.len(), 13);
        let abbrevs: Vec<&str> = states.iter().map(|s| s.abbrev.as_str()).collect();
        assert!(abbrevs.contains(&"FL"));
        assert!(abbrevs.contains(&"MA"));
    }

    #[test]
    fn florida_record_fields() {
        let fl = builtin().iter().find(|s| s.abbrev == "FL").unwrap();
        assert_eq!(fl.state, "Florida");
        assert_eq!(fl.agency.name, "Florida Department of Health");
        assert_eq!(fl.agency.city, "Tallahassee");
        assert_eq!(fl.provider.name, "SafeRide Transit Solutions");
        assert_eq!(fl.details.fleet_size, 50);
        assert_eq!(fl.details.driver_count, 120);
        assert_eq!(
            fl.regions_joined(),
            "Orange County, Seminole County, Osceola County"
        );
    }

    #[test]
    fn document_title_includes_state() {
        let tx = builtin().iter().find(|s| s.abbrev == "TX").unwrap();
        assert_eq!(
            tx.document_title(),
            "Transportation Services Contract - Texas"
        );
    }

    #[test]
    fn filter_is_case_insensitive() {
        let filtered = filter_by_abbrev(builtin().to_vec(), "fl, tx").unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn filter_with_no_match_errors() {
        let err = filter_by_abbrev(builtin().to_vec(), "ZZ").unwrap_err();
        assert!(err.to_string().contains("ZZ"));
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let filtered = filter_by_abbrev(builtin().to_vec(), "  ").unwrap();
        assert_eq!(filtered.len(), 13);
    }

    #[test]
    fn content_kind_order_is_stable() {
        assert_eq!(ContentKind::ALL[0], ContentKind::Contract);
        assert_eq!(ContentKind::ALL[3], ContentKind::Performance);
    }
}
