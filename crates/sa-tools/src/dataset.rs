//! Static ticker dataset
//!
//! Loads the PSX ticker/price snapshot from a JSON file at startup and
//! serves symbol lookups and searches to the tools. The dataset is
//! read-only after loading.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

use sa_core::{Error, Result};

/// One record of the ticker snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerRecord {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub as_of: Option<String>,
    #[serde(default)]
    pub sector_name: Option<String>,
}

/// In-memory ticker dataset keyed by symbol
pub struct TickerDataset {
    records: Vec<TickerRecord>,
}

impl TickerDataset {
    /// Load and validate the dataset from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Dataset(format!("Failed to read {}: {}", path.display(), e)))?;
        let records: Vec<TickerRecord> = serde_json::from_str(&raw)
            .map_err(|e| Error::Dataset(format!("Failed to parse {}: {}", path.display(), e)))?;

        let dataset = Self::from_records(records)?;
        info!(
            "Loaded {} ticker records from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Build a dataset from already-parsed records
    ///
    /// Records with an empty symbol or name are rejected.
    pub fn from_records(records: Vec<TickerRecord>) -> Result<Self> {
        for (idx, record) in records.iter().enumerate() {
            if record.symbol.is_empty() || record.name.is_empty() {
                return Err(Error::Dataset(format!(
                    "Invalid record at index {}: symbol and name are required",
                    idx
                )));
            }
        }
        Ok(Self { records })
    }

    /// Look up a record by symbol (case-insensitive)
    pub fn find_by_symbol(&self, symbol: &str) -> Option<&TickerRecord> {
        let wanted = symbol.to_uppercase();
        self.records
            .iter()
            .find(|r| r.symbol.to_uppercase() == wanted)
    }

    /// Search by optional name substring and/or exact sector name
    pub fn search(&self, query: Option<&str>, sector: Option<&str>) -> Vec<&TickerRecord> {
        let query = query.map(|q| q.to_lowercase());
        let sector = sector.map(|s| s.to_uppercase());

        self.records
            .iter()
            .filter(|r| match &query {
                Some(q) => r.name.to_lowercase().contains(q),
                None => true,
            })
            .filter(|r| match &sector {
                Some(s) => {
                    r.sector_name
                        .as_deref()
                        .unwrap_or_default()
                        .to_uppercase()
                        == *s
                }
                None => true,
            })
            .collect()
    }

    /// Distinct sector names, uppercased and sorted
    pub fn sectors(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| r.sector_name.as_deref())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_uppercase())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of records in the dataset
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// Small fixture shared by the tool tests
    pub(crate) fn sample_dataset() -> TickerDataset {
        TickerDataset::from_records(vec![
            TickerRecord {
                symbol: "HBL".to_string(),
                name: "Habib Bank Limited".to_string(),
                price: Some(120.5),
                currency: Some("PKR".to_string()),
                as_of: Some("2025-06-30".to_string()),
                sector_name: Some("Commercial Banks".to_string()),
            },
            TickerRecord {
                symbol: "TRG".to_string(),
                name: "TRG Pakistan Limited".to_string(),
                price: Some(66.0),
                currency: None,
                as_of: None,
                sector_name: Some("Technology & Communication".to_string()),
            },
            TickerRecord {
                symbol: "NEWCO".to_string(),
                name: "New Company Limited".to_string(),
                price: None,
                currency: None,
                as_of: None,
                sector_name: None,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_find_by_symbol_case_insensitive() {
        let dataset = sample_dataset();
        assert!(dataset.find_by_symbol("HBL").is_some());
        assert!(dataset.find_by_symbol("hbl").is_some());
        assert!(dataset.find_by_symbol("NOPE").is_none());
    }

    #[test]
    fn test_search_by_name() {
        let dataset = sample_dataset();
        let hits = dataset.search(Some("bank"), None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].symbol, "HBL");
    }

    #[test]
    fn test_search_by_sector() {
        let dataset = sample_dataset();
        let hits = dataset.search(None, Some("technology & communication"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].symbol, "TRG");
    }

    #[test]
    fn test_search_no_filters_returns_all() {
        let dataset = sample_dataset();
        assert_eq!(dataset.search(None, None).len(), 3);
    }

    #[test]
    fn test_search_no_match_is_empty() {
        let dataset = sample_dataset();
        assert!(dataset.search(Some("zzz"), None).is_empty());
    }

    #[test]
    fn test_sectors_are_unique_and_sorted() {
        let dataset = sample_dataset();
        assert_eq!(
            dataset.sectors(),
            vec![
                "COMMERCIAL BANKS".to_string(),
                "TECHNOLOGY & COMMUNICATION".to_string()
            ]
        );
    }

    #[test]
    fn test_invalid_record_is_rejected() {
        let result = TickerDataset::from_records(vec![TickerRecord {
            symbol: String::new(),
            name: "No Symbol".to_string(),
            price: None,
            currency: None,
            as_of: None,
            sector_name: None,
        }]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"symbol": "OGDC", "name": "Oil & Gas Development Company", "price": 210.0, "sectorName": "Oil & Gas Exploration"}}]"#
        )
        .unwrap();

        let dataset = TickerDataset::from_json_file(file.path()).unwrap();
        assert_eq!(dataset.len(), 1);
        let record = dataset.find_by_symbol("ogdc").unwrap();
        assert_eq!(record.sector_name.as_deref(), Some("Oil & Gas Exploration"));
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = TickerDataset::from_json_file("/nonexistent/tickers.json");
        assert!(matches!(result, Err(Error::Dataset(_))));
    }
}
