//! Company search tool

use async_trait::async_trait;
use sa_core::{Result, Tool, ToolResult};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::dataset::TickerDataset;

/// Tool searching companies by name substring and/or sector
pub struct SearchCompaniesTool {
    dataset: Arc<TickerDataset>,
}

impl SearchCompaniesTool {
    pub fn new(dataset: Arc<TickerDataset>) -> Self {
        Self { dataset }
    }
}

#[async_trait]
impl Tool for SearchCompaniesTool {
    fn name(&self) -> &str {
        "search_companies"
    }

    fn description(&self) -> &str {
        "Search companies by (optional) name substring and/or sector."
    }

    fn input_schema(&self) -> Value {
        // Constrain the sector to dataset values when there are any.
        let mut sector = json!({
            "type": "string",
            "description": "Sector name"
        });
        let sectors = self.dataset.sectors();
        if !sectors.is_empty() {
            sector["enum"] = json!(sectors);
            sector["description"] = json!("Exact sector name (from dataset)");
        }

        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search by company name substring"
                },
                "sector": sector
            }
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let query = input["query"].as_str().filter(|q| !q.is_empty());
        let sector = input["sector"].as_str().filter(|s| !s.is_empty());

        tracing::debug!(query = ?query, sector = ?sector, "Searching companies");

        let results: Vec<Value> = self
            .dataset
            .search(query, sector)
            .into_iter()
            .map(|r| {
                json!({
                    "symbol": r.symbol,
                    "name": r.name,
                    "sectorName": r.sector_name.as_deref().unwrap_or("Unknown"),
                })
            })
            .collect();

        Ok(ToolResult::success(Value::Array(results).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample_dataset;

    #[tokio::test]
    async fn test_search_by_query() {
        let tool = SearchCompaniesTool::new(Arc::new(sample_dataset()));

        let result = tool.execute(json!({"query": "bank"})).await.unwrap();
        assert!(!result.is_error);

        let payload: Value = serde_json::from_str(&result.output).unwrap();
        let hits = payload.as_array().unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["symbol"], "HBL");
    }

    #[tokio::test]
    async fn test_search_by_sector() {
        let tool = SearchCompaniesTool::new(Arc::new(sample_dataset()));

        let result = tool
            .execute(json!({"sector": "Commercial Banks"}))
            .await
            .unwrap();

        let payload: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(payload.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_without_filters() {
        let tool = SearchCompaniesTool::new(Arc::new(sample_dataset()));

        let result = tool.execute(json!({})).await.unwrap();
        let payload: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(payload.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_search_no_match_is_empty_array() {
        let tool = SearchCompaniesTool::new(Arc::new(sample_dataset()));

        let result = tool.execute(json!({"query": "zzz"})).await.unwrap();
        assert!(!result.is_error);

        let payload: Value = serde_json::from_str(&result.output).unwrap();
        assert!(payload.as_array().unwrap().is_empty());
    }

    #[test]
    fn test_schema_lists_sectors() {
        let tool = SearchCompaniesTool::new(Arc::new(sample_dataset()));
        let schema = tool.input_schema();
        let sectors = schema["properties"]["sector"]["enum"].as_array().unwrap();
        assert_eq!(sectors.len(), 2);
    }
}
