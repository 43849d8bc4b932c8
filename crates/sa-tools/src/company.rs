//! Company details tool

use async_trait::async_trait;
use sa_core::{Result, Tool, ToolResult};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::dataset::TickerDataset;

/// Tool returning company details for a stock symbol
pub struct GetCompanyTool {
    dataset: Arc<TickerDataset>,
}

impl GetCompanyTool {
    pub fn new(dataset: Arc<TickerDataset>) -> Self {
        Self { dataset }
    }
}

#[async_trait]
impl Tool for GetCompanyTool {
    fn name(&self) -> &str {
        "get_company"
    }

    fn description(&self) -> &str {
        "Return company details for a stock symbol."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "pattern": "^[A-Z0-9]{1,10}$",
                    "description": "PSX ticker symbol"
                }
            },
            "required": ["symbol"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let symbol = input["symbol"].as_str().ok_or_else(|| {
            sa_core::Error::ToolExecution("Missing 'symbol' parameter".to_string())
        })?;
        let symbol = symbol.to_uppercase();

        tracing::debug!(symbol = %symbol, "Looking up company");

        let Some(record) = self.dataset.find_by_symbol(&symbol) else {
            return Ok(ToolResult::error(format!("Symbol '{}' not found", symbol)));
        };

        let payload = json!({
            "symbol": record.symbol,
            "name": record.name,
            "sectorName": record.sector_name.as_deref().unwrap_or("Unknown"),
        });

        Ok(ToolResult::success(payload.to_string()))
    }
}
