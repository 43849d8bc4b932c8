//! Price lookup tool

use async_trait::async_trait;
use chrono::Utc;
use sa_core::{Result, Tool, ToolResult};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::dataset::TickerDataset;

/// Tool returning price data for a stock symbol
pub struct GetPriceTool {
    dataset: Arc<TickerDataset>,
}

impl GetPriceTool {
    pub fn new(dataset: Arc<TickerDataset>) -> Self {
        Self { dataset }
    }
}

#[async_trait]
impl Tool for GetPriceTool {
    fn name(&self) -> &str {
        "get_price"
    }

    fn description(&self) -> &str {
        "Return price data for a stock symbol (PSX)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "pattern": "^[A-Z0-9]{1,10}$",
                    "description": "PSX ticker symbol (uppercase)"
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

        tracing::debug!(symbol = %symbol, "Looking up price");

        let Some(record) = self.dataset.find_by_symbol(&symbol) else {
            return Ok(ToolResult::error(format!("Symbol '{}' not found", symbol)));
        };

        let Some(price) = record.price else {
            return Ok(ToolResult::error(format!(
                "Price data not available for '{}'",
                symbol
            )));
        };

        let payload = json!({
            "symbol": record.symbol,
            "price": price,
            "currency": record.currency.as_deref().unwrap_or("PKR"),
            "asOf": record
                .as_of
                .clone()
                .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string()),
        });

        Ok(ToolResult::success(payload.to_string()))
    }
}
