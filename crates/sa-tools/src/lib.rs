//! sa-tools: Stock data tools for sa-gateway
//!
//! Dataset-backed tools the agent can call: price lookup, company
//! details, and company search.

use sa_core::ToolManager;

pub mod company;
pub mod dataset;
pub mod price;
pub mod search;

pub use company::GetCompanyTool;
pub use dataset::{TickerDataset, TickerRecord};
pub use price::GetPriceTool;
pub use search::SearchCompaniesTool;

use std::sync::Arc;

/// Register all stock tools with the tool manager
pub fn register_stock_tools(manager: &mut ToolManager, dataset: Arc<TickerDataset>) {
    manager.register(Arc::new(GetPriceTool::new(Arc::clone(&dataset))));
    manager.register(Arc::new(GetCompanyTool::new(Arc::clone(&dataset))));
    manager.register(Arc::new(SearchCompaniesTool::new(dataset)));
}
