//! Ticker symbol extraction and resolution

pub mod extract;
pub mod resolver;

pub use extract::{SymbolExtractor, UppercaseRunExtractor};
pub use resolver::{is_valid_symbol, SymbolResolver};
