pub mod cycle_search;
pub mod errors;
pub mod path_context;
pub mod quote_cache;
pub mod results;
pub mod types;

// 重新导出核心类型，方便外部使用
pub use cycle_search::{CycleSearch, SearchSettings, SearchStats};
pub use errors::{MarketError, SearchError};
pub use path_context::PathContext;
pub use quote_cache::{QuoteCache, QuoteKey};
pub use results::CycleLedger;
pub use types::*;
