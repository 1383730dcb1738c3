//! Currency Spy - 通货市场循环套利搜索
//!
//! 从一种通货出发做有界深度优先搜索，按需向市场查询报价（按通货对缓存），
//! 记录所有回到起点的兑换循环。

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod log_adapter;
pub mod market;
pub mod report;

// 重新导出常用类型
pub use crate::config::Config;
pub use crate::core::{Cycle, CycleSearch, PathContext, PathHop, Quote, SearchError, SearchSettings};
pub use crate::currency::CurrencyRegistry;
pub use crate::market::{MarketDataProvider, PoeTradeClient};
