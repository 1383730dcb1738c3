//! 错误类型

use thiserror::Error;

/// 行情查询错误，任何一种都会终止整次搜索
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("market request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("bad response from {url}: {status}")]
    Status { status: u16, url: String },

    #[error("malformed offer row: {0}")]
    MalformedOffer(String),

    #[error("invalid market url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// 搜索过程中的错误
///
/// `Market` 和 `DepthTooShallow` 来自外部输入，其余变体都表示实现缺陷，正常运行时不应出现。
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Market(#[from] MarketError),

    #[error("max depth must be at least {min}, got {max}")]
    DepthTooShallow { max: usize, min: usize },

    #[error("cannot extend an empty trade path")]
    EmptyPath,

    #[error("attempting to pop empty context")]
    RetractEmpty,

    #[error("delved too deep: path length {len} > max depth {max}")]
    DepthExceeded { len: usize, max: usize },
}

pub type MarketResult<T> = Result<T, MarketError>;
pub type SearchResult<T> = Result<T, SearchError>;
