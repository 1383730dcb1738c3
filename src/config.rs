use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::cycle_search::SearchSettings;
use crate::core::types::CurrencyId;
use crate::currency::CurrencyRegistry;
use crate::market::poe_trade::DEFAULT_HOST;

// 配置文件名（不带扩展名），位于工作目录，可选
const CONFIG_FILE: &str = "currency-spy";
// 环境变量前缀，例如 CURRENCY_SPY__MARKET__LEAGUE
const ENV_PREFIX: &str = "CURRENCY_SPY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub market: MarketConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    pub host: String,
    pub league: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub max_depth: usize,
    pub starting_currency: String,
    pub starting_amount: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            market: MarketConfig {
                host: DEFAULT_HOST.to_string(),
                league: "Synthesis".to_string(),
            },
            search: SearchConfig {
                max_depth: 3,
                starting_currency: "chaos".to_string(),
                starting_amount: 10,
            },
        }
    }
}

impl Config {
    /// 按 默认值 -> currency-spy.toml -> 环境变量 的顺序加载配置
    ///
    /// 这里不做校验，命令行覆盖之后再调用 [`validate`](Self::validate)。
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let settings = config::Config::builder()
            .set_default("market.host", defaults.market.host)?
            .set_default("market.league", defaults.market.league)?
            .set_default("search.max_depth", defaults.search.max_depth as i64)?
            .set_default("search.starting_currency", defaults.search.starting_currency)?
            .set_default("search.starting_amount", defaults.search.starting_amount as i64)?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// 检查配置是否可用于搜索
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.max_depth <= 2 {
            return Err(ConfigError::Invalid(format!(
                "dfs depth must be greater than 2, got {}",
                self.search.max_depth
            )));
        }
        if self.search.starting_amount == 0 {
            return Err(ConfigError::Invalid(
                "starting amount must be positive".to_string(),
            ));
        }
        if self.market.league.trim().is_empty() {
            return Err(ConfigError::Invalid("league must not be empty".to_string()));
        }
        if self.market.host.trim().is_empty() {
            return Err(ConfigError::Invalid("market host must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            max_depth: self.search.max_depth,
            starting_amount: self.search.starting_amount,
        }
    }

    /// 在注册表中解析起始通货
    pub fn starting_currency_id(&self, registry: &CurrencyRegistry) -> Result<CurrencyId, ConfigError> {
        registry
            .id_by_name(&self.search.starting_currency)
            .ok_or_else(|| ConfigError::UnknownCurrency(self.search.starting_currency.clone()))
    }
}
