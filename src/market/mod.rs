pub mod poe_trade;

use async_trait::async_trait;

use crate::core::errors::MarketResult;
use crate::core::types::{CurrencyId, Quote};

pub use poe_trade::{first_affordable, Offer, PoeTradeClient};

#[async_trait]
pub trait MarketDataProvider {
    /// 提供者名称
    fn name(&self) -> &str;

    /// 查询用 `have` 换 `want` 时第一个买得起的报价
    ///
    /// 没有报价或所有报价都超过 `available` 时返回 `Ok(None)`；
    /// 通信失败或响应无法解析时返回错误，调用方不应重试。
    async fn best_offer(
        &self,
        have: CurrencyId,
        want: CurrencyId,
        available: u64,
    ) -> MarketResult<Option<Quote>>;
}
