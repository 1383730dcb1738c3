use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 通货 ID，与市场站点上的 `want` / `have` 参数一致
pub type CurrencyId = u32;

/// 起始跳没有交易对手时使用的占位卖家
pub const NO_SELLER: &str = "N/A";

/// 一种可交易的通货
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency {
    pub id: CurrencyId,
    pub name: String,
}

impl Currency {
    pub fn new(id: CurrencyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// 市场上针对某个通货对的最佳报价
///
/// 只有当 `pay_amount` 不超过查询时持有的数量时报价才有效，
/// 这一点由行情提供者保证。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub seller: String,         // 交易对手
    pub pay_amount: f64,        // 每单需要支付的源通货数量
    pub receive_amount: f64,    // 每单获得的目标通货数量
    pub stock: Option<u64>,     // 卖家库存（站点未提供时为空）
}

impl Quote {
    pub fn new(seller: impl Into<String>, pay_amount: f64, receive_amount: f64) -> Self {
        Self {
            seller: seller.into(),
            pay_amount,
            receive_amount,
            stock: None,
        }
    }

    /// 用该报价把 `amount` 全部兑换后得到的整数数量（向下取整）
    pub fn convert(&self, amount: u64) -> u64 {
        (amount as f64 / self.pay_amount * self.receive_amount).floor() as u64
    }
}

/// 交易路径中的一跳
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathHop {
    pub currency: CurrencyId,   // 到达本跳后持有的通货
    pub amount: u64,            // 到达本跳后持有的数量
    pub seller: String,         // 提供这笔交易的卖家
}

impl PathHop {
    pub fn new(currency: CurrencyId, amount: u64, seller: impl Into<String>) -> Self {
        Self {
            currency,
            amount,
            seller: seller.into(),
        }
    }
}

/// 已完成的兑换循环：最后一跳的通货与起点相同
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cycle {
    pub hops: Vec<PathHop>,
    pub found_at: DateTime<Utc>,
}

impl Cycle {
    pub fn new(hops: Vec<PathHop>) -> Self {
        Self {
            hops,
            found_at: Utc::now(),
        }
    }

    pub fn start_currency(&self) -> Option<CurrencyId> {
        self.hops.first().map(|hop| hop.currency)
    }

    pub fn start_amount(&self) -> u64 {
        self.hops.first().map(|hop| hop.amount).unwrap_or_default()
    }

    pub fn final_amount(&self) -> u64 {
        self.hops.last().map(|hop| hop.amount).unwrap_or_default()
    }

    /// 跑完一圈后的盈亏（可能为负）
    pub fn profit(&self) -> i128 {
        i128::from(self.final_amount()) - i128::from(self.start_amount())
    }

    pub fn is_profitable(&self) -> bool {
        self.profit() > 0
    }

    /// 交易次数（跳数减去起点）
    pub fn trade_count(&self) -> usize {
        self.hops.len().saturating_sub(1)
    }
}

impl PartialEq for Cycle {
    fn eq(&self, other: &Self) -> bool {
        self.hops == other.hops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_convert_truncates() {
        let quote = Quote::new("seller", 3.0, 1.0);
        assert_eq!(quote.convert(10), 3);

        let quote = Quote::new("seller", 1.0, 0.5);
        assert_eq!(quote.convert(20), 10);
    }

    #[test]
    fn test_cycle_profit() {
        let cycle = Cycle::new(vec![
            PathHop::new(4, 10, NO_SELLER),
            PathHop::new(6, 1, "bob"),
            PathHop::new(4, 12, "alice"),
        ]);
        assert_eq!(cycle.start_currency(), Some(4));
        assert_eq!(cycle.profit(), 2);
        assert!(cycle.is_profitable());
        assert_eq!(cycle.trade_count(), 2);
    }

    #[test]
    fn test_losing_cycle() {
        let cycle = Cycle::new(vec![PathHop::new(1, 10, NO_SELLER), PathHop::new(1, 7, "x")]);
        assert_eq!(cycle.profit(), -3);
        assert!(!cycle.is_profitable());
    }
}
