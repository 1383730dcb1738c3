use std::collections::HashMap;

use crate::core::types::{Currency, CurrencyId};

/// 站点上已知的通货 (id, 名称)
///
/// 22 和 23 是站点上 alteration / chance 的另一组 ID，保留原样。
const POE_CURRENCIES: [(CurrencyId, &str); 26] = [
    (1, "alteration"),
    (2, "fusing"),
    (3, "alchemy"),
    (4, "chaos"),
    (6, "exalted"),
    (7, "chromatic"),
    (8, "jewellers"),
    (9, "chance"),
    (10, "chisel"),
    (11, "scouring"),
    (12, "blessed"),
    (13, "regret"),
    (14, "regal"),
    (16, "vaal"),
    (17, "wisdom"),
    (18, "portal"),
    (19, "armorer"),
    (20, "whetstone"),
    (21, "glassblower"),
    (22, "alteration"),
    (23, "chance"),
    (27, "sacrifice_at_dusk"),
    (28, "sacrifice_at_midnight"),
    (29, "sacrifice_at_dawn"),
    (30, "sacrifice_at_noon"),
    (35, "silver"),
];

/// 通货注册表：ID -> 名称
///
/// 遍历顺序不确定（底层是 `HashMap`），搜索不能依赖候选通货的顺序。
#[derive(Debug, Clone, Default)]
pub struct CurrencyRegistry {
    names: HashMap<CurrencyId, String>,
}

impl CurrencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置的 poe.trade 通货表
    pub fn poe_default() -> Self {
        POE_CURRENCIES
            .iter()
            .map(|(id, name)| Currency::new(*id, *name))
            .collect()
    }

    /// 添加或覆盖一种通货
    pub fn insert(&mut self, id: CurrencyId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    pub fn name(&self, id: CurrencyId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// 报告用的显示名，未知 ID 显示为 `#id`
    pub fn display_name(&self, id: CurrencyId) -> String {
        self.name(id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", id))
    }

    /// 按名称查找 ID（不区分大小写），重名时取最小的 ID
    pub fn id_by_name(&self, name: &str) -> Option<CurrencyId> {
        self.names
            .iter()
            .filter(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(id, _)| *id)
            .min()
    }

    pub fn contains(&self, id: CurrencyId) -> bool {
        self.names.contains_key(&id)
    }

    /// 所有通货 ID，顺序不确定
    pub fn ids(&self) -> impl Iterator<Item = CurrencyId> + '_ {
        self.names.keys().copied()
    }

    /// 去重并排序后的名称列表
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.values().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<Currency> for CurrencyRegistry {
    fn from_iter<I: IntoIterator<Item = Currency>>(iter: I) -> Self {
        let mut registry = Self::new();
        for currency in iter {
            registry.insert(currency.id, currency.name);
        }
        registry
    }
}
