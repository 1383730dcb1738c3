use std::collections::HashMap;

use log::debug;

use crate::core::types::{CurrencyId, Quote};

/// 缓存键：有序的 (have, want) 通货对
///
/// 数量不参与键值，同一通货对缓存后对任何数量都返回同一个报价。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuoteKey {
    pub have: CurrencyId,
    pub want: CurrencyId,
}

impl QuoteKey {
    pub fn new(have: CurrencyId, want: CurrencyId) -> Self {
        Self { have, want }
    }
}

/// 报价备忘表，生命周期与一次搜索相同，不淘汰也不过期
#[derive(Debug, Default)]
pub struct QuoteCache {
    entries: HashMap<QuoteKey, Quote>,
    hits: usize,
    misses: usize,
}

impl QuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查找缓存的报价，同时记录命中统计
    pub fn get(&mut self, have: CurrencyId, want: CurrencyId) -> Option<&Quote> {
        match self.entries.get(&QuoteKey::new(have, want)) {
            Some(quote) => {
                self.hits += 1;
                debug!("缓存命中: have={}, want={}", have, want);
                Some(quote)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn put(&mut self, have: CurrencyId, want: CurrencyId, quote: Quote) {
        self.entries.insert(QuoteKey::new(have, want), quote);
    }

    pub fn contains(&self, have: CurrencyId, want: CurrencyId) -> bool {
        self.entries.contains_key(&QuoteKey::new(have, want))
    }

    /// 返回 (命中次数, 未命中次数)
    pub fn get_stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}
