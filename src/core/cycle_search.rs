use futures::future::{BoxFuture, FutureExt};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::errors::{SearchError, SearchResult};
use crate::core::path_context::PathContext;
use crate::core::quote_cache::QuoteCache;
use crate::core::results::CycleLedger;
use crate::core::types::{Cycle, CurrencyId, Quote};
use crate::currency::CurrencyRegistry;
use crate::market::MarketDataProvider;

// 起点加一跳就已经是 2，更小的深度无法表示任何路径
pub const MIN_DEPTH: usize = 2;

/// 搜索参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    pub max_depth: usize,       // 路径最多包含的跳数（含起点），需要 >2 才可能成环
    pub starting_amount: u64,   // 起始通货数量
}

/// 一次搜索的计数器
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes_visited: usize,
    pub provider_queries: usize,
    pub cache_hits: usize,
    pub depth_pruned: usize,
    pub abandoned_nodes: usize,
    pub cycles_found: usize,
}

/// 一次循环搜索
///
/// 报价缓存、结果和路径缓冲区都归这个对象所有，每次运行新建一个。
/// 交易图不预先构建，边在访问时通过缓存或行情提供者按需获取。
pub struct CycleSearch<'a, P: ?Sized> {
    provider: &'a P,
    registry: &'a CurrencyRegistry,
    settings: SearchSettings,
    cache: QuoteCache,
    context: PathContext,
    ledger: CycleLedger,
    stats: SearchStats,
}

impl<'a, P> CycleSearch<'a, P>
where
    P: MarketDataProvider + Send + Sync + ?Sized,
{
    pub fn new(provider: &'a P, registry: &'a CurrencyRegistry, settings: SearchSettings) -> Self {
        Self {
            provider,
            registry,
            settings,
            cache: QuoteCache::new(),
            context: PathContext::with_capacity(settings.max_depth + 1),
            ledger: CycleLedger::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    pub fn context(&self) -> &PathContext {
        &self.context
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn cycles(&self) -> &[Cycle] {
        self.ledger.cycles()
    }

    pub fn ledger(&self) -> &CycleLedger {
        &self.ledger
    }

    /// 从 `start` 开始搜索所有回到 `start` 的循环
    ///
    /// 返回值只表示这一分支是否出现过循环，结果通过 [`cycles`](Self::cycles) 读取。
    /// 任何行情错误或不变量被破坏都会立即中止搜索。
    /// 深度 2 合法但找不到循环，小于 2 直接拒绝。
    pub async fn run(&mut self, start: CurrencyId) -> SearchResult<bool> {
        if self.settings.max_depth < MIN_DEPTH {
            return Err(SearchError::DepthTooShallow {
                max: self.settings.max_depth,
                min: MIN_DEPTH,
            });
        }

        info!(
            "开始搜索: 起点={} 数量={} 最大深度={} 提供者={}",
            self.registry.display_name(start),
            self.settings.starting_amount,
            self.settings.max_depth,
            self.provider.name()
        );

        let found = self.delve(start).await?;

        let (hits, misses) = self.cache.get_stats();
        info!(
            "搜索完成: 访问 {} 个节点, 查询 {} 次, 缓存命中 {} / 未命中 {}, 找到 {} 个循环",
            self.stats.nodes_visited,
            self.stats.provider_queries,
            hits,
            misses,
            self.ledger.len()
        );
        Ok(found)
    }

    // 递归需要装箱的 future
    fn delve(&mut self, current: CurrencyId) -> BoxFuture<'_, SearchResult<bool>> {
        self.visit(current).boxed()
    }

    async fn visit(&mut self, current: CurrencyId) -> SearchResult<bool> {
        self.stats.nodes_visited += 1;

        // 回到起点了吗？
        if self.context.first().map(|hop| hop.currency) == Some(current) {
            self.ledger.record(&self.context);
            self.stats.cycles_found += 1;
            return Ok(true);
        }

        let depth = self.context.len();
        if depth > self.settings.max_depth {
            return Err(SearchError::DepthExceeded {
                len: depth,
                max: self.settings.max_depth,
            });
        }
        if depth == self.settings.max_depth {
            debug!("达到最大深度: {:?}", self.context.hops());
            self.stats.depth_pruned += 1;
            return Ok(false);
        }

        // 不和自己兑换；遍历顺序不确定
        let candidates: Vec<CurrencyId> = self.registry.ids().filter(|id| *id != current).collect();

        let mut seeded = false;
        let mut found = false;
        for candidate in candidates {
            debug!(
                "考察 {} -> {}",
                self.registry.display_name(current),
                self.registry.display_name(candidate)
            );

            if self.context.is_empty() {
                self.context.seed(current, self.settings.starting_amount);
                seeded = true;
            }

            let available = self.context.last().map(|hop| hop.amount).ok_or(SearchError::EmptyPath)?;
            let quote = match self.quote_for(current, candidate, available).await? {
                Some(quote) => quote,
                None => {
                    // 一条边没有报价就放弃整个节点剩下的候选
                    debug!(
                        "{} -> {} 没有可用报价，放弃节点 {}",
                        self.registry.display_name(current),
                        self.registry.display_name(candidate),
                        self.registry.display_name(current)
                    );
                    self.stats.abandoned_nodes += 1;
                    self.release_seed(seeded)?;
                    return Ok(false);
                }
            };

            self.context.extend(candidate, &quote)?;
            found |= self.delve(candidate).await?;
            self.context.retract()?;
        }

        self.release_seed(seeded)?;
        Ok(found)
    }

    /// 先查缓存，未命中再查询行情并写入缓存
    async fn quote_for(
        &mut self,
        have: CurrencyId,
        want: CurrencyId,
        available: u64,
    ) -> SearchResult<Option<Quote>> {
        if let Some(quote) = self.cache.get(have, want) {
            self.stats.cache_hits += 1;
            return Ok(Some(quote.clone()));
        }

        self.stats.provider_queries += 1;
        let quote = self.provider.best_offer(have, want, available).await?;
        if let Some(quote) = &quote {
            self.cache.put(have, want, quote.clone());
        }
        Ok(quote)
    }

    // 本节点填充的起始跳在返回前移除，保证缓冲区恢复原状
    fn release_seed(&mut self, seeded: bool) -> SearchResult<()> {
        if seeded {
            self.context.retract()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::{MarketError, MarketResult};
    use crate::core::types::PathHop;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const A: CurrencyId = 1;
    const B: CurrencyId = 2;
    const C: CurrencyId = 3;
    const D: CurrencyId = 4;

    /// 固定报价表，记录每次查询
    #[derive(Default)]
    struct FakeMarket {
        quotes: HashMap<(CurrencyId, CurrencyId), Quote>,
        calls: Mutex<Vec<(CurrencyId, CurrencyId, u64)>>,
        fail: bool,
    }

    impl FakeMarket {
        fn with_quote(mut self, have: CurrencyId, want: CurrencyId, pay: f64, receive: f64) -> Self {
            self.quotes
                .insert((have, want), Quote::new(format!("seller{}{}", have, want), pay, receive));
            self
        }

        fn calls(&self) -> Vec<(CurrencyId, CurrencyId, u64)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MarketDataProvider for FakeMarket {
        fn name(&self) -> &str {
            "fake"
        }

        async fn best_offer(
            &self,
            have: CurrencyId,
            want: CurrencyId,
            available: u64,
        ) -> MarketResult<Option<Quote>> {
            self.calls.lock().unwrap().push((have, want, available));
            if self.fail {
                return Err(MarketError::MalformedOffer("boom".to_string()));
            }
            Ok(self
                .quotes
                .get(&(have, want))
                .filter(|q| q.pay_amount <= available as f64)
                .cloned())
        }
    }

    fn registry(ids: &[CurrencyId]) -> CurrencyRegistry {
        let mut registry = CurrencyRegistry::new();
        for id in ids {
            registry.insert(*id, format!("c{}", id));
        }
        registry
    }

    fn settings(max_depth: usize) -> SearchSettings {
        SearchSettings {
            max_depth,
            starting_amount: 10,
        }
    }

    #[tokio::test]
    async fn test_two_hop_cycle() {
        let market = FakeMarket::default()
            .with_quote(A, B, 1.0, 2.0)
            .with_quote(B, A, 1.0, 0.5);
        let registry = registry(&[A, B]);
        let mut search = CycleSearch::new(&market, &registry, settings(3));

        assert!(search.run(A).await.unwrap());
        assert_eq!(search.cycles().len(), 1);
        assert_eq!(
            search.cycles()[0].hops,
            vec![
                PathHop::new(A, 10, "N/A"),
                PathHop::new(B, 20, "seller12"),
                PathHop::new(A, 10, "seller21"),
            ]
        );
        assert_eq!(search.stats().cycles_found, 1);
    }

    #[tokio::test]
    async fn test_depth_two_prunes_cycle() {
        let market = FakeMarket::default()
            .with_quote(A, B, 1.0, 2.0)
            .with_quote(B, A, 1.0, 0.5);
        let registry = registry(&[A, B]);
        let mut search = CycleSearch::new(&market, &registry, settings(2));

        assert!(!search.run(A).await.unwrap());
        assert!(search.cycles().is_empty());
        assert_eq!(search.stats().depth_pruned, 1);
        // B -> A 从未被查询
        assert_eq!(market.calls(), vec![(A, B, 10)]);
    }

    #[tokio::test]
    async fn test_depth_below_two_rejected() {
        let market = FakeMarket::default()
            .with_quote(A, B, 1.0, 2.0)
            .with_quote(B, A, 1.0, 0.5);
        let registry = registry(&[A, B]);

        for depth in [0, 1] {
            let mut search = CycleSearch::new(&market, &registry, settings(depth));
            let err = search.run(A).await.unwrap_err();
            assert!(matches!(err, SearchError::DepthTooShallow { max, min: 2 } if max == depth));
        }
        assert!(market.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_quote_abandons_node() {
        let market = FakeMarket::default();
        let registry = registry(&[A, B, C, D]);
        let mut search = CycleSearch::new(&market, &registry, settings(4));

        assert!(!search.run(A).await.unwrap());
        assert_eq!(market.calls().len(), 1);
        assert_eq!(search.stats().abandoned_nodes, 1);
        assert!(search.context().is_empty());
    }

    #[tokio::test]
    async fn test_pairs_are_queried_once() {
        // 完全图，所有报价 1:1
        let mut market = FakeMarket::default();
        for have in [A, B, C] {
            for want in [A, B, C] {
                if have != want {
                    market = market.with_quote(have, want, 1.0, 1.0);
                }
            }
        }
        let registry = registry(&[A, B, C]);
        let mut search = CycleSearch::new(&market, &registry, settings(4));
        search.run(A).await.unwrap();

        let calls = market.calls();
        let mut pairs: Vec<_> = calls.iter().map(|(h, w, _)| (*h, *w)).collect();
        pairs.sort_unstable();
        pairs.dedup();
        assert_eq!(pairs.len(), calls.len());
        assert_eq!(search.stats().provider_queries, calls.len());
        assert!(search.stats().cache_hits > 0);

        // A->B->A, A->C->A, A->B->C->A, A->C->B->A
        assert_eq!(search.cycles().len(), 4);
    }

    #[tokio::test]
    async fn test_context_restored_after_run() {
        let market = FakeMarket::default()
            .with_quote(A, B, 1.0, 2.0)
            .with_quote(B, A, 1.0, 0.5)
            .with_quote(A, C, 1.0, 1.0)
            .with_quote(C, A, 1.0, 1.0)
            .with_quote(B, C, 1.0, 1.0)
            .with_quote(C, B, 1.0, 1.0);
        let registry = registry(&[A, B, C]);
        let mut search = CycleSearch::new(&market, &registry, settings(4));

        let before = search.context().clone();
        search.run(A).await.unwrap();
        assert_eq!(search.context(), &before);
        assert!(search.context().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_is_fatal() {
        let market = FakeMarket {
            fail: true,
            ..Default::default()
        };
        let registry = registry(&[A, B, C]);
        let mut search = CycleSearch::new(&market, &registry, settings(3));

        let err = search.run(A).await.unwrap_err();
        assert!(matches!(err, SearchError::Market(MarketError::MalformedOffer(_))));
        assert_eq!(market.calls().len(), 1);
        assert!(search.cycles().is_empty());
    }
}
