use log::debug;

use crate::core::errors::{SearchError, SearchResult};
use crate::core::types::{Cycle, CurrencyId, PathHop, Quote, NO_SELLER};

/// 当前候选交易路径，深度优先搜索时原地扩展和回溯
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathContext {
    hops: Vec<PathHop>,
}

impl PathContext {
    /// 空路径
    pub fn new() -> Self {
        Self::default()
    }

    /// 只包含起始跳的路径
    pub fn init(start: CurrencyId, amount: u64) -> Self {
        let mut context = Self::new();
        context.seed(start, amount);
        context
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            hops: Vec::with_capacity(capacity),
        }
    }

    /// 追加起始跳，没有交易对手
    pub fn seed(&mut self, start: CurrencyId, amount: u64) {
        let hop = PathHop::new(start, amount, NO_SELLER);
        debug!("填充起始节点: {:?}", hop);
        self.hops.push(hop);
    }

    /// 按报价把上一跳的全部数量兑换为 `currency`，追加为新的一跳
    pub fn extend(&mut self, currency: CurrencyId, quote: &Quote) -> SearchResult<&PathHop> {
        let last = self.hops.last().ok_or(SearchError::EmptyPath)?;
        let hop = PathHop::new(currency, quote.convert(last.amount), quote.seller.clone());
        debug!("追加到交易路径: {:?}", hop);
        self.hops.push(hop);
        Ok(&self.hops[self.hops.len() - 1])
    }

    /// 移除最后一跳
    pub fn retract(&mut self) -> SearchResult<PathHop> {
        let hop = self.hops.pop().ok_or(SearchError::RetractEmpty)?;
        debug!("从交易路径弹出: {:?}", hop);
        Ok(hop)
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn first(&self) -> Option<&PathHop> {
        self.hops.first()
    }

    pub fn last(&self) -> Option<&PathHop> {
        self.hops.last()
    }

    pub fn hops(&self) -> &[PathHop] {
        &self.hops
    }

    /// 深拷贝当前路径；缓冲区随后会被回溯修改
    pub fn snapshot(&self) -> Cycle {
        Cycle::new(self.hops.clone())
    }
}
