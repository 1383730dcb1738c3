use log::info;

use crate::core::path_context::PathContext;
use crate::core::types::Cycle;

/// 一次搜索中发现的所有循环，按发现顺序保存
#[derive(Debug, Default)]
pub struct CycleLedger {
    cycles: Vec<Cycle>,
}

impl CycleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录路径的深拷贝
    pub fn record(&mut self, context: &PathContext) -> &Cycle {
        let cycle = context.snapshot();
        info!("====== 回到起点 ====== {:?}", cycle.hops);
        self.cycles.push(cycle);
        &self.cycles[self.cycles.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    /// 只保留能赚钱的循环
    pub fn profitable(&self) -> Vec<&Cycle> {
        self.cycles.iter().filter(|c| c.is_profitable()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Quote;

    #[test]
    fn test_record_deep_copies() {
        let mut ledger = CycleLedger::new();
        let mut context = PathContext::init(1, 10);
        context.extend(2, &Quote::new("a", 1.0, 2.0)).unwrap();
        context.extend(1, &Quote::new("b", 1.0, 0.75)).unwrap();

        ledger.record(&context);
        context.retract().unwrap();
        context.retract().unwrap();

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.cycles()[0].hops.len(), 3);
        assert_eq!(ledger.cycles()[0].final_amount(), 15);
        assert_eq!(ledger.profitable().len(), 1);
    }
}
