use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use tabled::{settings::Style, Table, Tabled};

use crate::core::types::Cycle;
use crate::currency::CurrencyRegistry;

/// 报告格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Table,
    Json,
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "table" => Ok(ReportFormat::Table),
            "json" => Ok(ReportFormat::Json),
            other => Err(anyhow!("unknown report format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct StepRow {
    #[tabled(rename = "步骤")]
    step: usize,
    #[tabled(rename = "通货")]
    currency: String,
    #[tabled(rename = "数量")]
    amount: u64,
    #[tabled(rename = "卖家")]
    seller: String,
}

/// 按指定格式渲染循环列表
pub fn render(format: ReportFormat, cycles: &[&Cycle], registry: &CurrencyRegistry) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(cycles, registry)),
        ReportFormat::Table => Ok(render_table(cycles, registry)),
        ReportFormat::Json => render_json(cycles),
    }
}

/// 每个循环一段，每跳一行：`Step n: 名称 @ 数量`
pub fn render_text(cycles: &[&Cycle], registry: &CurrencyRegistry) -> String {
    let mut out = String::new();
    for cycle in cycles {
        out.push_str("---------\n");
        for (n, hop) in cycle.hops.iter().enumerate() {
            let _ = writeln!(out, "Step {}: {} @ {}", n, registry.display_name(hop.currency), hop.amount);
        }
    }
    out
}

pub fn render_table(cycles: &[&Cycle], registry: &CurrencyRegistry) -> String {
    if cycles.is_empty() {
        return "没有找到循环\n".to_string();
    }

    let mut out = String::new();
    for (index, cycle) in cycles.iter().enumerate() {
        let rows: Vec<StepRow> = cycle
            .hops
            .iter()
            .enumerate()
            .map(|(step, hop)| StepRow {
                step,
                currency: registry.display_name(hop.currency),
                amount: hop.amount,
                seller: hop.seller.clone(),
            })
            .collect();

        let _ = writeln!(
            out,
            "循环 #{} ({} 次交易, 盈亏 {:+})",
            index + 1,
            cycle.trade_count(),
            cycle.profit()
        );
        let _ = writeln!(out, "{}", Table::new(rows).with(Style::modern()));
    }
    out
}

pub fn render_json(cycles: &[&Cycle]) -> Result<String> {
    Ok(serde_json::to_string_pretty(cycles)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PathHop, NO_SELLER};

    fn sample() -> Cycle {
        Cycle::new(vec![
            PathHop::new(4, 10, NO_SELLER),
            PathHop::new(6, 20, "alice"),
            PathHop::new(4, 11, "bob"),
        ])
    }

    #[test]
    fn test_render_text() {
        let registry = CurrencyRegistry::poe_default();
        let cycle = sample();
        let text = render_text(&[&cycle], &registry);
        assert_eq!(
            text,
            "---------\nStep 0: chaos @ 10\nStep 1: exalted @ 20\nStep 2: chaos @ 11\n"
        );
    }

    #[test]
    fn test_render_table_mentions_profit() {
        let registry = CurrencyRegistry::poe_default();
        let cycle = sample();
        let table = render_table(&[&cycle], &registry);
        assert!(table.contains("循环 #1 (2 次交易, 盈亏 +1)"));
        assert!(table.contains("alice"));
        assert!(table.contains("exalted"));
    }

    #[test]
    fn test_render_empty() {
        let registry = CurrencyRegistry::poe_default();
        assert_eq!(render_text(&[], &registry), "");
        assert_eq!(render_table(&[], &registry), "没有找到循环\n");
    }

    #[test]
    fn test_render_json() {
        let cycle = sample();
        let json = render_json(&[&cycle]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["hops"][1]["seller"], "alice");
        assert_eq!(value[0]["hops"][2]["amount"], 11);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("TABLE".parse::<ReportFormat>().unwrap(), ReportFormat::Table);
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
