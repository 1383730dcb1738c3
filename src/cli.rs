use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use log::{info, warn};

use crate::config::{Config, ConfigError};
use crate::core::cycle_search::CycleSearch;
use crate::currency::CurrencyRegistry;
use crate::market::PoeTradeClient;
use crate::report::{self, ReportFormat};

// 命令行参数常量
const LEAGUE_ARG: &str = "league";
const DEPTH_ARG: &str = "dfs-depth";
const CURRENCY_ARG: &str = "currency";
const AMOUNT_ARG: &str = "amount";
const FORMAT_ARG: &str = "format";
const PROFITABLE_ARG: &str = "profitable-only";
const LIST_ARG: &str = "list-currencies";
const VERBOSE_ARG: &str = "verbose";
const QUIET_ARG: &str = "quiet";

/// CLI应用程序结构
pub struct CliApp {
    config: Config,
    registry: CurrencyRegistry,
}

impl CliApp {
    pub fn new(config: Config, registry: CurrencyRegistry) -> Self {
        Self { config, registry }
    }

    /// 构建命令行参数解析器
    pub fn build_cli() -> Command {
        Command::new("currency-spy")
            .version("0.1")
            .about("通货市场循环套利搜索")
            .arg(
                Arg::new(LEAGUE_ARG)
                    .long(LEAGUE_ARG)
                    .help("使用的联盟")
                    .value_name("LEAGUE"),
            )
            .arg(
                Arg::new(DEPTH_ARG)
                    .long(DEPTH_ARG)
                    .alias("dfs_depth")
                    .short('d')
                    .help("DFS 最大深度，需要 >2")
                    .value_name("DEPTH")
                    .value_parser(clap::value_parser!(usize)),
            )
            .arg(
                Arg::new(CURRENCY_ARG)
                    .long(CURRENCY_ARG)
                    .short('c')
                    .help("起始通货名称")
                    .value_name("NAME"),
            )
            .arg(
                Arg::new(AMOUNT_ARG)
                    .long(AMOUNT_ARG)
                    .short('a')
                    .help("起始通货数量")
                    .value_name("AMOUNT")
                    .value_parser(clap::value_parser!(u64)),
            )
            .arg(
                Arg::new(FORMAT_ARG)
                    .long(FORMAT_ARG)
                    .short('f')
                    .help("报告格式: text / table / json")
                    .value_name("FORMAT")
                    .default_value("text"),
            )
            .arg(
                Arg::new(PROFITABLE_ARG)
                    .long(PROFITABLE_ARG)
                    .help("只报告盈利的循环")
                    .action(clap::ArgAction::SetTrue),
            )
            .arg(
                Arg::new(LIST_ARG)
                    .long(LIST_ARG)
                    .help("列出所有已知通货后退出")
                    .action(clap::ArgAction::SetTrue),
            )
            .arg(
                Arg::new(VERBOSE_ARG)
                    .long(VERBOSE_ARG)
                    .short('v')
                    .help("输出调试日志")
                    .action(clap::ArgAction::SetTrue),
            )
            .arg(
                Arg::new(QUIET_ARG)
                    .long(QUIET_ARG)
                    .short('q')
                    .help("只输出警告和错误日志")
                    .action(clap::ArgAction::SetTrue),
            )
    }

    /// 命令行参数覆盖配置文件和环境变量，不做校验
    pub fn apply_overrides(config: &mut Config, matches: &ArgMatches) {
        if let Some(league) = matches.get_one::<String>(LEAGUE_ARG) {
            config.market.league = league.clone();
        }
        if let Some(depth) = matches.get_one::<usize>(DEPTH_ARG) {
            config.search.max_depth = *depth;
        }
        if let Some(currency) = matches.get_one::<String>(CURRENCY_ARG) {
            config.search.starting_currency = currency.clone();
        }
        if let Some(amount) = matches.get_one::<u64>(AMOUNT_ARG) {
            config.search.starting_amount = *amount;
        }
    }

    /// 运行CLI应用程序
    pub async fn run(&self, matches: &ArgMatches) -> Result<()> {
        if matches.get_flag(LIST_ARG) {
            self.print_currencies();
            return Ok(());
        }

        self.config.validate()?;

        let format: ReportFormat = matches
            .get_one::<String>(FORMAT_ARG)
            .map(|s| s.parse::<ReportFormat>())
            .transpose()?
            .unwrap_or(ReportFormat::Text);

        let start = match self.config.starting_currency_id(&self.registry) {
            Ok(id) => id,
            Err(ConfigError::UnknownCurrency(name)) => {
                warn!("未知的起始通货: {}", name);
                println!("Looks like nothing ran. Here's a summary of valid currencies:");
                self.print_currencies();
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            "起始通货={} 数量={} 联盟={}",
            self.config.search.starting_currency,
            self.config.search.starting_amount,
            self.config.market.league
        );

        let client = PoeTradeClient::new(&self.config.market.host, self.config.market.league.clone())?;
        let mut search = CycleSearch::new(&client, &self.registry, self.config.search_settings());
        search.run(start).await?;
        info!("完成!");

        let cycles: Vec<_> = if matches.get_flag(PROFITABLE_ARG) {
            search.ledger().profitable()
        } else {
            search.cycles().iter().collect()
        };

        print!("{}", report::render(format, &cycles, &self.registry)?);
        Ok(())
    }

    fn print_currencies(&self) {
        for name in self.registry.sorted_names() {
            println!("{}", name);
        }
    }
}
