use anyhow::Result;
use log::{error, info};

use currency_spy::cli::CliApp;
use currency_spy::config::Config;
use currency_spy::currency::CurrencyRegistry;
use currency_spy::log_adapter::{LogAdapter, LogMode};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 文件
    dotenv::dotenv().ok();

    let matches = CliApp::build_cli().get_matches();

    // 初始化日志系统
    LogAdapter::init(LogMode::from_flags(
        matches.get_flag("verbose"),
        matches.get_flag("quiet"),
    ))?;

    // 加载配置，命令行参数优先；校验在 run 里进行
    let mut config = Config::load()?;
    CliApp::apply_overrides(&mut config, &matches);
    info!("配置加载完成: {:?}", config);

    let app = CliApp::new(config, CurrencyRegistry::poe_default());
    if let Err(e) = app.run(&matches).await {
        error!("搜索失败: {}", e);
        return Err(e);
    }

    Ok(())
}
