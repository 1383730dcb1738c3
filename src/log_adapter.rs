use env_logger::{Builder, Target};
use log::LevelFilter;

/// 日志输出级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// 只输出警告和错误
    Quiet,
    /// 常规运行信息
    Normal,
    /// 输出每次扩展、回溯和缓存命中
    Trace,
}

impl LogMode {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, _) => LogMode::Trace,
            (false, true) => LogMode::Quiet,
            (false, false) => LogMode::Normal,
        }
    }

    pub fn level(self) -> LevelFilter {
        match self {
            LogMode::Quiet => LevelFilter::Warn,
            LogMode::Normal => LevelFilter::Info,
            LogMode::Trace => LevelFilter::Debug,
        }
    }
}

/// 日志适配器：日志写到 stderr，报告独占 stdout
pub struct LogAdapter;

impl LogAdapter {
    /// 初始化日志系统，RUST_LOG 优先于命令行给出的级别
    pub fn init(mode: LogMode) -> Result<(), log::SetLoggerError> {
        Builder::new()
            .filter_level(mode.level())
            .parse_default_env()
            .target(Target::Stderr)
            .try_init()
    }
}
