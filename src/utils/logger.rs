use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日誌輸出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// 函式庫與 `toml-profile` 執行檔共用的預設過濾設定
pub(crate) fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "demand_profile=debug,toml_profile=debug,info"
    } else {
        "demand_profile=info,toml_profile=info,warn"
    }
}

fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// 初始化 CLI 日誌；`RUST_LOG` 會覆蓋預設的過濾設定
pub fn init_logger(verbose: bool, format: LogFormat) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(default_filter(verbose));

    match format {
        LogFormat::Compact => registry.with(fmt_layer.compact()).init(),
        // 給日誌收集器用的結構化輸出
        LogFormat::Json => registry.with(fmt_layer.json()).init(),
    }
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(verbose, LogFormat::Compact);
}
