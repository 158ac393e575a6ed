use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub max_log_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
            max_log_files: 14,
        }
    }
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored once a subscriber is set.
pub fn init_tracing(config: &LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let stdout_layer = fmt::layer().with_target(true).with_thread_ids(false);

    let registry = Registry::default().with(env_filter).with(stdout_layer);

    if config.enable_file_logs {
        let file_appender = match RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("physicode")
            .filename_suffix("log")
            .max_log_files(config.max_log_files)
            .build(&config.log_dir)
        {
            Ok(appender) => appender,
            Err(e) => {
                eprintln!("file logging disabled, cannot open {}: {e}", config.log_dir);
                report_init_error(registry.try_init());
                return;
            }
        };
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .json();
        report_init_error(registry.with(file_layer).try_init());
    } else {
        report_init_error(registry.try_init());
    }
}

// 全局 subscriber 已设置属于正常情况（如测试环境），其余失败需要提示
fn report_init_error(result: Result<(), TryInitError>) {
    if let Err(e) = result {
        let msg = e.to_string();
        if !is_already_set(&msg) {
            eprintln!("failed to initialize tracing: {msg}");
        }
    }
}

fn is_already_set(message: &str) -> bool {
    message.contains("already been set")
}
