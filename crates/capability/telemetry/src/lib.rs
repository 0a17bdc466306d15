//! 结构化日志初始化。

use tracing_subscriber::{EnvFilter, fmt};

/// 日志级别无法解析时使用的兜底级别。
pub const FALLBACK_LOG_LEVEL: &str = "info";

/// 构建日志过滤器：优先 `RUST_LOG`，其次配置的 `LOG_LEVEL`，都无效时退回 info。
pub fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(log_level))
}

/// 仅按给定级别构建过滤器（不读取 `RUST_LOG`）。
pub fn level_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LOG_LEVEL))
}

/// 初始化 tracing；重复调用时保持第一次的设置。
pub fn init_tracing(log_level: &str) {
    let _ = fmt().with_env_filter(env_filter(log_level)).try_init();
}
