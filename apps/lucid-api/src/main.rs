//! lucid-lists 后端启动入口：加载配置、初始化日志、建立数据库连接池。

use lucid_config::AppConfig;
use lucid_storage::connect_pool;
use lucid_telemetry::init_tracing;
use sqlx::PgPool;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置（缺省值兜底，不会失败）
    let config = AppConfig::from_env();
    // 初始化结构化日志
    init_tracing(&config.log_level);

    info!(
        component = "config",
        app_env = %config.app_env,
        server_addr = %config.server_addr(),
        cors_origins = config.cors_allowed_origins.len(),
        "configuration loaded"
    );
    if config.is_production() && config.uses_default_jwt_secret() {
        warn!(
            component = "config",
            "JWT_SECRET is the placeholder default; set it for production"
        );
    }

    // 解析 → 创建 → 探活，任一阶段失败即终止启动
    let pool = connect_pool(&config).await?;

    wait_for_shutdown(pool).await
}

/// 等待 Ctrl-C 后关闭连接池。
async fn wait_for_shutdown(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
    tokio::signal::ctrl_c().await?;
    info!(component = "database", "shutdown signal received, closing connection pool");
    pool.close().await;
    Ok(())
}
