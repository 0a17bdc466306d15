//! 数据库连接管理
//!
//! 建立 Postgres 连接池，按顺序经过三个阶段，任一阶段失败立即返回：
//! 1. 解析：把数据源描述转换为 `PgConnectOptions`
//! 2. 创建：按固定上下限创建连接池
//! 3. 探活：直接建立一个连接执行 ping，只尝试一次，失败时带出驱动原始错误
//!
//! 连接池、重连与协议细节全部交给 sqlx。

use crate::dsn;
use crate::error::StorageError;
use lucid_config::AppConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, PgConnection, PgPool};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// 连接池最大连接数。
pub const MAX_CONNECTIONS: u32 = 10;
/// 连接池保持的最小连接数。
pub const MIN_CONNECTIONS: u32 = 2;

/// 数据源描述：完整连接串，或由离散字段拼装。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// `DATABASE_URL` 原样使用（URL 或 `key=value` 形式）。
    Url(String),
    /// 由 `DB_*` 字段拼装。
    Components {
        host: String,
        port: String,
        user: String,
        password: String,
        database: String,
        ssl_mode: String,
    },
}

impl DataSource {
    /// 按配置选择数据源：`database_url` 非空时优先，其余字段不参与。
    pub fn from_config(config: &AppConfig) -> Self {
        if !config.database_url.is_empty() {
            return Self::Url(config.database_url.clone());
        }
        Self::Components {
            host: config.db_host.clone(),
            port: config.db_port.clone(),
            user: config.db_user.clone(),
            password: config.db_password.clone(),
            database: config.db_name.clone(),
            ssl_mode: config.db_sslmode.clone(),
        }
    }

    /// 解析为 sqlx 连接参数。
    pub fn connect_options(&self) -> Result<PgConnectOptions, StorageError> {
        let options = match self {
            Self::Url(url) if dsn::is_keyword_value(url) => dsn::parse_keyword_value(url)?,
            Self::Url(url) => PgConnectOptions::from_str(url)
                .map_err(|err| StorageError::Parse(err.to_string()))?,
            Self::Components {
                host,
                port,
                user,
                password,
                database,
                ssl_mode,
            } => PgConnectOptions::new_without_pgpass()
                .host(host)
                .port(dsn::parse_port(port)?)
                .username(user)
                .password(password)
                .database(database)
                .ssl_mode(dsn::parse_ssl_mode(ssl_mode)?),
        };

        // URL 中显式写 `:0` 时 sqlx 不拒绝
        if options.get_port() == 0 {
            return Err(StorageError::Parse("invalid port: 0".to_string()));
        }
        Ok(options)
    }
}

impl fmt::Display for DataSource {
    /// 输出可写入日志的描述（密码打码）。
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) if dsn::is_keyword_value(url) => write!(f, "{}", dsn::redact(url)),
            Self::Url(url) => write!(f, "{}", redact_url(url)),
            Self::Components {
                host,
                port,
                user,
                database,
                ssl_mode,
                ..
            } => write!(
                f,
                "host={host} port={port} user={user} password=*** dbname={database} sslmode={ssl_mode}"
            ),
        }
    }
}

/// 连接池参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    /// 获取连接超时，同时限制探活耗时；`None` 时使用 sqlx 默认值，探活不设上限。
    pub acquire_timeout: Option<Duration>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: MAX_CONNECTIONS,
            min_connections: MIN_CONNECTIONS,
            acquire_timeout: None,
        }
    }
}

/// 建立 Postgres 连接池（默认上下限 10/2）。
pub async fn connect_pool(config: &AppConfig) -> Result<PgPool, StorageError> {
    connect_pool_with(config, PoolSettings::default()).await
}

/// 按指定连接池参数建立 Postgres 连接池。
///
/// # 返回
/// - `Ok(PgPool)`：已通过探活的连接池
/// - `Err(StorageError)`：解析、创建或探活失败
pub async fn connect_pool_with(
    config: &AppConfig,
    settings: PoolSettings,
) -> Result<PgPool, StorageError> {
    let source = DataSource::from_config(config);
    match &source {
        DataSource::Url(_) => info!(
            component = "database",
            "using DATABASE_URL for database connection"
        ),
        DataSource::Components { .. } => info!(
            component = "database",
            "using individual DB components for database connection"
        ),
    }

    let options = source.connect_options()?;
    let pool = create_pool(options.clone(), settings)?;
    if let Err(err) = ping(&options, settings.acquire_timeout).await {
        warn!(
            component = "database",
            source = %source,
            kind = err.kind(),
            error = %err,
            "database ping failed"
        );
        pool.close().await;
        return Err(err);
    }

    info!(
        component = "database",
        max_connections = settings.max_connections,
        min_connections = settings.min_connections,
        "database connection pool ready"
    );
    Ok(pool)
}

/// 校验上下限并创建连接池（不立即建连）。
fn create_pool(options: PgConnectOptions, settings: PoolSettings) -> Result<PgPool, StorageError> {
    if settings.max_connections == 0 {
        return Err(StorageError::PoolCreation(
            "max_connections must be greater than zero".to_string(),
        ));
    }
    if settings.min_connections > settings.max_connections {
        return Err(StorageError::PoolCreation(format!(
            "min_connections ({}) exceeds max_connections ({})",
            settings.min_connections, settings.max_connections
        )));
    }

    let mut pool_options = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections);
    if let Some(timeout) = settings.acquire_timeout {
        pool_options = pool_options.acquire_timeout(timeout);
    }
    Ok(pool_options.connect_lazy_with(options))
}

/// 探活：绕过连接池直接连接一次并 ping。
///
/// 连接池获取连接时会对连接拒绝等错误静默重试直到超时，
/// 只剩 `PoolTimedOut`；直连能立即返回驱动的原始错误。
async fn ping(options: &PgConnectOptions, timeout: Option<Duration>) -> Result<(), StorageError> {
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, ping_once(options))
            .await
            .map_err(|_| {
                StorageError::Connectivity(format!("no response from database within {limit:?}"))
            })?,
        None => ping_once(options).await,
    };
    result.map_err(|err| StorageError::Connectivity(err.to_string()))
}

async fn ping_once(options: &PgConnectOptions) -> Result<(), sqlx::Error> {
    let mut conn = PgConnection::connect_with(options).await?;
    conn.ping().await?;
    conn.close().await
}

/// 把 URL 中 `user:password@` 部分的密码替换为 `***`。
fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;
    let rest = &url[authority_start..];
    let authority_len = rest.find(['/', '?']).unwrap_or(rest.len());
    let Some(at) = rest[..authority_len].rfind('@') else {
        return url.to_string();
    };
    let Some(colon) = rest[..at].find(':') else {
        return url.to_string();
    };

    format!(
        "{}{}:***{}",
        &url[..authority_start],
        &rest[..colon],
        &rest[at..]
    )
}
