//! 应用运行配置加载。
//!
//! 所有配置项均来自环境变量；变量缺失或为空时使用固定默认值，
//! 因此加载过程不会失败。

use std::env;

/// 开发环境默认允许的跨域来源。
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000,http://localhost:8080,http://localhost:8082,http://localhost:8081";

/// JWT 密钥占位默认值（生产环境必须覆盖）。
pub const DEFAULT_JWT_SECRET: &str = "your-super-secret-jwt-key-change-in-production";

/// 应用运行配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    // 数据库
    /// 完整连接串；为空时由 `db_*` 字段拼装。
    pub database_url: String,
    pub db_host: String,
    pub db_port: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_sslmode: String,

    // 服务
    pub server_port: String,
    pub server_host: String,

    // 应用
    pub app_env: String,
    pub log_level: String,

    // 认证
    pub jwt_secret: String,

    // 跨域
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// 从进程环境变量读取配置。
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置（`from_env` 的底层实现，测试中直接注入）。
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: &str| read_with_default(&lookup, key, default);

        Self {
            database_url: read("DATABASE_URL", ""),
            db_host: read("DB_HOST", "localhost"),
            db_port: read("DB_PORT", "5432"),
            db_user: read("DB_USER", "postgres"),
            db_password: read("DB_PASSWORD", "password"),
            db_name: read("DB_NAME", "lucid_lists"),
            db_sslmode: read("DB_SSLMODE", "disable"),
            server_port: read("PORT", "8080"),
            server_host: read("SERVER_HOST", "localhost"),
            app_env: read("APP_ENV", "development"),
            log_level: read("LOG_LEVEL", "info"),
            jwt_secret: read("JWT_SECRET", DEFAULT_JWT_SECRET),
            cors_allowed_origins: cors_origins(
                &read("CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ORIGINS),
                &read("FRONTEND_PORT", ""),
            ),
        }
    }

    /// 服务监听地址（`host:port`）。
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否仍在使用占位 JWT 密钥。
    pub fn uses_default_jwt_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

/// 读取字符串环境变量，缺失或为空时返回默认值。
fn read_with_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// 解析跨域来源列表，并按需追加前端端口对应的 localhost 来源。
///
/// 列表项保持原样（不做 trim）；去重比较时才 trim，大小写敏感。
pub fn cors_origins(origins: &str, frontend_port: &str) -> Vec<String> {
    let mut list: Vec<String> = origins.split(',').map(str::to_string).collect();

    if !frontend_port.is_empty() {
        let dynamic_origin = format!("http://localhost:{frontend_port}");
        let exists = list.iter().any(|origin| origin.trim() == dynamic_origin);
        if !exists {
            list.push(dynamic_origin);
        }
    }

    list
}
