//! 存储层错误类型
//!
//! 连接建立分三个阶段，每个阶段对应一个错误类别：
//! - Parse：数据源描述无法解析为连接参数
//! - PoolCreation：连接池无法创建
//! - Connectivity：数据库不可达（探活失败）
//!
//! 所有错误都是终止性的，本层不做重试。

/// 连接建立错误。
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to parse database config: {0}")]
    Parse(String),
    #[error("failed to create connection pool: {0}")]
    PoolCreation(String),
    #[error("failed to ping database: {0}")]
    Connectivity(String),
}

impl StorageError {
    /// 错误类别名（用于日志字段）。
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::PoolCreation(_) => "pool_creation",
            Self::Connectivity(_) => "connectivity",
        }
    }
}
