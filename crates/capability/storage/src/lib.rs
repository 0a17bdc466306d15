//! # Lucid Storage 模块
//!
//! 负责建立 PostgreSQL 连接池，供后续请求处理共享使用。
//!
//! ## 模块说明
//!
//! - [`connection`]：数据源选择、连接池创建与探活
//! - [`dsn`]：`key=value` 形式连接串解析
//! - [`error`]：连接建立错误（解析 / 创建 / 连通性）
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use lucid_config::AppConfig;
//! use lucid_storage::connect_pool;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env();
//!     let pool = connect_pool(&config).await?;
//!     sqlx::query("SELECT 1").execute(&pool).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## 连接池配置
//!
//! - 最大连接数：10
//! - 最小连接数：2
//! - 获取连接超时：sqlx 默认值（可通过 [`PoolSettings`] 覆盖）

pub mod connection;
pub mod dsn;
pub mod error;

pub use connection::*;
pub use error::*;
