//! libpq 风格 `key=value` 连接串解析。
//!
//! sqlx 只解析 URL 形式，`DATABASE_URL` 也可能是
//! `host=db port=5432 user=app dbname=lists` 这种关键字形式，此处转换为 `PgConnectOptions`。
//! 值可用单引号包裹，`\'`、`\\` 为转义。

use crate::error::StorageError;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::str::FromStr;

/// 是否为 URL 形式（`postgres://` / `postgresql://`）。
pub fn is_url(dsn: &str) -> bool {
    let dsn = dsn.trim_start();
    dsn.starts_with("postgres://") || dsn.starts_with("postgresql://")
}

/// 是否为关键字形式：非 URL 且包含 `=`。
pub fn is_keyword_value(dsn: &str) -> bool {
    !is_url(dsn) && dsn.contains('=')
}

/// 解析关键字形式连接串为 sqlx 连接参数。
///
/// 支持的键：host、port、user、password、dbname、sslmode、sslrootcert、application_name。
pub fn parse_keyword_value(dsn: &str) -> Result<PgConnectOptions, StorageError> {
    let mut options = PgConnectOptions::new_without_pgpass();
    for (key, value) in parse_pairs(dsn)? {
        options = match key.as_str() {
            "host" => options.host(&value),
            "port" => options.port(parse_port(&value)?),
            "user" => options.username(&value),
            "password" => options.password(&value),
            "dbname" => options.database(&value),
            "sslmode" => options.ssl_mode(parse_ssl_mode(&value)?),
            "sslrootcert" => options.ssl_root_cert(&value),
            "application_name" => options.application_name(&value),
            other => {
                return Err(StorageError::Parse(format!(
                    "unsupported connection parameter: {other}"
                )));
            }
        };
    }
    Ok(options)
}

/// 输出密码打码后的关键字形式；无法解析时不回显原文。
pub fn redact(dsn: &str) -> String {
    match parse_pairs(dsn) {
        Ok(pairs) => pairs
            .into_iter()
            .map(|(key, value)| {
                if key == "password" {
                    format!("{key}=***")
                } else {
                    format!("{key}={value}")
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
        Err(_) => "<invalid connection string>".to_string(),
    }
}

/// 端口必须在 1..=65535。
pub(crate) fn parse_port(value: &str) -> Result<u16, StorageError> {
    match value.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(StorageError::Parse(format!("invalid port: {value}"))),
    }
}

pub(crate) fn parse_ssl_mode(value: &str) -> Result<PgSslMode, StorageError> {
    PgSslMode::from_str(value).map_err(|err| StorageError::Parse(err.to_string()))
}

/// 拆分 `key=value` 对，处理引号与转义。
fn parse_pairs(dsn: &str) -> Result<Vec<(String, String)>, StorageError> {
    let mut pairs = Vec::new();
    let mut chars = dsn.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=' && !c.is_whitespace()) {
            key.push(c);
        }
        if key.is_empty() {
            return Err(StorageError::Parse(
                "missing key in connection string".to_string(),
            ));
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.next() != Some('=') {
            return Err(StorageError::Parse(format!(
                "missing \"=\" after \"{key}\" in connection string"
            )));
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut value = String::new();
        if chars.next_if_eq(&'\'').is_some() {
            loop {
                match chars.next() {
                    Some('\'') => break,
                    Some('\\') => match chars.next() {
                        Some(escaped) => value.push(escaped),
                        None => return Err(unterminated_quote()),
                    },
                    Some(c) => value.push(c),
                    None => return Err(unterminated_quote()),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        value.push(escaped);
                    }
                } else {
                    value.push(c);
                }
            }
        }

        pairs.push((key, value));
    }

    Ok(pairs)
}

fn unterminated_quote() -> StorageError {
    StorageError::Parse("unterminated quoted string in connection string".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_handle_quotes_and_escapes() {
        let pairs = parse_pairs(r"host = db  password='it\'s secret' dbname=a\ b").expect("pairs");
        assert_eq!(
            pairs,
            vec![
                ("host".to_string(), "db".to_string()),
                ("password".to_string(), "it's secret".to_string()),
                ("dbname".to_string(), "a b".to_string()),
            ]
        );
    }

    #[test]
    fn pairs_reject_malformed_input() {
        assert!(parse_pairs("host=db port").is_err());
        assert!(parse_pairs("=db").is_err());
        assert!(parse_pairs("password='open").is_err());
    }

    #[test]
    fn form_detection() {
        assert!(is_url("postgres://app@db/lists"));
        assert!(is_url("postgresql://app@db/lists"));
        assert!(is_keyword_value("host=db dbname=lists"));
        assert!(!is_keyword_value("postgres://app@db/lists?sslmode=require"));
        assert!(!is_keyword_value("not a url"));
    }

    #[test]
    fn port_zero_is_rejected() {
        assert!(parse_port("0").is_err());
        assert!(parse_port("70000").is_err());
        assert_eq!(parse_port("5432").expect("port"), 5432);
    }

    #[test]
    fn redact_masks_password_only() {
        assert_eq!(
            redact("host=db password='s3 cret' dbname=lists"),
            "host=db password=*** dbname=lists"
        );
        assert_eq!(redact("password='open"), "<invalid connection string>");
    }
}
