use crate::domain::{CopyId, Isbn};
use thiserror::Error;

/// 環境変数の読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// アプリケーション設定
///
/// - `DATABASE_URL`: 設定されていればPostgreSQLを使う。未設定ならインメモリ
/// - `DATABASE_MAX_CONNECTIONS`: コネクションプールの上限（既定 5）
/// - `PORT`: 待ち受けポート（既定 3000）
/// - `REMINDERS_ENABLED`: リマインダーを予約するか（既定 true）
/// - `SEED_COPIES`: 起動時に登録する複本（`isbn=copy_id` のカンマ区切り）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub port: u16,
    pub reminders_enabled: bool,
    pub seed_copies: Vec<(Isbn, CopyId)>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            database_max_connections: 5,
            port: 3000,
            reminders_enabled: true,
            seed_copies: Vec::new(),
        }
    }
}

impl AppConfig {
    /// プロセスの環境変数から読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から読み込む
    ///
    /// 空文字列は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let database_max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(value) => parse(&value, "DATABASE_MAX_CONNECTIONS")?,
            None => defaults.database_max_connections,
        };

        let port = match get("PORT") {
            Some(value) => parse(&value, "PORT")?,
            None => defaults.port,
        };

        let reminders_enabled = match get("REMINDERS_ENABLED") {
            Some(value) => parse_bool(&value, "REMINDERS_ENABLED")?,
            None => defaults.reminders_enabled,
        };

        let seed_copies = match get("SEED_COPIES") {
            Some(value) => parse_seed_copies(&value, "SEED_COPIES")?,
            None => defaults.seed_copies,
        };

        Ok(Self {
            database_url: get("DATABASE_URL"),
            database_max_connections,
            port,
            reminders_enabled,
            seed_copies,
        })
    }

    /// 待ち受けアドレス
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse<T: std::str::FromStr>(value: &str, name: &'static str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

fn parse_bool(value: &str, name: &'static str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}

/// `978-4-00=C1, 978-4-00=C2` 形式。空の要素は読み飛ばす
fn parse_seed_copies(
    value: &str,
    name: &'static str,
) -> Result<Vec<(Isbn, CopyId)>, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    };

    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (isbn, copy_id) = entry.split_once('=').ok_or_else(invalid)?;
            let isbn = Isbn::new(isbn.trim()).map_err(|_| invalid())?;
            let copy_id = CopyId::new(copy_id.trim()).map_err(|_| invalid())?;
            Ok((isbn, copy_id))
        })
        .collect()
}
