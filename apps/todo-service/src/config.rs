//! # ToDo Service 設定
//!
//! JSON 設定ファイルからサーバーと DB の接続設定を読み込む。
//!
//! ## 読み込み元
//!
//! 1. 環境変数 `TODO_CONFIG` が指すファイル（未設定なら作業ディレクトリの `dev-config.json`）
//! 2. 環境変数 `TODO__<SECTION>__<KEY>` による上書き（例: `TODO__DB_SERVER__SECRET`）
//!
//! 環境変数名は小文字化し、`__` を `.`、`_` を `-` に置き換えて設定キーに対応付ける。
//! ファイルが無くても、すべてのキーが環境変数で揃えば起動できる。
//!
//! ```json
//! {
//!   "db-server": {
//!     "host": "localhost", "port": 5432, "user-id": "todo", "secret": "todo",
//!     "db-name": "todo_dev", "ssl-mode": "disable", "connect-timeout": 5
//!   },
//!   "http-server": { "address": ":8080", "read-timeout": 10, "write-timeout": 10 }
//! }
//! ```
//!
//! タイムアウトはすべて秒単位。

use std::{str::FromStr, time::Duration};

use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use sqlx::postgres::PgSslMode;
use thiserror::Error;
use todo_infra::db::ConnectionSettings;

/// 設定ファイル名の既定値
pub const DEFAULT_CONFIG_FILE: &str = "dev-config.json";

/// 設定ファイルのパスを上書きする環境変数
pub const CONFIG_PATH_ENV: &str = "TODO_CONFIG";

const ENV_PREFIX: &str = "TODO__";
const ENV_SEPARATOR: &str = "__";

/// 設定読み込み時のエラー
#[derive(Debug, Error)]
pub enum ConfigError {
   /// ファイルが存在しない・JSON が不正・必須キーの欠落
   #[error("設定ファイルを読み込めません: {0}")]
   Load(#[from] config::ConfigError),

   /// `ssl-mode` が PostgreSQL の sslmode として解釈できない
   #[error("ssl-mode が不正です: {0}")]
   InvalidSslMode(String),

   /// `address` が `host:port` 形式でない
   #[error("http-server.address が不正です: {0:?}")]
   InvalidAddress(String),
}

/// アプリケーション全体の設定
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
   #[serde(rename = "db-server")]
   pub db_server:   DbServerConfig,
   #[serde(rename = "http-server")]
   pub http_server: HttpServerConfig,
}

/// `db-server` セクション
#[derive(Debug, Clone, Deserialize)]
pub struct DbServerConfig {
   pub host:            String,
   pub port:            u16,
   #[serde(rename = "user-id")]
   pub user_id:         String,
   pub secret:          String,
   #[serde(rename = "db-name")]
   pub db_name:         String,
   #[serde(rename = "ssl-mode")]
   pub ssl_mode:        String,
   /// 秒
   #[serde(rename = "connect-timeout")]
   pub connect_timeout: u64,
}

/// `http-server` セクション
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
   /// `host:port` 形式。ホストを省略した `:8080` は全インターフェースで待ち受ける
   pub address:       String,
   /// 秒
   #[serde(rename = "read-timeout")]
   pub read_timeout:  u64,
   /// 秒
   #[serde(rename = "write-timeout")]
   pub write_timeout: u64,
}

impl AppConfig {
   /// 設定ファイルと環境変数から設定を読み込む
   pub fn load() -> Result<Self, ConfigError> {
      let path =
         std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
      Self::load_from(&path)
   }

   /// 指定したパスの設定ファイルを読み込み、環境変数で上書きする
   pub fn load_from(path: &str) -> Result<Self, ConfigError> {
      let builder = Config::builder()
         .add_source(File::new(path, FileFormat::Json).required(false));
      let config = apply_env_overrides(builder, std::env::vars())?.build()?;

      Self::from_config(config)
   }

   /// JSON 文字列から設定を読み込む（環境変数は参照しない）
   pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
      let config = Config::builder()
         .add_source(File::from_str(json, FileFormat::Json))
         .build()?;

      Self::from_config(config)
   }

   fn from_config(config: Config) -> Result<Self, ConfigError> {
      let app_config: Self = config.try_deserialize()?;
      app_config.validate()?;
      Ok(app_config)
   }

   fn validate(&self) -> Result<(), ConfigError> {
      self.db_server.ssl_mode()?;
      let address = self.http_server.address.trim();
      let valid = address
         .rsplit_once(':')
         .is_some_and(|(_, port)| port.parse::<u16>().is_ok());
      if !valid {
         return Err(ConfigError::InvalidAddress(self.http_server.address.clone()));
      }
      Ok(())
   }
}

/// `TODO__` で始まる環境変数を設定キーの上書きとして登録する
fn apply_env_overrides(
   mut builder: ConfigBuilder<DefaultState>,
   vars: impl IntoIterator<Item = (String, String)>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
   for (name, value) in vars {
      if let Some(key) = override_key(&name) {
         tracing::debug!(%key, "環境変数で設定を上書きします");
         builder = builder.set_override(key, value)?;
      }
   }
   Ok(builder)
}

/// `TODO__DB_SERVER__USER_ID` → `db-server.user-id`
fn override_key(env_name: &str) -> Option<String> {
   let rest = env_name.strip_prefix(ENV_PREFIX)?;
   if rest.is_empty() {
      return None;
   }
   let key = rest
      .split(ENV_SEPARATOR)
      .map(|segment| segment.to_ascii_lowercase().replace('_', "-"))
      .collect::<Vec<_>>()
      .join(".");
   Some(key)
}

impl DbServerConfig {
   /// `ssl-mode` を sqlx の sslmode に変換する
   pub fn ssl_mode(&self) -> Result<PgSslMode, ConfigError> {
      PgSslMode::from_str(&self.ssl_mode)
         .map_err(|_| ConfigError::InvalidSslMode(self.ssl_mode.clone()))
   }

   /// インフラ層の接続パラメータに変換する
   pub fn connection_settings(&self) -> Result<ConnectionSettings, ConfigError> {
      Ok(ConnectionSettings {
         host:            self.host.clone(),
         port:            self.port,
         user:            self.user_id.clone(),
         password:        self.secret.clone(),
         database:        self.db_name.clone(),
         ssl_mode:        self.ssl_mode()?,
         connect_timeout: Duration::from_secs(self.connect_timeout),
      })
   }
}

impl HttpServerConfig {
   /// `TcpListener::bind` に渡すアドレス
   pub fn listen_address(&self) -> String {
      let address = self.address.trim();
      if address.starts_with(':') {
         format!("0.0.0.0{address}")
      } else {
         address.to_string()
      }
   }

   /// リクエストボディの読み取りタイムアウト
   pub fn read_timeout(&self) -> Duration {
      Duration::from_secs(self.read_timeout)
   }

   /// レスポンスを返し終えるまでのタイムアウト
   pub fn write_timeout(&self) -> Duration {
      Duration::from_secs(self.write_timeout)
   }
}
