//! # PostgreSQL データベース接続管理
//!
//! 接続プールの作成と、起動時のスキーマ再作成を行う。
//!
//! ## 設計方針
//!
//! - **接続プール**: sqlx の `PgPool` をそのまま使う（独自のプーリングは持たない）
//! - **接続の即時確立**: 起動時に接続できなければエラーを返し、起動を中止させる
//! - **スキーマ再作成**: マイグレーションは持たず、起動のたびにテーブルを作り直す
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use todo_infra::db::{self, ConnectionSettings};
//!
//! async fn example(settings: &ConnectionSettings) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool(settings).await?;
//!     db::recreate_schema(&pool).await?;
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};

use crate::error::InfraError;

/// 管理対象テーブル名
pub const TABLE_NAME: &str = "todos";

const DROP_TABLE_QUERY: &str = "DROP TABLE IF EXISTS todos";

const CREATE_TABLE_QUERY: &str = r#"
CREATE TABLE IF NOT EXISTS todos
(
    id         BIGSERIAL PRIMARY KEY,
    task       VARCHAR(50) NOT NULL,
    completed  BOOLEAN NOT NULL DEFAULT FALSE,
    created_ts TIMESTAMPTZ NOT NULL,
    updated_ts TIMESTAMPTZ NOT NULL
)
"#;

/// 接続パラメータ
///
/// 設定ファイルの `db-server` セクションに対応する。
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub host:            String,
    pub port:            u16,
    pub user:            String,
    pub password:        String,
    pub database:        String,
    pub ssl_mode:        PgSslMode,
    /// 接続確立・プールからの取得のタイムアウト
    pub connect_timeout: Duration,
}

impl ConnectionSettings {
    /// sqlx の接続オプションに変換する
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(self.ssl_mode)
    }
}

/// PostgreSQL 接続プールを作成する
///
/// 起動時に一度だけ呼び出し、作成したプールをアプリケーション全体で共有する。
/// 最初の接続を確立できなかった場合は `sqlx::Error` を返す。
pub async fn create_pool(settings: &ConnectionSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(settings.connect_timeout)
        .connect_with(settings.connect_options())
        .await
}

/// テーブルを削除して作り直す
///
/// **既存のデータはすべて失われる。** 失敗時はそのままエラーを返し、
/// 呼び出し元（起動処理）が致命的エラーとして扱う。
#[tracing::instrument(skip_all, level = "debug")]
pub async fn recreate_schema(pool: &PgPool) -> Result<(), InfraError> {
    sqlx::query(DROP_TABLE_QUERY).execute(pool).await?;
    sqlx::query(CREATE_TABLE_QUERY).execute(pool).await?;
    Ok(())
}
