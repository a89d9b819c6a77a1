//! テスト共通フィクスチャ
//!
//! PostgreSQL を使用する統合テストで共通利用する接続・初期化ヘルパー。
//! Rust の統合テスト規約に従い `tests/common/mod.rs` に配置。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use todo_infra::db;
use tokio::sync::{Mutex, MutexGuard};

/// テーブルを作り直すテスト同士が干渉しないよう直列化するロック
static SCHEMA_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// テスト用の固定日時
pub fn test_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// テスト用の DATABASE_URL
///
/// 未設定の場合は `None`（呼び出し側でテストをスキップする）。
pub fn database_url() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL").ok()
}

/// スキーマを作り直した接続プールを返す
///
/// 戻り値のガードを保持している間、他のテストはスキーマに触れない。
pub async fn setup_pool() -> Option<(PgPool, MutexGuard<'static, ()>)> {
    let Some(url) = database_url() else {
        eprintln!("DATABASE_URL が未設定のため PostgreSQL 統合テストをスキップします");
        return None;
    };

    let guard = SCHEMA_LOCK.lock().await;
    let pool = PgPool::connect(&url).await.expect("データベース接続に失敗");
    db::recreate_schema(&pool)
        .await
        .expect("スキーマの再作成に失敗");

    Some((pool, guard))
}
