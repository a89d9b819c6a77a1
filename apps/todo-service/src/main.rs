//! # ToDo Service サーバー
//!
//! ToDo の CRUD を提供する HTTP サーバー。
//!
//! ## 起動手順
//!
//! 1. 設定ファイル（`dev-config.json`、または `TODO_CONFIG` で指定）を読み込む
//! 2. PostgreSQL に接続する
//! 3. `todos` テーブルを作り直す（**既存データはすべて消える**）
//! 4. リクエストの受付を開始する
//! 5. SIGINT / SIGTERM でグレースフルシャットダウンする（最大 1 秒）
//!
//! いずれかの手順が失敗した場合はエラーを返して終了する（終了コード 1）。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `TODO_CONFIG` | No | 設定ファイルのパス（デフォルト: `dev-config.json`） |
//! | `TODO__<SECTION>__<KEY>` | No | 設定値の上書き |
//! | `RUST_LOG` | No | ログフィルタ（デフォルト: `info,todo=debug`） |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p todo-service
//! ```

use std::sync::Arc;

use anyhow::Context as _;
use todo_infra::{db, repository::PostgresTodoRepository};
use todo_service::{
   app_builder::build_app,
   config::AppConfig,
   handler::TodoState,
   server::{self, shutdown_signal},
};
use todo_shared::observability::{TracingConfig, init_tracing};

const SERVICE_NAME: &str = "todo-service";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   let tracing_config = TracingConfig::from_env(SERVICE_NAME);
   init_tracing(&tracing_config).context("ロギングの初期化に失敗しました")?;
   let _tracing_guard =
      tracing::info_span!("app", service = %tracing_config.service_name).entered();

   let config = AppConfig::load().context("設定の読み込みに失敗しました")?;
   let settings = config.db_server.connection_settings()?;

   tracing::info!(
      "データベースに接続します: {}:{}/{}",
      settings.host,
      settings.port,
      settings.database
   );
   let pool = db::create_pool(&settings)
      .await
      .context("データベース接続に失敗しました")?;

   tracing::info!("テーブル {} を作成します", db::TABLE_NAME);
   db::recreate_schema(&pool)
      .await
      .context("テーブルの作成に失敗しました")?;

   let state = Arc::new(TodoState::new(Arc::new(PostgresTodoRepository::new(
      pool.clone(),
   ))));
   let app = build_app(state, &config.http_server);

   let running = server::start(&config.http_server.listen_address(), app).await?;
   running.wait_on_shutdown(shutdown_signal()).await?;

   pool.close().await;
   tracing::info!("ToDo Service を停止しました");
   Ok(())
}
