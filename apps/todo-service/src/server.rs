//! # サーバーのライフサイクル
//!
//! リスナーを別タスクで起動し、停止シグナルを受けたらグレースフルシャットダウンする。
//!
//! ```text
//! start() ──▶ RunningServer ──wait_on_shutdown(signal)──▶ 新規接続の受付停止
//!                                                      └▶ 処理中リクエストの完了待ち（最大 SHUTDOWN_TIMEOUT）
//! ```
//!
//! 期限内に終わらなければ `ServerError::ShutdownTimeout` を返し、サーバータスクを中断する。

use std::{future::Future, net::SocketAddr, time::Duration};

use axum::{Router, ServiceExt, extract::Request};
use thiserror::Error;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tower_http::normalize_path::NormalizePath;

/// グレースフルシャットダウンの待ち時間の上限
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// サーバーの起動・停止で発生するエラー
#[derive(Debug, Error)]
pub enum ServerError {
   /// アドレスにバインドできない
   #[error("リスナーのバインドに失敗しました: {0}")]
   Bind(#[source] std::io::Error),

   /// HTTP サーバーが I/O エラーで終了した
   #[error("HTTP サーバーが異常終了しました: {0}")]
   Serve(#[source] std::io::Error),

   /// サーバータスクが panic した、または中断された
   #[error("サーバータスクが異常終了しました: {0}")]
   Join(#[from] tokio::task::JoinError),

   /// 期限内に処理中のリクエストが終わらなかった
   #[error("グレースフルシャットダウンが {0:?} 以内に完了しませんでした")]
   ShutdownTimeout(Duration),
}

/// 起動済みサーバーのハンドル
pub struct RunningServer {
   local_addr:  SocketAddr,
   shutdown_tx: oneshot::Sender<()>,
   handle:      JoinHandle<std::io::Result<()>>,
}

/// `address` にバインドしてサーバーを起動する
pub async fn start(address: &str, app: NormalizePath<Router>) -> Result<RunningServer, ServerError> {
   let listener = TcpListener::bind(address).await.map_err(ServerError::Bind)?;
   start_with_listener(listener, app)
}

/// バインド済みのリスナーでサーバーを起動する
///
/// 呼び出し元はブロックされない。
pub fn start_with_listener(
   listener: TcpListener,
   app: NormalizePath<Router>,
) -> Result<RunningServer, ServerError> {
   let local_addr = listener.local_addr().map_err(ServerError::Bind)?;
   let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

   let handle = tokio::spawn(async move {
      axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
         .with_graceful_shutdown(async move {
            // 送信側が drop された場合も停止する
            let _ = shutdown_rx.await;
         })
         .await
   });

   tracing::info!("リクエストの受付を開始しました: {}", local_addr);

   Ok(RunningServer {
      local_addr,
      shutdown_tx,
      handle,
   })
}

impl RunningServer {
   pub fn local_addr(&self) -> SocketAddr {
      self.local_addr
   }

   /// `signal` の完了を待ってからグレースフルシャットダウンする
   ///
   /// シグナルより先にサーバーが終了した場合は、その結果を返す。
   pub async fn wait_on_shutdown<F>(mut self, signal: F) -> Result<(), ServerError>
   where
      F: Future<Output = ()>,
   {
      tokio::select! {
         () = signal => {}
         joined = &mut self.handle => {
            tracing::warn!("シャットダウン要求の前にサーバーが終了しました");
            return joined?.map_err(ServerError::Serve);
         }
      }

      self.shutdown(SHUTDOWN_TIMEOUT).await
   }

   /// 新規接続の受付を止め、処理中のリクエストを最大 `timeout` まで待つ
   pub async fn shutdown(self, timeout: Duration) -> Result<(), ServerError> {
      tracing::info!("シャットダウンを開始します");
      let _ = self.shutdown_tx.send(());

      let abort_handle = self.handle.abort_handle();
      match tokio::time::timeout(timeout, self.handle).await {
         Ok(joined) => joined?.map_err(ServerError::Serve),
         Err(_) => {
            abort_handle.abort();
            Err(ServerError::ShutdownTimeout(timeout))
         }
      }
   }
}

/// SIGINT / SIGTERM（Unix 以外では Ctrl-C）を待つ
pub async fn shutdown_signal() {
   let ctrl_c = async {
      if let Err(e) = tokio::signal::ctrl_c().await {
         tracing::error!("SIGINT ハンドラを登録できません: {}", e);
         std::future::pending::<()>().await;
      }
   };

   #[cfg(unix)]
   let terminate = async {
      match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
         Ok(mut sigterm) => {
            sigterm.recv().await;
         }
         Err(e) => {
            tracing::error!("SIGTERM ハンドラを登録できません: {}", e);
            std::future::pending::<()>().await;
         }
      }
   };

   #[cfg(not(unix))]
   let terminate = std::future::pending::<()>();

   tokio::select! {
      () = ctrl_c => tracing::info!("SIGINT を受信しました"),
      () = terminate => tracing::info!("SIGTERM を受信しました"),
   }
}
