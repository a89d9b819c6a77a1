//! # ルートログミドルウェア
//!
//! ルート登録時に各ハンドラを包み、リクエスト完了時に
//! メソッド・URI・ルート名・ステータス・処理時間を 1 行で出力する tower Layer。
//!
//! ```text
//! TraceLayer → [タイムアウト] → Router → RouteLogLayer("getToDos") → handler
//! ```
//!
//! ログ出力はレスポンスに影響しない。

use std::{
   future::Future,
   pin::Pin,
   task::{Context, Poll},
   time::Instant,
};

use axum::http::{Request, Response};
use tower::{Layer, Service};

/// ルート名付きのアクセスログを出力する Layer
#[derive(Clone, Copy, Debug)]
pub struct RouteLogLayer {
   route: &'static str,
}

impl RouteLogLayer {
   /// `route` はログに出力するルート名（`addToDo` など）
   pub fn new(route: &'static str) -> Self {
      Self { route }
   }
}

impl<S> Layer<S> for RouteLogLayer {
   type Service = RouteLogService<S>;

   fn layer(&self, inner: S) -> Self::Service {
      RouteLogService {
         inner,
         route: self.route,
      }
   }
}

/// [`RouteLogLayer`] が生成する Service
#[derive(Clone, Debug)]
pub struct RouteLogService<S> {
   inner: S,
   route: &'static str,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RouteLogService<S>
where
   S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
   S::Future: Send + 'static,
   S::Error: std::fmt::Display + 'static,
   ReqBody: Send + 'static,
   ResBody: Send + 'static,
{
   type Error = S::Error;
   type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
   type Response = S::Response;

   fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
      self.inner.poll_ready(cx)
   }

   fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
      // clone-swap パターン: poll_ready で得た readiness を保持する inner を使う
      let clone = self.inner.clone();
      let mut inner = std::mem::replace(&mut self.inner, clone);

      let route = self.route;
      let method = req.method().clone();
      let uri = req.uri().clone();
      let start = Instant::now();

      Box::pin(async move {
         let result = inner.call(req).await;
         let latency_ms = start.elapsed().as_millis() as u64;

         match &result {
            Ok(response) => {
               tracing::info!(
                  http.method = %method,
                  http.uri = %uri,
                  route = route,
                  http.status_code = response.status().as_u16(),
                  http.latency_ms = latency_ms,
                  "リクエスト完了"
               );
            }
            Err(err) => {
               tracing::error!(
                  http.method = %method,
                  http.uri = %uri,
                  route = route,
                  http.latency_ms = latency_ms,
                  error.message = %err,
                  "リクエスト処理エラー"
               );
            }
         }

         result
      })
   }
}

#[cfg(test)]
mod tests {
   use std::{
      convert::Infallible,
      io,
      sync::{Arc, Mutex},
   };

   use axum::http::{Method, StatusCode};
   use pretty_assertions::assert_eq;
   use serde_json::{Value, json};
   use tower::{service_fn, util::BoxCloneService};
   use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt};

   use super::*;

   /// JSON ログの出力先
   #[derive(Clone, Default)]
   struct LogBuffer(Arc<Mutex<Vec<u8>>>);

   impl io::Write for LogBuffer {
      fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
         self.0.lock().unwrap().extend_from_slice(buf);
         Ok(buf.len())
      }

      fn flush(&mut self) -> io::Result<()> {
         Ok(())
      }
   }

   impl<'a> MakeWriter<'a> for LogBuffer {
      type Writer = LogBuffer;

      fn make_writer(&'a self) -> Self::Writer {
         self.clone()
      }
   }

   impl LogBuffer {
      fn records(&self) -> Vec<Value> {
         let bytes = self.0.lock().unwrap();
         String::from_utf8_lossy(&bytes)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
      }
   }

   /// 本番と同じ JSON フォーマッタでログを取り込む（ガードを保持している間だけ有効）
   fn capture_json_logs() -> (tracing::subscriber::DefaultGuard, LogBuffer) {
      let buffer = LogBuffer::default();
      let subscriber = tracing_subscriber::registry().with(
         tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(buffer.clone()),
      );
      (tracing::subscriber::set_default(subscriber), buffer)
   }

   fn handler_returning(status: StatusCode) -> BoxCloneService<Request<()>, Response<()>, Infallible> {
      BoxCloneService::new(service_fn(move |_req: Request<()>| async move {
         Ok::<_, Infallible>(Response::builder().status(status).body(()).unwrap())
      }))
   }

   fn request(method: Method, uri: &str) -> Request<()> {
      Request::builder().method(method).uri(uri).body(()).unwrap()
   }

   #[tokio::test]
   async fn test_ルート名とリクエスト情報を1行で出力する() {
      let (_guard, logs) = capture_json_logs();
      let mut sut = RouteLogLayer::new("getToDoByID").layer(handler_returning(StatusCode::NOT_FOUND));

      sut.call(request(Method::GET, "/v1/todo/7")).await.unwrap();

      let records = logs.records();
      assert_eq!(records.len(), 1);
      let record = &records[0];
      assert_eq!(record["level"], json!("INFO"));
      assert_eq!(record["route"], json!("getToDoByID"));
      assert_eq!(record["http.method"], json!("GET"));
      assert_eq!(record["http.uri"], json!("/v1/todo/7"));
      assert_eq!(record["http.status_code"], json!(404));
      assert!(record["http.latency_ms"].is_u64());
   }

   #[tokio::test]
   async fn test_ルートごとに異なるルート名が記録される() {
      let (_guard, logs) = capture_json_logs();
      let mut add = RouteLogLayer::new("addToDo").layer(handler_returning(StatusCode::CREATED));
      let mut list = RouteLogLayer::new("getToDos").layer(handler_returning(StatusCode::OK));

      let created = add.call(request(Method::POST, "/v1/todo/1")).await.unwrap();
      list.call(request(Method::GET, "/v1/todos?count=3")).await.unwrap();

      assert_eq!(created.status(), StatusCode::CREATED);
      let routes: Vec<(Value, Value)> = logs
         .records()
         .iter()
         .map(|r| (r["route"].clone(), r["http.uri"].clone()))
         .collect();
      assert_eq!(
         routes,
         vec![
            (json!("addToDo"), json!("/v1/todo/1")),
            (json!("getToDos"), json!("/v1/todos?count=3")),
         ]
      );
   }

   #[tokio::test]
   async fn test_内部serviceのエラーはerrorで記録しそのまま返す() {
      let (_guard, logs) = capture_json_logs();
      let failing: BoxCloneService<Request<()>, Response<()>, String> =
         BoxCloneService::new(service_fn(|_req: Request<()>| async {
            Err::<Response<()>, _>("handler panicked".to_string())
         }));
      let mut sut = RouteLogLayer::new("deleteToDo").layer(failing);

      let result = sut.call(request(Method::DELETE, "/v1/todo/1")).await;

      assert_eq!(result.unwrap_err(), "handler panicked");
      let records = logs.records();
      assert_eq!(records.len(), 1);
      assert_eq!(records[0]["level"], json!("ERROR"));
      assert_eq!(records[0]["route"], json!("deleteToDo"));
      assert_eq!(records[0]["error.message"], json!("handler panicked"));
   }
}
