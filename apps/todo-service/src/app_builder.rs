//! # アプリケーション構築
//!
//! State を受け取り、ルーティングとミドルウェアを組み立てる。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。
//!
//! ## ルート
//!
//! | ルート名 | メソッド | パス |
//! |---------|---------|------|
//! | `addToDo` | POST | `/v1/todo/{id}` |
//! | `deleteToDo` | DELETE | `/v1/todo/{id}` |
//! | `getToDos` | GET | `/v1/todos` |
//! | `getToDoByID` | GET | `/v1/todo/{id}` |
//! | `updateToDo` | PUT | `/v1/todo/{id}` |

use std::sync::Arc;

use axum::{
   Router,
   http::StatusCode,
   routing::{delete, get, post, put},
};
use tower::Layer;
use tower_http::{
   normalize_path::{NormalizePath, NormalizePathLayer},
   timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
   trace::TraceLayer,
};

use crate::{
   config::HttpServerConfig,
   handler::{TodoState, add_todo, delete_todo, get_todo_by_id, get_todos, update_todo},
   middleware::RouteLogLayer,
};

/// ルーターを構築する
///
/// 各ルートは登録時に [`RouteLogLayer`] で包む。
pub fn build_router(state: Arc<TodoState>, http: &HttpServerConfig) -> Router {
   Router::new()
      .route(
         "/v1/todo/{id}",
         post(add_todo).layer(RouteLogLayer::new("addToDo")),
      )
      .route(
         "/v1/todo/{id}",
         delete(delete_todo).layer(RouteLogLayer::new("deleteToDo")),
      )
      .route(
         "/v1/todos",
         get(get_todos).layer(RouteLogLayer::new("getToDos")),
      )
      .route(
         "/v1/todo/{id}",
         get(get_todo_by_id).layer(RouteLogLayer::new("getToDoByID")),
      )
      .route(
         "/v1/todo/{id}",
         put(update_todo).layer(RouteLogLayer::new("updateToDo")),
      )
      .with_state(state)
      .layer(TimeoutLayer::with_status_code(
         StatusCode::REQUEST_TIMEOUT,
         http.write_timeout(),
      ))
      .layer(RequestBodyTimeoutLayer::new(http.read_timeout()))
      .layer(TraceLayer::new_for_http())
}

/// 末尾スラッシュを取り除いてからルーティングするアプリケーションを構築する
///
/// パスの正規化はルーティングより前に行う必要があるため、`Router` の外側で包む。
pub fn build_app(state: Arc<TodoState>, http: &HttpServerConfig) -> NormalizePath<Router> {
   NormalizePathLayer::trim_trailing_slash().layer(build_router(state, http))
}
