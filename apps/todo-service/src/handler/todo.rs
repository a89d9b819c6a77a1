//! # ToDo API ハンドラ
//!
//! ToDo の CRUD エンドポイントを実装する。
//!
//! ## エンドポイント
//!
//! ```text
//! GET    /v1/todos?start=&count=
//! GET    /v1/todo/{id}
//! POST   /v1/todo/{id}
//! PUT    /v1/todo/{id}
//! DELETE /v1/todo/{id}
//! ```
//!
//! `POST` のパス ID は URL 形式の検証にだけ使い、値は捨てる（ID はストアが採番する）。
//! `PUT` も同様にパス ID は形式の検証だけに使い、更新対象はボディの `id` で決める
//! （`id` が無ければ 0 とみなすため、該当行なしで 404 になる）。
//!
//! ボディの欠けたフィールドや `null` はゼロ値として扱う。`task` の妥当性は検証せず、
//! 文字数超過はストアのエラーとして返る。

use std::sync::Arc;

use axum::{
   body::Bytes,
   extract::{
      Path,
      RawQuery,
      State,
      rejection::{BytesRejection, PathRejection},
   },
   http::StatusCode,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use todo_domain::{
   DomainError,
   pagination::PageRequest,
   todo::{NewToDo, ToDo, ToDoId, ToDoUpdate},
};
use todo_infra::repository::TodoRepository;

use crate::{error::TodoError, response::JsonBody};

/// ToDo ハンドラーの State
pub struct TodoState {
   pub repository: Arc<dyn TodoRepository>,
}

impl TodoState {
   pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
      Self { repository }
   }
}

/// ToDo DTO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToDoDto {
   pub id:           i64,
   pub task:         String,
   pub completed:    bool,
   pub created_date: String,
   pub updated_date: String,
}

impl From<&ToDo> for ToDoDto {
   fn from(todo: &ToDo) -> Self {
      Self {
         id:           todo.id().as_i64(),
         task:         todo.task().to_string(),
         completed:    todo.completed(),
         created_date: format_timestamp(todo.created()),
         updated_date: format_timestamp(todo.updated()),
      }
   }
}

/// 作成・更新リクエストのボディ
///
/// 未知のフィールド（`created_date` など）は無視する。
/// 欠落・`null` のフィールドはゼロ値になる。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToDoPayload {
   #[serde(default)]
   pub id:        Option<i64>,
   #[serde(default, deserialize_with = "null_as_default")]
   pub task:      String,
   #[serde(default, alias = "Completed", deserialize_with = "null_as_default")]
   pub completed: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
   D: Deserializer<'de>,
   T: Default + Deserialize<'de>,
{
   Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
   ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// パスの `{id}` を ToDoId に変換する
fn parse_path_id(path: Result<Path<String>, PathRejection>) -> Result<ToDoId, TodoError> {
   let Path(raw) = path.map_err(|rejection| DomainError::Validation(rejection.body_text()))?;
   Ok(ToDoId::parse(&raw)?)
}

/// ボディを [`ToDoPayload`] にデコードする
///
/// 空・JSON でない・型が合わないボディはエラー。本文全体が `null` の場合はゼロ値。
fn decode_payload(body: Result<Bytes, BytesRejection>) -> Result<ToDoPayload, TodoError> {
   let body = body.map_err(|rejection| TodoError::InvalidPayload(rejection.body_text()))?;
   let payload: Option<ToDoPayload> =
      serde_json::from_slice(&body).map_err(|e| TodoError::InvalidPayload(e.to_string()))?;
   Ok(payload.unwrap_or_default())
}

/// クエリ文字列から `start` / `count` を読み取る
///
/// 同名パラメータは最初の値を使う。欠落・非数値は 0 とみなし、
/// 範囲外の補正は [`PageRequest::new`] に任せる。
fn page_request(query: Option<&str>) -> PageRequest {
   let mut start: Option<i64> = None;
   let mut count: Option<i64> = None;

   for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
      match key.as_ref() {
         "start" if start.is_none() => start = Some(value.parse().unwrap_or(0)),
         "count" if count.is_none() => count = Some(value.parse().unwrap_or(0)),
         _ => {}
      }
   }

   PageRequest::new(start.unwrap_or(0), count.unwrap_or(0))
}

/// GET /v1/todos
///
/// ページ指定の不正は 400 にせず、既定値に丸める。
///
/// ストア障害のときだけは 200 の空配列ではなく、他のエンドポイントと同じく
/// 500 とストアのエラーメッセージを返す。
pub async fn get_todos(
   State(state): State<Arc<TodoState>>,
   RawQuery(query): RawQuery,
) -> Result<JsonBody<Vec<ToDoDto>>, TodoError> {
   let page = page_request(query.as_deref());
   let todos = state.repository.find_range(page).await?;

   Ok(JsonBody(todos.iter().map(ToDoDto::from).collect()))
}

/// GET /v1/todo/{id}
pub async fn get_todo_by_id(
   State(state): State<Arc<TodoState>>,
   path: Result<Path<String>, PathRejection>,
) -> Result<JsonBody<ToDoDto>, TodoError> {
   let id = parse_path_id(path)?;
   let todo = state
      .repository
      .find_by_id(id)
      .await?
      .ok_or(TodoError::NotFound(id))?;

   Ok(JsonBody(ToDoDto::from(&todo)))
}

/// POST /v1/todo/{id}
pub async fn add_todo(
   State(state): State<Arc<TodoState>>,
   path: Result<Path<String>, PathRejection>,
   body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, JsonBody<ToDoDto>), TodoError> {
   parse_path_id(path)?;
   let payload = decode_payload(body)?;

   let todo = state
      .repository
      .insert(&NewToDo { task: payload.task })
      .await?;
   tracing::debug!(id = %todo.id(), "ToDo を作成しました");

   Ok((StatusCode::CREATED, JsonBody(ToDoDto::from(&todo))))
}

/// PUT /v1/todo/{id}
pub async fn update_todo(
   State(state): State<Arc<TodoState>>,
   path: Result<Path<String>, PathRejection>,
   body: Result<Bytes, BytesRejection>,
) -> Result<JsonBody<ToDoDto>, TodoError> {
   parse_path_id(path)?;
   let payload = decode_payload(body)?;

   let id = ToDoId::from_i64(payload.id.unwrap_or(0));
   let update = ToDoUpdate {
      id,
      task: payload.task,
      completed: payload.completed,
   };
   let todo = state
      .repository
      .update(&update)
      .await?
      .ok_or(TodoError::NotFound(id))?;

   Ok(JsonBody(ToDoDto::from(&todo)))
}

/// DELETE /v1/todo/{id}
///
/// 成功時の本文は `null`。
pub async fn delete_todo(
   State(state): State<Arc<TodoState>>,
   path: Result<Path<String>, PathRejection>,
) -> Result<JsonBody<()>, TodoError> {
   let id = parse_path_id(path)?;
   if !state.repository.delete(id).await? {
      return Err(TodoError::NotFound(id));
   }
   tracing::debug!(%id, "ToDo を削除しました");

   Ok(JsonBody(()))
}
