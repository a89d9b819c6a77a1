//! # ToDo Service エラー定義
//!
//! ハンドラで発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | エラー | ステータス | 本文 |
//! |--------|-----------|------|
//! | `InvalidRequest` | 400 | `{"error":"Invalid request"}` |
//! | `InvalidPayload` | 400 | `{"error":"Invalid request payload"}` |
//! | `NotFound` | 404 | `{"error":"ToDo not found"}` |
//! | `Database` | 500 | `{"error":"<ストアのエラーメッセージ>"}` |

use axum::{
   http::StatusCode,
   response::{IntoResponse, Response},
};
use thiserror::Error;
use todo_domain::{DomainError, todo::ToDoId};
use todo_infra::InfraError;
use todo_shared::ErrorResponse;

use crate::response::JsonBody;

/// ToDo Service で発生するエラー
#[derive(Debug, Error)]
pub enum TodoError {
   /// パスの ID が整数として解釈できない
   #[error("不正なリクエスト: {0}")]
   InvalidRequest(#[from] DomainError),

   /// リクエストボディが ToDo としてデコードできない
   #[error("不正なリクエストボディ: {0}")]
   InvalidPayload(String),

   /// 対象の ToDo が存在しない
   #[error("ToDo が見つかりません: {0}")]
   NotFound(ToDoId),

   /// データベースエラー
   #[error("データベースエラー: {0}")]
   Database(#[from] InfraError),
}

impl IntoResponse for TodoError {
   fn into_response(self) -> Response {
      let (status, body) = match &self {
         TodoError::InvalidRequest(e) => {
            tracing::debug!("不正なリクエスト: {}", e);
            (StatusCode::BAD_REQUEST, ErrorResponse::invalid_request())
         }
         TodoError::InvalidPayload(msg) => {
            tracing::debug!("不正なリクエストボディ: {}", msg);
            (StatusCode::BAD_REQUEST, ErrorResponse::invalid_payload())
         }
         TodoError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorResponse::not_found()),
         TodoError::Database(e) => {
            tracing::error!(
               error.kind = "database",
               span_trace = %e.span_trace(),
               "データベースエラー: {}",
               e
            );
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(e.detail()))
         }
      };

      (status, JsonBody(body)).into_response()
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   async fn into_parts(error: TodoError) -> (StatusCode, ErrorResponse) {
      let response = error.into_response();
      let status = response.status();
      let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
         .await
         .unwrap();
      (status, serde_json::from_slice(&bytes).unwrap())
   }

   #[rstest]
   #[case(
      TodoError::InvalidRequest(DomainError::Validation("abc".to_string())),
      StatusCode::BAD_REQUEST,
      "Invalid request"
   )]
   #[case(
      TodoError::InvalidPayload("EOF".to_string()),
      StatusCode::BAD_REQUEST,
      "Invalid request payload"
   )]
   #[case(
      TodoError::NotFound(ToDoId::from_i64(3)),
      StatusCode::NOT_FOUND,
      "ToDo not found"
   )]
   #[tokio::test]
   async fn test_エラー種別ごとのステータスと本文(
      #[case] error: TodoError,
      #[case] expected_status: StatusCode,
      #[case] expected_message: &str,
   ) {
      let (status, body) = into_parts(error).await;

      assert_eq!(status, expected_status);
      assert_eq!(body, ErrorResponse::new(expected_message));
   }

   #[tokio::test]
   async fn test_データベースエラーは下位のメッセージをそのまま返す() {
      let error = TodoError::from(InfraError::store(
         "value too long for type character varying(50)",
      ));

      let (status, body) = into_parts(error).await;

      assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
      assert_eq!(
         body.error,
         "value too long for type character varying(50)"
      );
   }
}
