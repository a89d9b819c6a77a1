//! # エラーレスポンス
//!
//! 全エンドポイントで共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - 本文は `{"error": "<message>"}` の 1 キーのみ
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換はサービス側の責務（shared に axum 依存を入れない）
//! - 固定メッセージは便利コンストラクタで提供し、文言のハードコードを排除

use serde::{Deserialize, Serialize};

/// パス ID の形式不正
pub const INVALID_REQUEST: &str = "Invalid request";
/// リクエストボディのデコード失敗
pub const INVALID_REQUEST_PAYLOAD: &str = "Invalid request payload";
/// 対象の ToDo が存在しない
pub const TODO_NOT_FOUND: &str = "ToDo not found";

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
   pub error: String,
}

impl ErrorResponse {
   /// 任意のメッセージでエラーレスポンスを作る
   pub fn new(message: impl Into<String>) -> Self {
      Self {
         error: message.into(),
      }
   }

   /// 400 Bad Request（ID・URL 形式の不正）
   pub fn invalid_request() -> Self {
      Self::new(INVALID_REQUEST)
   }

   /// 400 Bad Request（ボディの不正）
   pub fn invalid_payload() -> Self {
      Self::new(INVALID_REQUEST_PAYLOAD)
   }

   /// 404 Not Found
   pub fn not_found() -> Self {
      Self::new(TODO_NOT_FOUND)
   }
}
