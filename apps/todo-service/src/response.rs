//! # JSON レスポンス
//!
//! 全レスポンスの本文は JSON で、`Content-Type` は `application/json; charset=UTF-8` に固定する。
//! axum の `Json` は charset を付けないため、専用のラッパーを使う。

use axum::{
   http::{HeaderValue, StatusCode, header},
   response::{IntoResponse, Response},
};
use serde::Serialize;

/// 全レスポンス共通の Content-Type
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// `T` を JSON 本文として返すレスポンス
///
/// `JsonBody(())` は本文 `null` になる。
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T: Serialize> IntoResponse for JsonBody<T> {
   fn into_response(self) -> Response {
      let content_type = [(
         header::CONTENT_TYPE,
         HeaderValue::from_static(JSON_CONTENT_TYPE),
      )];

      match serde_json::to_vec(&self.0) {
         Ok(bytes) => (content_type, bytes).into_response(),
         Err(e) => {
            tracing::error!("レスポンスのシリアライズに失敗しました: {}", e);
            (
               StatusCode::INTERNAL_SERVER_ERROR,
               content_type,
               serde_json::json!({ "error": e.to_string() }).to_string(),
            )
               .into_response()
         }
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   async fn body_string(response: Response) -> String {
      let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
         .await
         .unwrap();
      String::from_utf8(bytes.to_vec()).unwrap()
   }

   #[tokio::test]
   async fn test_content_typeにcharsetが付く() {
      let response = JsonBody(serde_json::json!({ "id": 1 })).into_response();

      assert_eq!(response.status(), StatusCode::OK);
      assert_eq!(
         response.headers()[header::CONTENT_TYPE],
         "application/json; charset=UTF-8"
      );
      assert_eq!(body_string(response).await, r#"{"id":1}"#);
   }

   #[tokio::test]
   async fn test_unitはnullになる() {
      let response = JsonBody(()).into_response();

      assert_eq!(body_string(response).await, "null");
   }

   #[tokio::test]
   async fn test_空のvecは空配列になる() {
      let response = JsonBody(Vec::<i32>::new()).into_response();

      assert_eq!(body_string(response).await, "[]");
   }
}
