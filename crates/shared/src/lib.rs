//! # ToDo 共有ユーティリティ
//!
//! サービスとインフラの双方から使われる共通ユーティリティを提供する。
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum などの Web フレームワークには依存しない

pub mod error_response;
pub mod observability;

pub use error_response::ErrorResponse;
