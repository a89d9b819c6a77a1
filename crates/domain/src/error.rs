//! # ドメイン層エラー定義
//!
//! 入力値の検証失敗を表現するエラー型。
//! API 層で 400 Bad Request に変換される。
//!
//! ## 使用例
//!
//! ```rust
//! use todo_domain::DomainError;
//!
//! fn validate_id(raw: &str) -> Result<i64, DomainError> {
//!     raw.parse()
//!         .map_err(|_| DomainError::Validation(format!("整数ではありません: {raw}")))
//! }
//!
//! assert!(validate_id("42").is_ok());
//! assert!(validate_id("abc").is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、適切な HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値がドメインのルールに違反している場合に使用する。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
