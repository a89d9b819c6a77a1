//! # インフラ層エラー定義
//!
//! ストアとのやり取りで起きた障害を表す。
//!
//! [`InfraError`] は種別（[`InfraErrorKind`]）と、生成時点の [`SpanTrace`] を持つ。
//! リポジトリメソッドは `#[tracing::instrument]` 付きなので、`?` で変換した瞬間の
//! 呼び出し経路（どのメソッド・どの ID か）がエラーに残る。
//!
//! HTTP 500 の本文には [`InfraError::detail`] でストアのメッセージをそのまま返す。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// 「該当行なし」はエラーではなく、リポジトリの戻り値（`Option` / `bool`）で表現する。
/// ここに来るのは制約違反・接続断などのストア障害のみ。
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// データベースエラー
    ///
    /// SQL の実行失敗、接続エラー、制約違反（`task` の文字数超過など）。
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// sqlx を介さないストアのエラー（インメモリ実装など）
    #[error("ストアエラー: {0}")]
    Store(String),
}

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 下位のエラーメッセージをそのまま返す
    ///
    /// 500 レスポンスの本文に使う。種別のプレフィックスは付けず、
    /// PostgreSQL が返したエラーはそのメッセージだけを返す。
    pub fn detail(&self) -> String {
        match &self.kind {
            InfraErrorKind::Database(sqlx::Error::Database(db_err)) => db_err.message().to_string(),
            InfraErrorKind::Database(source) => source.to_string(),
            InfraErrorKind::Store(msg) => msg.clone(),
        }
    }

    /// sqlx を介さないストアのエラーを生成する
    pub fn store(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Store(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Database(source),
            span_trace: SpanTrace::capture(),
        }
    }
}
