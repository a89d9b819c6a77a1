//! # ToDo インフラ層
//!
//! ストア（PostgreSQL）との接続・通信を担当する。
//!
//! ## 責務
//!
//! - **データベース接続**: 接続プールの作成と起動時のスキーマ再作成
//! - **リポジトリ実装**: ToDo の挿入・取得・一覧・更新・削除
//!
//! ## 依存関係
//!
//! ```text
//! todo-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続プールとスキーマ初期化
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use todo_infra::{db, repository::{PostgresTodoRepository, TodoRepository}};
//!
//! async fn setup(settings: &db::ConnectionSettings) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool(settings).await?;
//!     db::recreate_schema(&pool).await?;
//!     let repository = PostgresTodoRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::{InfraError, InfraErrorKind};
