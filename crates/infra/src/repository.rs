//! # リポジトリ実装
//!
//! ドメインモデルの永続化を担当するリポジトリを提供する。
//!
//! - **データベース抽象化**: sqlx を使用し、PostgreSQL 固有の処理をカプセル化
//! - **テスタビリティ**: トレイト経由でモック可能な設計

pub mod todo_repository;

pub use todo_repository::{PostgresTodoRepository, TodoRepository};
