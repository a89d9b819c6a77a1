//! # ToDo ドメイン層
//!
//! ToDo サービスのドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! todo-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、HTTP）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`todo`] - ToDo エンティティと識別子
//! - [`pagination`] - 一覧取得のページ指定
//! - [`clock`] - 打刻に使う時刻プロバイダ
//! - [`error`] - ドメイン層のエラー
//!
//! ## 使用例
//!
//! ```rust
//! use todo_domain::{pagination::PageRequest, todo::ToDoId};
//!
//! let id = ToDoId::parse("42").unwrap();
//! assert_eq!(id.as_i64(), 42);
//!
//! let page = PageRequest::new(-1, 0);
//! assert_eq!((page.start(), page.count()), (0, 10));
//! ```

pub mod clock;
pub mod error;
pub mod pagination;
pub mod todo;

pub use error::DomainError;
