//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - 入力の検証を先に行い、通過したものだけをリポジトリに渡す

pub mod todo;

pub use todo::{
   ToDoDto,
   ToDoPayload,
   TodoState,
   add_todo,
   delete_todo,
   get_todo_by_id,
   get_todos,
   update_todo,
};
