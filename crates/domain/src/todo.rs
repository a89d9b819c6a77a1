//! # ToDo
//!
//! このサービスが扱う唯一のエンティティ。
//!
//! ## ライフサイクル
//!
//! - 作成: ストアが `id` を採番し、`created` と `updated` に同じ時刻を設定する
//! - 更新: `task` / `completed` / `updated` のみが変化する
//! - 削除: 物理削除（論理削除・履歴なし）
//!
//! `task` の長さ（50 文字以内）はアプリケーションでは検証しない。
//! テーブルの `VARCHAR(50)` 制約違反はストアのエラーとして呼び出し元に返る。

use chrono::{DateTime, Utc};
use derive_more::Display;

use crate::DomainError;

/// ToDo の識別子（ストアが採番する連番）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("{_0}")]
pub struct ToDoId(i64);

impl ToDoId {
    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    /// パスパラメータなどの文字列から ID を解釈する
    ///
    /// 符号付き 10 進整数のみを受け付ける（`"+5"`、`"-3"` は可、`"8&6"` は不可）。
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        raw.parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::Validation(format!("ToDo ID が整数ではありません: {raw}")))
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// ToDo エンティティ
///
/// # 不変条件
///
/// - `id` は採番後に変化しない
/// - `created <= updated`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToDo {
    id:        ToDoId,
    task:      String,
    completed: bool,
    created:   DateTime<Utc>,
    updated:   DateTime<Utc>,
}

impl ToDo {
    /// 永続化済みの値から ToDo を復元する
    pub fn from_db(
        id: ToDoId,
        task: String,
        completed: bool,
        created: DateTime<Utc>,
        updated: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task,
            completed,
            created,
            updated,
        }
    }

    pub fn id(&self) -> ToDoId {
        self.id
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// 更新内容を適用した新しい状態を返す
    ///
    /// `id` と `created` は保持し、`updated` は `now` に置き換える。
    pub fn updated_with(&self, update: &ToDoUpdate, now: DateTime<Utc>) -> Self {
        Self {
            id:        self.id,
            task:      update.task.clone(),
            completed: update.completed,
            created:   self.created,
            updated:   now,
        }
    }
}

/// 作成時の入力（`id` はストアが採番するため持たない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewToDo {
    pub task: String,
}

/// 更新時の入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToDoUpdate {
    pub id:        ToDoId,
    pub task:      String,
    pub completed: bool,
}
