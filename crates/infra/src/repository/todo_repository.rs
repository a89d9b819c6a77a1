//! # TodoRepository
//!
//! ToDo の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **該当行なしは戻り値で表現**: `find_by_id` / `update` は `None`、
//!   `delete` は `false` を返す。エラーはストア障害のみ
//! - **全クエリをパラメータ化**: ID もページ指定もバインドする
//! - **打刻はリポジトリで行う**: `created` / `updated` は [`Clock`] から取得する
//! - **並び順は保証しない**: 一覧取得に `ORDER BY` は付けない

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use todo_domain::{
    clock::{Clock, SystemClock},
    pagination::PageRequest,
    todo::{NewToDo, ToDo, ToDoId, ToDoUpdate},
};

use crate::error::InfraError;

/// ToDo リポジトリトレイト
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// ToDo を挿入し、採番された ID を含む行を返す
    async fn insert(&self, new_todo: &NewToDo) -> Result<ToDo, InfraError>;

    /// ID で ToDo を検索する
    async fn find_by_id(&self, id: ToDoId) -> Result<Option<ToDo>, InfraError>;

    /// `start` 件目から最大 `count` 件を取得する
    async fn find_range(&self, page: PageRequest) -> Result<Vec<ToDo>, InfraError>;

    /// `task` / `completed` を更新し、`updated` を現在時刻にする
    ///
    /// 対象行が存在しない場合は `None` を返す。
    async fn update(&self, update: &ToDoUpdate) -> Result<Option<ToDo>, InfraError>;

    /// ToDo を削除する
    ///
    /// 対象行が存在しない場合は `false` を返す。
    async fn delete(&self, id: ToDoId) -> Result<bool, InfraError>;
}

#[derive(sqlx::FromRow)]
struct TodoRow {
    id:         i64,
    task:       String,
    completed:  bool,
    created_ts: DateTime<Utc>,
    updated_ts: DateTime<Utc>,
}

impl From<TodoRow> for ToDo {
    fn from(row: TodoRow) -> Self {
        ToDo::from_db(
            ToDoId::from_i64(row.id),
            row.task,
            row.completed,
            row.created_ts,
            row.updated_ts,
        )
    }
}

/// PostgreSQL 実装の TodoRepository
#[derive(Clone)]
pub struct PostgresTodoRepository {
    pool:  PgPool,
    clock: Arc<dyn Clock>,
}

impl PostgresTodoRepository {
    /// システム時刻で打刻するリポジトリを作成する
    pub fn new(pool: PgPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// 時刻プロバイダを指定してリポジトリを作成する
    pub fn with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, new_todo: &NewToDo) -> Result<ToDo, InfraError> {
        let now = self.clock.now();
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            INSERT INTO todos (task, completed, created_ts, updated_ts)
            VALUES ($1, FALSE, $2, $2)
            RETURNING id, task, completed, created_ts, updated_ts
            "#,
        )
        .bind(&new_todo.task)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: ToDoId) -> Result<Option<ToDo>, InfraError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, task, completed, created_ts, updated_ts
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ToDo::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(start = page.start(), count = page.count()))]
    async fn find_range(&self, page: PageRequest) -> Result<Vec<ToDo>, InfraError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, task, completed, created_ts, updated_ts
            FROM todos
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.count())
        .bind(page.start())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ToDo::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %update.id))]
    async fn update(&self, update: &ToDoUpdate) -> Result<Option<ToDo>, InfraError> {
        let now = self.clock.now();
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            UPDATE todos
            SET task = $2, completed = $3, updated_ts = $4
            WHERE id = $1
            RETURNING id, task, completed, created_ts, updated_ts
            "#,
        )
        .bind(update.id.as_i64())
        .bind(&update.task)
        .bind(update.completed)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ToDo::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: ToDoId) -> Result<bool, InfraError> {
        let result = sqlx::query(
            r#"
            DELETE FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresTodoRepository>();
        assert_send_sync::<Arc<dyn TodoRepository>>();
    }
}
