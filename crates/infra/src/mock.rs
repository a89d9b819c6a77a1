//! # テスト用モックリポジトリ
//!
//! ハンドラテストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! todo-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! PostgreSQL 実装と同じ観測可能な振る舞いを再現する:
//! ID は 1 からの連番、`task` が 50 文字を超えると挿入・更新はエラー、
//! 一覧は挿入順。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use todo_domain::{
    clock::{Clock, SystemClock},
    pagination::PageRequest,
    todo::{NewToDo, ToDo, ToDoId, ToDoUpdate},
};

use crate::{error::InfraError, repository::TodoRepository};

/// `task` 列の最大文字数（`VARCHAR(50)`）
const TASK_MAX_CHARS: usize = 50;

#[derive(Default)]
struct Store {
    todos:   Vec<ToDo>,
    last_id: i64,
}

// ===== MockTodoRepository =====

#[derive(Clone)]
pub struct MockTodoRepository {
    store:   Arc<Mutex<Store>>,
    clock:   Arc<dyn Clock>,
    failure: Option<String>,
}

impl Default for MockTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTodoRepository {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            clock,
            failure: None,
        }
    }

    /// すべての操作がストア障害を返すリポジトリを作成する
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    /// 現在保持している ToDo の件数
    pub fn len(&self) -> usize {
        self.store.lock().unwrap().todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_failure(&self) -> Result<(), InfraError> {
        match &self.failure {
            Some(message) => Err(InfraError::store(message.clone())),
            None => Ok(()),
        }
    }

    fn check_task_length(task: &str) -> Result<(), InfraError> {
        if task.chars().count() > TASK_MAX_CHARS {
            return Err(InfraError::store(format!(
                "value too long for type character varying({TASK_MAX_CHARS})"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for MockTodoRepository {
    async fn insert(&self, new_todo: &NewToDo) -> Result<ToDo, InfraError> {
        self.check_failure()?;
        Self::check_task_length(&new_todo.task)?;

        let now = self.clock.now();
        let mut store = self.store.lock().unwrap();
        store.last_id += 1;
        let todo = ToDo::from_db(
            ToDoId::from_i64(store.last_id),
            new_todo.task.clone(),
            false,
            now,
            now,
        );
        store.todos.push(todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&self, id: ToDoId) -> Result<Option<ToDo>, InfraError> {
        self.check_failure()?;
        Ok(self
            .store
            .lock()
            .unwrap()
            .todos
            .iter()
            .find(|t| t.id() == id)
            .cloned())
    }

    async fn find_range(&self, page: PageRequest) -> Result<Vec<ToDo>, InfraError> {
        self.check_failure()?;
        let start = usize::try_from(page.start()).unwrap_or(usize::MAX);
        let count = usize::try_from(page.count()).unwrap_or(0);
        Ok(self
            .store
            .lock()
            .unwrap()
            .todos
            .iter()
            .skip(start)
            .take(count)
            .cloned()
            .collect())
    }

    async fn update(&self, update: &ToDoUpdate) -> Result<Option<ToDo>, InfraError> {
        self.check_failure()?;
        Self::check_task_length(&update.task)?;

        let now = self.clock.now();
        let mut store = self.store.lock().unwrap();
        let Some(slot) = store.todos.iter_mut().find(|t| t.id() == update.id) else {
            return Ok(None);
        };
        *slot = slot.updated_with(update, now);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: ToDoId) -> Result<bool, InfraError> {
        self.check_failure()?;
        let mut store = self.store.lock().unwrap();
        let before = store.todos.len();
        store.todos.retain(|t| t.id() != id);
        Ok(store.todos.len() < before)
    }
}
