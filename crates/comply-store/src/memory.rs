//! # In-Memory Store
//!
//! A `Mutex`-guarded store holding both record kinds, used by the test
//! suites and by single-process deployments that have no database.
//! Records keep insertion order, so list results are deterministic.

use std::sync::Mutex;

use comply_core::{SubmissionId, TodoId, UserId};
use comply_domain::{Submission, TodoItem};

use crate::{StoreError, SubmissionPatch, SubmissionStore, TodoPatch, TodoStore};

#[derive(Debug, Default)]
struct Inner {
    submissions: Vec<Submission>,
    todos: Vec<TodoItem>,
}

/// In-memory implementation of both store traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl SubmissionStore for MemoryStore {
    async fn list_submissions(&self, user: &UserId) -> Result<Vec<Submission>, StoreError> {
        Ok(self.with_inner(|inner| {
            let mut subs: Vec<Submission> = inner
                .submissions
                .iter()
                .filter(|s| s.user_id == *user)
                .cloned()
                .collect();
            // Soonest expiration first, undated entries last.
            subs.sort_by_key(|s| (s.expiration_date.is_none(), s.expiration_date));
            subs
        }))
    }

    async fn get_submission(
        &self,
        user: &UserId,
        id: &SubmissionId,
    ) -> Result<Submission, StoreError> {
        self.with_inner(|inner| {
            inner
                .submissions
                .iter()
                .find(|s| s.id == *id && s.user_id == *user)
                .cloned()
                .ok_or(StoreError::NotFound {
                    kind: "submission",
                    id: id.to_string(),
                })
        })
    }

    async fn create_submission(&self, submission: Submission) -> Result<Submission, StoreError> {
        self.with_inner(|inner| {
            inner.submissions.push(submission.clone());
            Ok(submission)
        })
    }

    async fn update_submission(
        &self,
        user: &UserId,
        id: &SubmissionId,
        patch: SubmissionPatch,
    ) -> Result<Submission, StoreError> {
        self.with_inner(|inner| {
            let submission = inner
                .submissions
                .iter_mut()
                .find(|s| s.id == *id && s.user_id == *user)
                .ok_or(StoreError::NotFound {
                    kind: "submission",
                    id: id.to_string(),
                })?;
            patch.apply(submission);
            Ok(submission.clone())
        })
    }

    async fn delete_submission(
        &self,
        user: &UserId,
        id: &SubmissionId,
    ) -> Result<(), StoreError> {
        self.with_inner(|inner| {
            let before = inner.submissions.len();
            inner
                .submissions
                .retain(|s| !(s.id == *id && s.user_id == *user));
            if inner.submissions.len() == before {
                return Err(StoreError::NotFound {
                    kind: "submission",
                    id: id.to_string(),
                });
            }
            Ok(())
        })
    }
}

impl TodoStore for MemoryStore {
    async fn list_todos(&self, user: &UserId) -> Result<Vec<TodoItem>, StoreError> {
        Ok(self.with_inner(|inner| {
            inner
                .todos
                .iter()
                .filter(|t| t.user_id == *user)
                .cloned()
                .collect()
        }))
    }

    async fn get_todo(&self, user: &UserId, id: &TodoId) -> Result<TodoItem, StoreError> {
        self.with_inner(|inner| {
            inner
                .todos
                .iter()
                .find(|t| t.id == *id && t.user_id == *user)
                .cloned()
                .ok_or(StoreError::NotFound {
                    kind: "todo",
                    id: id.to_string(),
                })
        })
    }

    async fn create_todo(&self, todo: TodoItem) -> Result<TodoItem, StoreError> {
        self.with_inner(|inner| {
            inner.todos.push(todo.clone());
            Ok(todo)
        })
    }

    async fn update_todo(
        &self,
        user: &UserId,
        id: &TodoId,
        patch: TodoPatch,
    ) -> Result<TodoItem, StoreError> {
        self.with_inner(|inner| {
            let todo = inner
                .todos
                .iter_mut()
                .find(|t| t.id == *id && t.user_id == *user)
                .ok_or(StoreError::NotFound {
                    kind: "todo",
                    id: id.to_string(),
                })?;
            patch.apply(todo);
            Ok(todo.clone())
        })
    }

    async fn delete_todo(&self, user: &UserId, id: &TodoId) -> Result<(), StoreError> {
        self.with_inner(|inner| {
            let before = inner.todos.len();
            inner.todos.retain(|t| !(t.id == *id && t.user_id == *user));
            if inner.todos.len() == before {
                return Err(StoreError::NotFound {
                    kind: "todo",
                    id: id.to_string(),
                });
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comply_core::{JurisdictionCode, Timestamp};
    use comply_domain::{ItemType, Priority, SubmissionStatus, TodoStatus};

    fn day(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_ymd(y, m, d).unwrap()
    }

    fn submission(user: UserId) -> Submission {
        Submission {
            id: SubmissionId::new(),
            user_id: user,
            compliance_type: "SOS Business Entity".to_string(),
            jurisdiction: JurisdictionCode::parse("CA").unwrap(),
            agency: "Secretary of State".to_string(),
            account_type_id: None,
            entity_name: Some("Acme LLC".to_string()),
            registration_number: None,
            submitted_on: None,
            filing_date: None,
            expiration_date: None,
            duration: None,
            status: SubmissionStatus::Active,
            defer_days: None,
            filing_storage_link: None,
            compliance_page_link: None,
            password_manager_link: None,
            notes: None,
            created_at: day(2024, 1, 1),
        }
    }

    fn todo(user: UserId) -> TodoItem {
        TodoItem {
            id: TodoId::new(),
            user_id: user,
            title: "File annual report".to_string(),
            description: None,
            priority: Priority::Medium,
            status: TodoStatus::Pending,
            item_type: ItemType::Task,
            due_date: None,
            dismissed_at: None,
            deferred_until: None,
            related_submission_id: None,
            created_at: day(2024, 1, 1),
        }
    }

    #[tokio::test]
    async fn test_list_is_user_scoped() {
        let store = MemoryStore::new();
        let alice = UserId::new();
        let bob = UserId::new();
        store.create_submission(submission(alice)).await.unwrap();
        store.create_submission(submission(bob)).await.unwrap();

        assert_eq!(store.list_submissions(&alice).await.unwrap().len(), 1);
        assert_eq!(store.list_submissions(&bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_sorted_by_expiration() {
        let store = MemoryStore::new();
        let user = UserId::new();
        let mut late = submission(user);
        late.expiration_date = Some(day(2025, 6, 1));
        let mut soon = submission(user);
        soon.expiration_date = Some(day(2025, 1, 1));
        let undated = submission(user);
        store.create_submission(late.clone()).await.unwrap();
        store.create_submission(undated.clone()).await.unwrap();
        store.create_submission(soon.clone()).await.unwrap();

        let listed = store.list_submissions(&user).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![soon.id, late.id, undated.id]);
    }

    #[tokio::test]
    async fn test_update_applies_patch_and_clears_fields() {
        let store = MemoryStore::new();
        let user = UserId::new();
        let mut sub = submission(user);
        sub.defer_days = Some(14);
        sub.status = SubmissionStatus::UserDeferred;
        let sub = store.create_submission(sub).await.unwrap();

        let patch = SubmissionPatch {
            status: Some(SubmissionStatus::Active),
            defer_days: Some(None),
            ..Default::default()
        };
        let updated = store.update_submission(&user, &sub.id, patch).await.unwrap();
        assert_eq!(updated.status, SubmissionStatus::Active);
        assert_eq!(updated.defer_days, None);
    }

    #[tokio::test]
    async fn test_update_wrong_user_is_not_found() {
        let store = MemoryStore::new();
        let user = UserId::new();
        let sub = store.create_submission(submission(user)).await.unwrap();

        let stranger = UserId::new();
        let result = store
            .update_submission(&stranger, &sub.id, SubmissionPatch::default())
            .await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_todo_crud_roundtrip() {
        let store = MemoryStore::new();
        let user = UserId::new();
        let item = store.create_todo(todo(user)).await.unwrap();

        let patch = TodoPatch {
            status: Some(TodoStatus::Completed),
            ..Default::default()
        };
        let updated = store.update_todo(&user, &item.id, patch).await.unwrap();
        assert_eq!(updated.status, TodoStatus::Completed);

        store.delete_todo(&user, &item.id).await.unwrap();
        assert!(store.list_todos(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryStore::new();
        let user = UserId::new();
        let result = store.delete_todo(&user, &TodoId::new()).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }
}
