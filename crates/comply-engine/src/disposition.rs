//! # Flagged-Item Dispositions
//!
//! The three user actions on a flagged item, expressed as store
//! transactions the engine's invariants stay consistent under:
//!
//! - **Complete** — the item stops blocking new reminders.
//! - **Dismiss** — the item leaves the visible list and its submission
//!   becomes USER_DISMISSED, which keeps the engine from re-flagging it.
//! - **Defer** — the item hides until a deadline and its submission
//!   becomes USER_DEFERRED; the engine's Step A reverses both once the
//!   deadline passes.
//!
//! Dismiss and defer also work on plain tasks; the submission-side update
//! simply does not apply when the item has no back reference.

use comply_core::{Clock, TodoId, UserId};
use comply_domain::{SubmissionStatus, TodoItem, TodoStatus};
use comply_store::{StoreError, SubmissionPatch, SubmissionStore, TodoPatch, TodoStore};
use thiserror::Error;

/// Errors from disposition actions.
#[derive(Error, Debug)]
pub enum DispositionError {
    /// Defer called with a zero-day window.
    #[error("defer window must be at least one day, got {0}")]
    InvalidDeferDays(u32),

    /// A store read or write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Mark a to-do item COMPLETED.
pub async fn complete<T: TodoStore>(
    todos: &T,
    user: &UserId,
    id: &TodoId,
) -> Result<TodoItem, DispositionError> {
    let patch = TodoPatch {
        status: Some(TodoStatus::Completed),
        ..Default::default()
    };
    Ok(todos.update_todo(user, id, patch).await?)
}

/// Dismiss a to-do item: stamp dismissed-at and, for a flagged item,
/// move its submission to USER_DISMISSED. The item is not deleted.
pub async fn dismiss<S, T, C>(
    submissions: &S,
    todos: &T,
    clock: &C,
    user: &UserId,
    id: &TodoId,
) -> Result<TodoItem, DispositionError>
where
    S: SubmissionStore,
    T: TodoStore,
    C: Clock,
{
    let now = clock.now();
    let patch = TodoPatch {
        dismissed_at: Some(Some(now)),
        ..Default::default()
    };
    let todo = todos.update_todo(user, id, patch).await?;

    if let Some(submission_id) = todo.related_submission_id {
        let patch = SubmissionPatch {
            status: Some(SubmissionStatus::UserDismissed),
            ..Default::default()
        };
        submissions
            .update_submission(user, &submission_id, patch)
            .await?;
    }
    Ok(todo)
}

/// Defer a to-do item for `days` (≥ 1): hide it until now + days and,
/// for a flagged item, move its submission to USER_DEFERRED with the
/// defer duration recorded for Step A to reconcile later.
pub async fn defer<S, T, C>(
    submissions: &S,
    todos: &T,
    clock: &C,
    user: &UserId,
    id: &TodoId,
    days: u32,
) -> Result<TodoItem, DispositionError>
where
    S: SubmissionStore,
    T: TodoStore,
    C: Clock,
{
    if days < 1 {
        return Err(DispositionError::InvalidDeferDays(days));
    }
    let now = clock.now();
    let patch = TodoPatch {
        deferred_until: Some(Some(now.add_days(i64::from(days)))),
        ..Default::default()
    };
    let todo = todos.update_todo(user, id, patch).await?;

    if let Some(submission_id) = todo.related_submission_id {
        let patch = SubmissionPatch {
            status: Some(SubmissionStatus::UserDeferred),
            defer_days: Some(Some(days)),
            ..Default::default()
        };
        submissions
            .update_submission(user, &submission_id, patch)
            .await?;
    }
    Ok(todo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use comply_core::{FixedClock, JurisdictionCode, SubmissionId, Timestamp};
    use comply_domain::{ItemType, Priority, Submission};
    use comply_store::MemoryStore;

    fn day(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_ymd(y, m, d).unwrap()
    }

    async fn seed(store: &MemoryStore, user: UserId) -> (Submission, TodoItem) {
        let submission = Submission {
            id: SubmissionId::new(),
            user_id: user,
            compliance_type: "Business License".to_string(),
            jurisdiction: JurisdictionCode::parse("WA").unwrap(),
            agency: "Department of Revenue".to_string(),
            account_type_id: None,
            entity_name: Some("Acme LLC".to_string()),
            registration_number: None,
            submitted_on: None,
            filing_date: None,
            expiration_date: Some(day(2025, 1, 10)),
            duration: None,
            status: SubmissionStatus::Active,
            defer_days: None,
            filing_storage_link: None,
            compliance_page_link: None,
            password_manager_link: None,
            notes: None,
            created_at: day(2024, 1, 1),
        };
        let submission = store.create_submission(submission).await.unwrap();
        let todo = TodoItem {
            id: TodoId::new(),
            user_id: user,
            title: "Renew Business License - WA".to_string(),
            description: None,
            priority: Priority::High,
            status: TodoStatus::Pending,
            item_type: ItemType::FlaggedItem,
            due_date: Some(day(2025, 1, 10)),
            dismissed_at: None,
            deferred_until: None,
            related_submission_id: Some(submission.id),
            created_at: day(2024, 12, 20),
        };
        let todo = store.create_todo(todo).await.unwrap();
        (submission, todo)
    }

    #[tokio::test]
    async fn test_complete_marks_item_done() {
        let store = MemoryStore::new();
        let user = UserId::new();
        let (_, todo) = seed(&store, user).await;

        let completed = complete(&store, &user, &todo.id).await.unwrap();
        assert_eq!(completed.status, TodoStatus::Completed);
    }

    #[tokio::test]
    async fn test_dismiss_stamps_item_and_submission() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(day(2024, 12, 20));
        let user = UserId::new();
        let (submission, todo) = seed(&store, user).await;

        let dismissed = dismiss(&store, &store, &clock, &user, &todo.id)
            .await
            .unwrap();
        assert_eq!(dismissed.dismissed_at, Some(day(2024, 12, 20)));

        let submission = store.get_submission(&user, &submission.id).await.unwrap();
        assert_eq!(submission.status, SubmissionStatus::UserDismissed);
    }

    #[tokio::test]
    async fn test_defer_sets_deadline_and_duration() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(day(2024, 12, 20));
        let user = UserId::new();
        let (submission, todo) = seed(&store, user).await;

        let deferred = defer(&store, &store, &clock, &user, &todo.id, 14)
            .await
            .unwrap();
        assert_eq!(deferred.deferred_until, Some(day(2025, 1, 3)));

        let submission = store.get_submission(&user, &submission.id).await.unwrap();
        assert_eq!(submission.status, SubmissionStatus::UserDeferred);
        assert_eq!(submission.defer_days, Some(14));
    }

    #[tokio::test]
    async fn test_defer_rejects_zero_days() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(day(2024, 12, 20));
        let user = UserId::new();
        let (_, todo) = seed(&store, user).await;

        let result = defer(&store, &store, &clock, &user, &todo.id, 0).await;
        assert!(matches!(
            result,
            Err(DispositionError::InvalidDeferDays(0))
        ));
    }

    #[tokio::test]
    async fn test_dismiss_plain_task_touches_no_submission() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(day(2024, 12, 20));
        let user = UserId::new();
        let task = TodoItem {
            id: TodoId::new(),
            user_id: user,
            title: "Order new registered-agent service".to_string(),
            description: None,
            priority: Priority::Low,
            status: TodoStatus::Pending,
            item_type: ItemType::Task,
            due_date: None,
            dismissed_at: None,
            deferred_until: None,
            related_submission_id: None,
            created_at: day(2024, 12, 1),
        };
        let task = store.create_todo(task).await.unwrap();

        let dismissed = dismiss(&store, &store, &clock, &user, &task.id)
            .await
            .unwrap();
        assert_eq!(dismissed.dismissed_at, Some(day(2024, 12, 20)));
    }
}
