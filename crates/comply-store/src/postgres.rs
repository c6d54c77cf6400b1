//! # Postgres Store
//!
//! A thin wrapper over a `sqlx` Postgres pool. Queries are
//! runtime-checked and every statement carries the owning user id in its
//! WHERE clause, so cross-user access is impossible at the query level.
//!
//! Partial updates are read-modify-write: fetch the row, apply the patch
//! in Rust, write all mutable columns back. With per-user, per-session
//! traffic there is no contention worth a dynamic SET clause.
//!
//! Schema management is out of scope here; the store assumes the
//! `compliance_submissions` and `todo_items` tables already exist.

use chrono::{DateTime, Utc};
use comply_core::{
    AccountTypeId, ComplyError, JurisdictionCode, SubmissionId, Timestamp, TodoId, UserId,
};
use comply_domain::{ItemType, Priority, Submission, SubmissionStatus, TodoItem, TodoStatus};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{StoreError, SubmissionPatch, SubmissionStore, TodoPatch, TodoStore};

const SUBMISSION_COLUMNS: &str = "id, user_id, compliance_type, jurisdiction, agency, \
     account_type_id, entity_name, registration_number, submitted_on, filing_date, \
     expiration_date, duration, status, defer_days, filing_storage_link, \
     compliance_page_link, password_manager_link, notes, created_at";

const TODO_COLUMNS: &str = "id, user_id, title, description, priority, status, item_type, \
     due_date, dismissed_at, deferred_until, related_submission_id, created_at";

/// Postgres-backed implementation of both store traits.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ─── Row mapping ─────────────────────────────────────────────────────

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: Uuid,
    user_id: Uuid,
    compliance_type: String,
    jurisdiction: String,
    agency: String,
    account_type_id: Option<Uuid>,
    entity_name: Option<String>,
    registration_number: Option<String>,
    submitted_on: Option<DateTime<Utc>>,
    filing_date: Option<DateTime<Utc>>,
    expiration_date: Option<DateTime<Utc>>,
    duration: Option<String>,
    status: String,
    defer_days: Option<i32>,
    filing_storage_link: Option<String>,
    compliance_page_link: Option<String>,
    password_manager_link: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = StoreError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        Ok(Submission {
            id: SubmissionId(row.id),
            user_id: UserId(row.user_id),
            compliance_type: row.compliance_type,
            jurisdiction: JurisdictionCode::parse(&row.jurisdiction)?,
            agency: row.agency,
            account_type_id: row.account_type_id.map(AccountTypeId),
            entity_name: row.entity_name,
            registration_number: row.registration_number,
            submitted_on: row.submitted_on.map(Timestamp::from_utc),
            filing_date: row.filing_date.map(Timestamp::from_utc),
            expiration_date: row.expiration_date.map(Timestamp::from_utc),
            duration: row.duration,
            status: row.status.parse::<SubmissionStatus>()?,
            defer_days: defer_days_from_db(row.defer_days)?,
            filing_storage_link: row.filing_storage_link,
            compliance_page_link: row.compliance_page_link,
            password_manager_link: row.password_manager_link,
            notes: row.notes,
            created_at: Timestamp::from_utc(row.created_at),
        })
    }
}

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    priority: String,
    status: String,
    item_type: String,
    due_date: Option<DateTime<Utc>>,
    dismissed_at: Option<DateTime<Utc>>,
    deferred_until: Option<DateTime<Utc>>,
    related_submission_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for TodoItem {
    type Error = StoreError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        Ok(TodoItem {
            id: TodoId(row.id),
            user_id: UserId(row.user_id),
            title: row.title,
            description: row.description,
            priority: row.priority.parse::<Priority>()?,
            status: row.status.parse::<TodoStatus>()?,
            item_type: row.item_type.parse::<ItemType>()?,
            due_date: row.due_date.map(Timestamp::from_utc),
            dismissed_at: row.dismissed_at.map(Timestamp::from_utc),
            deferred_until: row.deferred_until.map(Timestamp::from_utc),
            related_submission_id: row.related_submission_id.map(SubmissionId),
            created_at: Timestamp::from_utc(row.created_at),
        })
    }
}

fn as_utc(ts: Option<Timestamp>) -> Option<DateTime<Utc>> {
    ts.map(|t| *t.as_datetime())
}

// defer_days is u32 in the domain and INTEGER in the schema; values that
// do not fit either way are decode errors, not silent reinterpretations.

fn defer_days_from_db(value: Option<i32>) -> Result<Option<u32>, StoreError> {
    value
        .map(|d| {
            u32::try_from(d).map_err(|_| {
                StoreError::Decode(ComplyError::Validation(format!(
                    "defer_days out of range: {d}"
                )))
            })
        })
        .transpose()
}

fn defer_days_to_db(value: Option<u32>) -> Result<Option<i32>, StoreError> {
    value
        .map(|d| {
            i32::try_from(d).map_err(|_| {
                StoreError::Decode(ComplyError::Validation(format!(
                    "defer_days out of range: {d}"
                )))
            })
        })
        .transpose()
}

// ─── Submissions ─────────────────────────────────────────────────────

impl SubmissionStore for PgStore {
    async fn list_submissions(&self, user: &UserId) -> Result<Vec<Submission>, StoreError> {
        let query = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM compliance_submissions \
             WHERE user_id = $1 ORDER BY expiration_date ASC NULLS LAST"
        );
        let rows = sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(user.0)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Submission::try_from).collect()
    }

    async fn get_submission(
        &self,
        user: &UserId,
        id: &SubmissionId,
    ) -> Result<Submission, StoreError> {
        let query = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM compliance_submissions \
             WHERE user_id = $1 AND id = $2"
        );
        let row = sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(user.0)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound {
                kind: "submission",
                id: id.to_string(),
            })?;
        Submission::try_from(row)
    }

    async fn create_submission(&self, submission: Submission) -> Result<Submission, StoreError> {
        let query = format!(
            "INSERT INTO compliance_submissions ({SUBMISSION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)"
        );
        let defer_days = defer_days_to_db(submission.defer_days)?;
        sqlx::query(&query)
            .bind(submission.id.0)
            .bind(submission.user_id.0)
            .bind(&submission.compliance_type)
            .bind(submission.jurisdiction.as_str())
            .bind(&submission.agency)
            .bind(submission.account_type_id.map(|a| a.0))
            .bind(&submission.entity_name)
            .bind(&submission.registration_number)
            .bind(as_utc(submission.submitted_on))
            .bind(as_utc(submission.filing_date))
            .bind(as_utc(submission.expiration_date))
            .bind(&submission.duration)
            .bind(submission.status.to_string())
            .bind(defer_days)
            .bind(&submission.filing_storage_link)
            .bind(&submission.compliance_page_link)
            .bind(&submission.password_manager_link)
            .bind(&submission.notes)
            .bind(*submission.created_at.as_datetime())
            .execute(&self.pool)
            .await?;
        Ok(submission)
    }

    async fn update_submission(
        &self,
        user: &UserId,
        id: &SubmissionId,
        patch: SubmissionPatch,
    ) -> Result<Submission, StoreError> {
        let mut submission = self.get_submission(user, id).await?;
        patch.apply(&mut submission);
        let defer_days = defer_days_to_db(submission.defer_days)?;

        sqlx::query(
            "UPDATE compliance_submissions SET status = $3, defer_days = $4, \
             expiration_date = $5, filing_date = $6, duration = $7, \
             registration_number = $8, notes = $9 \
             WHERE user_id = $1 AND id = $2",
        )
        .bind(user.0)
        .bind(id.0)
        .bind(submission.status.to_string())
        .bind(defer_days)
        .bind(as_utc(submission.expiration_date))
        .bind(as_utc(submission.filing_date))
        .bind(&submission.duration)
        .bind(&submission.registration_number)
        .bind(&submission.notes)
        .execute(&self.pool)
        .await?;
        Ok(submission)
    }

    async fn delete_submission(
        &self,
        user: &UserId,
        id: &SubmissionId,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "DELETE FROM compliance_submissions WHERE user_id = $1 AND id = $2",
        )
        .bind(user.0)
        .bind(id.0)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                kind: "submission",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

// ─── To-do items ─────────────────────────────────────────────────────

impl TodoStore for PgStore {
    async fn list_todos(&self, user: &UserId) -> Result<Vec<TodoItem>, StoreError> {
        let query = format!(
            "SELECT {TODO_COLUMNS} FROM todo_items WHERE user_id = $1 ORDER BY created_at ASC"
        );
        let rows = sqlx::query_as::<_, TodoRow>(&query)
            .bind(user.0)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(TodoItem::try_from).collect()
    }

    async fn get_todo(&self, user: &UserId, id: &TodoId) -> Result<TodoItem, StoreError> {
        let query =
            format!("SELECT {TODO_COLUMNS} FROM todo_items WHERE user_id = $1 AND id = $2");
        let row = sqlx::query_as::<_, TodoRow>(&query)
            .bind(user.0)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound {
                kind: "todo",
                id: id.to_string(),
            })?;
        TodoItem::try_from(row)
    }

    async fn create_todo(&self, todo: TodoItem) -> Result<TodoItem, StoreError> {
        let query = format!(
            "INSERT INTO todo_items ({TODO_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"
        );
        sqlx::query(&query)
            .bind(todo.id.0)
            .bind(todo.user_id.0)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.priority.to_string())
            .bind(todo.status.to_string())
            .bind(todo.item_type.to_string())
            .bind(as_utc(todo.due_date))
            .bind(as_utc(todo.dismissed_at))
            .bind(as_utc(todo.deferred_until))
            .bind(todo.related_submission_id.map(|s| s.0))
            .bind(*todo.created_at.as_datetime())
            .execute(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn update_todo(
        &self,
        user: &UserId,
        id: &TodoId,
        patch: TodoPatch,
    ) -> Result<TodoItem, StoreError> {
        let mut todo = self.get_todo(user, id).await?;
        patch.apply(&mut todo);

        sqlx::query(
            "UPDATE todo_items SET title = $3, description = $4, priority = $5, \
             status = $6, due_date = $7, dismissed_at = $8, deferred_until = $9 \
             WHERE user_id = $1 AND id = $2",
        )
        .bind(user.0)
        .bind(id.0)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.priority.to_string())
        .bind(todo.status.to_string())
        .bind(as_utc(todo.due_date))
        .bind(as_utc(todo.dismissed_at))
        .bind(as_utc(todo.deferred_until))
        .execute(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn delete_todo(&self, user: &UserId, id: &TodoId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM todo_items WHERE user_id = $1 AND id = $2")
            .bind(user.0)
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                kind: "todo",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defer_days_roundtrip() {
        assert_eq!(defer_days_from_db(Some(14)).unwrap(), Some(14));
        assert_eq!(defer_days_from_db(None).unwrap(), None);
        assert_eq!(defer_days_to_db(Some(14)).unwrap(), Some(14));
        assert_eq!(defer_days_to_db(None).unwrap(), None);
    }

    #[test]
    fn test_negative_defer_days_is_a_decode_error() {
        assert!(matches!(
            defer_days_from_db(Some(-1)),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn test_oversized_defer_days_is_a_decode_error() {
        assert!(matches!(
            defer_days_to_db(Some(u32::MAX)),
            Err(StoreError::Decode(_))
        ));
    }
}
