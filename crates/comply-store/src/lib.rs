//! # comply-store — The Storage Seam
//!
//! Async store traits for submissions and to-do items, plus two
//! implementations:
//!
//! - [`MemoryStore`] — a `Mutex`-guarded in-memory store for tests and
//!   single-process use.
//! - [`PgStore`] — a thin wrapper over a Postgres pool via `sqlx`, with
//!   runtime-checked queries and read-modify-write partial updates.
//!
//! ## Design
//!
//! Every operation is scoped by an explicit [`UserId`]; a store never
//! returns or mutates another user's rows. Partial updates are expressed
//! as patch structs where `None` means "leave unchanged" and
//! `Some(None)` clears a nullable field, matching the partial-field
//! update semantics of the stores the engine consumes.
//!
//! Stores are deliberately thin: no business rules live here. The
//! duplicate-intake guard and every renewal decision belong to
//! `comply-engine`.

pub mod memory;
pub mod postgres;

use comply_core::{SubmissionId, Timestamp, TodoId, UserId};
use comply_domain::{Priority, Submission, SubmissionStatus, TodoItem, TodoStatus};
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors surfaced by store implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No row with that id exists for the user.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind ("submission" or "todo").
        kind: &'static str,
        /// Display form of the missing id.
        id: String,
    },

    /// The backing database rejected or failed the operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be decoded into its domain type.
    #[error("stored value could not be decoded: {0}")]
    Decode(#[from] comply_core::ComplyError),
}

// ─── Patch types ─────────────────────────────────────────────────────

/// Partial update to a submission. `None` leaves a field unchanged;
/// `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default)]
pub struct SubmissionPatch {
    /// New lifecycle status.
    pub status: Option<SubmissionStatus>,
    /// New defer duration in days.
    pub defer_days: Option<Option<u32>>,
    /// New expiration date.
    pub expiration_date: Option<Option<Timestamp>>,
    /// New filing date.
    pub filing_date: Option<Option<Timestamp>>,
    /// New duration text.
    pub duration: Option<Option<String>>,
    /// New registration number.
    pub registration_number: Option<Option<String>>,
    /// New notes.
    pub notes: Option<Option<String>>,
}

impl SubmissionPatch {
    /// Apply the patch in place.
    pub fn apply(&self, submission: &mut Submission) {
        if let Some(status) = self.status {
            submission.status = status;
        }
        if let Some(defer_days) = self.defer_days {
            submission.defer_days = defer_days;
        }
        if let Some(expiration_date) = self.expiration_date {
            submission.expiration_date = expiration_date;
        }
        if let Some(filing_date) = self.filing_date {
            submission.filing_date = filing_date;
        }
        if let Some(duration) = &self.duration {
            submission.duration = duration.clone();
        }
        if let Some(registration_number) = &self.registration_number {
            submission.registration_number = registration_number.clone();
        }
        if let Some(notes) = &self.notes {
            submission.notes = notes.clone();
        }
    }
}

/// Partial update to a to-do item. Same `None` / `Some(None)` semantics
/// as [`SubmissionPatch`].
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New completion status.
    pub status: Option<TodoStatus>,
    /// New due date.
    pub due_date: Option<Option<Timestamp>>,
    /// New dismissed-at stamp.
    pub dismissed_at: Option<Option<Timestamp>>,
    /// New deferred-until deadline.
    pub deferred_until: Option<Option<Timestamp>>,
}

impl TodoPatch {
    /// Apply the patch in place.
    pub fn apply(&self, todo: &mut TodoItem) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
        if let Some(dismissed_at) = self.dismissed_at {
            todo.dismissed_at = dismissed_at;
        }
        if let Some(deferred_until) = self.deferred_until {
            todo.deferred_until = deferred_until;
        }
    }
}

// ─── Store traits ────────────────────────────────────────────────────

/// Persistence for compliance submissions, scoped per user.
#[allow(async_fn_in_trait)]
pub trait SubmissionStore {
    /// All submissions owned by the user, soonest expiration first.
    async fn list_submissions(&self, user: &UserId) -> Result<Vec<Submission>, StoreError>;

    /// One submission by id.
    async fn get_submission(
        &self,
        user: &UserId,
        id: &SubmissionId,
    ) -> Result<Submission, StoreError>;

    /// Persist a new submission.
    async fn create_submission(&self, submission: Submission) -> Result<Submission, StoreError>;

    /// Apply a partial update and return the updated record.
    async fn update_submission(
        &self,
        user: &UserId,
        id: &SubmissionId,
        patch: SubmissionPatch,
    ) -> Result<Submission, StoreError>;

    /// Delete a submission.
    async fn delete_submission(&self, user: &UserId, id: &SubmissionId)
        -> Result<(), StoreError>;
}

/// Persistence for to-do items, scoped per user.
#[allow(async_fn_in_trait)]
pub trait TodoStore {
    /// All to-do items owned by the user, in creation order.
    async fn list_todos(&self, user: &UserId) -> Result<Vec<TodoItem>, StoreError>;

    /// One to-do item by id.
    async fn get_todo(&self, user: &UserId, id: &TodoId) -> Result<TodoItem, StoreError>;

    /// Persist a new to-do item.
    async fn create_todo(&self, todo: TodoItem) -> Result<TodoItem, StoreError>;

    /// Apply a partial update and return the updated record.
    async fn update_todo(
        &self,
        user: &UserId,
        id: &TodoId,
        patch: TodoPatch,
    ) -> Result<TodoItem, StoreError>;

    /// Delete a to-do item.
    async fn delete_todo(&self, user: &UserId, id: &TodoId) -> Result<(), StoreError>;
}
