//! # The Renewal Engine
//!
//! One engine run, for one user:
//!
//! ```text
//! Step A  defer reconciliation   USER_DEFERRED + elapsed window → ACTIVE
//! Step B  due-date computation   expiration date, else filing + months
//! Step C  window filter          due within [today, today + 30d]
//! Step D  dedup check            skip if an open reminder already exists
//! Step E  creation               FLAGGED_ITEM with date-derived priority
//! ```
//!
//! Step A runs first so a just-un-deferred submission is immediately
//! eligible for a fresh reminder in the same run. Reconciliation closes
//! the lapsed reminder; without that, the stale item would hold the dedup
//! check forever and the submission could never be flagged again.
//!
//! The engine carries no state between runs. Both lists are fetched fresh
//! per invocation, and the dedup check is what makes back-to-back runs
//! idempotent. Concurrent runs for the same user (two open sessions) can
//! race past each other's dedup check and double-flag a submission; that
//! race is acknowledged and not defended against.

use std::collections::{HashMap, HashSet};

use comply_core::{Clock, SubmissionId, Timestamp, TodoId, UserId};
use comply_domain::{
    ItemType, Priority, Submission, SubmissionStatus, TodoItem, TodoStatus,
};
use comply_store::{
    StoreError, SubmissionPatch, SubmissionStore, TodoPatch, TodoStore,
};
use thiserror::Error;
use tracing::{info, warn};

/// Lookahead window, in days, for reminder creation. A submission due
/// further out than this is left alone until a later session.
pub const RENEWAL_WINDOW_DAYS: i64 = 30;

/// Errors that abort an engine run.
///
/// Only the initial list reads abort; per-item write failures are logged
/// and counted in the [`RenewalReport`] instead.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Fetching the user's submissions or to-dos failed.
    #[error("failed to load {what}: {source}")]
    Load {
        /// Which list failed ("submissions" or "todos").
        what: &'static str,
        /// The underlying store error.
        source: StoreError,
    },
}

/// Outcome of one engine run.
#[derive(Debug, Default)]
pub struct RenewalReport {
    /// Submissions reactivated from USER_DEFERRED.
    pub reactivated: Vec<SubmissionId>,
    /// Flagged items created this run.
    pub created: Vec<TodoId>,
    /// Per-item writes that failed and were skipped.
    pub write_failures: usize,
}

/// The renewal engine, generic over its stores and clock.
pub struct RenewalEngine<'a, S, T, C> {
    submissions: &'a S,
    todos: &'a T,
    clock: &'a C,
}

impl<'a, S, T, C> RenewalEngine<'a, S, T, C>
where
    S: SubmissionStore,
    T: TodoStore,
    C: Clock,
{
    /// Assemble an engine over the given stores and clock.
    pub fn new(submissions: &'a S, todos: &'a T, clock: &'a C) -> Self {
        Self {
            submissions,
            todos,
            clock,
        }
    }

    /// Run the engine for one user.
    ///
    /// # Errors
    ///
    /// Returns an error only when fetching either list fails. Individual
    /// write failures are logged, counted, and skipped.
    pub async fn run(&self, user: &UserId) -> Result<RenewalReport, EngineError> {
        let now = self.clock.now();
        let horizon = now.add_days(RENEWAL_WINDOW_DAYS);

        let mut submissions =
            self.submissions
                .list_submissions(user)
                .await
                .map_err(|source| EngineError::Load {
                    what: "submissions",
                    source,
                })?;
        let todos = self
            .todos
            .list_todos(user)
            .await
            .map_err(|source| EngineError::Load {
                what: "todos",
                source,
            })?;

        // Indexed lookup: submission id -> its to-dos. Replaces repeated
        // rescans of the full to-do list per submission.
        let mut by_submission: HashMap<SubmissionId, Vec<&TodoItem>> = HashMap::new();
        for todo in &todos {
            if let Some(submission_id) = todo.related_submission_id {
                by_submission.entry(submission_id).or_default().push(todo);
            }
        }
        let mut has_open_reminder: HashSet<SubmissionId> = by_submission
            .iter()
            .filter(|(_, items)| items.iter().any(|t| t.is_open()))
            .map(|(id, _)| *id)
            .collect();

        let mut report = RenewalReport::default();

        // Step A — defer reconciliation, before Step B so a reactivated
        // submission is considered in the same run.
        for submission in submissions.iter_mut() {
            if submission.status != SubmissionStatus::UserDeferred
                || submission.defer_days.is_none()
            {
                continue;
            }
            // Only the open reminder carries the live deferral; closed
            // reminders from earlier cycles keep stale stamps.
            let Some(deferred) = by_submission
                .get(&submission.id)
                .and_then(|items| items.iter().find(|t| t.is_open() && t.deferred_until.is_some()))
            else {
                continue;
            };
            let Some(until) = deferred.deferred_until else {
                continue;
            };
            if now < until {
                continue;
            }

            // Close the lapsed reminder first; leaving it open would hold
            // the dedup check and suppress the fresh one forever. The
            // deferral stamp goes with it.
            let close = TodoPatch {
                status: Some(TodoStatus::Completed),
                deferred_until: Some(None),
                ..Default::default()
            };
            if let Err(error) = self.todos.update_todo(user, &deferred.id, close).await {
                warn!(todo = %deferred.id, %error, "failed to close lapsed reminder");
                report.write_failures += 1;
                continue;
            }

            let reactivate = SubmissionPatch {
                status: Some(SubmissionStatus::Active),
                defer_days: Some(None),
                ..Default::default()
            };
            match self
                .submissions
                .update_submission(user, &submission.id, reactivate)
                .await
            {
                Ok(updated) => {
                    info!(submission = %submission.id, "defer window elapsed, submission reactivated");
                    // Any other open item referencing the submission still
                    // blocks creation, item type notwithstanding.
                    let blocked = by_submission.get(&submission.id).is_some_and(|items| {
                        items.iter().any(|t| t.id != deferred.id && t.is_open())
                    });
                    if !blocked {
                        has_open_reminder.remove(&submission.id);
                    }
                    report.reactivated.push(submission.id);
                    *submission = updated;
                }
                Err(error) => {
                    warn!(submission = %submission.id, %error, "failed to reactivate deferred submission");
                    report.write_failures += 1;
                }
            }
        }

        // Steps B through E over the (possibly just-reactivated) list.
        for submission in &submissions {
            if !submission.status.is_active() {
                continue;
            }
            let Some(due) = submission.renewal_due_date() else {
                continue;
            };
            // Window filter: overdue submissions are the expiring-alert
            // list's concern, not a reminder.
            if due < now || due > horizon {
                continue;
            }
            if has_open_reminder.contains(&submission.id) {
                continue;
            }

            let reminder = build_reminder(user, submission, now, due);
            match self.todos.create_todo(reminder).await {
                Ok(created) => {
                    info!(
                        submission = %submission.id,
                        todo = %created.id,
                        due = %due,
                        "renewal reminder created"
                    );
                    report.created.push(created.id);
                }
                Err(error) => {
                    warn!(submission = %submission.id, %error, "failed to create renewal reminder");
                    report.write_failures += 1;
                }
            }
        }

        Ok(report)
    }
}

/// Shape the flagged item for a due submission.
fn build_reminder(
    user: &UserId,
    submission: &Submission,
    now: Timestamp,
    due: Timestamp,
) -> TodoItem {
    let entity = submission
        .entity_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or("your business");
    TodoItem {
        id: TodoId::new(),
        user_id: *user,
        title: format!(
            "Renew {} - {}",
            submission.compliance_type, submission.jurisdiction
        ),
        description: Some(format!(
            "The {} for {} in {} is due for renewal with {}.",
            submission.compliance_type, entity, submission.jurisdiction, submission.agency
        )),
        priority: Priority::for_days_until(now.days_until(&due)),
        status: TodoStatus::Pending,
        item_type: ItemType::FlaggedItem,
        due_date: Some(due),
        dismissed_at: None,
        deferred_until: None,
        related_submission_id: Some(submission.id),
        created_at: now,
    }
}
