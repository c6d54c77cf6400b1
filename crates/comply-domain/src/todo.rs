//! # To-Do Items — Tasks and Flagged Items
//!
//! Two kinds of to-do entries share one record shape:
//!
//! - **TASK** — created, edited, and deleted directly by the user.
//! - **FLAGGED_ITEM** — created only by the renewal engine to suggest a
//!   renewal action; completed when the user acts, or dismissed/deferred
//!   by explicit user action. Never created manually.
//!
//! ## Invariant
//!
//! At most one non-COMPLETED FLAGGED_ITEM exists per submission at any
//! time. The engine enforces this through its dedup check; dismiss and
//! defer leave the item in place rather than deleting it.

use comply_core::{ComplyError, SubmissionId, Timestamp, TodoId, UserId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Urgency bucket for a to-do item. Ordering follows urgency, so
/// `Urgent > High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// No near-term deadline.
    Low,
    /// Default for user-created tasks and reminders more than two weeks out.
    Medium,
    /// Due within two weeks.
    High,
    /// Due within a week.
    Urgent,
}

impl Priority {
    /// Bucket a reminder by how many whole days remain until it is due
    /// (days computed as a ceiling, so a fraction of a day rounds up).
    pub fn for_days_until(days: i64) -> Self {
        if days <= 7 {
            Self::Urgent
        } else if days <= 14 {
            Self::High
        } else {
            Self::Medium
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Priority {
    type Err = ComplyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "URGENT" => Ok(Self::Urgent),
            other => Err(ComplyError::Validation(format!(
                "unknown priority: {other:?}"
            ))),
        }
    }
}

/// Completion status of a to-do item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoStatus {
    /// Open.
    Pending,
    /// Done. Completed flagged items no longer block new reminders for
    /// their submission.
    Completed,
}

impl std::fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for TodoStatus {
    type Err = ComplyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(ComplyError::Validation(format!(
                "unknown todo status: {other:?}"
            ))),
        }
    }
}

/// Origin of a to-do item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    /// User-created entry.
    Task,
    /// Engine-generated renewal reminder.
    FlaggedItem,
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Task => "TASK",
            Self::FlaggedItem => "FLAGGED_ITEM",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ItemType {
    type Err = ComplyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TASK" => Ok(Self::Task),
            "FLAGGED_ITEM" => Ok(Self::FlaggedItem),
            other => Err(ComplyError::Validation(format!(
                "unknown item type: {other:?}"
            ))),
        }
    }
}

/// A to-do list entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier.
    pub id: TodoId,
    /// Owning user.
    pub user_id: UserId,
    /// Short title shown in the list.
    pub title: String,
    /// Longer description, when present.
    pub description: Option<String>,
    /// Urgency bucket.
    pub priority: Priority,
    /// Completion status.
    pub status: TodoStatus,
    /// Whether this is a user task or an engine-generated flagged item.
    pub item_type: ItemType,
    /// When the item falls due.
    pub due_date: Option<Timestamp>,
    /// Set when the user dismissed the item. Dismissed items stay in the
    /// store but leave the visible list.
    pub dismissed_at: Option<Timestamp>,
    /// Set when the user deferred the item; hidden from the visible list
    /// until this instant passes.
    pub deferred_until: Option<Timestamp>,
    /// Back reference to the submission a flagged item was raised for.
    pub related_submission_id: Option<SubmissionId>,
    /// When the record was created.
    pub created_at: Timestamp,
}

impl TodoItem {
    /// Whether the item still blocks a new reminder for its submission.
    pub fn is_open(&self) -> bool {
        self.status != TodoStatus::Completed
    }

    /// Whether the item belongs on the user-visible list at `now`:
    /// not dismissed, and any defer window already elapsed.
    pub fn is_visible(&self, now: Timestamp) -> bool {
        self.dismissed_at.is_none() && self.deferred_until.map_or(true, |until| until <= now)
    }
}

/// The user-visible to-do list at `now`: dismissed and still-deferred
/// items are excluded, tasks come before flagged items, open entries
/// before completed ones, then by descending priority and ascending due
/// date (undated entries last).
pub fn visible_todos(items: &[TodoItem], now: Timestamp) -> Vec<&TodoItem> {
    let mut visible: Vec<&TodoItem> = items.iter().filter(|t| t.is_visible(now)).collect();
    visible.sort_by(|a, b| {
        item_type_rank(a.item_type)
            .cmp(&item_type_rank(b.item_type))
            .then_with(|| status_rank(a.status).cmp(&status_rank(b.status)))
            .then_with(|| b.priority.cmp(&a.priority))
            .then_with(|| due_date_order(a.due_date, b.due_date))
    });
    visible
}

fn item_type_rank(item_type: ItemType) -> u8 {
    match item_type {
        ItemType::Task => 0,
        ItemType::FlaggedItem => 1,
    }
}

fn status_rank(status: TodoStatus) -> u8 {
    match status {
        TodoStatus::Pending => 0,
        TodoStatus::Completed => 1,
    }
}

fn due_date_order(a: Option<Timestamp>, b: Option<Timestamp>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_ymd(y, m, d).unwrap()
    }

    fn task(title: &str) -> TodoItem {
        TodoItem {
            id: TodoId::new(),
            user_id: UserId::new(),
            title: title.to_string(),
            description: None,
            priority: Priority::Medium,
            status: TodoStatus::Pending,
            item_type: ItemType::Task,
            due_date: None,
            dismissed_at: None,
            deferred_until: None,
            related_submission_id: None,
            created_at: day(2024, 12, 1),
        }
    }

    // ── priority bucketing ───────────────────────────────────────────

    #[test]
    fn test_priority_boundary_seven_days_is_urgent() {
        assert_eq!(Priority::for_days_until(7), Priority::Urgent);
        assert_eq!(Priority::for_days_until(8), Priority::High);
    }

    #[test]
    fn test_priority_boundary_fourteen_days_is_high() {
        assert_eq!(Priority::for_days_until(14), Priority::High);
        assert_eq!(Priority::for_days_until(15), Priority::Medium);
    }

    #[test]
    fn test_priority_ordering_follows_urgency() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    // ── visibility ───────────────────────────────────────────────────

    #[test]
    fn test_dismissed_item_is_hidden() {
        let mut item = task("dismissed");
        item.dismissed_at = Some(day(2024, 12, 10));
        assert!(!item.is_visible(day(2024, 12, 20)));
    }

    #[test]
    fn test_deferred_item_hidden_until_deadline() {
        let mut item = task("deferred");
        item.deferred_until = Some(day(2024, 12, 25));
        assert!(!item.is_visible(day(2024, 12, 20)));
        // Visible again at the exact deferred-until instant.
        assert!(item.is_visible(day(2024, 12, 25)));
        assert!(item.is_visible(day(2024, 12, 26)));
    }

    // ── list ordering ────────────────────────────────────────────────

    #[test]
    fn test_visible_list_ordering() {
        let now = day(2024, 12, 20);

        let mut done_task = task("done task");
        done_task.status = TodoStatus::Completed;

        let mut urgent_flag = task("urgent flag");
        urgent_flag.item_type = ItemType::FlaggedItem;
        urgent_flag.priority = Priority::Urgent;
        urgent_flag.due_date = Some(day(2024, 12, 24));

        let mut later_flag = task("later flag");
        later_flag.item_type = ItemType::FlaggedItem;
        later_flag.priority = Priority::Urgent;
        later_flag.due_date = Some(day(2024, 12, 26));

        let mut hidden = task("hidden");
        hidden.deferred_until = Some(day(2025, 1, 5));

        let open_task = task("open task");

        let items = vec![
            done_task,
            later_flag,
            hidden,
            urgent_flag,
            open_task,
        ];
        let titles: Vec<&str> = visible_todos(&items, now)
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["open task", "done task", "urgent flag", "later flag"]
        );
    }

    // ── wire names ───────────────────────────────────────────────────

    #[test]
    fn test_item_type_serde_wire_names() {
        let json = serde_json::to_string(&ItemType::FlaggedItem).unwrap();
        assert_eq!(json, "\"FLAGGED_ITEM\"");
    }

    #[test]
    fn test_priority_display_from_str_roundtrip() {
        for p in [
            Priority::Low,
            Priority::Medium,
            Priority::High,
            Priority::Urgent,
        ] {
            let parsed: Priority = p.to_string().parse().unwrap();
            assert_eq!(parsed, p);
        }
    }
}
