//! # comply-domain — Domain Records and Pure Logic
//!
//! The records the compliance stack tracks, with every decision the
//! renewal engine and the user-facing lists depend on expressed as pure
//! functions over those records. Nothing here touches storage or a clock
//! directly — callers pass "now" in.
//!
//! ## Modules
//!
//! - **Submission** (`submission.rs`): a tracked compliance obligation for
//!   one jurisdiction and agency. Carries the status enum
//!   (ACTIVE → OBSOLETE / USER_DISMISSED / USER_DEFERRED …) and the
//!   renewal due-date computation (expiration date, else filing date plus
//!   integer duration months).
//!
//! - **To-do** (`todo.rs`): user tasks and engine-generated flagged items,
//!   priority bucketing by days-until-due, and the visible-list filter
//!   and ordering.
//!
//! - **Account types** (`account_type.rs`): static reference data per
//!   jurisdiction, including the serialized required-field list that
//!   drives form-field visibility and the default renewal duration.
//!
//! - **Resources** (`resource.rs`): guidance content keyed by
//!   jurisdiction and compliance type.
//!
//! ## Design
//!
//! Statuses are proper enums with exhaustive `match` at each decision
//! point — due-date computation, dedup, reconciliation — so a new status
//! variant cannot be silently mishandled the way a stray status string
//! could be.

pub mod account_type;
pub mod resource;
pub mod submission;
pub mod todo;

// ─── Submission re-exports ──────────────────────────────────────────

pub use submission::{expiring_within, Submission, SubmissionStatus, EXPIRY_ALERT_DAYS};

// ─── To-do re-exports ───────────────────────────────────────────────

pub use todo::{visible_todos, ItemType, Priority, TodoItem, TodoStatus};

// ─── Account type re-exports ────────────────────────────────────────

pub use account_type::{AccountType, AccountTypeCatalog, SubmissionField};

// ─── Resource re-exports ────────────────────────────────────────────

pub use resource::{ResourceGuide, ResourceLibrary};
