//! # comply-engine — Renewal Engine and Flagged-Item Lifecycle
//!
//! Derives, for one user at a time, the set of compliance submissions
//! needing near-term attention and keeps the to-do list synchronized with
//! that set without ever duplicating a reminder.
//!
//! ## Modules
//!
//! - **Engine** (`engine.rs`): the per-session run. Reconciles elapsed
//!   deferrals back to ACTIVE, computes renewal due dates, filters to the
//!   30-day window, dedups against open reminders, and creates
//!   FLAGGED_ITEM to-dos with date-derived priority.
//!
//! - **Dispositions** (`disposition.rs`): the user actions the engine's
//!   invariants must stay consistent under — complete, dismiss, and
//!   defer.
//!
//! - **Intake** (`intake.rs`): duplicate-guarded submission creation,
//!   account-type pre-fill, and the renew-and-supersede flow.
//!
//! ## Failure Semantics
//!
//! A failed list read aborts the run. A failed write for one item is
//! logged and skipped; the rest of the candidate list is still processed.
//! Nothing is retried within a run — the next run re-derives everything
//! from the stores and picks up whatever was missed, because a missing
//! reminder still passes the dedup check.

pub mod disposition;
pub mod engine;
pub mod intake;

// ─── Engine re-exports ──────────────────────────────────────────────

pub use engine::{EngineError, RenewalEngine, RenewalReport, RENEWAL_WINDOW_DAYS};

// ─── Disposition re-exports ─────────────────────────────────────────

pub use disposition::{complete, defer, dismiss, DispositionError};

// ─── Intake re-exports ──────────────────────────────────────────────

pub use intake::{create_submission, renew, IntakeError, NewSubmission};
