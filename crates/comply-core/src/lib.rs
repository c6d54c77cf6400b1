//! # comply-core — Foundational Types for the Compliance Stack
//!
//! This crate is the bedrock of the compliance tracking stack. It defines
//! the type-system primitives every other crate in the workspace builds on;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `UserId`, `SubmissionId`,
//!    `TodoId`, `AccountTypeId`, `JurisdictionCode` — all newtypes with
//!    validated constructors. No bare strings or UUIDs for identifiers.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with
//!    seconds precision, so renewal-window comparisons never depend on a
//!    local timezone.
//!
//! 3. **Injectable clock.** Nothing downstream calls `Utc::now()` directly.
//!    The `Clock` trait carries "today" into every date computation, which
//!    makes the window and defer-expiry logic deterministic under test.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `comply-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod error;
pub mod identity;
pub mod jurisdiction;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::ComplyError;
pub use identity::{AccountTypeId, ResourceId, SubmissionId, TodoId, UserId};
pub use jurisdiction::{find_scope, scopes_by_type, ComplianceScope, JurisdictionCode, ScopeType};
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};
