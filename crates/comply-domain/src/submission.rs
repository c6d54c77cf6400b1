//! # Compliance Submissions
//!
//! A submission records one compliance obligation — a state registration,
//! license, or recurring filing — for a jurisdiction and agency, owned by
//! exactly one user.
//!
//! ## Status Lifecycle
//!
//! ```text
//! ACTIVE ──▶ OBSOLETE        (superseded by a renewal)
//!   │
//!   ├──▶ USER_DISMISSED      (user dismissed the flagged reminder)
//!   │
//!   └──▶ USER_DEFERRED ──▶ ACTIVE   (defer window elapsed)
//! ```
//!
//! EXPIRED and PENDING are user-set bookkeeping states; the renewal engine
//! only ever considers submissions whose status is exactly ACTIVE.
//!
//! ## Invariant
//!
//! At most one non-OBSOLETE submission exists per (jurisdiction,
//! compliance type, entity name) triple. The check is procedural at intake
//! ([`Submission::conflicts_with`]), not a database constraint.

use comply_core::{AccountTypeId, ComplyError, JurisdictionCode, SubmissionId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Lookahead window, in days, for the expiring-submission alert list.
pub const EXPIRY_ALERT_DAYS: i64 = 30;

/// Lifecycle status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    /// In force; eligible for renewal reminders.
    Active,
    /// Past its expiration date, as recorded by the user.
    Expired,
    /// Filed but not yet effective.
    Pending,
    /// Superseded by a renewal; kept for history, hidden by default.
    Obsolete,
    /// The user dismissed this submission's reminder; no further
    /// reminders until the user reactivates it.
    UserDismissed,
    /// The user deferred this submission's reminder; reverts to ACTIVE
    /// once the defer window elapses.
    UserDeferred,
}

impl SubmissionStatus {
    /// Whether the renewal engine considers this submission at all.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Pending => "PENDING",
            Self::Obsolete => "OBSOLETE",
            Self::UserDismissed => "USER_DISMISSED",
            Self::UserDeferred => "USER_DEFERRED",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = ComplyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "EXPIRED" => Ok(Self::Expired),
            "PENDING" => Ok(Self::Pending),
            "OBSOLETE" => Ok(Self::Obsolete),
            "USER_DISMISSED" => Ok(Self::UserDismissed),
            "USER_DEFERRED" => Ok(Self::UserDeferred),
            other => Err(ComplyError::Validation(format!(
                "unknown submission status: {other:?}"
            ))),
        }
    }
}

/// A tracked compliance obligation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Unique identifier.
    pub id: SubmissionId,
    /// Owning user; every query and mutation is scoped by this.
    pub user_id: UserId,
    /// Kind of obligation (e.g., "Sales and Use Tax Permit").
    pub compliance_type: String,
    /// Jurisdiction the obligation is owed in.
    pub jurisdiction: JurisdictionCode,
    /// Agency the obligation is owed to.
    pub agency: String,
    /// Link to the account-type reference entry this was created from,
    /// when one was used.
    pub account_type_id: Option<AccountTypeId>,
    /// Legal entity the obligation belongs to.
    pub entity_name: Option<String>,
    /// Account or registration number issued by the agency.
    pub registration_number: Option<String>,
    /// When the user recorded the submission.
    pub submitted_on: Option<Timestamp>,
    /// When the filing was made.
    pub filing_date: Option<Timestamp>,
    /// When the obligation expires. Takes precedence over
    /// filing-date-plus-duration when computing the renewal due date.
    pub expiration_date: Option<Timestamp>,
    /// Renewal cadence in whole months, stored as entered. Only text that
    /// parses as an integer is usable; anything else — including a unit
    /// suffix like `"12mo"`, which lenient parsers would read as 12 —
    /// means no computable due date.
    pub duration: Option<String>,
    /// Lifecycle status.
    pub status: SubmissionStatus,
    /// Days the user deferred this submission for; present only while
    /// status is USER_DEFERRED.
    pub defer_days: Option<u32>,
    /// Link to where the filed documents are stored.
    pub filing_storage_link: Option<String>,
    /// Link to the agency's compliance portal.
    pub compliance_page_link: Option<String>,
    /// Link to the password-manager entry for the portal.
    pub password_manager_link: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the record was created.
    pub created_at: Timestamp,
}

impl Submission {
    /// The date a renewal falls due.
    ///
    /// An explicit expiration date wins. Otherwise the filing date
    /// advanced by the duration, when the duration text parses as a whole
    /// number of months. Returns `None` when neither path is computable —
    /// including when the duration is non-numeric, which is not an error.
    pub fn renewal_due_date(&self) -> Option<Timestamp> {
        if let Some(expiration) = self.expiration_date {
            return Some(expiration);
        }
        let filing = self.filing_date?;
        let months: u32 = self.duration.as_deref()?.trim().parse().ok()?;
        Some(filing.add_months(months))
    }

    /// Whether this submission blocks intake of `other` under the
    /// one-per-triple rule: both non-OBSOLETE, same jurisdiction,
    /// compliance type, and entity name.
    pub fn conflicts_with(&self, other: &Submission) -> bool {
        self.status != SubmissionStatus::Obsolete
            && other.status != SubmissionStatus::Obsolete
            && self.jurisdiction == other.jurisdiction
            && self.compliance_type == other.compliance_type
            && self.entity_name == other.entity_name
    }

    /// Whether this submission belongs on the expiring-soon alert list:
    /// ACTIVE, with an expiration date inside `[now, now + days]`.
    pub fn is_expiring_within(&self, now: Timestamp, days: i64) -> bool {
        if !self.status.is_active() {
            return false;
        }
        match self.expiration_date {
            Some(expiration) => expiration >= now && expiration <= now.add_days(days),
            None => false,
        }
    }
}

/// ACTIVE submissions expiring inside `[now, now + days]`, soonest first.
pub fn expiring_within(submissions: &[Submission], now: Timestamp, days: i64) -> Vec<&Submission> {
    let mut expiring: Vec<&Submission> = submissions
        .iter()
        .filter(|s| s.is_expiring_within(now, days))
        .collect();
    expiring.sort_by_key(|s| s.expiration_date);
    expiring
}
