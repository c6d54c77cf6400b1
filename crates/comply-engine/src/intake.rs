//! # Submission Intake and Renewal
//!
//! Creation paths for submissions:
//!
//! - **Direct intake** — a manually entered submission, guarded by the
//!   one-per-triple rule: at most one non-OBSOLETE submission per
//!   (jurisdiction, compliance type, entity name). The guard is a
//!   procedural check against the user's current list, not a database
//!   constraint, so two racing sessions can still slip past it.
//!
//! - **Account-type pre-fill** — a [`NewSubmission`] shaped from a
//!   catalog entry: type name, jurisdiction, agency, and default
//!   duration carried over.
//!
//! - **Renew and supersede** — the action behind completing a flagged
//!   item: the old submission goes OBSOLETE, a successor is created in
//!   its place, and the prompting reminder is completed.

use comply_core::{AccountTypeId, Clock, JurisdictionCode, SubmissionId, Timestamp, TodoId, UserId};
use comply_domain::{AccountType, Submission, SubmissionStatus};
use comply_store::{StoreError, SubmissionPatch, SubmissionStore, TodoStore};
use thiserror::Error;
use tracing::info;

use crate::disposition;

/// Errors from intake and renewal.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// A non-OBSOLETE submission already covers this triple.
    #[error("a submission for {compliance_type} in {jurisdiction} already exists for this entity")]
    Duplicate {
        /// Jurisdiction of the colliding submission.
        jurisdiction: JurisdictionCode,
        /// Compliance type of the colliding submission.
        compliance_type: String,
    },

    /// A store read or write failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Completing the prompting reminder failed.
    #[error("failed to complete flagged item: {0}")]
    Disposition(#[from] disposition::DispositionError),
}

/// Fields for a submission being created.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    /// Kind of obligation.
    pub compliance_type: String,
    /// Jurisdiction the obligation is owed in.
    pub jurisdiction: JurisdictionCode,
    /// Agency the obligation is owed to.
    pub agency: String,
    /// Catalog entry this was created from, when one was used.
    pub account_type_id: Option<AccountTypeId>,
    /// Legal entity the obligation belongs to.
    pub entity_name: Option<String>,
    /// Agency-issued registration number.
    pub registration_number: Option<String>,
    /// Date the submission was recorded.
    pub submitted_on: Option<Timestamp>,
    /// Date the filing was made.
    pub filing_date: Option<Timestamp>,
    /// Date the obligation expires.
    pub expiration_date: Option<Timestamp>,
    /// Renewal cadence in months, as text.
    pub duration: Option<String>,
    /// Initial status; defaults to ACTIVE.
    pub status: Option<SubmissionStatus>,
    /// Link to stored filing documents.
    pub filing_storage_link: Option<String>,
    /// Link to the agency portal.
    pub compliance_page_link: Option<String>,
    /// Link to the password-manager entry.
    pub password_manager_link: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl NewSubmission {
    /// Start a submission with just the identifying triple; everything
    /// else defaults to empty.
    pub fn bare(
        compliance_type: impl Into<String>,
        jurisdiction: JurisdictionCode,
        agency: impl Into<String>,
    ) -> Self {
        Self {
            compliance_type: compliance_type.into(),
            jurisdiction,
            agency: agency.into(),
            account_type_id: None,
            entity_name: None,
            registration_number: None,
            submitted_on: None,
            filing_date: None,
            expiration_date: None,
            duration: None,
            status: None,
            filing_storage_link: None,
            compliance_page_link: None,
            password_manager_link: None,
            notes: None,
        }
    }

    /// Pre-fill from a catalog entry: type name, jurisdiction, agency,
    /// and default duration carried over, with the back reference set.
    pub fn from_account_type(account_type: &AccountType) -> Self {
        let mut new = Self::bare(
            account_type.name.clone(),
            account_type.jurisdiction.clone(),
            account_type.agency.clone(),
        );
        new.account_type_id = Some(account_type.id);
        new.duration = account_type.default_duration.clone();
        new
    }

    fn into_submission(self, user: &UserId, now: Timestamp) -> Submission {
        Submission {
            id: SubmissionId::new(),
            user_id: *user,
            compliance_type: self.compliance_type,
            jurisdiction: self.jurisdiction,
            agency: self.agency,
            account_type_id: self.account_type_id,
            entity_name: self.entity_name,
            registration_number: self.registration_number,
            submitted_on: self.submitted_on,
            filing_date: self.filing_date,
            expiration_date: self.expiration_date,
            duration: self.duration,
            status: self.status.unwrap_or(SubmissionStatus::Active),
            defer_days: None,
            filing_storage_link: self.filing_storage_link,
            compliance_page_link: self.compliance_page_link,
            password_manager_link: self.password_manager_link,
            notes: self.notes,
            created_at: now,
        }
    }
}

/// Create a submission, enforcing the one-per-triple rule against the
/// user's current list.
pub async fn create_submission<S, C>(
    submissions: &S,
    clock: &C,
    user: &UserId,
    new: NewSubmission,
) -> Result<Submission, IntakeError>
where
    S: SubmissionStore,
    C: Clock,
{
    let candidate = new.into_submission(user, clock.now());

    let existing = submissions.list_submissions(user).await?;
    if existing.iter().any(|s| s.conflicts_with(&candidate)) {
        return Err(IntakeError::Duplicate {
            jurisdiction: candidate.jurisdiction.clone(),
            compliance_type: candidate.compliance_type.clone(),
        });
    }

    Ok(submissions.create_submission(candidate).await?)
}

/// Renew a submission: mark the old one OBSOLETE, create its successor
/// with today's filing date, and complete the flagged item that prompted
/// the renewal (when one is given).
pub async fn renew<S, T, C>(
    submissions: &S,
    todos: &T,
    clock: &C,
    user: &UserId,
    id: &SubmissionId,
    flagged_item: Option<&TodoId>,
) -> Result<Submission, IntakeError>
where
    S: SubmissionStore,
    T: TodoStore,
    C: Clock,
{
    let now = clock.now();
    let old = submissions.get_submission(user, id).await?;

    // Retire the predecessor first so the duplicate guard admits the
    // successor.
    let retire = SubmissionPatch {
        status: Some(SubmissionStatus::Obsolete),
        ..Default::default()
    };
    submissions.update_submission(user, id, retire).await?;

    let mut successor = NewSubmission::bare(
        old.compliance_type.clone(),
        old.jurisdiction.clone(),
        old.agency.clone(),
    );
    successor.account_type_id = old.account_type_id;
    successor.entity_name = old.entity_name.clone();
    successor.registration_number = old.registration_number.clone();
    successor.duration = old.duration.clone();
    successor.filing_storage_link = old.filing_storage_link.clone();
    successor.compliance_page_link = old.compliance_page_link.clone();
    successor.password_manager_link = old.password_manager_link.clone();
    successor.submitted_on = Some(now);
    successor.filing_date = Some(now);

    let successor = create_submission(submissions, clock, user, successor).await?;
    info!(old = %old.id, new = %successor.id, "submission renewed and superseded");

    if let Some(todo_id) = flagged_item {
        disposition::complete(todos, user, todo_id).await?;
    }

    Ok(successor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use comply_core::FixedClock;
    use comply_store::MemoryStore;

    fn day(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_ymd(y, m, d).unwrap()
    }

    fn new_submission() -> NewSubmission {
        let mut new = NewSubmission::bare(
            "Sales and Use Tax Permit",
            JurisdictionCode::parse("CA").unwrap(),
            "CDTFA",
        );
        new.entity_name = Some("Acme LLC".to_string());
        new
    }

    #[tokio::test]
    async fn test_create_defaults_to_active() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(day(2024, 12, 20));
        let user = UserId::new();

        let created = create_submission(&store, &clock, &user, new_submission())
            .await
            .unwrap();
        assert_eq!(created.status, SubmissionStatus::Active);
        assert_eq!(created.created_at, day(2024, 12, 20));
    }

    #[tokio::test]
    async fn test_duplicate_triple_rejected() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(day(2024, 12, 20));
        let user = UserId::new();

        create_submission(&store, &clock, &user, new_submission())
            .await
            .unwrap();
        let result = create_submission(&store, &clock, &user, new_submission()).await;
        assert!(matches!(result, Err(IntakeError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_allowed_for_other_entity() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(day(2024, 12, 20));
        let user = UserId::new();

        create_submission(&store, &clock, &user, new_submission())
            .await
            .unwrap();
        let mut other = new_submission();
        other.entity_name = Some("Beta Corp".to_string());
        assert!(create_submission(&store, &clock, &user, other).await.is_ok());
    }

    #[tokio::test]
    async fn test_from_account_type_prefills() {
        let account_type = AccountType {
            id: AccountTypeId::new(),
            name: "Employer Payroll Tax Account".to_string(),
            jurisdiction: JurisdictionCode::parse("CA").unwrap(),
            agency: "EDD".to_string(),
            description: None,
            required_fields: None,
            default_duration: Some("3".to_string()),
            is_active: true,
        };
        let new = NewSubmission::from_account_type(&account_type);
        assert_eq!(new.compliance_type, "Employer Payroll Tax Account");
        assert_eq!(new.agency, "EDD");
        assert_eq!(new.duration, Some("3".to_string()));
        assert_eq!(new.account_type_id, Some(account_type.id));
    }

    #[tokio::test]
    async fn test_renew_supersedes_old_submission() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(day(2024, 12, 20));
        let user = UserId::new();

        let old = create_submission(&store, &clock, &user, new_submission())
            .await
            .unwrap();
        let successor = renew(&store, &store, &clock, &user, &old.id, None)
            .await
            .unwrap();

        let old = store.get_submission(&user, &old.id).await.unwrap();
        assert_eq!(old.status, SubmissionStatus::Obsolete);
        assert_eq!(successor.status, SubmissionStatus::Active);
        assert_eq!(successor.filing_date, Some(day(2024, 12, 20)));
        assert_eq!(successor.compliance_type, "Sales and Use Tax Permit");

        // Exactly one non-OBSOLETE submission remains for the triple.
        let all = store.list_submissions(&user).await.unwrap();
        let open: Vec<_> = all
            .iter()
            .filter(|s| s.status != SubmissionStatus::Obsolete)
            .collect();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, successor.id);
    }
}
