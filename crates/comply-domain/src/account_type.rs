//! # Compliance Account Types — Reference Catalog
//!
//! Static reference data describing the known registration types per
//! jurisdiction: which agency owns them, which submission fields matter
//! for them, and the default renewal cadence used to pre-fill new
//! submissions.
//!
//! The required-field list is stored as serialized JSON (a list of field
//! names), exactly as the backing store holds it. Parsing is lenient by
//! policy: an absent or malformed list means every field is shown, and a
//! field name that matches nothing is simply never required.

use comply_core::{AccountTypeId, JurisdictionCode};
use serde::{Deserialize, Serialize};

/// Submission form fields an account type can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionField {
    /// Legal entity name.
    EntityName,
    /// Agency-issued registration number.
    RegistrationNumber,
    /// Date the submission was recorded.
    SubmittedOn,
    /// Date the filing was made.
    FilingDate,
    /// Date the obligation expires.
    ExpirationDate,
    /// Link to stored filing documents.
    FilingStorageLink,
    /// Link to the agency portal.
    CompliancePageLink,
    /// Link to the password-manager entry.
    PasswordManagerLink,
}

impl SubmissionField {
    /// The field name as stored in a required-field list.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntityName => "entityName",
            Self::RegistrationNumber => "registrationNumber",
            Self::SubmittedOn => "submittedOn",
            Self::FilingDate => "filingDate",
            Self::ExpirationDate => "expirationDate",
            Self::FilingStorageLink => "filingStorageLink",
            Self::CompliancePageLink => "compliancePageLink",
            Self::PasswordManagerLink => "passwordManagerLink",
        }
    }
}

/// Fields shown regardless of what an account type requires. The filing
/// date and storage link stay visible because every submission records
/// where and when it was filed.
const ALWAYS_SHOWN: &[SubmissionField] = &[
    SubmissionField::FilingDate,
    SubmissionField::FilingStorageLink,
];

/// One reference entry in the account-type catalog.
///
/// Immutable from the renewal engine's perspective; consulted only to
/// pre-fill and shape new submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountType {
    /// Unique identifier.
    pub id: AccountTypeId,
    /// Registration type name (e.g., "Employer Payroll Tax Account").
    pub name: String,
    /// Jurisdiction this type exists in.
    pub jurisdiction: JurisdictionCode,
    /// Agency that administers it.
    pub agency: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Serialized JSON list of required field names, as stored.
    pub required_fields: Option<String>,
    /// Default renewal cadence in months, used to pre-fill the duration.
    pub default_duration: Option<String>,
    /// Whether the entry is currently offered.
    pub is_active: bool,
}

impl AccountType {
    /// The parsed required-field list, or `None` when the stored value is
    /// absent or not valid JSON. Unknown names are kept as-is; they never
    /// match a [`SubmissionField`] and so never mark one required.
    pub fn required_field_names(&self) -> Option<Vec<String>> {
        let raw = self.required_fields.as_deref()?;
        serde_json::from_str(raw).ok()
    }

    /// Whether a submission form for this account type should show the
    /// given field. Always-shown fields and any parse failure default to
    /// visible; otherwise the field must appear in the required list.
    pub fn shows_field(&self, field: SubmissionField) -> bool {
        if ALWAYS_SHOWN.contains(&field) {
            return true;
        }
        match self.required_field_names() {
            Some(names) => names.iter().any(|n| n == field.as_str()),
            None => true,
        }
    }
}

/// The full account-type catalog, queried per jurisdiction and agency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountTypeCatalog {
    entries: Vec<AccountType>,
}

impl AccountTypeCatalog {
    /// Build a catalog from reference entries.
    pub fn new(entries: Vec<AccountType>) -> Self {
        Self { entries }
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &AccountTypeId) -> Option<&AccountType> {
        self.entries.iter().find(|t| t.id == *id)
    }

    /// Active entries for a jurisdiction, ordered by name. An agency
    /// narrows the result further when given.
    pub fn for_jurisdiction(
        &self,
        jurisdiction: &JurisdictionCode,
        agency: Option<&str>,
    ) -> Vec<&AccountType> {
        let mut matches: Vec<&AccountType> = self
            .entries
            .iter()
            .filter(|t| t.is_active && t.jurisdiction == *jurisdiction)
            .filter(|t| agency.map_or(true, |a| t.agency == a))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches
    }

    /// The distinct agencies offering types in a jurisdiction, sorted.
    pub fn agencies(&self, jurisdiction: &JurisdictionCode) -> Vec<&str> {
        let mut agencies: Vec<&str> = self
            .entries
            .iter()
            .filter(|t| t.is_active && t.jurisdiction == *jurisdiction)
            .map(|t| t.agency.as_str())
            .collect();
        agencies.sort_unstable();
        agencies.dedup();
        agencies
    }
}
