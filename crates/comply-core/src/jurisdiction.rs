//! # Jurisdiction Types
//!
//! Defines the validated jurisdiction code and the scope reference data
//! that describes which codes exist and at what level of government.
//!
//! A jurisdiction code is the short uppercase identifier a submission or
//! account type is keyed by — a two-letter state code (`CA`, `NY`), `US`
//! for federal, or a longer code for a city or county scope. Codes are
//! case-insensitive on input and stored uppercase.

use serde::{Deserialize, Serialize};

use crate::error::ComplyError;

/// A validated jurisdiction code: 2–10 ASCII alphanumeric characters,
/// normalized to uppercase at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JurisdictionCode(String);

impl JurisdictionCode {
    /// Parse and normalize a jurisdiction code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty, longer than 10 characters,
    /// or contains non-alphanumeric characters.
    pub fn parse(code: &str) -> Result<Self, ComplyError> {
        let trimmed = code.trim();
        if trimmed.len() < 2 || trimmed.len() > 10 {
            return Err(ComplyError::Validation(format!(
                "jurisdiction code must be 2-10 characters, got {:?}",
                code
            )));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ComplyError::Validation(format!(
                "jurisdiction code must be alphanumeric, got {:?}",
                code
            )));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The normalized uppercase code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JurisdictionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Level of government a jurisdiction scope belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeType {
    /// Federal scope (`US`).
    Federal,
    /// US state scope.
    State,
    /// City scope.
    City,
    /// County scope.
    County,
}

impl std::fmt::Display for ScopeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Federal => "FEDERAL",
            Self::State => "STATE",
            Self::City => "CITY",
            Self::County => "COUNTY",
        };
        f.write_str(s)
    }
}

/// Reference entry describing one valid jurisdiction scope.
///
/// Scopes are static reference data surfaced to users as a lookup guide;
/// they are not user-owned and nothing in the stack mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceScope {
    /// The jurisdiction code this scope is addressed by.
    pub code: JurisdictionCode,
    /// Human-readable name (e.g., "California").
    pub name: String,
    /// Level of government.
    pub scope_type: ScopeType,
    /// Whether the scope is currently offered.
    pub is_active: bool,
}

/// The active scope matching a code, looked up case-insensitively.
pub fn find_scope<'a>(scopes: &'a [ComplianceScope], code: &str) -> Option<&'a ComplianceScope> {
    let code = code.trim().to_ascii_uppercase();
    scopes
        .iter()
        .find(|s| s.is_active && s.code.as_str() == code)
}

/// Active scopes at the given level, ordered by name.
pub fn scopes_by_type(scopes: &[ComplianceScope], scope_type: ScopeType) -> Vec<&ComplianceScope> {
    let mut matches: Vec<&ComplianceScope> = scopes
        .iter()
        .filter(|s| s.is_active && s.scope_type == scope_type)
        .collect();
    matches.sort_by(|a, b| a.name.cmp(&b.name));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(code: &str, name: &str, scope_type: ScopeType) -> ComplianceScope {
        ComplianceScope {
            code: JurisdictionCode::parse(code).unwrap(),
            name: name.to_string(),
            scope_type,
            is_active: true,
        }
    }

    fn guide() -> Vec<ComplianceScope> {
        let mut retired = scope("PR", "Puerto Rico", ScopeType::State);
        retired.is_active = false;
        vec![
            scope("US", "Federal", ScopeType::Federal),
            scope("NY", "New York", ScopeType::State),
            scope("CA", "California", ScopeType::State),
            scope("NYC", "New York City", ScopeType::City),
            retired,
        ]
    }

    #[test]
    fn test_parse_uppercases() {
        let code = JurisdictionCode::parse("ca").unwrap();
        assert_eq!(code.as_str(), "CA");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let code = JurisdictionCode::parse(" NY ").unwrap();
        assert_eq!(code.as_str(), "NY");
    }

    #[test]
    fn test_parse_accepts_federal_and_long_codes() {
        assert!(JurisdictionCode::parse("US").is_ok());
        assert!(JurisdictionCode::parse("NYC").is_ok());
    }

    #[test]
    fn test_parse_rejects_bad_codes() {
        assert!(JurisdictionCode::parse("").is_err());
        assert!(JurisdictionCode::parse("C").is_err());
        assert!(JurisdictionCode::parse("ABCDEFGHIJK").is_err());
        assert!(JurisdictionCode::parse("C-A").is_err());
    }

    #[test]
    fn test_find_scope_case_insensitive() {
        let scopes = guide();
        assert_eq!(find_scope(&scopes, "ca").unwrap().name, "California");
        assert_eq!(find_scope(&scopes, " NYC ").unwrap().name, "New York City");
    }

    #[test]
    fn test_find_scope_skips_inactive() {
        let scopes = guide();
        assert!(find_scope(&scopes, "PR").is_none());
        assert!(find_scope(&scopes, "ZZ").is_none());
    }

    #[test]
    fn test_scopes_by_type_sorted_active_only() {
        let scopes = guide();
        let names: Vec<&str> = scopes_by_type(&scopes, ScopeType::State)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["California", "New York"]);
    }

    #[test]
    fn test_scope_type_serializes_screaming() {
        let json = serde_json::to_string(&ScopeType::Federal).unwrap();
        assert_eq!(json, "\"FEDERAL\"");
    }
}
