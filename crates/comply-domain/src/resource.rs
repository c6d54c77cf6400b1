//! # Resource Guides
//!
//! Static guidance content keyed by jurisdiction and compliance type:
//! what a registration involves, which documents it needs, how often it is
//! filed, what it costs, and where the agency portal lives. Surfaced next
//! to submission forms and flagged items for context.

use comply_core::{JurisdictionCode, ResourceId};
use serde::{Deserialize, Serialize};

/// One guidance entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceGuide {
    /// Unique identifier.
    pub id: ResourceId,
    /// Jurisdiction the guidance applies to.
    pub jurisdiction: JurisdictionCode,
    /// Compliance type the guidance covers (matches
    /// `Submission::compliance_type`).
    pub compliance_type: String,
    /// Guide title.
    pub title: String,
    /// What the registration involves.
    pub description: String,
    /// Documents the agency asks for.
    pub required_documents: Option<String>,
    /// How often the filing recurs.
    pub filing_frequency: Option<String>,
    /// Fee summary.
    pub fees: Option<String>,
    /// Link to the agency portal.
    pub portal_link: Option<String>,
    /// Anything else worth knowing.
    pub additional_notes: Option<String>,
}

/// The guide collection, queried by key or free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceLibrary {
    guides: Vec<ResourceGuide>,
}

impl ResourceLibrary {
    /// Build a library from guide entries.
    pub fn new(guides: Vec<ResourceGuide>) -> Self {
        Self { guides }
    }

    /// Look up a guide by id.
    pub fn get(&self, id: &ResourceId) -> Option<&ResourceGuide> {
        self.guides.iter().find(|g| g.id == *id)
    }

    /// The guide for a (jurisdiction, compliance type) pair, when one
    /// exists.
    pub fn find(
        &self,
        jurisdiction: &JurisdictionCode,
        compliance_type: &str,
    ) -> Option<&ResourceGuide> {
        self.guides
            .iter()
            .find(|g| g.jurisdiction == *jurisdiction && g.compliance_type == compliance_type)
    }

    /// Guides matching the filters, ordered by jurisdiction then
    /// compliance type. The search term matches title or description,
    /// case-insensitively.
    pub fn search(
        &self,
        jurisdiction: Option<&JurisdictionCode>,
        compliance_type: Option<&str>,
        term: Option<&str>,
    ) -> Vec<&ResourceGuide> {
        let needle = term.map(str::to_lowercase);
        let mut matches: Vec<&ResourceGuide> = self
            .guides
            .iter()
            .filter(|g| jurisdiction.map_or(true, |j| g.jurisdiction == *j))
            .filter(|g| compliance_type.map_or(true, |t| g.compliance_type == t))
            .filter(|g| {
                needle.as_deref().map_or(true, |n| {
                    g.title.to_lowercase().contains(n) || g.description.to_lowercase().contains(n)
                })
            })
            .collect();
        matches.sort_by(|a, b| {
            a.jurisdiction
                .as_str()
                .cmp(b.jurisdiction.as_str())
                .then_with(|| a.compliance_type.cmp(&b.compliance_type))
        });
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guide(code: &str, compliance_type: &str, title: &str) -> ResourceGuide {
        ResourceGuide {
            id: ResourceId::new(),
            jurisdiction: JurisdictionCode::parse(code).unwrap(),
            compliance_type: compliance_type.to_string(),
            title: title.to_string(),
            description: "All businesses operating here must register.".to_string(),
            required_documents: None,
            filing_frequency: Some("Annual".to_string()),
            fees: None,
            portal_link: None,
            additional_notes: None,
        }
    }

    fn library() -> ResourceLibrary {
        ResourceLibrary::new(vec![
            guide("NY", "SOS Registration", "New York Business Registration"),
            guide("CA", "SOS Registration", "California Business Registration"),
            guide("CA", "Unemployment Insurance", "California EDD Registration"),
        ])
    }

    #[test]
    fn test_find_by_key() {
        let library = library();
        let ca = JurisdictionCode::parse("CA").unwrap();
        let guide = library.find(&ca, "Unemployment Insurance").unwrap();
        assert_eq!(guide.title, "California EDD Registration");
    }

    #[test]
    fn test_find_missing_key() {
        let library = library();
        let tx = JurisdictionCode::parse("TX").unwrap();
        assert!(library.find(&tx, "SOS Registration").is_none());
    }

    #[test]
    fn test_search_ordering() {
        let library = library();
        let titles: Vec<&str> = library
            .search(None, None, None)
            .iter()
            .map(|g| g.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec![
                "California Business Registration",
                "California EDD Registration",
                "New York Business Registration"
            ]
        );
    }

    #[test]
    fn test_search_term_is_case_insensitive() {
        let library = library();
        let hits = library.search(None, None, Some("edd"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "California EDD Registration");
    }

    #[test]
    fn test_search_term_matches_description() {
        let library = library();
        let hits = library.search(None, None, Some("OPERATING"));
        assert_eq!(hits.len(), 3);
    }
}
