//! Domain types shared by the batch processor, the service, and the API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of business categories a license can belong to.
///
/// Deserialization is exact and case-sensitive, so any label outside this
/// set is rejected at every boundary (CSV rows, update payloads, model
/// responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Productivity,
    Design,
    Communication,
    Development,
    Finance,
    Marketing,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Productivity,
        Category::Design,
        Category::Communication,
        Category::Development,
        Category::Finance,
        Category::Marketing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Productivity => "Productivity",
            Category::Design => "Design",
            Category::Communication => "Communication",
            Category::Development => "Development",
            Category::Finance => "Finance",
            Category::Marketing => "Marketing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the six category labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid category '{0}', expected one of: Productivity, Design, Communication, Development, Finance, Marketing")]
pub struct InvalidCategory(pub String);

impl FromStr for Category {
    type Err = InvalidCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| InvalidCategory(s.to_string()))
    }
}

/// One classified license, as persisted in the output table and served by
/// the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub license_id: i64,
    pub license_description: String,
    pub category: Category,
    pub explanation: String,
    #[serde(default)]
    pub manually_validated: bool,
}

impl LicenseRecord {
    /// A freshly classified record. Only the batch processor creates these.
    pub fn classified(row: &InputRow, classification: Classification) -> Self {
        Self {
            license_id: row.license_id,
            license_description: row.description.clone(),
            category: classification.category,
            explanation: classification.explanation,
            manually_validated: false,
        }
    }

    /// Apply a manual correction. Always marks the record as validated.
    pub fn apply(&mut self, update: LicenseUpdate) {
        self.category = update.category;
        self.explanation = update.explanation;
        self.manually_validated = true;
    }
}

/// Manual correction payload for `PUT /licenses/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseUpdate {
    pub category: Category,
    pub explanation: String,
}

/// Per-category aggregate. Derived on every request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub count: u64,
    pub validated_count: u64,
}

/// What the classifier returns for a single description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub explanation: String,
}

/// One unclassified license from the input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRow {
    #[serde(rename = "License ID")]
    pub license_id: i64,
    #[serde(rename = "License Description")]
    pub description: String,
}
