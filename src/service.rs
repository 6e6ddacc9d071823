//! Read, summarize, and correct classified licenses.
//!
//! Every operation loads the table fresh from the store; nothing is cached
//! between calls.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Result, ServiceError};
use crate::model::{Category, CategorySummary, LicenseRecord, LicenseUpdate};
use crate::store::LicenseStore;

pub struct LicenseService {
    store: Arc<dyn LicenseStore>,
}

impl LicenseService {
    pub fn new(store: Arc<dyn LicenseStore>) -> Self {
        Self { store }
    }

    /// All records in table order. Empty when no table exists yet.
    pub async fn list_all(&self) -> Result<Vec<LicenseRecord>> {
        Ok(self.store.load().await?.unwrap_or_default())
    }

    /// One entry per category present, ordered by category name.
    pub async fn summarize(&self) -> Result<Vec<CategorySummary>> {
        Ok(summarize(&self.list_all().await?))
    }

    /// Apply a manual correction and persist the whole table.
    ///
    /// Nothing is written when the table or the id is missing.
    pub async fn update(&self, license_id: i64, update: LicenseUpdate) -> Result<LicenseRecord> {
        let mut records = self
            .store
            .load()
            .await?
            .ok_or_else(|| ServiceError::NotFound("No licenses found".to_string()))?;

        let record = records
            .iter_mut()
            .find(|r| r.license_id == license_id)
            .ok_or_else(|| ServiceError::NotFound("License not found".to_string()))?;
        record.apply(update);
        let updated = record.clone();

        self.store.save(&records).await?;
        tracing::info!(license_id, category = %updated.category, "license manually validated");
        Ok(updated)
    }
}

/// Group by category, counting records and validated records.
pub fn summarize(records: &[LicenseRecord]) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<&'static str, (Category, u64, u64)> = BTreeMap::new();
    for record in records {
        let entry = groups
            .entry(record.category.as_str())
            .or_insert((record.category, 0, 0));
        entry.1 += 1;
        if record.manually_validated {
            entry.2 += 1;
        }
    }
    groups
        .into_values()
        .map(|(category, count, validated_count)| CategorySummary {
            category,
            count,
            validated_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: i64, category: Category, validated: bool) -> LicenseRecord {
        LicenseRecord {
            license_id: id,
            license_description: format!("license {id}"),
            category,
            explanation: String::new(),
            manually_validated: validated,
        }
    }

    #[test]
    fn summarize_empty_is_empty() {
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn summarize_counts_per_category() {
        let records = vec![
            rec(1, Category::Productivity, true),
            rec(2, Category::Finance, false),
            rec(3, Category::Productivity, false),
            rec(4, Category::Productivity, true),
        ];
        let summary = summarize(&records);
        assert_eq!(
            summary,
            vec![
                CategorySummary {
                    category: Category::Finance,
                    count: 1,
                    validated_count: 0,
                },
                CategorySummary {
                    category: Category::Productivity,
                    count: 3,
                    validated_count: 2,
                },
            ]
        );
    }

    #[test]
    fn summarize_orders_by_category_name() {
        let records = vec![
            rec(1, Category::Marketing, false),
            rec(2, Category::Communication, false),
            rec(3, Category::Design, false),
        ];
        let names: Vec<_> = summarize(&records)
            .into_iter()
            .map(|s| s.category.as_str())
            .collect();
        assert_eq!(names, vec!["Communication", "Design", "Marketing"]);
    }
}
