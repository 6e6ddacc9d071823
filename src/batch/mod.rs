use anyhow::{Context, Result, bail};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::classifier::{Classifier, ClassifyError};
use crate::consts::DEFAULT_TIMEOUT_SECS;
use crate::error::ServiceError;
use crate::model::{InputRow, LicenseRecord};
use crate::store::LicenseStore;
use crate::store::csv::read_input;

/// What to do when one row cannot be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure. Nothing is written.
    #[default]
    Abort,
    /// Log the failure, leave the row out, keep going. A run where every
    /// row fails writes nothing.
    Skip,
}

pub struct BatchConfig {
    pub on_failure: FailurePolicy,
    pub call_timeout: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            on_failure: FailurePolicy::Abort,
            call_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Outcome of a committed batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub classified: usize,
    /// Ids left out under [`FailurePolicy::Skip`], in input order.
    pub skipped: Vec<i64>,
}

/// Classifies an input table row by row and replaces the output table.
pub struct BatchProcessor {
    classifier: Box<dyn Classifier>,
    store: Arc<dyn LicenseStore>,
    config: BatchConfig,
}

impl BatchProcessor {
    pub fn new(
        classifier: Box<dyn Classifier>,
        store: Arc<dyn LicenseStore>,
        config: BatchConfig,
    ) -> Self {
        Self {
            classifier,
            store,
            config,
        }
    }

    /// Read `input` and run [`process`](Self::process) over its rows.
    pub async fn process_file(&self, input: &Path) -> Result<BatchReport> {
        let rows = read_input(input)?;
        tracing::info!(path = %input.display(), rows = rows.len(), "loaded input table");
        self.process(&rows).await
    }

    /// Classify every row in order, one call each, then write the whole
    /// table in one go. Prior output is replaced, not merged.
    pub async fn process(&self, rows: &[InputRow]) -> Result<BatchReport> {
        validate_rows(rows)?;

        let mut records = Vec::with_capacity(rows.len());
        let mut skipped = Vec::new();

        for (i, row) in rows.iter().enumerate() {
            match self.classify_row(row).await {
                Ok(record) => {
                    tracing::info!(
                        index = i + 1,
                        total = rows.len(),
                        license_id = record.license_id,
                        category = %record.category,
                        "classified license"
                    );
                    records.push(record);
                }
                Err(e) => match self.config.on_failure {
                    FailurePolicy::Abort => {
                        return Err(e).with_context(|| {
                            format!("failed to classify license {}", row.license_id)
                        });
                    }
                    FailurePolicy::Skip => {
                        tracing::warn!(license_id = row.license_id, error = %e, "skipping license");
                        skipped.push(row.license_id);
                    }
                },
            }
        }

        if records.is_empty() && !skipped.is_empty() {
            bail!(
                "every license failed to classify ({} skipped); output table left unchanged",
                skipped.len()
            );
        }

        self.store
            .save(&records)
            .await
            .context("failed to write output table")?;

        Ok(BatchReport {
            classified: records.len(),
            skipped,
        })
    }

    /// One classifier call for one row, bounded by the configured timeout.
    pub async fn classify_row(&self, row: &InputRow) -> Result<LicenseRecord, ClassifyError> {
        let timeout = self.config.call_timeout;
        let classification =
            match tokio::time::timeout(timeout, self.classifier.classify(&row.description)).await {
                Ok(result) => result?,
                Err(_) => return Err(ClassifyError::TimedOut(timeout)),
            };
        Ok(LicenseRecord::classified(row, classification))
    }
}

/// Reject inputs that would break table invariants before any external
/// call is made: duplicate ids and blank descriptions.
pub fn validate_rows(rows: &[InputRow]) -> Result<(), ServiceError> {
    let mut seen = HashSet::with_capacity(rows.len());
    for row in rows {
        if !seen.insert(row.license_id) {
            return Err(ServiceError::Validation(format!(
                "duplicate license id {} in input",
                row.license_id
            )));
        }
        if row.description.trim().is_empty() {
            return Err(ServiceError::Validation(format!(
                "license {} has an empty description",
                row.license_id
            )));
        }
    }
    Ok(())
}
