use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::LicenseStore;
use crate::error::{Result, ServiceError};
use crate::model::{Category, InputRow, LicenseRecord};

/// CSV-backed output table. Every save rewrites the file from scratch.
///
/// No locking: two concurrent read-modify-write cycles against the same
/// file can lose an update.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LicenseStore for CsvStore {
    async fn load(&self) -> Result<Option<Vec<LicenseRecord>>> {
        let mut reader = match csv::Reader::from_path(&self.path) {
            Ok(reader) => reader,
            Err(e) if is_not_found(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let records = reader
            .deserialize::<StoredRow>()
            .map(|row| row.map(LicenseRecord::from))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Some(records))
    }

    async fn save(&self, records: &[LicenseRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        // Header goes out even for an empty table so readers always see the columns.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        writer.write_record(OUTPUT_COLUMNS)?;
        for record in records {
            writer.serialize(StoredRow::from(record.clone()))?;
        }
        writer.flush()?;
        tracing::debug!(path = %self.path.display(), rows = records.len(), "wrote license table");
        Ok(())
    }
}

/// Column order of the output table. Must match [`StoredRow`].
pub const OUTPUT_COLUMNS: [&str; 5] = [
    "license_id",
    "license_description",
    "category",
    "explanation",
    "manually_validated",
];

/// Read the unclassified input table (`License ID`, `License Description`).
pub fn read_input(path: &Path) -> Result<Vec<InputRow>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        ServiceError::Storage(format!("cannot read input table {}: {e}", path.display()))
    })?;
    let rows = reader
        .deserialize::<InputRow>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn is_not_found(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(e) if e.kind() == io::ErrorKind::NotFound)
}

/// On-disk row. Identical to [`LicenseRecord`] except for the boolean
/// encoding, which follows the existing data files (`True`/`False`).
#[derive(Serialize, Deserialize)]
struct StoredRow {
    license_id: i64,
    license_description: String,
    category: Category,
    explanation: String,
    #[serde(with = "titlecase_bool", default)]
    manually_validated: bool,
}

impl From<LicenseRecord> for StoredRow {
    fn from(r: LicenseRecord) -> Self {
        Self {
            license_id: r.license_id,
            license_description: r.license_description,
            category: r.category,
            explanation: r.explanation,
            manually_validated: r.manually_validated,
        }
    }
}

impl From<StoredRow> for LicenseRecord {
    fn from(r: StoredRow) -> Self {
        Self {
            license_id: r.license_id,
            license_description: r.license_description,
            category: r.category,
            explanation: r.explanation,
            manually_validated: r.manually_validated,
        }
    }
}

mod titlecase_bool {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(if *value { "True" } else { "False" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(d)?;
        match raw.trim() {
            "True" | "true" | "TRUE" | "1" => Ok(true),
            "False" | "false" | "FALSE" | "0" | "" => Ok(false),
            other => Err(D::Error::custom(format!("invalid boolean '{other}'"))),
        }
    }
}
