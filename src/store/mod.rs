pub mod csv;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::LicenseRecord;

/// Where classified licenses live. The whole table is the unit of read
/// and write; there is no partial or append path.
#[async_trait]
pub trait LicenseStore: Send + Sync {
    /// Read every record in table order. `None` when no table exists yet.
    async fn load(&self) -> Result<Option<Vec<LicenseRecord>>>;

    /// Replace the whole table with `records`.
    async fn save(&self, records: &[LicenseRecord]) -> Result<()>;
}
