use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use license_classifier::error::ServiceError;
use license_classifier::model::{Category, LicenseRecord, LicenseUpdate};
use license_classifier::service::LicenseService;
use license_classifier::store::LicenseStore;
use license_classifier::store::csv::CsvStore;

fn record(id: i64, category: Category, validated: bool) -> LicenseRecord {
    LicenseRecord {
        license_id: id,
        license_description: format!("license {id}"),
        category,
        explanation: format!("explanation {id}"),
        manually_validated: validated,
    }
}

/// Helper: a service over a CSV table in a fresh temp dir.
fn temp_service() -> (LicenseService, Arc<CsvStore>, PathBuf, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classified.csv");
    let store = Arc::new(CsvStore::new(&path));
    let service = LicenseService::new(store.clone());
    (service, store, path, dir)
}

fn update(category: Category, explanation: &str) -> LicenseUpdate {
    LicenseUpdate {
        category,
        explanation: explanation.to_string(),
    }
}

// ── list_all ──────────────────────────────────────────────────────

#[tokio::test]
async fn list_all_without_table_is_empty() {
    let (service, _store, _path, _dir) = temp_service();
    assert!(service.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_all_returns_stored_records() {
    let (service, store, _path, _dir) = temp_service();
    let records = vec![
        record(1, Category::Productivity, false),
        record(2, Category::Design, true),
    ];
    store.save(&records).await.unwrap();

    assert_eq!(service.list_all().await.unwrap(), records);
}

#[tokio::test]
async fn list_all_sees_external_changes() {
    let (service, store, _path, _dir) = temp_service();
    store.save(&[record(1, Category::Finance, false)]).await.unwrap();
    assert_eq!(service.list_all().await.unwrap().len(), 1);

    store
        .save(&[
            record(1, Category::Finance, false),
            record(2, Category::Finance, false),
        ])
        .await
        .unwrap();
    assert_eq!(service.list_all().await.unwrap().len(), 2);
}

// ── summarize ─────────────────────────────────────────────────────

#[tokio::test]
async fn summarize_without_table_is_empty() {
    let (service, _store, _path, _dir) = temp_service();
    assert!(service.summarize().await.unwrap().is_empty());
}

#[tokio::test]
async fn summarize_counts_sum_to_total() {
    let (service, store, _path, _dir) = temp_service();
    let records = vec![
        record(1, Category::Productivity, false),
        record(2, Category::Productivity, true),
        record(3, Category::Development, false),
        record(4, Category::Marketing, true),
        record(5, Category::Development, true),
    ];
    store.save(&records).await.unwrap();

    let summary = service.summarize().await.unwrap();
    assert_eq!(summary.len(), 3);
    assert_eq!(summary.iter().map(|s| s.count).sum::<u64>(), 5);
    assert_eq!(summary.iter().map(|s| s.validated_count).sum::<u64>(), 3);

    let dev = summary
        .iter()
        .find(|s| s.category == Category::Development)
        .unwrap();
    assert_eq!(dev.count, 2);
    assert_eq!(dev.validated_count, 1);
}

// ── update ────────────────────────────────────────────────────────

#[tokio::test]
async fn update_sets_fields_and_persists() {
    let (service, store, _path, _dir) = temp_service();
    store
        .save(&[
            record(1, Category::Finance, false),
            record(2, Category::Design, false),
        ])
        .await
        .unwrap();

    let updated = service
        .update(2, update(Category::Marketing, "Corrected by hand"))
        .await
        .unwrap();
    assert_eq!(updated.license_id, 2);
    assert_eq!(updated.license_description, "license 2");
    assert_eq!(updated.category, Category::Marketing);
    assert_eq!(updated.explanation, "Corrected by hand");
    assert!(updated.manually_validated);

    let listed = service.list_all().await.unwrap();
    assert_eq!(listed[1], updated);
    assert_eq!(listed[0], record(1, Category::Finance, false));
}

#[tokio::test]
async fn update_unknown_id_is_not_found_and_leaves_file_untouched() {
    let (service, store, path, _dir) = temp_service();
    store.save(&[record(1, Category::Finance, false)]).await.unwrap();
    let before = fs::read(&path).unwrap();

    let err = service
        .update(999, update(Category::Design, "nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(msg) if msg == "License not found"));
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[tokio::test]
async fn update_without_table_is_not_found_and_creates_nothing() {
    let (service, _store, path, _dir) = temp_service();

    let err = service
        .update(1, update(Category::Design, "nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(msg) if msg == "No licenses found"));
    assert!(!path.exists());
}

#[tokio::test]
async fn validated_flag_survives_later_updates() {
    let (service, store, _path, _dir) = temp_service();
    store.save(&[record(1, Category::Finance, false)]).await.unwrap();

    service
        .update(1, update(Category::Design, "first"))
        .await
        .unwrap();
    let second = service
        .update(1, update(Category::Finance, "second"))
        .await
        .unwrap();

    assert!(second.manually_validated);
    assert_eq!(second.category, Category::Finance);
    assert_eq!(service.summarize().await.unwrap()[0].validated_count, 1);
}
