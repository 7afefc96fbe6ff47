//! Integration tests for `SourceLoader::load_all`.
//!
//! Each test stands up a `wiremock` server so no real network traffic is
//! made. Covers precedence ordering, partial and total failure, non-2xx
//! statuses and file-backed sources.

use std::path::PathBuf;

use heero_core::{LocationType, SourceConfig, SourceKind};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use heero_loader::{LoaderError, SourceLoader};

const SHEET_CSV: &str = "Category,Name,Address,Latitude,Longitude,Website,Rating,Review Count,Subcategories,Phone Number,City\n\
Tyre Shop,Reifen Meier,Hauptstrasse 5,47.05,8.30,,4.2,12,,041 123 45 67,Luzern\n\
Bosch Car Service,Garage Keller,Industriestrasse 9,47.50,8.72,,,,,,Winterthur\n";

fn url_source(name: &str, kind: SourceKind, url: String, category: Option<LocationType>) -> SourceConfig {
    SourceConfig {
        name: name.to_owned(),
        kind,
        url: Some(url),
        path: None,
        category,
        id_prefix: None,
    }
}

fn geojson_body(name: &str, lng: f64, lat: f64) -> serde_json::Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "Company_Name": name, "City": "Zurich" },
            "geometry": { "type": "Point", "coordinates": [lng, lat] }
        }]
    })
}

fn test_loader(sources: Vec<SourceConfig>) -> SourceLoader {
    SourceLoader::new(sources, 5, "heero-test/0.1").expect("failed to build test SourceLoader")
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn load_all_orders_records_by_priority() {
    let server = MockServer::start().await;
    mount(&server, "/sheet.csv", ResponseTemplate::new(200).set_body_string(SHEET_CSV)).await;
    mount(
        &server,
        "/hubs.geojson",
        ResponseTemplate::new(200).set_body_json(geojson_body("HEERO Hub Basel", 7.59, 47.56)),
    )
    .await;
    mount(
        &server,
        "/excellence.geojson",
        ResponseTemplate::new(200).set_body_json(geojson_body("HEERO Motors Zurich", 8.54, 47.38)),
    )
    .await;

    // Deliberately listed lowest precedence first.
    let loader = test_loader(vec![
        url_source("sheet", SourceKind::SheetCsv, format!("{}/sheet.csv", server.uri()), None),
        url_source(
            "hubs",
            SourceKind::Geojson,
            format!("{}/hubs.geojson", server.uri()),
            Some(LocationType::CertifiedHub),
        ),
        url_source(
            "excellence",
            SourceKind::Geojson,
            format!("{}/excellence.geojson", server.uri()),
            Some(LocationType::ServiceExcellence),
        ),
    ]);

    let records = loader.load_all().await.expect("load_all should succeed");
    let types: Vec<LocationType> = records.iter().map(|r| r.location_type).collect();
    assert_eq!(
        types,
        [
            LocationType::ServiceExcellence,
            LocationType::CertifiedHub,
            LocationType::Bosch,
            LocationType::Other,
        ]
    );
    assert_eq!(records[0].id, "service_excellence-location-0");
    assert_eq!(records[3].category, "Tyre Shop");
    assert_eq!(records[3].review_count, Some(12));
    assert!(records
        .windows(2)
        .all(|w| w[0].priority() <= w[1].priority()));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failing_source_is_skipped() {
    let server = MockServer::start().await;
    mount(&server, "/sheet.csv", ResponseTemplate::new(200).set_body_string(SHEET_CSV)).await;
    mount(&server, "/bosch.geojson", ResponseTemplate::new(500)).await;

    let loader = test_loader(vec![
        url_source("sheet", SourceKind::SheetCsv, format!("{}/sheet.csv", server.uri()), None),
        url_source(
            "bosch",
            SourceKind::Geojson,
            format!("{}/bosch.geojson", server.uri()),
            Some(LocationType::Bosch),
        ),
    ]);

    let records = loader.load_all().await.expect("partial failure still loads");
    assert_eq!(records.len(), 2, "sheet rows survive a failed sibling");
}

#[tokio::test]
async fn all_sources_failing_is_an_error() {
    let server = MockServer::start().await;
    mount(&server, "/a.csv", ResponseTemplate::new(404)).await;
    mount(
        &server,
        "/b.geojson",
        ResponseTemplate::new(200).set_body_string("{not json"),
    )
    .await;

    let loader = test_loader(vec![
        url_source("a", SourceKind::SheetCsv, format!("{}/a.csv", server.uri()), None),
        url_source(
            "b",
            SourceKind::Geojson,
            format!("{}/b.geojson", server.uri()),
            Some(LocationType::Mercedes),
        ),
    ]);

    let err = loader.load_all().await.unwrap_err();
    match err {
        LoaderError::AllSourcesFailed { failures } => {
            assert_eq!(failures.len(), 2);
            let a = failures.iter().find(|f| f.source_name == "a").expect("a failed");
            assert!(a.reason.contains("404"));
            assert!(!a.parse_error, "a 404 is a fetch failure");
            let b = failures.iter().find(|f| f.source_name == "b").expect("b failed");
            assert!(b.parse_error, "malformed JSON is a parse failure");
        }
        other => panic!("expected AllSourcesFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn non_success_status_is_reported_per_source() {
    let server = MockServer::start().await;
    mount(&server, "/gone.csv", ResponseTemplate::new(503)).await;

    let source = url_source("gone", SourceKind::SheetCsv, format!("{}/gone.csv", server.uri()), None);
    let loader = test_loader(vec![]);
    let err = loader.load_source(&source).await.unwrap_err();
    assert!(
        matches!(err, LoaderError::HttpStatus { status: 503, .. }),
        "expected HttpStatus 503, got: {err:?}"
    );
}

#[tokio::test]
async fn empty_source_counts_as_success() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/empty.geojson",
        ResponseTemplate::new(200).set_body_json(json!({"type": "FeatureCollection", "features": []})),
    )
    .await;

    let loader = test_loader(vec![url_source(
        "empty",
        SourceKind::Geojson,
        format!("{}/empty.geojson", server.uri()),
        Some(LocationType::Bosch),
    )]);
    let records = loader.load_all().await.expect("empty source is not a failure");
    assert!(records.is_empty());
}

// ---------------------------------------------------------------------------
// File-backed sources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reads_embedded_csv_from_disk() {
    let dir = std::env::temp_dir().join(format!("heero-loader-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join("embedded.csv");
    std::fs::write(
        &file,
        "City,Website,Address,Latitude,Longitude,Rating,Review Count,Category,Subcategories,Name,Phone Number\n\
Zurich,,Bahnhofstrasse 1,47.3769,8.5417,,,,,Bosch Service,555-1234\n",
    )
    .unwrap();

    let source = SourceConfig {
        name: "embedded".to_owned(),
        kind: SourceKind::EmbeddedCsv,
        url: None,
        path: Some(PathBuf::from("embedded.csv")),
        category: None,
        id_prefix: None,
    };
    let loader = test_loader(vec![source]).with_base_dir(&dir);
    let records = loader.load_all().await.expect("file source loads");
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].location_type, LocationType::Bosch);
    assert_eq!(records[0].company_name.as_deref(), Some("Bosch Service"));
}

#[tokio::test]
async fn missing_file_is_an_io_failure() {
    let source = SourceConfig {
        name: "missing".to_owned(),
        kind: SourceKind::Geojson,
        url: None,
        path: Some(PathBuf::from("/definitely/not/here.geojson")),
        category: Some(LocationType::Bosch),
        id_prefix: None,
    };
    let loader = test_loader(vec![]);
    let err = loader.load_source(&source).await.unwrap_err();
    assert!(matches!(err, LoaderError::Io { .. }));
}
