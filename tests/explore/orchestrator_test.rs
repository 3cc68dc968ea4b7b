// tests/explore/orchestrator_test.rs
#[path = "../common/mod.rs"]
mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use common::{chart, demo_store, explorer, registry, BrokenStore, CountingStore};
use wetland_explorer::explore::{ChartType, ExploreError, Explorer, QueryRequest};
use wetland_explorer::registry::SemanticType;
use wetland_explorer::store::{RecordStore, SqliteStore};

#[test]
fn test_list_sources_with_record_counts() {
    let sources = explorer().list_sources().unwrap();
    let counts: HashMap<_, _> = sources
        .iter()
        .map(|s| (s.id.as_str(), s.record_count))
        .collect();

    assert_eq!(sources.len(), 6);
    assert_eq!(counts["wetland_sites"], 7);
    assert_eq!(counts["species"], 8);
    assert_eq!(counts["observations"], 10);
    assert_eq!(counts["threats"], 10);
    assert_eq!(counts["conservation_measures"], 9);
    assert_eq!(counts["taxonomic_groups"], 4);
    assert_eq!(sources[0].id, "wetland_sites");
    assert_eq!(sources[0].icon, "fas fa-water");
}

#[test]
fn test_list_fields() {
    let explorer = explorer();
    let fields = explorer.list_fields("species");
    assert_eq!(fields[0].id, "scientific_name");
    assert_eq!(fields[0].semantic_type, SemanticType::Text);
    assert!(fields
        .iter()
        .any(|f| f.id == "taxonomic_group__name" && f.semantic_type == SemanticType::Categorical));

    assert!(explorer.list_fields("users").is_empty());
}

#[test]
fn test_field_summary_json() {
    let fields = explorer().list_fields("taxonomic_groups");
    assert_eq!(
        serde_json::to_value(&fields[0]).unwrap(),
        serde_json::json!({"id": "name", "name": "Group name", "type": "categorical"})
    );
}

#[test]
fn test_unknown_source() {
    let request = QueryRequest::new("users", "name", ChartType::Bar);
    let err = explorer().execute(&request).unwrap_err();
    assert!(matches!(err, ExploreError::InvalidSource(ref s) if s == "users"));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_unknown_field_anywhere_is_invalid_field() {
    let explorer = explorer();
    let base = QueryRequest::new("species", "iucn_status", ChartType::Bar);
    let requests = vec![
        QueryRequest::new("species", "nonexistent_field", ChartType::Bar),
        base.clone().with_y_field("nonexistent_field"),
        base.clone().with_group_by("nonexistent_field"),
        base.clone().with_filter("nonexistent_field", "LC"),
        QueryRequest::new("species", "nonexistent_field", ChartType::Table),
    ];
    for request in requests {
        let err = explorer.execute(&request).unwrap_err();
        assert!(
            matches!(err, ExploreError::InvalidField { ref field, .. } if field == "nonexistent_field"),
            "{:?}",
            request
        );
    }
}

#[test]
fn test_validation_happens_before_storage() {
    let explorer = Explorer::new(registry(), CountingStore::new(demo_store()));
    let rejected = vec![
        QueryRequest::new("users", "name", ChartType::Bar),
        QueryRequest::new("species", "nonexistent_field", ChartType::Bar),
        QueryRequest::new("wetland_sites", "region", ChartType::Bar).with_y_field("commune"),
        QueryRequest::new("wetland_sites", "threat_count", ChartType::Bar),
        QueryRequest::new("wetland_sites", "region", ChartType::Bar)
            .with_filter("area_hectares", "vast"),
    ];
    for request in rejected {
        assert!(explorer.execute(&request).unwrap_err().is_validation());
    }
    assert_eq!(explorer.store().fetches(), 0);

    let accepted = QueryRequest::new("wetland_sites", "region", ChartType::Bar);
    explorer.execute(&accepted).unwrap();
    assert!(explorer.store().fetches() > 0);
}

#[test]
fn test_count_field_is_not_a_grouping_axis() {
    let request = QueryRequest::new("wetland_sites", "threat_count", ChartType::Bar);
    let err = explorer().execute(&request).unwrap_err();
    assert_eq!(err.kind(), "invalid_aggregation");
}

#[test]
fn test_storage_failure_is_generic() {
    let explorer = Explorer::new(registry(), BrokenStore);
    let request = QueryRequest::new("wetland_sites", "region", ChartType::Bar);
    let err = explorer.execute(&request).unwrap_err();

    assert!(matches!(err, ExploreError::ExecutionFailed));
    assert_eq!(err.status_code(), 500);
    assert!(!err.is_validation());
    let message = err.to_string();
    assert!(!message.contains("disk"));
    assert!(!message.contains("wetlands.db"));

    assert!(matches!(
        explorer.list_sources(),
        Err(ExploreError::ExecutionFailed)
    ));
}

#[test]
fn test_validation_wins_over_storage_failure() {
    let explorer = Explorer::new(registry(), BrokenStore);
    let request = QueryRequest::new("species", "nonexistent_field", ChartType::Bar);
    assert_eq!(explorer.execute(&request).unwrap_err().kind(), "invalid_field");
}

#[test]
fn test_empty_database() {
    let store = SqliteStore::open_in_memory().unwrap();
    let explorer = Explorer::new(registry(), store);

    let result = chart(
        explorer
            .execute(&QueryRequest::new("wetland_sites", "region", ChartType::Pie))
            .unwrap(),
    );
    assert!(result.labels.is_empty());
    assert!(result.data.is_empty());
    assert_eq!(result.total_records, 0);

    for source in explorer.list_sources().unwrap() {
        assert_eq!(source.record_count, 0, "{}", source.id);
    }
}

#[test]
fn test_execute_is_idempotent() {
    let explorer = explorer();
    let request = QueryRequest::new("observations", "wetland_site__region", ChartType::Bar)
        .with_y_field("count")
        .with_filter("species__iucn_status", "LC");
    let first = explorer.execute(&request).unwrap();
    let second = explorer.execute(&request).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_shared_explorer_serves_threads() {
    let store: Arc<dyn RecordStore> = Arc::new(demo_store());
    let explorer = Arc::new(Explorer::new(registry(), store));
    let expected = explorer
        .execute(&QueryRequest::new("species", "iucn_status", ChartType::Bar))
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let explorer = Arc::clone(&explorer);
            thread::spawn(move || {
                explorer
                    .execute(&QueryRequest::new("species", "iucn_status", ChartType::Bar))
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_request_from_wire_json() {
    let request: QueryRequest = serde_json::from_str(
        r#"{"source": "taxonomic_groups", "x_field": "name", "y_field": "count", "chart_type": "line"}"#,
    )
    .unwrap();
    assert_eq!(request.y_field, None);

    let result = chart(explorer().execute(&request).unwrap());
    assert_eq!(result.chart_type, ChartType::Line);
    assert_eq!(result.total_records, 4);
}
