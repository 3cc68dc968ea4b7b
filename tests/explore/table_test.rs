// tests/explore/table_test.rs
#[path = "../common/mod.rs"]
mod common;

use common::{add_many_threat_links, demo_store, explorer, registry, table};
use serde_json::json;
use wetland_explorer::explore::{ChartType, Explorer, QueryRequest, TABLE_ROW_CAP};

fn threats_by_site() -> QueryRequest {
    QueryRequest::new("threats", "threat__name", ChartType::Table).with_y_field("site__name")
}

#[test]
fn test_threat_site_table() {
    let result = table(explorer().execute(&threats_by_site()).unwrap());

    assert_eq!(result.chart_type, ChartType::Table);
    assert_eq!(result.columns, vec!["threat__name", "site__name"]);
    assert_eq!(result.data.len(), 10);

    let first = &result.data[0];
    assert_eq!(first["threat__name"], json!("Surpêche"));
    assert_eq!(first["site__name"], json!("Parc National du Banc d'Arguin"));
    for row in &result.data {
        assert_eq!(row.len(), 2);
    }
}

#[test]
fn test_table_rows_are_capped() {
    let store = demo_store();
    add_many_threat_links(&store);
    let explorer = Explorer::new(registry(), store);

    let result = table(explorer.execute(&threats_by_site()).unwrap());
    assert_eq!(result.data.len(), TABLE_ROW_CAP as usize);
    // The first rows are still the demo links, in record order.
    assert_eq!(result.data[0]["threat__name"], json!("Surpêche"));
}

#[test]
fn test_group_by_adds_a_column() {
    let request = threats_by_site().with_group_by("intensity");
    let result = table(explorer().execute(&request).unwrap());
    assert_eq!(result.columns, vec!["threat__name", "site__name", "intensity"]);
    assert_eq!(result.data[0]["intensity"], json!("Élevée"));
    // Site 7 reported its threat without an intensity.
    assert_eq!(result.data[9]["intensity"], json!(null));
}

#[test]
fn test_repeated_column_is_listed_once() {
    let request = QueryRequest::new("wetland_sites", "name", ChartType::Table)
        .with_y_field("name")
        .with_group_by("name");
    let result = table(explorer().execute(&request).unwrap());
    assert_eq!(result.columns, vec!["name"]);
    assert_eq!(result.data.len(), 7);
}

#[test]
fn test_table_values_keep_their_types() {
    let request = QueryRequest::new("wetland_sites", "name", ChartType::Table)
        .with_y_field("area_hectares")
        .with_group_by("is_ramsar_site");
    let result = table(explorer().execute(&request).unwrap());

    let arguin = &result.data[0];
    assert_eq!(arguin["name"], json!("Parc National du Banc d'Arguin"));
    assert_eq!(arguin["area_hectares"], json!(1200000.0));
    assert_eq!(arguin["is_ramsar_site"], json!(true));

    let aleg = &result.data[5];
    assert_eq!(aleg["area_hectares"], json!(null));
    assert_eq!(aleg["is_ramsar_site"], json!(false));
}

#[test]
fn test_count_column_groups_rows() {
    let request = QueryRequest::new("wetland_sites", "region", ChartType::Table)
        .with_y_field("species_count");
    let result = table(explorer().execute(&request).unwrap());

    assert_eq!(result.columns, vec!["region", "species_count"]);
    let rows: Vec<_> = result
        .data
        .iter()
        .map(|row| (row["region"].clone(), row["species_count"].clone()))
        .collect();
    assert_eq!(
        rows,
        vec![
            (json!("Assaba"), json!(1)),
            (json!("Brakna"), json!(1)),
            (json!("Dakhlet Nouadhibou"), json!(5)),
            (json!("Hodh Ech Chargui"), json!(2)),
            (json!("Trarza"), json!(4)),
        ]
    );
}

#[test]
fn test_table_accepts_any_y_field() {
    // Text fields are fine as table columns even though they cannot be summed.
    let request = QueryRequest::new("wetland_sites", "region", ChartType::Table)
        .with_y_field("designation_date");
    let result = table(explorer().execute(&request).unwrap());
    assert_eq!(result.data.len(), 7);
    assert_eq!(result.data[0]["designation_date"], json!("1982-10-22"));
}

#[test]
fn test_filtered_table() {
    let request = threats_by_site().with_filter("site__region", "Trarza");
    let result = table(explorer().execute(&request).unwrap());
    let threats: Vec<_> = result.data.iter().map(|row| row["threat__name"].clone()).collect();
    assert_eq!(
        threats,
        vec![json!("Ensablement"), json!("Sécheresse"), json!("Ensablement")]
    );
}

#[test]
fn test_table_json_shape() {
    let request = QueryRequest::new("taxonomic_groups", "name", ChartType::Table)
        .with_filter("name", "Reptiles");
    let result = explorer().execute(&request).unwrap();
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "chart_type": "table",
            "data": [{"name": "Reptiles"}],
            "columns": ["name"]
        })
    );
}
