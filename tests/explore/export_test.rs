// tests/explore/export_test.rs
#[path = "../common/mod.rs"]
mod common;

use common::explorer;
use wetland_explorer::explore::{ChartType, ExploreError, ExportFormat, QueryRequest};

fn threats_by_site(chart_type: ChartType) -> QueryRequest {
    QueryRequest::new("threats", "threat__name", chart_type).with_y_field("site__name")
}

#[test]
fn test_csv_export() {
    let export = explorer()
        .export(&threats_by_site(ChartType::Table), ExportFormat::Csv)
        .unwrap();

    assert_eq!(export.content_type, "text/csv; charset=utf-8");
    assert_eq!(export.file_name, "threats_export.csv");

    let lines: Vec<_> = export.body.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "threat__name,site__name");
    assert_eq!(lines[1], "Surpêche,Parc National du Banc d'Arguin");
    assert!(export.body.starts_with("threat__name,site__name\r\n"));
}

#[test]
fn test_export_ignores_chart_type() {
    let explorer = explorer();
    let as_table = explorer
        .export(&threats_by_site(ChartType::Table), ExportFormat::Csv)
        .unwrap();
    let as_bar = explorer
        .export(&threats_by_site(ChartType::Bar), ExportFormat::Csv)
        .unwrap();
    assert_eq!(as_table, as_bar);
}

#[test]
fn test_json_export() {
    let export = explorer()
        .export(&threats_by_site(ChartType::Table), ExportFormat::Json)
        .unwrap();

    assert_eq!(export.content_type, "application/json");
    assert_eq!(export.file_name, "threats_export.json");

    let rows: Vec<serde_json::Map<String, serde_json::Value>> =
        serde_json::from_str(&export.body).unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["threat__name"], "Surpêche");
}

#[test]
fn test_csv_export_quotes_and_blanks() {
    let request = QueryRequest::new("wetland_sites", "name", ChartType::Table)
        .with_y_field("commune")
        .with_group_by("is_ramsar_site");
    let export = explorer().export(&request, ExportFormat::Csv).unwrap();
    let lines: Vec<_> = export.body.split("\r\n").collect();

    assert_eq!(lines[0], "name,commune,is_ramsar_site");
    assert_eq!(lines[1], "Parc National du Banc d'Arguin,Nouamghar,true");
    // Gâat Mahmoudé has no commune.
    assert_eq!(lines[5], "Gâat Mahmoudé,,true");
    assert_eq!(lines[6], "Lac d'Aleg,Aleg,false");
}

#[test]
fn test_export_validates_like_execute() {
    let explorer = explorer();
    let request = QueryRequest::new("threats", "nonexistent_field", ChartType::Table);
    assert!(matches!(
        explorer.export(&request, ExportFormat::Csv),
        Err(ExploreError::InvalidField { .. })
    ));

    let request = QueryRequest::new("users", "name", ChartType::Table);
    assert!(matches!(
        explorer.export(&request, ExportFormat::Json),
        Err(ExploreError::InvalidSource(_))
    ));
}

#[test]
fn test_export_format_parsing() {
    assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
    assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
    assert!("xlsx".parse::<ExportFormat>().is_err());
    assert_eq!(ExportFormat::default(), ExportFormat::Csv);
}
