// tests/explore/chart_test.rs
#[path = "../common/mod.rs"]
mod common;

use common::{chart, explorer, values};
use serde_json::json;
use wetland_explorer::explore::{
    ChartType, ExploreError, Explorer, ExplorerLimits, QueryRequest, SeriesValue,
};

#[test]
fn test_species_per_taxonomic_group() {
    let request = QueryRequest::new("taxonomic_groups", "name", ChartType::Bar)
        .with_y_field("species_count");
    let result = chart(explorer().execute(&request).unwrap());

    assert_eq!(
        result.labels,
        vec![
            json!("Oiseaux"),
            json!("Mammifères"),
            json!("Poissons"),
            json!("Reptiles")
        ]
    );
    assert_eq!(
        result.data,
        vec![
            SeriesValue::Integer(4),
            SeriesValue::Integer(2),
            SeriesValue::Integer(1),
            SeriesValue::Integer(1)
        ]
    );
    // Every species belongs to exactly one group.
    assert_eq!(values(&result).iter().sum::<f64>(), 8.0);
    assert_eq!(result.total_records, 4);
}

#[test]
fn test_ramsar_sites_by_region() {
    let request = QueryRequest::new("wetland_sites", "region", ChartType::Pie)
        .with_filter("is_ramsar_site", true);
    let result = chart(explorer().execute(&request).unwrap());

    assert_eq!(result.chart_type, ChartType::Pie);
    assert_eq!(
        result.labels,
        vec![
            json!("Trarza"),
            json!("Brakna"),
            json!("Dakhlet Nouadhibou"),
            json!("Hodh Ech Chargui")
        ]
    );
    assert_eq!(values(&result), vec![2.0, 1.0, 1.0, 1.0]);
    // Assaba only has a non-Ramsar site: absent, not zero.
    assert!(!result.labels.contains(&json!("Assaba")));
    assert_eq!(result.total_records, 5);
}

#[test]
fn test_count_token_counts_records() {
    let explicit = QueryRequest::new("wetland_sites", "region", ChartType::Bar);
    let token = explicit.clone().with_y_field("count");
    let explorer = explorer();
    assert_eq!(
        explorer.execute(&explicit).unwrap(),
        explorer.execute(&token).unwrap()
    );
}

#[test]
fn test_distinct_count_across_relationship() {
    let request = QueryRequest::new("wetland_sites", "region", ChartType::Bar)
        .with_y_field("threat_count");
    let result = chart(explorer().execute(&request).unwrap());

    assert_eq!(
        result.labels,
        vec![
            json!("Brakna"),
            json!("Dakhlet Nouadhibou"),
            json!("Trarza"),
            json!("Assaba"),
            json!("Hodh Ech Chargui")
        ]
    );
    assert_eq!(values(&result), vec![2.0, 2.0, 2.0, 1.0, 1.0]);
    assert_eq!(result.total_records, 7);
}

#[test]
fn test_sum_treats_missing_as_zero() {
    let request = QueryRequest::new("observations", "observation_year", ChartType::Line)
        .with_y_field("count");
    let result = chart(explorer().execute(&request).unwrap());

    assert_eq!(result.labels, vec![json!("2021"), json!("2022"), json!("2023")]);
    assert_eq!(
        result.data,
        vec![
            SeriesValue::Integer(142000),
            SeriesValue::Integer(7700),
            SeriesValue::Integer(356)
        ]
    );
    assert_eq!(result.total_records, 10);
}

#[test]
fn test_sum_of_real_column() {
    let request = QueryRequest::new("wetland_sites", "region", ChartType::Bar)
        .with_y_field("area_hectares");
    let result = chart(explorer().execute(&request).unwrap());

    assert_eq!(
        result.labels,
        vec![
            json!("Dakhlet Nouadhibou"),
            json!("Trarza"),
            json!("Hodh Ech Chargui"),
            json!("Brakna"),
            json!("Assaba")
        ]
    );
    assert_eq!(values(&result), vec![1200000.0, 31100.0, 5000.0, 3500.0, 2200.0]);
}

#[test]
fn test_related_grouping_field() {
    let request = QueryRequest::new("observations", "species__taxonomic_group__name", ChartType::Bar);
    let result = chart(explorer().execute(&request).unwrap());

    // Oiseaux: 1-7, Mammifères: 8, Reptiles: 9, Poissons: 10.
    assert_eq!(result.labels[0], json!("Oiseaux"));
    assert_eq!(result.data[0], SeriesValue::Integer(7));
    assert_eq!(values(&result).iter().sum::<f64>(), 10.0);
}

#[test]
fn test_null_and_boolean_labels() {
    let explorer = explorer();

    let request = QueryRequest::new("wetland_sites", "commune", ChartType::Bar);
    let result = chart(explorer.execute(&request).unwrap());
    assert_eq!(
        result.labels,
        vec![
            json!("N'Diago"),
            json!(null),
            json!("Aleg"),
            json!("Kankossa"),
            json!("Mâl"),
            json!("Nouamghar")
        ]
    );

    let request = QueryRequest::new("wetland_sites", "is_ramsar_site", ChartType::Pie);
    let result = chart(explorer.execute(&request).unwrap());
    assert_eq!(result.labels, vec![json!(true), json!(false)]);
    assert_eq!(values(&result), vec![5.0, 2.0]);
}

#[test]
fn test_no_matching_rows_is_empty_not_error() {
    let request = QueryRequest::new("wetland_sites", "region", ChartType::Bar)
        .with_filter("region", "Tiris Zemmour");
    let result = chart(explorer().execute(&request).unwrap());
    assert!(result.labels.is_empty());
    assert!(result.data.is_empty());
    assert_eq!(result.total_records, 0);
}

#[test]
fn test_labels_and_data_stay_aligned() {
    let explorer = explorer();
    let requests = vec![
        QueryRequest::new("species", "iucn_status", ChartType::Bar),
        QueryRequest::new("species", "taxonomic_group__name", ChartType::Pie)
            .with_y_field("observation_count"),
        QueryRequest::new("threats", "threat__threat_type__name", ChartType::Bar)
            .with_y_field("site_count"),
        QueryRequest::new("conservation_measures", "status", ChartType::Line)
            .with_y_field("measure_count"),
        QueryRequest::new("observations", "wetland_site__region", ChartType::Bar)
            .with_y_field("count"),
    ];
    for request in requests {
        let result = chart(explorer.execute(&request).unwrap());
        assert_eq!(result.labels.len(), result.data.len(), "{:?}", request);
        assert!(!result.labels.is_empty(), "{:?}", request);
    }
}

#[test]
fn test_count_values_are_non_negative_integers() {
    let request = QueryRequest::new("taxonomic_groups", "name", ChartType::Bar)
        .with_y_field("observation_count");
    let result = chart(explorer().execute(&request).unwrap());
    for value in &result.data {
        assert!(matches!(value, SeriesValue::Integer(n) if *n >= 0));
    }
}

#[test]
fn test_group_cap_folds_into_other() {
    let explorer = Explorer::new(common::registry(), common::demo_store()).with_limits(
        ExplorerLimits {
            max_chart_groups: Some(3),
            other_label: "Autres".to_string(),
        },
    );
    let request = QueryRequest::new("species", "scientific_name", ChartType::Bar);
    let result = chart(explorer.execute(&request).unwrap());

    assert_eq!(
        result.labels,
        vec![
            json!("Calidris alba"),
            json!("Chelonia mydas"),
            json!("Monachus monachus"),
            json!("Autres")
        ]
    );
    assert_eq!(values(&result), vec![1.0, 1.0, 1.0, 5.0]);
    assert_eq!(result.total_records, 8);
}

#[test]
fn test_group_named_like_the_bucket_is_merged() {
    let store = common::demo_store();
    store
        .execute_batch(
            "INSERT INTO wetland_sites (id, name, region, is_ramsar_site) VALUES
                (200, 'Mare A', 'Other', 0),
                (201, 'Mare B', 'Other', 0),
                (202, 'Mare C', 'Other', 0);",
        )
        .unwrap();
    let explorer = Explorer::new(common::registry(), store).with_limits(ExplorerLimits {
        max_chart_groups: Some(1),
        other_label: "Other".to_string(),
    });
    let request = QueryRequest::new("wetland_sites", "region", ChartType::Bar);
    let result = chart(explorer.execute(&request).unwrap());

    // "Other" leads with 3 sites, then Brakna and Trarza with 2 each.
    assert_eq!(result.labels, vec![json!("Brakna"), json!("Other")]);
    assert_eq!(values(&result), vec![2.0, 8.0]);
    assert_eq!(result.total_records, 10);
}

#[test]
fn test_uncapped_explorer_returns_every_group() {
    let explorer = Explorer::new(common::registry(), common::demo_store()).with_limits(
        ExplorerLimits {
            max_chart_groups: None,
            other_label: "Other".to_string(),
        },
    );
    let request = QueryRequest::new("species", "scientific_name", ChartType::Bar);
    let result = chart(explorer.execute(&request).unwrap());
    assert_eq!(result.labels.len(), 8);
}

#[test]
fn test_non_numeric_y_is_rejected() {
    let explorer = explorer();
    for y in ["commune", "name", "is_ramsar_site", "designation_date", "designation_year"] {
        let request = QueryRequest::new("wetland_sites", "region", ChartType::Bar).with_y_field(y);
        let err = explorer.execute(&request).unwrap_err();
        assert!(
            matches!(err, ExploreError::InvalidAggregation { ref field, .. } if field == y),
            "{}: {:?}",
            y,
            err
        );
        assert_eq!(err.status_code(), 400);
    }
}

#[test]
fn test_group_by_is_validated_but_ignored_for_charts() {
    let explorer = explorer();
    let plain = QueryRequest::new("wetland_sites", "region", ChartType::Bar);
    let grouped = plain.clone().with_group_by("commune");
    assert_eq!(
        explorer.execute(&plain).unwrap(),
        explorer.execute(&grouped).unwrap()
    );

    let bad = plain.with_group_by("nonexistent_field");
    assert_eq!(explorer.execute(&bad).unwrap_err().kind(), "invalid_field");
}

#[test]
fn test_chart_json_shape() {
    let request = QueryRequest::new("wetland_sites", "is_ramsar_site", ChartType::Pie);
    let result = explorer().execute(&request).unwrap();
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "chart_type": "pie",
            "labels": [true, false],
            "data": [5, 2],
            "total_records": 7
        })
    );
}
