use super::experiment::InstrumentChannelDao;
use super::plot::PLOTS;
use super::query;
use super::transect::{TRANSECTS, TRANSECT_NODES};
use super::Resource;
use crate::error::ApiError;
use fieldlab_core::{compile, FilterParams, QueryPlan};
use serde_json::{json, Map, Value};
use uuid::Uuid;

const AREA: &str = "0b5c3c1e-5f39-4a3c-9f6e-1b2f7d9c0a11";

fn plan(filter: Option<&str>, sort: Option<&str>, range: Option<&str>) -> QueryPlan {
    let params = FilterParams::parse(filter, sort, range).unwrap();
    compile(&PLOTS, &params).unwrap()
}

fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("payload must be an object"),
    }
}

#[test]
fn test_select_defaults_to_iterator_order() {
    // Execute
    let builder = query::select(&PLOTS, &plan(None, None, None));

    // Validate
    assert_eq!(
        r#"SELECT t.* FROM "plot" t ORDER BY t."iterator" ASC"#,
        builder.sql()
    );
}

#[test]
fn test_select_identifier_with_range() {
    // Prepare
    let filter = format!(r#"{{"area_id": "{}"}}"#, AREA);

    // Execute
    let builder = query::select(&PLOTS, &plan(Some(&filter), None, Some("[0, 10]")));

    // Validate
    assert_eq!(
        r#"SELECT t.* FROM "plot" t WHERE t."area_id" = $1 ORDER BY t."iterator" ASC LIMIT $2 OFFSET $3"#,
        builder.sql()
    );
}

#[test]
fn test_select_text_is_case_insensitive_substring() {
    // Execute
    let builder = query::select(&PLOTS, &plan(Some(r#"{"name": "north"}"#), None, None));

    // Validate
    assert_eq!(
        r#"SELECT t.* FROM "plot" t WHERE COALESCE(CAST(t."name" AS TEXT), '') ILIKE $1 ORDER BY t."iterator" ASC"#,
        builder.sql()
    );
}

#[test]
fn test_select_sort_keeps_pages_stable() {
    // Execute
    let builder = query::select(&PLOTS, &plan(None, Some(r#"["name", "DESC"]"#), None));

    // Validate
    assert!(builder
        .sql()
        .ends_with(r#"ORDER BY t."name" DESC, t."iterator" ASC"#));
}

#[test]
fn test_relation_filters() {
    // Execute
    let has = query::select(&PLOTS, &plan(Some(r#"{"samples": true}"#), None, None));
    let has_not = query::select(&PLOTS, &plan(Some(r#"{"samples": false}"#), None, None));

    // Validate
    assert!(has
        .sql()
        .contains(r#"WHERE EXISTS (SELECT 1 FROM "plotsample" r WHERE r."plot_id" = t."id")"#));
    assert!(has_not.sql().contains("WHERE NOT EXISTS (SELECT 1"));
}

#[test]
fn test_empty_list_and_null() {
    // Execute
    let empty = query::select(&PLOTS, &plan(Some(r#"{"area_id": []}"#), None, None));
    let null = query::select(&PLOTS, &plan(Some(r#"{"aspect": null}"#), None, None));

    // Validate
    assert!(empty.sql().contains("WHERE FALSE"));
    assert!(null.sql().contains(r#"WHERE t."aspect" IS NULL"#));
}

#[test]
fn test_search_covers_text_columns_and_parents() {
    // Execute
    let builder = query::select(&PLOTS, &plan(Some(r#"{"q": "ridge"}"#), None, None));

    // Validate
    let sql = builder.sql();
    assert!(sql.contains(r#"COALESCE(CAST(t."name" AS TEXT), '') ILIKE $1"#));
    assert!(sql.contains(r#"COALESCE(CAST(t."gradient" AS TEXT), '') ILIKE $2"#));
    assert!(sql.contains(
        r#"EXISTS (SELECT 1 FROM "area" j WHERE j."id" = t."area_id" AND (COALESCE(CAST(j."name" AS TEXT), '') ILIKE"#
    ));
    assert!(!sql.contains(r#"t."area_id" AS TEXT"#));
}

#[test]
fn test_count_ignores_sort_and_range() {
    // Prepare
    let plan = plan(
        Some(r#"{"name": "north"}"#),
        Some(r#"["name", "ASC"]"#),
        Some("[5, 10]"),
    );

    // Execute
    let builder = query::count(&PLOTS, &plan.predicates);

    // Validate
    assert_eq!(
        r#"SELECT count(*) AS count FROM "plot" t WHERE COALESCE(CAST(t."name" AS TEXT), '') ILIKE $1"#,
        builder.sql()
    );
}

#[test]
fn test_like_pattern_escapes_metacharacters() {
    assert_eq!("%plot%", query::like_pattern("plot"));
    assert_eq!(r"%50\%\_a\\b%", query::like_pattern(r"50%_a\b"));
}

#[test]
fn test_insert_ignores_unknown_and_read_only_keys() {
    // Prepare
    let body = payload(json!({
        "id": AREA,
        "last_updated": "2024-01-01T00:00:00Z",
        "gradient": "flat",
        "name": "P1",
        "area_id": AREA,
        "color": "red",
    }));

    // Execute
    let builder = query::insert(&PLOTS, Uuid::new_v4(), &body).unwrap();

    // Validate
    assert_eq!(
        r#"INSERT INTO "plot" ("id", "name", "area_id", "gradient") VALUES ($1, $2, $3, $4) RETURNING *"#,
        builder.sql()
    );
}

#[test]
fn test_update_touches_last_updated() {
    // Prepare
    let body = payload(json!({"name": "P2", "coord_x": null}));

    // Execute
    let builder = query::update(&PLOTS, Uuid::new_v4(), &body).unwrap();

    // Validate
    assert_eq!(
        r#"UPDATE "plot" SET "name" = $1, "coord_x" = $2, "last_updated" = now() WHERE "id" = $3 RETURNING *"#,
        builder.sql()
    );
}

fn insert_error(body: &Map<String, Value>) -> ApiError {
    match query::insert(&PLOTS, Uuid::new_v4(), body) {
        Ok(_) => panic!("payload should be rejected"),
        Err(err) => err,
    }
}

#[test]
fn test_payload_type_mismatch() {
    // Prepare
    let wrong_number = payload(json!({"coord_x": "east"}));
    let wrong_uuid = payload(json!({"area_id": "not-a-uuid"}));
    let wrong_date = payload(json!({"created_on": "yesterday"}));

    // Execute & Validate
    for body in [wrong_number, wrong_uuid, wrong_date] {
        let err = insert_error(&body);
        assert!(matches!(err, ApiError::Payload(_)));
    }
}

#[test]
fn test_payload_integer_out_of_range() {
    // Prepare
    let too_large = payload(json!({"coord_srid": 3000000000i64}));
    let fits = payload(json!({"coord_srid": 4326}));

    // Execute
    let err = insert_error(&too_large);
    let builder = query::insert(&PLOTS, Uuid::new_v4(), &fits);

    // Validate
    match err {
        ApiError::Payload(msg) => assert!(msg.contains("coord_srid")),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(builder.is_ok());
}

#[test]
fn test_delete_many() {
    // Execute
    let builder = query::delete_many(&PLOTS, &[Uuid::new_v4(), Uuid::new_v4()]);

    // Validate
    assert_eq!(
        r#"DELETE FROM "plot" WHERE "id" = ANY($1) RETURNING "id""#,
        builder.sql()
    );
}

#[test]
fn test_parse_timestamp() {
    let expected = query::parse_timestamp("2024-05-01T10:00:00Z").unwrap();
    assert_eq!(Some(expected), query::parse_timestamp("2024-05-01T12:00:00+02:00"));
    assert_eq!(Some(expected), query::parse_timestamp("2024-05-01T10:00:00"));
    assert_eq!(Some(expected), query::parse_timestamp("2024-05-01T10:00"));
    assert_eq!(None, query::parse_timestamp("May 1st"));
}

#[test]
fn test_channel_lengths_must_match() {
    // Prepare
    let aligned = payload(json!({"time_values": [0.0, 1.0], "raw_values": [0.5, 0.7]}));
    let partial = payload(json!({"time_values": [0.0, 1.0]}));
    let misaligned = payload(json!({"time_values": [0.0, 1.0], "raw_values": [0.5]}));

    // Execute & Validate
    assert!(InstrumentChannelDao::validate(&aligned).is_ok());
    assert!(InstrumentChannelDao::validate(&partial).is_ok());
    assert!(matches!(
        InstrumentChannelDao::validate(&misaligned),
        Err(ApiError::Payload(_))
    ));
}

#[test]
fn test_transect_nodes_relation_and_order() {
    // Prepare
    let params = FilterParams::parse(Some(r#"{"nodes": true}"#), None, None).unwrap();
    let with_nodes = compile(&TRANSECTS, &params).unwrap();
    let params = FilterParams::parse(None, Some(r#"["order", "ASC"]"#), None).unwrap();
    let ordered = compile(&TRANSECT_NODES, &params).unwrap();

    // Execute
    let transects = query::select(&TRANSECTS, &with_nodes);
    let nodes = query::select(&TRANSECT_NODES, &ordered);

    // Validate
    assert!(transects.sql().contains(
        r#"WHERE EXISTS (SELECT 1 FROM "transectnode" r WHERE r."transect_id" = t."id")"#
    ));
    assert!(nodes
        .sql()
        .ends_with(r#"ORDER BY t."order" ASC, t."iterator" ASC"#));
}

#[test]
fn test_transect_node_search_uses_plot_name() {
    // Prepare
    let params = FilterParams::parse(Some(r#"{"q": "P1"}"#), None, None).unwrap();
    let plan = compile(&TRANSECT_NODES, &params).unwrap();

    // Execute
    let builder = query::select(&TRANSECT_NODES, &plan);

    // Validate
    assert!(builder.sql().contains(
        r#"EXISTS (SELECT 1 FROM "plot" j WHERE j."id" = t."plot_id" AND (COALESCE(CAST(j."name" AS TEXT), '') ILIKE $1))"#
    ));
}
