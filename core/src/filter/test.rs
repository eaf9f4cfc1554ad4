use super::*;
use crate::schema::{Field, FieldKind, Relation, SearchJoin};

static SAMPLES: Relation = Relation {
    table: "plotsample",
    foreign_key: "plot_id",
};

static PLOTS: EntitySchema = EntitySchema {
    name: "plots",
    table: "plot",
    fields: &[
        Field::read_only("id", FieldKind::Id),
        Field::new("name", FieldKind::Text),
        Field::new("area_id", FieldKind::Id),
        Field::new("aspect", FieldKind::Text),
        Field::new("replicate", FieldKind::Integer),
        Field::new("coord_x", FieldKind::Float),
        Field::new("is_public", FieldKind::Boolean),
        Field::read_only("last_updated", FieldKind::Timestamp),
        Field::new("samples", FieldKind::Relation(&SAMPLES)),
    ],
    search_joins: &[SearchJoin {
        table: "area",
        local_key: "area_id",
        columns: &["name"],
    }],
    default_order: "iterator",
    touch_column: Some("last_updated"),
};

const AREA_A: &str = "0b5c3c1e-5f39-4a3c-9f6e-1b2f7d9c0a11";
const AREA_B: &str = "5d1f0e3a-8c47-4e2b-a1d6-3f9b2c7e4d22";

fn plan(filter: &str) -> Result<QueryPlan, QueryError> {
    let params = FilterParams::parse(Some(filter), None, None)?;
    compile(&PLOTS, &params)
}

fn is_substring(predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Contains(..) | Predicate::Search { .. } => true,
        Predicate::Any(inner) => inner.iter().any(is_substring),
        _ => false,
    }
}

#[test]
fn test_empty_parameters() {
    // Execute
    let params = FilterParams::parse(None, Some(""), Some("  ")).unwrap();
    let plan = compile(&PLOTS, &params).unwrap();

    // Validate
    assert!(plan.predicates.is_empty());
    assert_eq!(None, plan.sort);
    assert_eq!(None, plan.range);
}

#[test]
fn test_identifier_fields_match_exactly() {
    // Prepare
    let filter = format!(r#"{{"id": "{}", "area_id": ["{}", "{}"]}}"#, AREA_A, AREA_A, AREA_B);

    // Execute
    let plan = plan(&filter).unwrap();

    // Validate
    assert_eq!(2, plan.predicates.len());
    assert!(!plan.predicates.iter().any(is_substring));
    let area_a = Uuid::parse_str(AREA_A).unwrap();
    let area_b = Uuid::parse_str(AREA_B).unwrap();
    assert!(plan
        .predicates
        .contains(&Predicate::Equals("id", Scalar::Uuid(area_a))));
    assert!(plan.predicates.contains(&Predicate::Any(vec![
        Predicate::Equals("area_id", Scalar::Uuid(area_a)),
        Predicate::Equals("area_id", Scalar::Uuid(area_b)),
    ])));
}

#[test]
fn test_identifier_must_be_uuid() {
    let err = plan(r#"{"area_id": "not-a-uuid"}"#).unwrap_err();
    assert!(matches!(err, QueryError::InvalidValue(field, _) if field == "area_id"));

    let err = plan(r#"{"area_id": 12}"#).unwrap_err();
    assert!(matches!(err, QueryError::InvalidValue(..)));
}

#[test]
fn test_text_fields_match_substrings() {
    // Execute
    let plan = plan(r#"{"name": "Plot", "aspect": ["north", "south"]}"#).unwrap();

    // Validate
    assert!(plan
        .predicates
        .contains(&Predicate::Contains("name", "Plot".to_owned())));
    assert!(plan.predicates.contains(&Predicate::Any(vec![
        Predicate::Contains("aspect", "north".to_owned()),
        Predicate::Contains("aspect", "south".to_owned()),
    ])));
}

#[test]
fn test_numbers_match_exactly() {
    let plan = plan(r#"{"replicate": 2, "coord_x": 2600000.5, "name": 7}"#).unwrap();
    assert!(plan
        .predicates
        .contains(&Predicate::Equals("replicate", Scalar::Integer(2))));
    assert!(plan
        .predicates
        .contains(&Predicate::Equals("coord_x", Scalar::Float(2600000.5))));
    assert!(plan
        .predicates
        .contains(&Predicate::Equals("name", Scalar::Text("7".to_owned()))));
}

#[test]
fn test_fractional_integer_is_rejected() {
    let err = plan(r#"{"replicate": 1.5}"#).unwrap_err();
    assert!(matches!(err, QueryError::InvalidValue(..)));
}

#[test]
fn test_booleans() {
    let plan = plan(r#"{"samples": false, "is_public": true}"#).unwrap();
    assert!(plan
        .predicates
        .contains(&Predicate::Related(&SAMPLES, false)));
    assert!(plan
        .predicates
        .contains(&Predicate::Equals("is_public", Scalar::Boolean(true))));

    let err = compile(
        &PLOTS,
        &FilterParams::parse(Some(r#"{"name": true}"#), None, None).unwrap(),
    )
    .unwrap_err();
    assert!(matches!(err, QueryError::InvalidValue(..)));
}

#[test]
fn test_null_and_empty_list() {
    let plan = plan(r#"{"aspect": null, "area_id": []}"#).unwrap();
    assert!(plan.predicates.contains(&Predicate::IsNull("aspect")));
    assert!(plan.predicates.contains(&Predicate::Any(vec![])));
}

#[test]
fn test_search_covers_text_columns_and_joins() {
    // Execute
    let plan = plan(r#"{"q": "alp"}"#).unwrap();

    // Validate
    match &plan.predicates[0] {
        Predicate::Search {
            needle,
            columns,
            joins,
        } => {
            assert_eq!("alp", needle);
            assert_eq!(&vec!["name", "aspect"], columns);
            assert_eq!(1, joins.len());
            assert_eq!("area", joins[0].table);
        }
        other => panic!("Unexpected predicate {:?}", other),
    }
}

#[test]
fn test_unknown_field_is_a_client_error() {
    let err = plan(r#"{"colour": "red"}"#).unwrap_err();
    assert_eq!(
        QueryError::UnknownField("plots", "colour".to_owned()),
        err
    );
}

#[test]
fn test_malformed_json() {
    let err = FilterParams::parse(Some("{name"), None, None).unwrap_err();
    assert!(matches!(err, QueryError::MalformedParameter("filter", _)));

    let err = FilterParams::parse(Some("[1, 2]"), None, None).unwrap_err();
    assert!(matches!(err, QueryError::MalformedParameter("filter", _)));

    let err = FilterParams::parse(None, Some(r#"{"name": "ASC"}"#), None).unwrap_err();
    assert!(matches!(err, QueryError::MalformedParameter("sort", _)));
}

#[test]
fn test_sort() {
    let params = FilterParams::parse(None, Some(r#"["name", "ASC"]"#), None).unwrap();
    let plan = compile(&PLOTS, &params).unwrap();
    assert_eq!(
        Some(Sort {
            column: "name",
            direction: Direction::Asc
        }),
        plan.sort
    );

    let params = FilterParams::parse(None, Some(r#"["last_updated", "DESC"]"#), None).unwrap();
    let plan = compile(&PLOTS, &params).unwrap();
    assert_eq!(Direction::Desc, plan.sort.unwrap().direction);

    let params = FilterParams::parse(None, Some(r#"["name", "asc"]"#), None).unwrap();
    let plan = compile(&PLOTS, &params).unwrap();
    assert_eq!(Direction::Asc, plan.sort.unwrap().direction);

    let params = FilterParams::parse(None, Some(r#"["name", "up"]"#), None).unwrap();
    let plan = compile(&PLOTS, &params).unwrap();
    assert_eq!(Direction::Desc, plan.sort.unwrap().direction);

    // Anything but a pair leaves the order to the store
    let params = FilterParams::parse(None, Some(r#"["name"]"#), None).unwrap();
    assert_eq!(None, compile(&PLOTS, &params).unwrap().sort);
}

#[test]
fn test_sort_on_unknown_or_virtual_field() {
    let params = FilterParams::parse(None, Some(r#"["colour", "ASC"]"#), None).unwrap();
    assert!(matches!(
        compile(&PLOTS, &params),
        Err(QueryError::UnknownField(..))
    ));

    let params = FilterParams::parse(None, Some(r#"["samples", "ASC"]"#), None).unwrap();
    assert!(matches!(
        compile(&PLOTS, &params),
        Err(QueryError::UnknownField(..))
    ));
}

#[test]
fn test_range() {
    let params = FilterParams::parse(None, None, Some("[10, 20]")).unwrap();
    let range = compile(&PLOTS, &params).unwrap().range.unwrap();
    assert_eq!(10, range.offset());
    assert_eq!(10, range.limit());
}

#[test]
fn test_invalid_ranges() {
    for raw in [
        "[20, 10]",
        "[-1, 10]",
        "[0]",
        "[0, 1, 2]",
        "[\"a\", 2]",
        "[10000000000000000000, 18446744073709551615]",
        "[0, 9223372036854775808]",
    ] {
        let params = FilterParams::parse(None, None, Some(raw)).unwrap();
        assert!(
            matches!(compile(&PLOTS, &params), Err(QueryError::InvalidRange(_))),
            "{} should be rejected",
            raw
        );
    }
}
