//! Argument binding, result coercion and reshaping through the public API

#[path = "testutils/mod.rs"]
mod testutils;

use chrono::{NaiveDate, TimeZone, Utc};
use procstore::catalog::Mode;
use procstore::storage::Point;
use procstore::{
    Arguments, CallableKind, DefinitionRequest, EngineError, InputDeclaration, InvocationContext,
    InvocationError, Value,
};
use std::collections::BTreeMap;
use testutils::catalog_fixture::CatalogFixture;

fn map_of(pairs: &[(&str, Value)]) -> Value {
    Value::Map(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    )
}

#[test]
fn test_defaults_apply_when_argument_missing() {
    let fixture = CatalogFixture::new();
    fixture
        .coordinator()
        .declare_function(
            &DefinitionRequest::new("answer", "RETURN $input AS answer")
                .input(InputDeclaration::new("input", "int").with_default("42"))
                .output("answer", "number"),
        )
        .unwrap();

    assert_eq!(
        fixture.call_function("answer", Arguments::none()).unwrap(),
        Value::Integer(42)
    );
    assert_eq!(
        fixture
            .call_function("answer", Arguments::Positional(vec![Value::Integer(7)]))
            .unwrap(),
        Value::Integer(7)
    );
    assert_eq!(
        fixture
            .call_function("custom.answer", Arguments::named([("input", Value::Integer(9))]))
            .unwrap(),
        Value::Integer(9)
    );
}

#[test]
fn test_missing_argument_without_default() {
    let fixture = CatalogFixture::new();
    fixture
        .coordinator()
        .declare_procedure(
            &DefinitionRequest::new("echo", "RETURN $text AS text")
                .input(InputDeclaration::new("text", "string")),
        )
        .unwrap();

    assert!(matches!(
        fixture.call_procedure("echo", Arguments::none()),
        Err(InvocationError::MissingArgument { parameter, .. }) if parameter == "text"
    ));
    assert!(matches!(
        fixture.call_procedure("echo", Arguments::Positional(vec![Value::Integer(1)])),
        Err(InvocationError::TypeMismatch { parameter, .. }) if parameter == "text"
    ));
    // Nothing reached the engine
    assert!(fixture.engine().requests().is_empty());
}

#[test]
fn test_positional_binding_of_all_parameter_types() {
    let fixture = CatalogFixture::new();
    fixture
        .coordinator()
        .declare_procedure(
            &DefinitionRequest::new(
                "everything",
                "RETURN $i AS i, $f AS f, $s AS s, $m AS m, $l AS l, $b AS b, $d AS d, $dt AS dt, $p AS p",
            )
            .input(InputDeclaration::new("i", "int"))
            .input(InputDeclaration::new("f", "float"))
            .input(InputDeclaration::new("s", "string"))
            .input(InputDeclaration::new("m", "map"))
            .input(InputDeclaration::new("l", "list int"))
            .input(InputDeclaration::new("b", "bool"))
            .input(InputDeclaration::new("d", "date"))
            .input(InputDeclaration::new("dt", "datetime"))
            .input(InputDeclaration::new("p", "point")),
        )
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let datetime = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 0).unwrap().fixed_offset();
    let point = Point::cartesian(1.5, -2.0);
    let arguments = vec![
        Value::Integer(1),
        Value::Integer(2),
        Value::from("three"),
        map_of(&[("four", Value::Integer(4))]),
        Value::from(vec![5i64, 6]),
        Value::Boolean(true),
        Value::Date(date),
        Value::DateTime(datetime),
        Value::Point(point.clone()),
    ];

    let rows = fixture
        .call_procedure("everything", Arguments::Positional(arguments))
        .unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.get_value("i"), Some(&Value::Integer(1)));
    // Integer widened for the float parameter
    assert_eq!(row.get_value("f"), Some(&Value::Float(2.0)));
    assert_eq!(row.get_value("s"), Some(&Value::from("three")));
    assert_eq!(
        row.get_value("m"),
        Some(&map_of(&[("four", Value::Integer(4))]))
    );
    assert_eq!(row.get_value("l"), Some(&Value::from(vec![5i64, 6])));
    assert_eq!(row.get_value("b"), Some(&Value::Boolean(true)));
    assert_eq!(row.get_value("d"), Some(&Value::Date(date)));
    assert_eq!(row.get_value("dt"), Some(&Value::DateTime(datetime)));
    assert_eq!(row.get_value("p"), Some(&Value::Point(point)));

    let request = fixture.engine().last_request().unwrap();
    assert_eq!(request.parameters.len(), 9);
    assert_eq!(request.mode, Mode::Read);
}

#[test]
fn test_result_coercion_matrix() {
    let fixture = CatalogFixture::new();
    let coordinator = fixture.coordinator();
    let cases = [
        ("as_int", "RETURN 1 AS x", "int", Value::Integer(1)),
        ("as_float", "RETURN 1 AS x", "float", Value::Float(1.0)),
        ("as_string", "RETURN 'one' AS x", "string", Value::from("one")),
        (
            "as_map",
            "RETURN {one: 1} AS x",
            "map",
            map_of(&[("one", Value::Integer(1))]),
        ),
        (
            "as_list",
            "UNWIND [1, 2] AS n RETURN n",
            "list of int",
            Value::from(vec![1i64, 2]),
        ),
        ("as_bool", "RETURN true AS x", "boolean", Value::Boolean(true)),
        (
            "as_date",
            "RETURN date('2024-01-02') AS x",
            "date",
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
        ),
        (
            "as_datetime",
            "RETURN date('2024-01-02') AS x",
            "datetime",
            Value::DateTime(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap().fixed_offset()),
        ),
        (
            "as_point",
            "RETURN point({x: 3, y: 4}) AS x",
            "point",
            Value::Point(Point::cartesian(3.0, 4.0)),
        ),
    ];

    for (name, statement, returns, _) in &cases {
        coordinator
            .declare_function(&DefinitionRequest::new(*name, *statement).returns(*returns))
            .unwrap();
    }
    for (name, _, _, expected) in cases {
        assert_eq!(
            fixture.call_function(name, Arguments::none()).unwrap(),
            expected,
            "result of {}",
            name
        );
    }

    coordinator
        .declare_function(&DefinitionRequest::new("not_int", "RETURN 'x' AS x").returns("int"))
        .unwrap();
    assert!(matches!(
        fixture.call_function("not_int", Arguments::none()),
        Err(InvocationError::TypeMismatch { .. })
    ));
}

#[test]
fn test_force_single_controls_aggregation() {
    let fixture = CatalogFixture::new();
    let coordinator = fixture.coordinator();
    coordinator
        .declare_function(
            &DefinitionRequest::new("all", "UNWIND [1, 2, 3] AS x RETURN x").returns("list of int"),
        )
        .unwrap();
    coordinator
        .declare_function(
            &DefinitionRequest::new("first", "UNWIND [1, 2, 3] AS x RETURN x")
                .returns("int")
                .force_single(true),
        )
        .unwrap();
    coordinator
        .declare_function(&DefinitionRequest::new("inferred", "UNWIND [1, 2] AS x RETURN x"))
        .unwrap();
    coordinator
        .declare_function(
            &DefinitionRequest::new("nothing", "UNWIND [] AS x RETURN x").returns("int"),
        )
        .unwrap();

    assert_eq!(
        fixture.call_function("all", Arguments::none()).unwrap(),
        Value::from(vec![1i64, 2, 3])
    );
    assert_eq!(
        fixture.call_function("first", Arguments::none()).unwrap(),
        Value::Integer(1)
    );
    assert_eq!(
        fixture.call_function("inferred", Arguments::none()).unwrap(),
        Value::List(vec![
            map_of(&[("x", Value::Integer(1))]),
            map_of(&[("x", Value::Integer(2))]),
        ])
    );
    assert_eq!(
        fixture.call_function("nothing", Arguments::none()).unwrap(),
        Value::Null
    );
}

#[test]
fn test_force_single_alone_picks_first_value() {
    let fixture = CatalogFixture::new();
    let coordinator = fixture.coordinator();
    let request = |name: &str| {
        DefinitionRequest::new(name, "UNWIND [1, 2, 3] AS x RETURN x").returns("any")
    };
    coordinator.declare_function(&request("every")).unwrap();
    coordinator
        .declare_function(&request("single").force_single(true))
        .unwrap();

    assert_eq!(
        fixture.call_function("every", Arguments::none()).unwrap(),
        Value::from(vec![1i64, 2, 3])
    );
    assert_eq!(
        fixture.call_function("single", Arguments::none()).unwrap(),
        Value::Integer(1)
    );
}

#[test]
fn test_declared_params_input_reaches_statement() {
    let fixture = CatalogFixture::new();
    fixture
        .coordinator()
        .declare_function(
            &DefinitionRequest::new("echo", "RETURN $params AS params")
                .input(InputDeclaration::new("params", "map"))
                .returns("map"),
        )
        .unwrap();
    let argument = map_of(&[("a", Value::Integer(1))]);

    assert_eq!(
        fixture
            .call_function("echo", Arguments::Positional(vec![argument.clone()]))
            .unwrap(),
        argument
    );
    let request = fixture.engine().last_request().unwrap();
    assert_eq!(request.parameters.get("params"), Some(&argument));
    assert_eq!(request.parameters.len(), 1);

    // Declared inputs are stored, so the binding survives a restart
    let blob = fixture.raw_blob().unwrap();
    assert_eq!(blob["functions"]["echo"]["inputs"][0]["name"], "params");
    let restarted = fixture.restart();
    assert_eq!(
        restarted
            .call_function("echo", Arguments::named([("params", argument.clone())]))
            .unwrap(),
        argument
    );
    assert!(matches!(
        restarted.call_function("echo", Arguments::none()),
        Err(InvocationError::MissingArgument { parameter, .. }) if parameter == "params"
    ));
}

#[test]
fn test_parameter_map_is_spread() {
    let fixture = CatalogFixture::new();
    fixture
        .coordinator()
        .declare_function(&DefinitionRequest::new("spread", "RETURN $answer AS answer").returns("int"))
        .unwrap();

    assert_eq!(
        fixture
            .call_function("spread", Arguments::named([("answer", Value::Integer(42))]))
            .unwrap(),
        Value::Integer(42)
    );

    let request = fixture.engine().last_request().unwrap();
    let mut expected = BTreeMap::new();
    expected.insert("answer".to_string(), Value::Integer(42));
    assert_eq!(request.parameters, expected);

    // Without the key the engine reports the missing parameter
    assert!(matches!(
        fixture.call_function("spread", Arguments::none()),
        Err(InvocationError::Engine(EngineError::Failed(_)))
    ));
}

#[test]
fn test_procedure_rows_follow_declared_columns() {
    let fixture = CatalogFixture::new();
    fixture
        .coordinator()
        .declare_procedure(
            &DefinitionRequest::new("pairs", "UNWIND [1, 2] AS n RETURN n AS b, 'x' AS a")
                .output("a", "string")
                .output("b", "float")
                .output("c", "int"),
        )
        .unwrap();

    let rows = fixture.call_procedure("pairs", Arguments::none()).unwrap();
    assert_eq!(rows.len(), 2);
    for (row, n) in rows.iter().zip([1.0, 2.0]) {
        assert_eq!(
            row.columns,
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert_eq!(row.get_value("a"), Some(&Value::from("x")));
        assert_eq!(row.get_value("b"), Some(&Value::Float(n)));
        assert_eq!(row.get_value("c"), Some(&Value::Null));
    }
}

#[test]
fn test_inferred_outputs_are_observed_on_first_call() {
    let fixture = CatalogFixture::new();
    fixture
        .coordinator()
        .declare_procedure(&DefinitionRequest::new("shape", "RETURN 1 AS n, 'a' AS s"))
        .unwrap();
    assert!(fixture.coordinator().list()[0].outputs.is_empty());

    fixture.call_procedure("shape", Arguments::none()).unwrap();

    let listing = fixture.coordinator().list();
    let info = &listing[0];
    assert!(info.inferred);
    assert_eq!(
        info.outputs,
        vec![
            ("n".to_string(), "INTEGER".to_string()),
            ("s".to_string(), "STRING".to_string()),
        ]
    );
}

#[test]
fn test_write_callables_need_write_context() {
    let fixture = CatalogFixture::new();
    let coordinator = fixture.coordinator();
    coordinator
        .declare_procedure(
            &DefinitionRequest::new("add", "CREATE (:Item) RETURN 'done' AS status").mode("WRITE"),
        )
        .unwrap();
    coordinator
        .declare_procedure(&DefinitionRequest::new(
            "sneaky",
            "CREATE (:Item) RETURN 'done' AS status",
        ))
        .unwrap();

    assert!(matches!(
        fixture.call_procedure_in("add", Arguments::none(), &InvocationContext::read_only()),
        Err(InvocationError::WriteInReadContext { .. })
    ));
    let rows = fixture.call_procedure("add", Arguments::none()).unwrap();
    assert_eq!(rows[0].get_value("status"), Some(&Value::from("done")));
    assert_eq!(fixture.engine().last_request().unwrap().mode, Mode::Write);

    // A read callable runs its statement in read mode even from a write context
    assert!(matches!(
        fixture.call_procedure("sneaky", Arguments::none()),
        Err(InvocationError::WriteInReadContext { .. })
    ));
}

#[test]
fn test_unknown_and_wrong_kind_callables() {
    let fixture = CatalogFixture::new();
    fixture
        .coordinator()
        .declare_function(&DefinitionRequest::new("f", "RETURN 1 AS x"))
        .unwrap();

    assert!(matches!(
        fixture.call_function("missing", Arguments::none()),
        Err(InvocationError::UnknownCallable { .. })
    ));
    assert!(matches!(
        fixture.call_procedure("f", Arguments::none()),
        Err(InvocationError::UnknownCallable {
            kind: CallableKind::Procedure,
            ..
        })
    ));
}
