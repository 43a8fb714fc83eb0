//! Durability of the callable catalog across restarts

#[path = "testutils/mod.rs"]
mod testutils;

use procstore::catalog::Mode;
use procstore::exec::DetachedEngine;
use procstore::{
    Arguments, CallableCoordinator, CallableKind, CatalogError, DefinitionRequest,
    InputDeclaration, LifecycleState, Value,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use testutils::catalog_fixture::CatalogFixture;

#[test]
fn test_restart_restores_every_definition() {
    let fixture = CatalogFixture::new();
    let coordinator = fixture.coordinator();
    coordinator
        .declare_function(
            &DefinitionRequest::new("answer", "RETURN $input AS answer")
                .input(InputDeclaration::new("input", "int").with_default("42"))
                .output("answer", "number")
                .force_single(true)
                .description("The answer"),
        )
        .unwrap();
    coordinator
        .declare_procedure(
            &DefinitionRequest::new("people", "CREATE (:Person) RETURN 'ok' AS status")
                .mode("write")
                .output("status", "string"),
        )
        .unwrap();
    coordinator
        .declare_function(&DefinitionRequest::new("untyped", "RETURN $x AS x"))
        .unwrap();

    let restarted = fixture.restart();
    assert_eq!(
        restarted.coordinator().lifecycle_state(),
        LifecycleState::Ready
    );
    assert_eq!(
        restarted.coordinator().catalog().snapshot(),
        coordinator.catalog().snapshot()
    );
    assert_eq!(restarted.coordinator().list(), coordinator.list());

    assert_eq!(
        restarted.call_function("answer", Arguments::none()).unwrap(),
        Value::Integer(42)
    );
}

#[test]
fn test_untyped_function_answers_the_same_after_restart() {
    let fixture = CatalogFixture::new();
    fixture
        .coordinator()
        .declare_function(&DefinitionRequest::new("answer", "RETURN 42 AS answer"))
        .unwrap();

    let mut row = BTreeMap::new();
    row.insert("answer".to_string(), Value::Integer(42));
    let expected = Value::List(vec![Value::Map(row)]);
    assert_eq!(
        fixture.call_function("answer", Arguments::none()).unwrap(),
        expected
    );

    let restarted = fixture.restart();
    assert_eq!(
        restarted.call_function("answer", Arguments::none()).unwrap(),
        expected
    );
}

#[test]
fn test_restart_twice_is_idempotent() {
    let fixture = CatalogFixture::new();
    fixture
        .coordinator()
        .declare_function(&DefinitionRequest::new("one", "RETURN 1 AS one").returns("int"))
        .unwrap();
    let blob = fixture.raw_blob();

    let once = fixture.restart();
    let twice = once.restart();
    assert_eq!(
        twice.coordinator().catalog().snapshot(),
        fixture.coordinator().catalog().snapshot()
    );
    // Reload never rewrites the blob
    assert_eq!(twice.raw_blob(), blob);
}

#[test]
fn test_sled_database_survives_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("procstore_test");

    {
        let coordinator =
            CallableCoordinator::from_path(&db_path, Arc::new(DetachedEngine)).unwrap();
        assert_eq!(coordinator.lifecycle_state(), LifecycleState::Ready);
        coordinator
            .declare_procedure(
                &DefinitionRequest::new("counts", "UNWIND [1, 2] AS n RETURN n")
                    .output("n", "int")
                    .description("Counts to two"),
            )
            .unwrap();
        coordinator.shutdown().unwrap();
    }

    let coordinator = CallableCoordinator::from_path(&db_path, Arc::new(DetachedEngine)).unwrap();
    let listing = coordinator.list();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].qualified_name, "custom.counts");
    assert_eq!(listing[0].kind, CallableKind::Procedure);
    assert_eq!(listing[0].mode, Mode::Read);
    assert_eq!(listing[0].description.as_deref(), Some("Counts to two"));
    coordinator.shutdown().unwrap();
}

#[test]
fn test_removal_is_durable() {
    let fixture = CatalogFixture::new();
    let coordinator = fixture.coordinator();
    coordinator
        .declare_function(&DefinitionRequest::new("gone", "RETURN 1 AS x"))
        .unwrap();
    coordinator.remove(CallableKind::Function, "gone").unwrap();

    assert!(matches!(
        coordinator.remove(CallableKind::Function, "gone"),
        Err(CatalogError::NotFound { .. })
    ));

    let restarted = fixture.restart();
    assert!(restarted.coordinator().list().is_empty());
}

#[test]
fn test_blob_layout() {
    let fixture = CatalogFixture::new();
    fixture
        .coordinator()
        .declare_function(&DefinitionRequest::new("implicit", "RETURN $x AS x"))
        .unwrap();
    fixture
        .coordinator()
        .declare_procedure(
            &DefinitionRequest::new("typed", "RETURN $n AS n")
                .input(InputDeclaration::new("n", "int").with_default("3"))
                .output("n", "int"),
        )
        .unwrap();

    let blob = fixture.raw_blob().expect("blob should be written");
    let implicit = &blob["functions"]["implicit"];
    assert_eq!(implicit["statement"], "RETURN $x AS x");
    assert_eq!(implicit["mode"], "read");
    assert_eq!(implicit["forceSingle"], false);
    assert_eq!(implicit["signature"], "custom.implicit(params :: MAP = {})");
    assert!(implicit.get("inputs").is_none());
    assert!(implicit.get("outputs").is_none());

    let typed = &blob["procedures"]["typed"];
    assert_eq!(
        typed["signature"],
        "custom.typed(n :: INTEGER = 3) :: (n :: INTEGER)"
    );
    assert_eq!(typed["inputs"][0]["name"], "n");
    assert_eq!(typed["inputs"][0]["default"], "3");
    assert_eq!(typed["outputs"][0]["type"], "INTEGER");
}

#[test]
fn test_legacy_record_reloads_from_signature() {
    let fixture = CatalogFixture::new();
    fixture.write_raw_blob(
        br#"{
            "procedures": {},
            "functions": {
                "answer": {
                    "statement": "RETURN $input AS answer",
                    "mode": "read",
                    "forceSingle": true,
                    "signature": "custom.answer(input = 42 :: INTEGER?) :: (answer :: NUMBER?)",
                    "description": null
                }
            }
        }"#,
    );

    let restarted = fixture.restart();
    let report = restarted.coordinator().reload().unwrap();
    assert_eq!(report.loaded_functions, vec!["answer".to_string()]);
    assert!(report.dropped.is_empty());

    let listing = restarted.coordinator().list();
    assert_eq!(
        listing[0].inputs,
        vec![("input".to_string(), "INTEGER".to_string())]
    );
    assert_eq!(
        listing[0].outputs,
        vec![("answer".to_string(), "NUMBER".to_string())]
    );
    assert_eq!(
        restarted.call_function("answer", Arguments::none()).unwrap(),
        Value::Integer(42)
    );
}

#[test]
fn test_corrupted_description_degrades_record() {
    let fixture = CatalogFixture::new();
    fixture.write_raw_blob(
        br#"{
            "procedures": {
                "hello": {
                    "statement": "RETURN 'hi' AS greeting",
                    "mode": "read",
                    "forceSingle": false,
                    "signature": "custom.hello() :: (greeting :: STRING)",
                    "description": "Says hi",
                    "inputs": [],
                    "outputs": [{"name": "greeting", "type": "STRING"}]
                }
            },
            "functions": {
                "nodescription": {
                    "statement": "RETURN 42 AS answer",
                    "mode": "read",
                    "forceSingle": true,
                    "signature": "custom.nodescription() :: INTEGER",
                    "description": {"present": false}
                }
            }
        }"#,
    );

    let restarted = fixture.restart();
    let report = restarted.coordinator().reload().unwrap();
    assert_eq!(report.loaded_procedures, vec!["hello".to_string()]);
    assert_eq!(report.loaded_functions, vec!["nodescription".to_string()]);
    assert!(report.dropped.is_empty());
    assert_eq!(report.degraded.len(), 1);
    assert_eq!(report.degraded[0].name, "nodescription");
    assert_eq!(report.degraded[0].fields, vec!["description".to_string()]);

    let listing = restarted.coordinator().list();
    assert_eq!(listing[0].description.as_deref(), Some("Says hi"));
    assert_eq!(listing[1].name, "nodescription");
    assert_eq!(listing[1].description, None);

    assert_eq!(
        restarted
            .call_function("nodescription", Arguments::none())
            .unwrap(),
        Value::Integer(42)
    );
    let rows = restarted.call_procedure("hello", Arguments::none()).unwrap();
    assert_eq!(rows[0].get_value("greeting"), Some(&Value::from("hi")));
}

#[test]
fn test_bad_records_are_dropped_individually() {
    let fixture = CatalogFixture::new();
    fixture.write_raw_blob(
        br#"{
            "procedures": {
                "good": {"statement": "RETURN 1 AS x", "mode": "read"},
                "no_statement": {"mode": "read"},
                "bad_mode": {"statement": "RETURN 1 AS x", "mode": "sideways"},
                "shared": {"statement": "RETURN 1 AS x"}
            },
            "functions": {
                "shared": {"statement": "RETURN 2 AS x"},
                "bad default": {
                    "statement": "RETURN $n AS n",
                    "inputs": [{"name": "n", "type": "INTEGER", "default": "[1,"}]
                }
            }
        }"#,
    );

    let restarted = fixture.restart();
    let report = restarted.coordinator().reload().unwrap();
    assert_eq!(
        report.loaded_procedures,
        vec!["good".to_string(), "shared".to_string()]
    );
    assert!(report.loaded_functions.is_empty());

    let mut dropped: Vec<_> = report
        .dropped
        .iter()
        .map(|d| (d.kind, d.name.as_str()))
        .collect();
    dropped.sort();
    assert_eq!(
        dropped,
        vec![
            (CallableKind::Procedure, "bad_mode"),
            (CallableKind::Procedure, "no_statement"),
            (CallableKind::Function, "bad default"),
            (CallableKind::Function, "shared"),
        ]
    );
    assert_eq!(
        restarted.coordinator().lifecycle_state(),
        LifecycleState::Ready
    );
}

#[test]
fn test_garbage_blob_fails_catalog_and_keeps_blob() {
    let fixture = CatalogFixture::new();
    fixture.write_raw_blob(b"not json at all");

    let restarted = fixture.restart();
    assert_eq!(
        restarted.coordinator().lifecycle_state(),
        LifecycleState::Failed
    );
    assert!(restarted.coordinator().list().is_empty());
    assert!(matches!(
        restarted
            .coordinator()
            .declare_function(&DefinitionRequest::new("f", "RETURN 1 AS x")),
        Err(CatalogError::NotReady(LifecycleState::Failed))
    ));

    // Failed catalogs never overwrite what is stored
    assert!(matches!(
        restarted.coordinator().reload(),
        Err(CatalogError::Codec(_))
    ));
    fixture.write_raw_blob(br#"{"procedures": {}, "functions": {}}"#);
    let report = restarted.coordinator().reload().unwrap();
    assert_eq!(report.loaded(), 0);
    assert_eq!(
        restarted.coordinator().lifecycle_state(),
        LifecycleState::Ready
    );
}

#[test]
fn test_unreadable_store_fails_catalog() {
    let fixture = CatalogFixture::new();
    fixture
        .coordinator()
        .declare_function(&DefinitionRequest::new("f", "RETURN 1 AS x"))
        .unwrap();

    fixture.faults().fail_reads(true);
    let restarted = fixture.restart();
    assert_eq!(
        restarted.coordinator().lifecycle_state(),
        LifecycleState::Failed
    );
    assert!(restarted.coordinator().list().is_empty());
    assert!(matches!(
        restarted
            .coordinator()
            .declare_function(&DefinitionRequest::new("g", "RETURN 2 AS x")),
        Err(CatalogError::NotReady(LifecycleState::Failed))
    ));

    fixture.faults().fail_reads(false);
    let report = restarted.coordinator().reload().unwrap();
    assert_eq!(report.loaded_functions, vec!["f".to_string()]);
}
