//! End-to-end tests for `zmkview kle`.

use std::fs;

mod fixtures;
use fixtures::*;

#[test]
fn test_kle_to_stdout() {
    let (doc_path, _doc_temp) = test_document_file();
    let output = run_isolated(&["kle", doc_path.to_str().unwrap()]);
    assert_exit_code(&output, 0);

    let kle: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse KLE JSON");
    let rows = kle.as_array().unwrap();

    // y=1 and y=1.5 stay in one row
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], serde_json::json!({"x": 0.0, "y": 0.0}));
    assert_eq!(rows[0][1], "Q");
    assert_eq!(rows[1].as_array().unwrap().len(), 6);
    assert_eq!(
        rows[1][2],
        serde_json::json!({"x": 1.0, "y": 0.5, "r": 15.0, "rx": 1.0, "ry": 1.5})
    );
    assert_eq!(rows[1][3], "THUMB");
}

#[test]
fn test_kle_layer_to_file() {
    let (doc_path, doc_temp) = test_document_file();
    let out_path = doc_temp.path().join("nav.kle.json");

    let output = run_isolated(&[
        "kle",
        doc_path.to_str().unwrap(),
        "--layer",
        "Nav",
        "-o",
        out_path.to_str().unwrap(),
    ]);
    assert_exit_code(&output, 0);

    let kle: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(kle[0], serde_json::json!({"name": "Nav"}));
    // Transparent key on Nav has an empty legend
    assert_eq!(kle[2][1], "");
}

#[test]
fn test_kle_unknown_layer() {
    let (doc_path, _doc_temp) = test_document_file();
    let output = run_isolated(&["kle", doc_path.to_str().unwrap(), "--layer", "Gaming"]);
    assert_exit_code(&output, 1);
}
