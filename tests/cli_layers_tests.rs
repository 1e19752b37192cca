//! End-to-end tests for `zmkview layers`.

mod fixtures;
use fixtures::*;

#[test]
fn test_layers_text_output() {
    let (doc_path, _doc_temp) = test_document_file();
    let output = run_isolated(&["layers", doc_path.to_str().unwrap()]);
    assert_exit_code(&output, 0);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Layer 0 (Base)\n"));
    assert!(stdout.contains("├─→ &lt 1 SPACE on key 4 (THUMB) → Layer 1 (Nav)"));
    assert!(stdout.contains("└─→ &mo 2 on key 5 (LEC) → Layer 2 (Sym)"));
    assert!(stdout.contains("Layer 1 (Nav) [activated by key 4 (THUMB)]"));
    assert!(stdout.contains("└─→ &to 0 on key 5 (LEC) → Layer 0 (Base)"));
    assert!(stdout.contains("Layer 2 (Sym) [activated by key 5 (LEC)]"));
    assert!(stdout.contains("Warnings:"));
    assert!(stdout.contains("⚠ Layer 'Nav' key 4 is '&kp ESC'"));
}

#[test]
fn test_layers_json_output() {
    let (doc_path, _doc_temp) = test_document_file();
    let output = run_isolated(&["layers", "--json", doc_path.to_str().unwrap()]);
    assert_exit_code(&output, 0);

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON output");

    let layers = report["layers"].as_array().expect("layers should be an array");
    assert_eq!(layers.len(), 3);
    assert_eq!(layers[0]["name"], "Base");
    assert!(layers[0]["activation_key"].is_null());
    assert_eq!(layers[1]["activation_key"], 4);
    assert_eq!(layers[2]["activation_key"], 5);

    assert_eq!(layers[1]["inbound"][0]["from_layer"], "Base");
    assert_eq!(layers[1]["inbound"][0]["kind"], "layer_tap");

    assert_eq!(report["warnings"].as_array().unwrap().len(), 1);
}

#[test]
fn test_layers_missing_document() {
    let output = run_isolated(&["layers", "/nonexistent/keymap.json"]);
    assert_exit_code(&output, 2);
}
