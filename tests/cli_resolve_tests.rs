//! End-to-end tests for `zmkview resolve`.

mod fixtures;
use fixtures::*;

#[test]
fn test_resolve_text_output() {
    let output = run_isolated(&["resolve", "q", "LS(N1)"]);
    assert_exit_code(&output, 0);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Input:    q\nText:     Q"));
    assert!(stdout.contains("Input:    LS(N1)\nText:     Shift+1"));
    assert!(stdout.contains("(html)"));
}

#[test]
fn test_resolve_json_output() {
    let output = run_isolated(&["resolve", "--json", "&kp", "SOMETHING_UNKNOWN", "LS(N1)"]);
    assert_exit_code(&output, 0);

    let results: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON output");
    let results = results.as_array().expect("Should be an array");
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["input"], "&kp");
    assert_eq!(results[0]["text"], "&kp");
    assert_eq!(results[0]["rendered"], "&amp;kp");

    assert_eq!(results[1]["text"], "SOMETHING_UNKNOWN");
    assert_eq!(results[1]["html"], "");
    assert!(results[1].get("icon").is_none());

    assert_eq!(results[2]["text"], "Shift+1");
    assert!(results[2]["html"]
        .as_str()
        .unwrap()
        .starts_with(r#"<span class="combined">"#));
}

#[test]
fn test_resolve_text_mode() {
    let output = run_isolated(&["resolve", "--json", "--mode", "text", "LS(N1)"]);
    assert_exit_code(&output, 0);

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results[0]["rendered"], "Shift+1");
}

#[test]
fn test_resolve_requires_a_token() {
    let output = run_isolated(&["resolve"]);
    assert_eq!(output.status.code(), Some(2));
}
