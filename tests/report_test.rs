use apideref::report::*;
use apideref::types::DerefStats;

fn sample_stats() -> DerefStats {
    DerefStats {
        resolved: 4,
        circular_paths: vec!["#/definitions/Node/properties/child".to_string()],
        missing_paths: vec!["#/paths/~1pets/get/schema".to_string()],
        skipped: false,
    }
}

#[test]
fn test_text_report_lists_counts_and_pointers() {
    let remaining = vec![(
        "#/definitions/Node/properties/child".to_string(),
        "#/definitions/Node".to_string(),
    )];
    let text = format_report_as_text(&sample_stats(), &remaining);

    assert!(text.contains("Resolved:  4"));
    assert!(text.contains("Circular:  1"));
    assert!(text.contains("Missing:   1"));
    assert!(text.contains("Circular references:\n  #/definitions/Node/properties/child"));
    assert!(text.contains("#/definitions/Node/properties/child -> #/definitions/Node"));
}

#[test]
fn test_text_report_for_skipped_pass() {
    let stats = DerefStats {
        skipped: true,
        ..DerefStats::default()
    };
    let text = format_report_as_text(&stats, &[]);
    assert!(text.contains("disabled"));
    assert!(!text.contains("Resolved"));
}

#[test]
fn test_json_report_is_valid_json() {
    let remaining = vec![("#/a".to_string(), "#/b".to_string())];
    let text = format_report_as_json(&sample_stats(), &remaining);
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["resolved"], 4);
    assert_eq!(value["circular"][0], "#/definitions/Node/properties/child");
    assert_eq!(value["remaining"][0]["pointer"], "#/b");
    assert_eq!(value["skipped"], false);
}
