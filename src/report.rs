use serde_json::json;

use crate::types::DerefStats;

/// Formats the outcome of a dereference pass as plain text for a terminal.
///
/// `remaining` lists every pointer node still present in the document, as
/// `(location, pointer)` pairs.
pub fn format_report_as_text(stats: &DerefStats, remaining: &[(String, String)]) -> String {
    let mut out = String::new();

    if stats.skipped {
        out.push_str("Dereferencing disabled; document returned unchanged\n");
        return out;
    }

    out.push_str(&format!("Resolved:  {}\n", stats.resolved));
    out.push_str(&format!("Circular:  {}\n", stats.circular_paths.len()));
    out.push_str(&format!("Missing:   {}\n", stats.missing_paths.len()));

    if !stats.circular_paths.is_empty() {
        out.push_str("\nCircular references:\n");
        for path in &stats.circular_paths {
            out.push_str(&format!("  {}\n", path));
        }
    }

    if !remaining.is_empty() {
        out.push_str("\nUnresolved pointers:\n");
        for (path, pointer) in remaining {
            out.push_str(&format!("  {} -> {}\n", path, pointer));
        }
    }

    out
}

/// Formats the outcome of a dereference pass as a JSON string.
pub fn format_report_as_json(stats: &DerefStats, remaining: &[(String, String)]) -> String {
    let remaining: Vec<_> = remaining
        .iter()
        .map(|(path, pointer)| json!({ "path": path, "pointer": pointer }))
        .collect();

    let report = json!({
        "skipped": stats.skipped,
        "resolved": stats.resolved,
        "circular": stats.circular_paths,
        "missing": stats.missing_paths,
        "remaining": remaining,
    });

    serde_json::to_string_pretty(&report).unwrap_or_default()
}
