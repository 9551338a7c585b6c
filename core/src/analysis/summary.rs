//! Best-effort carryover digest from freeform LLM output.
//!
//! This is a string heuristic, not a parse. The model is asked for a
//! "Summary" section but nothing guarantees it writes one.

/// Lines kept after the marker
const MAX_SUMMARY_LINES: usize = 5;
/// Characters kept when no marker is found
const FALLBACK_CHARS: usize = 200;

/// Digest following a line that mentions "summary" (any case), if there is one.
///
/// Collects up to five following lines that are non-empty and not `#` headings,
/// trimmed and joined with single spaces. Further marker lines are skipped.
pub fn locate_summary(response: &str) -> Option<String> {
    let mut found = false;
    let mut lines: Vec<&str> = Vec::new();
    for line in response.lines() {
        if is_marker(line) {
            found = true;
            continue;
        }
        if !found {
            continue;
        }
        if !line.trim().is_empty() && !line.starts_with('#') {
            lines.push(line.trim());
            if lines.len() >= MAX_SUMMARY_LINES {
                break;
            }
        }
    }
    found.then(|| lines.join(" "))
}

/// `locate_summary`, or the first 200 characters of the response
pub fn extract_summary(response: &str) -> String {
    locate_summary(response).unwrap_or_else(|| {
        response
            .chars()
            .take(FALLBACK_CHARS)
            .collect::<String>()
            .trim()
            .to_string()
    })
}

fn is_marker(line: &str) -> bool {
    line.to_lowercase().contains("summary")
}
