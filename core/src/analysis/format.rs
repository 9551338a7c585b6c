//! Render chunk events as prompt text

use super::record::Record;

/// Internal fields that still reach the prompt
const ALLOWED_INTERNAL_FIELDS: [&str; 2] = ["_time", "_raw"];

/// One labelled block per event, fields sorted by name, blocks separated by a blank line.
///
/// Fields starting with `_` are dropped except `_time` and `_raw`. Insertion
/// order of the input never affects the output.
pub fn format_events(events: &[Record]) -> String {
    events
        .iter()
        .enumerate()
        .map(|(idx, event)| format_event(idx + 1, event))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_event(index: usize, event: &Record) -> String {
    let mut out = format!("Event {index}:\n");
    if let Some(ts) = event.get("_time") {
        out.push_str(&format!("  Timestamp: {ts}\n"));
    }

    let mut fields: Vec<(&str, &str)> = event
        .iter()
        .filter(|(name, _)| !name.starts_with('_') || ALLOWED_INTERNAL_FIELDS.contains(name))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (name, value) in fields {
        out.push_str(&format!("  {name}: {value}\n"));
    }
    out
}
