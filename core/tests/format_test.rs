use dfir_copilot_core::analysis::{extract_summary, format_events, locate_summary, Record};

#[test]
fn field_order_does_not_change_formatting() {
    let a = Record::new()
        .with("src_ip", "10.0.0.5")
        .with("user", "admin")
        .with("action", "logon");
    let b = Record::new()
        .with("action", "logon")
        .with("src_ip", "10.0.0.5")
        .with("user", "admin");
    assert_eq!(format_events(&[a]), format_events(&[b]));
}

#[test]
fn internal_fields_dropped_except_time_and_raw() {
    let rec: Record = serde_json::from_str(
        r#"{"_raw":"4624 An account was successfully logged on","_cd":"1:23","_time":"1700000000","host":"dc01","_serial":"0"}"#,
    )
    .unwrap();
    let text = format_events(&[rec]);
    assert_eq!(
        text,
        "Event 1:\n  Timestamp: 1700000000\n  _raw: 4624 An account was successfully logged on\n  _time: 1700000000\n  host: dc01\n"
    );
}

#[test]
fn events_are_numbered_and_separated() {
    let evs = vec![
        Record::new().with("host", "a"),
        Record::new().with("host", "b"),
    ];
    assert_eq!(
        format_events(&evs),
        "Event 1:\n  host: a\n\nEvent 2:\n  host: b\n"
    );
}

#[test]
fn no_timestamp_line_without_time_field() {
    let text = format_events(&[Record::new().with("host", "a")]);
    assert!(!text.contains("Timestamp"));
}

#[test]
fn summary_marker_followed_by_three_lines() {
    let response = "1. Key Findings\n- brute force\n\nSummary\nFailed logons from one IP.\nFollowed by a success.\nAccount: svc_backup\n";
    assert_eq!(
        extract_summary(response),
        "Failed logons from one IP. Followed by a success. Account: svc_backup"
    );
}

#[test]
fn no_marker_falls_back_to_first_200_chars() {
    let response = "x".repeat(500);
    assert_eq!(extract_summary(&response), "x".repeat(200));
    assert_eq!(locate_summary(&response), None);
}

#[test]
fn marker_without_body_is_empty_digest() {
    assert_eq!(locate_summary("Findings\nSUMMARY").as_deref(), Some(""));
}
