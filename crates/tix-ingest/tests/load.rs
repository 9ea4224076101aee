//! File-level loading tests.

use std::io::Write;
use std::path::PathBuf;

use serde_json::json;
use tempfile::NamedTempFile;
use tix_ingest::{IngestError, SourcePaths, load_sources, load_staff, load_tickets};

fn export(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_tickets_from_json_array() {
    let file = export(
        br#"[
  {"_id": {"$oid": "65a1"}, "ticket_id": {"$numberLong": "12"}, "subject": "Printer",
   "activity_history": [{"staff_id": 5, "status": "open", "created_at": {"$date": "2024-01-01T00:00:00Z"}}]},
  {"_id": {"$oid": "65a2"}, "activity_history": null}
]"#,
    );
    let tickets = load_tickets(file.path()).unwrap();
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0].id, Some(json!({"$oid": "65a1"})));
    assert_eq!(tickets[0].activity_history.as_ref().map(Vec::len), Some(1));
    assert_eq!(tickets[1].activity_history, None);
}

#[test]
fn loads_staff_from_newline_delimited_export() {
    let file = export(b"\xEF\xBB\xBF{\"staff_id\": 5, \"name\": \"Ana\", \"role\": \"billing\"}\n\n{\"staff_id\": 6}\n");
    let staff = load_staff(file.path()).unwrap();
    assert_eq!(staff.len(), 2);
    assert_eq!(staff[0].name, Some(json!("Ana")));
    assert_eq!(staff[1].role, None);
}

#[test]
fn reports_line_of_malformed_document() {
    let file = export(b"{\"staff_id\": 5}\n{\"staff_id\": 6}\n{\"staff_id\": \n");
    match load_staff(file.path()).unwrap_err() {
        IngestError::JsonParse { line, path, .. } => {
            assert!(line >= 3);
            assert_eq!(path, file.path());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn skips_non_object_documents() {
    let file = export(b"[{\"_id\": \"a\"}, 42, null, [1], {\"_id\": \"b\"}]");
    let tickets = load_tickets(file.path()).unwrap();
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[1].id, Some(json!("b")));
}

#[test]
fn rejects_utf16_exports() {
    let file = export(&[0xFF, 0xFE, b'[', 0, b']', 0]);
    assert!(matches!(
        load_tickets(file.path()),
        Err(IngestError::UnsupportedEncoding { .. })
    ));
}

#[test]
fn missing_file_is_reported() {
    let paths = SourcePaths {
        tickets: PathBuf::from("/nonexistent/tickets.json"),
        staff: PathBuf::from("/nonexistent/staffs.json"),
    };
    assert!(matches!(
        load_sources(&paths),
        Err(IngestError::FileNotFound { .. })
    ));
}
