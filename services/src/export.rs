//! CSV export of attendance rows.

use chrono::{DateTime, Utc};

use crate::attendance_report::AttendanceRow;

pub const CSV_HEADER: &str = "Student ID,Name,Email,Program,Session,Status,Time In,Time Out";
const MAX_FILENAME_STEM: usize = 50;

fn esc(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value.map(|t| t.to_rfc3339()).unwrap_or_default()
}

pub fn attendance_csv(rows: &[AttendanceRow]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for row in rows {
        let fields = [
            esc(&row.student_id_number),
            esc(&row.name),
            esc(row.email.as_deref().unwrap_or_default()),
            esc(row.program.as_deref().unwrap_or_default()),
            esc(&row.session_name),
            row.status.to_string(),
            timestamp(row.check_in_at),
            timestamp(row.check_out_at),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// `<sanitized event name>-attendance.csv`.
pub fn export_filename(event_name: &str) -> String {
    let kept: String = event_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    let stem: String = kept
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
        .chars()
        .take(MAX_FILENAME_STEM)
        .collect();

    if stem.is_empty() {
        "attendance.csv".to_owned()
    } else {
        format!("{stem}-attendance.csv")
    }
}
