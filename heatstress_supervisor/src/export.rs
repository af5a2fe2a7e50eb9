//! Flat CSV rendering of the audit log.

use chrono::{DateTime, Utc};

use heatstress_core::{AuditLog, HeatError, AUDIT_COLUMNS};

use crate::session::HeatSession;

/// Quote a field when it holds a delimiter, quote or line break.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn push_record<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let line: Vec<String> = fields.iter().map(|f| csv_field(f.as_ref())).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Header plus one line per entry, insertion order. An empty log yields "".
pub fn render_csv(log: &AuditLog) -> String {
    if log.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    push_record(&mut out, &AUDIT_COLUMNS);
    for row in log.rows() {
        push_record(&mut out, &row);
    }
    out
}

/// Gated on the session's applied-penalties flag, not on log size.
pub fn export_csv(session: &HeatSession) -> Result<String, HeatError> {
    if !session.export_enabled() {
        return Err(HeatError::ExportDisabled);
    }
    Ok(render_csv(session.audit()))
}

pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("CHSRMT_Audit_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
