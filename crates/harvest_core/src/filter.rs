use chrono::NaiveDate;

use crate::types::parse_report_date;

/// Outcome of classifying one listing row against the target date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDisposition {
    /// Row is dated exactly on the target date; harvest it.
    Keep,
    /// Row is older than the target date. Nothing beyond this row can
    /// match, so pagination must stop after the current page.
    StopSession,
    /// Future-dated or malformed row; skipped without stopping.
    Ignore,
}

/// Classifies a row's date cell against `target`.
///
/// The stop rule relies on the portal returning rows sorted newest-first.
/// If the source ever emits out-of-order dates, `StopSession` will
/// truncate the session early; there is no recovery beyond that point.
pub fn classify_row(date_text: &str, target: NaiveDate) -> RowDisposition {
    match parse_report_date(date_text) {
        Some(date) if date == target => RowDisposition::Keep,
        Some(date) if date < target => RowDisposition::StopSession,
        _ => RowDisposition::Ignore,
    }
}
