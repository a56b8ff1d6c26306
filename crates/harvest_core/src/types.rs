use chrono::NaiveDate;

/// Date format used by the source listing, e.g. `24.03.21`.
pub const REPORT_DATE_FORMAT: &str = "%y.%m.%d";

/// Parses a listing date cell. Returns `None` for malformed text.
pub fn parse_report_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), REPORT_DATE_FORMAT).ok()
}

/// Renders a date back into the listing's `YY.MM.DD` form.
pub fn format_report_date(date: NaiveDate) -> String {
    date.format(REPORT_DATE_FORMAT).to_string()
}

/// One listing row as parsed from the portal table, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawListingRow {
    pub stock_name: String,
    pub title: String,
    pub company: String,
    /// First `<a href>` found in the attachment cell, if any.
    pub attachment_url: Option<String>,
    pub date_text: String,
    pub views_text: String,
}

/// One harvested listing row. Immutable once constructed; owned by the
/// session until handed to the report writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    pub stock_name: String,
    pub title: String,
    pub company: String,
    /// Present iff the listing carried a downloadable link. Absent means
    /// "no attachment", not an error.
    pub attachment_url: Option<String>,
    pub published: NaiveDate,
    pub views: u32,
}

impl ReportRecord {
    /// Builds a record from a raw row already classified as `Keep`.
    pub fn from_row(row: &RawListingRow, published: NaiveDate) -> Self {
        Self {
            stock_name: row.stock_name.clone(),
            title: row.title.clone(),
            company: row.company.clone(),
            attachment_url: row.attachment_url.clone(),
            published,
            views: parse_views(&row.views_text),
        }
    }
}

fn parse_views(text: &str) -> u32 {
    text.trim().replace(',', "").parse().unwrap_or(0)
}
