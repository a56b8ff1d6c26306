use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::WriterBuilder;

use harvest_core::{format_report_date, ReportRecord};

use crate::persist::{AtomicFileWriter, PersistError};

/// UTF-8 byte-order mark. Spreadsheet applications need it to pick the
/// right encoding for Hangul text.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Column names match the original portal vocabulary and are fixed:
/// stock, title, brokerage, attachment, published date, view count.
const CSV_HEADERS: [&str; 6] = ["종목명", "제목", "증권사", "첨부", "작성일", "조회수"];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Serializes the full record set of one run to
/// `{output_dir}/research_reports_{YYYYMMDD}.csv`.
///
/// A prior file for the same date is overwritten, never appended to: a
/// second run on the same day replaces the first run's output.
pub fn write_report_csv(
    output_dir: &Path,
    run_date: NaiveDate,
    records: &[ReportRecord],
) -> Result<PathBuf, ExportError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.write_record([
            record.stock_name.as_str(),
            record.title.as_str(),
            record.company.as_str(),
            record.attachment_url.as_deref().unwrap_or(""),
            format_report_date(record.published).as_str(),
            record.views.to_string().as_str(),
        ])?;
    }
    let body = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;

    let mut content = Vec::with_capacity(UTF8_BOM.len() + body.len());
    content.extend_from_slice(UTF8_BOM);
    content.extend_from_slice(&body);

    let filename = format!("research_reports_{}.csv", run_date.format("%Y%m%d"));
    let file_writer = AtomicFileWriter::new(output_dir.to_path_buf());
    Ok(file_writer.write(&filename, &content)?)
}
