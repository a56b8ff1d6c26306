//! Pure domain logic for the report harvester: record types, the
//! date-window row classifier, trigger-time arithmetic and the durable
//! scheduler state. No IO lives in this crate.
mod filter;
mod schedule;
mod state;
mod types;

pub use filter::{classify_row, RowDisposition};
pub use schedule::{next_run_after, TriggerTimes};
pub use state::SchedulerState;
pub use types::{
    format_report_date, parse_report_date, RawListingRow, ReportRecord, REPORT_DATE_FORMAT,
};
