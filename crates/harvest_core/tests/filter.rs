use chrono::NaiveDate;
use harvest_core::{classify_row, RowDisposition};

fn target() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 21).unwrap()
}

#[test]
fn row_on_target_date_is_kept() {
    assert_eq!(classify_row("24.03.21", target()), RowDisposition::Keep);
}

#[test]
fn older_row_stops_the_session() {
    assert_eq!(
        classify_row("24.03.20", target()),
        RowDisposition::StopSession
    );
    // Older by more than a day still stops.
    assert_eq!(
        classify_row("23.12.31", target()),
        RowDisposition::StopSession
    );
}

#[test]
fn future_dated_row_is_ignored_not_stopped() {
    assert_eq!(classify_row("24.03.22", target()), RowDisposition::Ignore);
}

#[test]
fn malformed_date_is_ignored() {
    assert_eq!(classify_row("", target()), RowDisposition::Ignore);
    assert_eq!(classify_row("2024-03-21", target()), RowDisposition::Ignore);
    assert_eq!(classify_row("tomorrow", target()), RowDisposition::Ignore);
}

#[test]
fn surrounding_whitespace_is_tolerated() {
    assert_eq!(classify_row(" 24.03.21\n", target()), RowDisposition::Keep);
}
