/// Local-calendar date helpers
///
/// "Today" throughout the system is the local calendar day, not UTC. All
/// entry dates use the `YYYY-MM-DD` shape.

use chrono::{Duration, Local, NaiveDate};

/// The current local calendar day
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date as `YYYY-MM-DD`
pub fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The last `n` local days in chronological order, ending today
pub fn last_n_days(n: u32) -> Vec<NaiveDate> {
    let today = today_local();
    (0..i64::from(n))
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}

/// Short weekday label for a date, e.g. "Mon"
pub fn short_label(date: NaiveDate) -> String {
    date.format("%a").to_string()
}
