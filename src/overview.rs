use crate::models::{Overview, VisitRecord, VisitRow};
use chrono::{Datelike, NaiveDate};

/// Derives everything the page shows from the raw records, relative to `today`.
pub fn build_overview_at(today: NaiveDate, records: &[VisitRecord]) -> Overview {
    Overview {
        month: today.format("%Y-%m").to_string(),
        month_count: month_count_at(today, records),
        visits: records.iter().map(visit_row).collect(),
    }
}

/// Number of visits falling in the same calendar month and year as `today`.
pub fn month_count_at(today: NaiveDate, records: &[VisitRecord]) -> usize {
    records
        .iter()
        .filter(|record| record.date.year() == today.year() && record.date.month() == today.month())
        .count()
}

pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

fn visit_row(record: &VisitRecord) -> VisitRow {
    VisitRow {
        date: record.key.clone(),
        weekday: weekday_name(record.date),
    }
}
