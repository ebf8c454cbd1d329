//! Calendar bucketing for dashboard trend series.
//!
//! Every granularity is a plain group-and-count over the events that fall in
//! its trailing window. Empty buckets are never emitted.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};

pub const DASHBOARD_WEEKS: u32 = 6;
pub const ANALYTICS_WEEKS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Calendar months over the trailing twelve months.
    Month,
    /// Trailing seven-day windows counted back from `now`.
    Week(u32),
    /// Spring (Jan-Jun) and Fall (Jul-Dec) over the trailing two years.
    Semester,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

pub fn bucket<I>(timestamps: I, granularity: Granularity, now: NaiveDateTime) -> Vec<Bucket>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    match granularity {
        Granularity::Month => by_month(timestamps, now),
        Granularity::Week(weeks) => by_trailing_week(timestamps, weeks, now),
        Granularity::Semester => by_semester(timestamps, now),
    }
}

fn months_before(now: NaiveDateTime, months: u32) -> NaiveDateTime {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDateTime::MIN)
}

fn by_month<I>(timestamps: I, now: NaiveDateTime) -> Vec<Bucket>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    let cutoff = months_before(now, 12);
    // Keyed by the first day of the month.
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();

    for ts in timestamps.into_iter().filter(|ts| *ts >= cutoff) {
        if let Some(month) = ts.date().with_day(1) {
            *counts.entry(month).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(month, count)| Bucket {
            label: month.format("%b %Y").to_string(),
            count,
        })
        .collect()
}

/// Week `k` covers the days `[7(k-1), 7k)` before today, so "Week 1" is the
/// most recent seven days. Buckets are relative to `now`, not to calendar
/// weeks: the same event moves to a higher `k` as time passes. Output runs
/// oldest first.
fn by_trailing_week<I>(timestamps: I, weeks: u32, now: NaiveDateTime) -> Vec<Bucket>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    let today = i64::from(now.date().num_days_from_ce());
    let horizon = 7 * i64::from(weeks);
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();

    for ts in timestamps {
        let days = today - i64::from(ts.date().num_days_from_ce());
        if !(0..horizon).contains(&days) {
            continue;
        }
        *counts.entry(days / 7 + 1).or_default() += 1;
    }

    counts
        .into_iter()
        .rev()
        .map(|(k, count)| Bucket {
            label: format!("Week {k}"),
            count,
        })
        .collect()
}

fn by_semester<I>(timestamps: I, now: NaiveDateTime) -> Vec<Bucket>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    let cutoff = months_before(now, 24);
    // (year, 0 = Spring | 1 = Fall) so Spring sorts before Fall.
    let mut counts: BTreeMap<(i32, u8), usize> = BTreeMap::new();

    for ts in timestamps.into_iter().filter(|ts| *ts >= cutoff) {
        let half = if ts.month0() < 6 { 0 } else { 1 };
        *counts.entry((ts.year(), half)).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((year, half), count)| Bucket {
            label: format!("{} {}", if half == 0 { "Spring" } else { "Fall" }, year),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn labels(buckets: &[Bucket]) -> Vec<(&str, usize)> {
        buckets.iter().map(|b| (b.label.as_str(), b.count)).collect()
    }

    #[test]
    fn month_window_boundary() {
        let now = at(2026, 10, 16);
        let exactly_twelve = at(2025, 10, 16);
        let one_day_older = at(2025, 10, 15);

        let buckets = bucket([exactly_twelve, one_day_older], Granularity::Month, now);
        assert_eq!(labels(&buckets), vec![("Oct 2025", 1)]);
    }

    #[test]
    fn months_are_chronological_without_zero_fill() {
        let now = at(2026, 3, 10);
        let events = [at(2026, 2, 1), at(2025, 6, 3), at(2026, 2, 20), at(2025, 12, 31)];

        let buckets = bucket(events, Granularity::Month, now);
        assert_eq!(
            labels(&buckets),
            vec![("Jun 2025", 1), ("Dec 2025", 1), ("Feb 2026", 2)]
        );
    }

    #[test]
    fn semester_split_between_june_and_july() {
        let now = at(2026, 10, 1);
        let buckets = bucket([at(2026, 6, 30), at(2026, 7, 1)], Granularity::Semester, now);
        assert_eq!(labels(&buckets), vec![("Spring 2026", 1), ("Fall 2026", 1)]);
    }

    #[test]
    fn semester_window_is_two_years() {
        let now = at(2026, 10, 1);
        let events = [at(2024, 9, 30), at(2024, 10, 1), at(2025, 2, 14), at(2025, 1, 3)];

        let buckets = bucket(events, Granularity::Semester, now);
        assert_eq!(labels(&buckets), vec![("Fall 2024", 1), ("Spring 2025", 2)]);
    }

    #[test]
    fn trailing_weeks_count_back_from_now() {
        let now = at(2026, 10, 16);
        let events = [
            now,
            now - Duration::days(6),
            now - Duration::days(7),
            now - Duration::days(20),
            now - Duration::days(55),
            now - Duration::days(56),
        ];

        let buckets = bucket(events, Granularity::Week(ANALYTICS_WEEKS), now);
        assert_eq!(
            labels(&buckets),
            vec![("Week 8", 1), ("Week 3", 1), ("Week 2", 1), ("Week 1", 2)]
        );
    }

    #[test]
    fn dashboard_week_window_is_shorter() {
        let now = at(2026, 10, 16);
        let events = [now - Duration::days(41), now - Duration::days(42)];

        let buckets = bucket(events, Granularity::Week(DASHBOARD_WEEKS), now);
        assert_eq!(labels(&buckets), vec![("Week 6", 1)]);
    }

    #[test]
    fn future_events_are_not_in_any_week() {
        let now = at(2026, 10, 16);
        let buckets = bucket([now + Duration::days(1)], Granularity::Week(8), now);
        assert!(buckets.is_empty());
    }

    #[test]
    fn empty_input_yields_no_buckets() {
        let now = at(2026, 10, 16);
        for granularity in [Granularity::Month, Granularity::Week(8), Granularity::Semester] {
            assert!(bucket(Vec::new(), granularity, now).is_empty());
        }
    }
}
