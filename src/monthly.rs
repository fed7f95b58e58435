//! Aggregation of daily series into calendar months.
//!
//! Use [summation](fn.summation.html) for fluxes such as precipitation or streamflow and
//! [average](fn.average.html) for states such as air temperature.  The first and last months
//! hold whatever days of them the series covers.
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// Aggregated value of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Month {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1 to 12.
    pub month: u32,
    /// Number of days of the month covered by the daily series.
    pub days: usize,
    /// Sum or mean of the daily values.
    pub value: f64,
}

/// Sum the values of `daily`, whose first value falls on `start`, by calendar month.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use exphydro::monthly;
///
/// let start = NaiveDate::from_ymd_opt(2001, 1, 30).unwrap();
/// let months = monthly::summation(&[1.0, 2.0, 3.0], start);
/// assert_eq!(months.len(), 2);
/// assert_eq!(months[0].value, 3.0);
/// assert_eq!(months[1].value, 3.0);
/// ```
pub fn summation(daily: &[f64], start: NaiveDate) -> Vec<Month> {
    group(daily, start)
}

/// Average the values of `daily`, whose first value falls on `start`, by calendar month.
pub fn average(daily: &[f64], start: NaiveDate) -> Vec<Month> {
    let mut months = group(daily, start);
    for m in months.iter_mut() {
        m.value /= m.days as f64;
    }
    months
}

fn group(daily: &[f64], start: NaiveDate) -> Vec<Month> {
    let mut months: Vec<Month> = Vec::new();
    for (i, value) in daily.iter().enumerate() {
        let day = start + Duration::days(i as i64);
        match months.last_mut() {
            Some(m) if m.year == day.year() && m.month == day.month() => {
                m.days += 1;
                m.value += value;
            }
            _ => months.push(Month {
                year: day.year(),
                month: day.month(),
                days: 1,
                value: *value,
            }),
        }
    }
    months
}
