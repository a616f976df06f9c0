use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use std::borrow::Cow;

use crate::errors::*;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_OF_DAY_FORMAT: &str = "%H:%M";

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub fn parse_time_of_day(time: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(time, TIME_OF_DAY_FORMAT)
        .chain_err(|| format!("Invalid time of day (HH:MM): {}", time))
}

pub fn parse_weekday(weekday: &str) -> Result<Weekday> {
    weekday
        .parse::<Weekday>()
        .map_err(|_| Error::from(format!("Invalid day of week: {}", weekday)))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .expect("Every month should have a first day")
}

pub fn first_of_previous_month(date: NaiveDate) -> NaiveDate {
    first_of_month(last_of_previous_month(date))
}

pub fn last_of_previous_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date) - Duration::days(1)
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let first_of_next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
    .expect("First of next month should be a valid date");
    last_of_previous_month(first_of_next_month).day()
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn escape_html(text: &str) -> Cow<str> {
    if !text.contains(|c| matches!(c, '&' | '<' | '>' | '"' | '\'')) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

pub fn format_error_chain(error: &Error) -> String {
    error
        .iter()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}
