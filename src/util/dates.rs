//! Display formatting for `YYYY-MM-DD` post dates.

use std::str::FromStr;

use serde::Deserialize;
use time::{Date, format_description::FormatItem, macros::format_description};

const ISO_DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const SLASHED_DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]/[month]/[day]");

const FULL_FORMAT: &[FormatItem<'static>] =
    format_description!("[weekday repr:long], [month repr:long] [day padding:none], [year]");
const LONG_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");
const MEDIUM_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");
const SHORT_FORMAT: &[FormatItem<'static>] =
    format_description!("[month padding:none]/[day padding:none]/[year repr:last_two]");

/// English date styles mirroring the usual `full`/`long`/`medium`/`short` presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStyle {
    Full,
    #[default]
    Long,
    Medium,
    Short,
}

impl DateStyle {
    fn format(self) -> &'static [FormatItem<'static>] {
        match self {
            DateStyle::Full => FULL_FORMAT,
            DateStyle::Long => LONG_FORMAT,
            DateStyle::Medium => MEDIUM_FORMAT,
            DateStyle::Short => SHORT_FORMAT,
        }
    }
}

impl FromStr for DateStyle {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "full" => Ok(DateStyle::Full),
            "long" => Ok(DateStyle::Long),
            "medium" => Ok(DateStyle::Medium),
            "short" => Ok(DateStyle::Short),
            other => Err(format!("unknown date style `{other}`")),
        }
    }
}

/// Parse `YYYY-MM-DD`, also accepting `/` separators.
pub fn parse_post_date(value: &str) -> Option<Date> {
    let value = value.trim();
    Date::parse(value, ISO_DATE_FORMAT)
        .or_else(|_| Date::parse(value, SLASHED_DATE_FORMAT))
        .ok()
}

/// Format a post date for display. Input that does not parse is returned as is.
pub fn format_date(value: &str, style: DateStyle) -> String {
    parse_post_date(value)
        .and_then(|date| date.format(style.format()).ok())
        .unwrap_or_else(|| value.to_string())
}

/// Rewrite `YYYY-MM-DD` as `DD/MM/YYYY` for the archive table.
///
/// Anything that does not split into exactly three dash-separated parts is
/// returned unchanged.
pub fn convert_date_separators(value: &str) -> String {
    let parts: Vec<&str> = value.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{day}/{month}/{year}"),
        _ => value.to_string(),
    }
}
