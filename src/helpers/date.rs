//! Date helper functions

use chrono::{DateTime, Datelike, TimeZone};

/// Pattern used for every publication date on the site
pub const PUBLICATION_DATE_FORMAT: &str = "DD MMM YYYY";

/// Abbreviated month names, Brazilian Portuguese
pub const PT_BR_MONTHS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Format a date using a Moment.js-compatible format string with pt-BR
/// month names
///
/// # Examples
/// ```ignore
/// format_date(&date, "DD MMM YYYY") // -> "25 mar 2021"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let month = date.month0() as usize;
    // Month names are substituted before chrono sees the pattern
    let chrono_format = moment_to_chrono_format(format).replace("%b", PT_BR_MONTHS[month]);
    date.format(&chrono_format).to_string()
}

/// Publication date as shown in listings and post headers, in `tz`
pub fn publication_date<Tz: TimeZone, Z: TimeZone>(date: &DateTime<Tz>, tz: &Z) -> String
where
    Z::Offset: std::fmt::Display,
{
    format_date(&date.with_timezone(tz), PUBLICATION_DATE_FORMAT)
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest patterns first within each category
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
