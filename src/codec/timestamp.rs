//! Transaction timestamp format.

use chrono::{DateTime, Utc};

/// Wire format, always 19 characters.
const TIMESTAMP_FORMAT: &str = "%Y:%m:%d-%H:%M:%S";

/// Zero-pad single digit numbers to two characters.
pub fn pad_number(num: i32) -> String {
    if (0..10).contains(&num) {
        format!("0{}", num)
    } else {
        num.to_string()
    }
}

/// Format a UTC instant as `YYYY:MM:DD-HH:MM:SS`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current UTC time in transaction timestamp format.
pub fn formatted_timestamp() -> String {
    format_timestamp(Utc::now())
}
