//! Date pattern handling.
//!
//! ARFF date formats follow the Java `SimpleDateFormat` convention
//! (`yyyy-MM-dd'T'HH:mm:ss`). Patterns are translated to chrono strftime
//! items before use; a pattern that already contains `%` is taken as
//! strftime as-is.

use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{FormatError, Result};

/// Translate a `SimpleDateFormat` pattern to a chrono format string.
pub fn to_chrono_pattern(pattern: &str) -> String {
    if pattern.contains('%') {
        return pattern.to_string();
    }

    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // '' is a literal quote, otherwise copy until the closing quote
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() && chars[i] != '\'' {
                out.push(chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            out.push(c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while chars.get(i + run) == Some(&c) {
            run += 1;
        }

        let item = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1 | 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', _) => "%d",
            ('H', _) => "%H",
            ('k', _) => "%H",
            ('h', _) => "%I",
            ('m', _) => "%M",
            ('s', _) => "%S",
            ('S', _) => "%3f",
            ('a', _) => "%p",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('D', _) => "%j",
            ('Z', _) => "%z",
            ('X', _) => "%:z",
            _ => "",
        };

        if item.is_empty() {
            for _ in 0..run {
                out.push(c);
            }
        } else {
            out.push_str(item);
        }
        i += run;
    }

    out
}

/// Parse a date token against a chrono pattern.
///
/// Patterns without a time component parse to midnight.
pub(crate) fn parse_date(text: &str, chrono_pattern: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, chrono_pattern)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, chrono_pattern)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Format a date with a chrono pattern.
pub(crate) fn format_date(value: &NaiveDateTime, chrono_pattern: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", value.format(chrono_pattern)).map_err(|_| {
        FormatError::Config(format!("Invalid date pattern: {}", chrono_pattern))
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_default_pattern() {
        assert_eq!(
            to_chrono_pattern("yyyy-MM-dd'T'HH:mm:ss"),
            "%Y-%m-%dT%H:%M:%S"
        );
        assert_eq!(to_chrono_pattern("yyyy-MM-dd"), "%Y-%m-%d");
        assert_eq!(to_chrono_pattern("dd/MM/yy hh:mm a"), "%d/%m/%y %I:%M %p");
    }

    #[test]
    fn test_strftime_passthrough() {
        assert_eq!(to_chrono_pattern("%Y-%m-%d %H:%M:%S"), "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn test_parse_date_only_pattern() {
        let parsed = parse_date("2024-03-05", "%Y-%m-%d").unwrap();
        assert_eq!(parsed.to_string(), "2024-03-05 00:00:00");
    }

    #[test]
    fn test_parse_datetime() {
        let parsed = parse_date("2024-03-05T10:20:30", "%Y-%m-%dT%H:%M:%S").unwrap();
        assert_eq!(
            format_date(&parsed, "%Y-%m-%dT%H:%M:%S").unwrap(),
            "2024-03-05T10:20:30"
        );
        assert!(parse_date("yesterday", "%Y-%m-%d").is_none());
    }
}
