//! Field splitting for ARFF lines.
//!
//! Fields keep their quotes so that coercion can tell a quoted `'?'`
//! apart from the missing-value token.

use crate::error::{FormatError, Result};

/// Split text on a separator, honouring `'` and `"` quoting and backslash
/// escapes inside quotes. Returned fields are trimmed slices of the input.
pub(crate) fn split_fields(text: &str, separator: char) -> Result<Vec<&str>> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == separator => {
                fields.push(text[start..i].trim());
                start = i + c.len_utf8();
            }
            None => {}
        }
    }

    if let Some(q) = quote {
        return Err(FormatError::parse_found(
            None,
            format!("Unclosed quote {}", q),
            text,
        ));
    }

    fields.push(text[start..].trim());
    Ok(fields)
}

/// Split off the first token, quoted or whitespace-delimited.
///
/// Returns the raw token (quotes kept) and the trimmed remainder.
pub(crate) fn split_token(text: &str) -> Result<(&str, &str)> {
    let text = text.trim_start();
    let mut chars = text.char_indices();

    let end = match chars.next() {
        None => return Ok(("", "")),
        Some((_, q @ ('\'' | '"'))) => {
            let mut escaped = false;
            let mut close = None;
            for (i, c) in chars {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    close = Some(i + c.len_utf8());
                    break;
                }
            }
            close.ok_or_else(|| FormatError::parse_found(None, "Unclosed quote", text))?
        }
        Some(_) => text
            .char_indices()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, _)| i)
            .unwrap_or(text.len()),
    };

    Ok((&text[..end], text[end..].trim()))
}
