//! ARFF quoting and unquoting of single values.

use std::borrow::Cow;

/// Quote a value if it would otherwise be misread.
///
/// Values are single-quoted when empty, equal to the missing-value token,
/// starting with `@`, or containing whitespace, separators, braces, quotes,
/// `%` or `\`.
pub fn quote_if_needed<'a>(value: &'a str, missing: &str) -> Cow<'a, str> {
    let needs_quoting = value.is_empty()
        || value == missing
        || value.starts_with('@')
        || value.chars().any(|c| {
            c.is_whitespace() || matches!(c, ',' | '%' | '{' | '}' | '\'' | '"' | '\\')
        });

    if !needs_quoting {
        return Cow::Borrowed(value);
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\'' => quoted.push_str("\\'"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    Cow::Owned(quoted)
}

/// Strip surrounding quotes and resolve backslash escapes.
///
/// Returns None if the text is not a quoted token.
pub fn unquote(text: &str) -> Option<String> {
    let mut chars = text.chars();
    let open = chars.next()?;
    if open != '\'' && open != '"' {
        return None;
    }
    if text.len() < 2 || !text.ends_with(open) {
        return None;
    }

    let inner = &text[1..text.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut iter = inner.chars();
    while let Some(c) = iter.next() {
        if c == '\\' {
            match iter.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values_are_not_quoted() {
        assert_eq!(quote_if_needed("abc", "?"), "abc");
        assert_eq!(quote_if_needed("what?", "?"), "what?");
        assert_eq!(quote_if_needed("1.5", "?"), "1.5");
    }

    #[test]
    fn test_special_values_are_quoted() {
        assert_eq!(quote_if_needed("", "?"), "''");
        assert_eq!(quote_if_needed("?", "?"), "'?'");
        assert_eq!(quote_if_needed("a b", "?"), "'a b'");
        assert_eq!(quote_if_needed("a,b", "?"), "'a,b'");
        assert_eq!(quote_if_needed("it's", "?"), "'it\\'s'");
        assert_eq!(quote_if_needed(" padded", "?"), "' padded'");
        assert_eq!(quote_if_needed("@data", "?"), "'@data'");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'a b'"), Some("a b".to_string()));
        assert_eq!(unquote("\"x,y\""), Some("x,y".to_string()));
        assert_eq!(unquote("'it\\'s'"), Some("it's".to_string()));
        assert_eq!(unquote("''"), Some(String::new()));
        assert_eq!(unquote("plain"), None);
        assert_eq!(unquote("'"), None);
        assert_eq!(unquote("'open"), None);
    }

    #[test]
    fn test_quote_then_unquote() {
        for value in ["line\nbreak", "tab\there", "back\\slash", "'", "{x}"] {
            let quoted = quote_if_needed(value, "?");
            assert_eq!(unquote(&quoted).as_deref(), Some(value));
        }
    }
}
