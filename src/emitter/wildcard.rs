//! Wildcard handling shared by the emitters
//!
//! A bare `*` in a string value is a wildcard; `\*` is a literal star.

/// Does the string contain a wildcard (an unescaped `*`)?
pub(crate) fn has_wildcard(s: &str) -> bool {
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                // Consumes the escaped character, whatever it is
                chars.next();
            }
            '*' => return true,
            _ => {}
        }
    }
    false
}

/// Rewrite wildcards for SQL LIKE: `*` -> `%`, `\*` -> `*`
pub(crate) fn to_like_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push('*');
            }
            '*' => out.push('%'),
            _ => out.push(ch),
        }
    }
    out
}

/// Drop wildcard escapes: `\*` -> `*`, everything else verbatim
pub(crate) fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push('*');
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Build an anchored regex source from a glob: `*` matches any run,
/// `\*` a literal star, all other text literally
pub(crate) fn to_regex_source(s: &str) -> String {
    let mut out = String::from("^");
    let mut literal = String::new();
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'*') => {
                chars.next();
                literal.push('*');
            }
            '*' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(".*");
            }
            _ => literal.push(ch),
        }
    }
    out.push_str(&regex::escape(&literal));
    out.push('$');
    out
}
