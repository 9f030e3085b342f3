//! Shared low-level helpers used throughout the parser: line splitting,
//! ASCII case folding, numeric validation, and UTF-8-safe truncation.

/// Split `line` on `delim` and report how many fields were found.
///
/// Mirrors the original `split(line, fields[], expected, delim)` contract:
/// the caller always gets back every field it would have gotten from a
/// correctly-shaped line, plus the observed field count, so it can decide
/// whether to trust the result. A line with too many fields yields exactly
/// `expected` entries (the last one absorbing any trailing delimiters) along
/// with the inflated observed count, matching how the original accumulates
/// an error rather than discarding data.
pub fn split(line: &str, expected: usize) -> (Vec<String>, usize) {
    split_on(line, expected, ';')
}

/// `split` with an explicit delimiter, used for both `;`-delimited CSV rows
/// and `,`-delimited sub-fields (alt route names, connected-route roots).
pub fn split_on(line: &str, expected: usize, delim: char) -> (Vec<String>, usize) {
    let raw: Vec<&str> = line.split(delim).collect();
    let observed = raw.len();
    let mut fields: Vec<String> = if raw.len() <= expected {
        raw.iter().map(|s| s.to_string()).collect()
    } else {
        let mut v: Vec<String> =
            raw[..expected - 1].iter().map(|s| s.to_string()).collect();
        v.push(raw[expected - 1..].join(&delim.to_string()));
        v
    };
    while fields.len() < expected {
        fields.push(String::new());
    }
    (fields, observed)
}

/// In-place ASCII-only case fold to lowercase. Non-ASCII bytes pass through
/// unchanged so hash keys stay deterministic across locales.
pub fn lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// In-place ASCII-only case fold to uppercase.
pub fn upper(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_uppercase() } else { c })
        .collect()
}

/// Returns true iff the prefix of `s` ending at the first occurrence of
/// `terminator` (or the end of the string) parses as a decimal number:
/// optional sign, digits, optional `.digits`, optional exponent.
pub fn valid_num_str(s: &str, terminator: char) -> bool {
    let prefix = match s.find(terminator) {
        Some(pos) => &s[..pos],
        None => s,
    };
    if prefix.is_empty() {
        return false;
    }
    let mut chars = prefix.chars().peekable();
    if matches!(chars.peek(), Some('+') | Some('-')) {
        chars.next();
    }
    let mut saw_digit = false;
    while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
        chars.next();
        saw_digit = true;
    }
    if chars.peek() == Some(&'.') {
        chars.next();
        while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
            chars.next();
            saw_digit = true;
        }
    }
    if !saw_digit {
        return false;
    }
    if matches!(chars.peek(), Some('e') | Some('E')) {
        chars.next();
        if matches!(chars.peek(), Some('+') | Some('-')) {
            chars.next();
        }
        let mut saw_exp_digit = false;
        while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
            chars.next();
            saw_exp_digit = true;
        }
        if !saw_exp_digit {
            return false;
        }
    }
    chars.next().is_none()
}

/// Truncate `s` to at most `max_bytes` bytes, stripping any partial UTF-8
/// continuation sequence left dangling at the cut point, for bounding
/// datacheck info strings and overlong labels.
pub fn truncate_utf8_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
