//! Label datacheck predicates. Each takes the label text (and the handful
//! of route fields a few rules need) and reports whether it fires, plus any
//! `info` payload. Gating — visible-vs-hidden, country, first-vs-interior —
//! lives in the reader driver, not here.

/// `label == "*"` is an automatic hit; otherwise scan for any byte outside
/// `[A-Za-z0-9()*+/._]`, with `*`/`+` only valid at position 0. Bytes are
/// tested as signed (so any non-ASCII byte trips the range checks) to match
/// the original scan exactly.
pub fn label_invalid_char(label: &str) -> Option<String> {
    if label == "*" {
        return Some(String::new());
    }
    for (idx, &b) in label.as_bytes().iter().enumerate() {
        if invalid_primary_byte(b, idx) {
            if label.as_bytes().starts_with(&[0xEF, 0xBB, 0xBF]) {
                return Some("UTF-8 BOM".to_string());
            }
            return Some(String::new());
        }
    }
    None
}

fn invalid_primary_byte(b: u8, idx: usize) -> bool {
    let signed = b as i8;
    ((b == b'*' || b == b'+') && idx > 0)
        || signed < 40
        || b == b','
        || (b > 57 && b < 65)
        || b == 96
        || b > 122
        || (b > 90 && b < 95)
}

/// Same scan for an alt label: `*` is only valid at position 1 of a label
/// starting with `+`.
pub fn alt_label_invalid_char(label: &str) -> bool {
    if label == "*" {
        return true;
    }
    let bytes = label.as_bytes();
    let starts_with_plus = bytes.first() == Some(&b'+');
    for (idx, &b) in bytes.iter().enumerate() {
        let invalid = (b == b'+' && idx > 0)
            || (b == b'*' && (idx > 1 || !starts_with_plus))
            || (b as i8) < 40
            || b == b','
            || (b > 57 && b < 65)
            || b == 96
            || b > 122
            || (b > 90 && b < 95);
        if invalid {
            return true;
        }
    }
    false
}

/// `*?I-\d+[EWCNSewcns]?Bus` — an interstate business route spelled "Bus"
/// instead of "BL"/"BS".
pub fn bus_with_i(label: &str) -> bool {
    let bytes = label.as_bytes();
    let mut i = 0;
    if bytes.get(i) == Some(&b'*') {
        i += 1;
    }
    if bytes.get(i) != Some(&b'I') || bytes.get(i + 1) != Some(&b'-') {
        return false;
    }
    i += 2;
    if !bytes.get(i).is_some_and(u8::is_ascii_digit) {
        return false;
    }
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    if matches!(bytes.get(i), Some(b'E' | b'W' | b'C' | b'N' | b'S' | b'e' | b'w' | b'c' | b'n' | b's')) {
        i += 1;
    }
    matches!(bytes.get(i), Some(b'B' | b'b'))
        && matches!(bytes.get(i + 1), Some(b'u' | b'U'))
        && matches!(bytes.get(i + 2), Some(b's' | b'S'))
}

/// `*?(To)?I\d` — a bare `I` immediately followed by a digit, missing its
/// hyphen.
pub fn interstate_no_hyphen(label: &str) -> bool {
    let bytes = label.as_bytes();
    let mut i = if bytes.first() == Some(&b'*') { 1 } else { 0 };
    if bytes.get(i) == Some(&b'T') && bytes.get(i + 1) == Some(&b'o') {
        i += 2;
    }
    bytes.get(i) == Some(&b'I') && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)
}

/// `(first_char_finding, final_char_finding)`: first char (after stripping
/// leading `*`s) is `_`, `/`, or `(`; final char is `_` or `/`.
pub fn label_invalid_ends(label: &str) -> (Option<char>, Option<char>) {
    let stripped = label.trim_start_matches('*');
    let first = stripped.chars().next().filter(|&c| c == '_' || c == '/' || c == '(');
    let last = label.chars().last().filter(|&c| c == '_' || c == '/');
    (first, last)
}

/// Exactly 7 characters, `X` followed by 6 digits.
pub fn label_looks_hidden(label: &str) -> bool {
    let bytes = label.as_bytes();
    bytes.len() == 7 && bytes[0] == b'X' && bytes[1..7].iter().all(u8::is_ascii_digit)
}

/// Unbalanced, nested, or right-before-left parentheses.
pub fn label_parens(label: &str) -> bool {
    let mut parens: i32 = 0;
    let mut left: Option<usize> = None;
    let mut right: Option<usize> = None;
    for (idx, c) in label.char_indices() {
        if c == '(' {
            if left.is_some() {
                return true;
            }
            left = Some(idx);
            parens += 1;
        } else if c == ')' {
            right = Some(idx);
            parens -= 1;
        }
    }
    parens != 0 || matches!((left, right), (Some(l), Some(r)) if r < l)
}

/// The label begins with (or, after a slash, numerically matches) the
/// route's own `route+banner`.
pub fn label_selfref(label: &str, route_route: &str, route_banner: &str) -> bool {
    if let Some(slash_pos) = label.find('/') {
        let after_slash = &label[slash_pos + 1..];
        if route_route.as_bytes().last().is_some_and(u8::is_ascii_digit) {
            let digit_start = route_route
                .as_bytes()
                .iter()
                .rposition(|b| !b.is_ascii_digit())
                .map(|p| p + 1)
                .unwrap_or(0);
            let numeric_suffix = &route_route[digit_start..];
            if after_slash == numeric_suffix || after_slash == route_route {
                return true;
            }
            if let Some(us_pos) = after_slash.find('_') {
                let prefix = &after_slash[..us_pos];
                if prefix == numeric_suffix || prefix == route_route {
                    return true;
                }
            }
        }
    }
    let rte_ban = format!("{}{}", route_route, route_banner);
    if let Some(rest) = label.strip_prefix(rte_ban.as_str()) {
        return rest.is_empty() || rest.starts_with('_') || rest.starts_with('/');
    }
    false
}

/// More than one `/` in the label.
pub fn label_slashes(label: &str) -> bool {
    label.match_indices('/').count() > 1
}

/// Starts with `Old` (case-insensitive `O`/`l`/`d`) immediately followed by
/// a digit.
pub fn lacks_generic(label: &str) -> bool {
    let stripped = label.strip_prefix('*').unwrap_or(label);
    let bytes = stripped.as_bytes();
    bytes.len() > 3
        && matches!(bytes[0], b'O' | b'o')
        && matches!(bytes[1], b'l' | b'L')
        && matches!(bytes[2], b'd' | b'D')
        && bytes[3].is_ascii_digit()
}

/// `(too_many_underscores, long_underscore, nonterminal_underscore)`.
pub fn underscore_datachecks(label: &str) -> (bool, bool, bool) {
    let Some(us_pos) = label.find('_') else {
        return (false, false, false);
    };
    let bytes = label.as_bytes();
    let too_many = label[us_pos + 1..].contains('_');
    let tail_len = bytes.len().saturating_sub(us_pos + 1);
    let long_underscore = tail_len >= 5 || (tail_len == 4 && !bytes[bytes.len() - 1].is_ascii_uppercase());
    let nonterminal = label[..us_pos].contains('/') || label[us_pos + 1..].contains('/');
    (too_many, long_underscore, nonterminal)
}

/// `*?US\d+[AB]([A-Z][a-z][a-z])?` terminated by end, `/`, `_`, or `(`.
pub fn us_letter(label: &str) -> bool {
    let bytes = label.as_bytes();
    let mut i = if bytes.first() == Some(&b'*') { 1 } else { 0 };
    if bytes.get(i) != Some(&b'U') || bytes.get(i + 1) != Some(&b'S') {
        return false;
    }
    i += 2;
    if !bytes.get(i).is_some_and(u8::is_ascii_digit) {
        return false;
    }
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    if !matches!(bytes.get(i), Some(b'A' | b'B')) {
        return false;
    }
    i += 1;
    let is_terminator = |pos: usize| matches!(bytes.get(pos), None | Some(b'/') | Some(b'_') | Some(b'('));
    if is_terminator(i) {
        return true;
    }
    if bytes.get(i).is_some_and(u8::is_ascii_uppercase)
        && bytes.get(i + 1).is_some_and(u8::is_ascii_lowercase)
        && bytes.get(i + 2).is_some_and(u8::is_ascii_lowercase)
    {
        is_terminator(i + 3)
    } else {
        false
    }
}
