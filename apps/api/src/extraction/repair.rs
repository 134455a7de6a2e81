//! Repair stages for JSON-ish model output.
//!
//! Each stage takes text and returns text. They run in a fixed order (see [`repair`]) and
//! every stage copies double-quoted string literals through untouched, so a later stage
//! never rewrites content an earlier stage already quoted.

use serde_json::Number;

/// Runs every stage in order. Valid JSON passes through with only whitespace changes.
pub fn repair(text: &str) -> String {
    let text = normalize_quotes(text);
    let text = quote_keys(&text);
    let text = quote_barewords(&text);
    let text = insert_missing_commas(&text);
    let text = strip_stray_commas(&text);
    balance_brackets(&text)
}

// ────────────────────────────────────────────────────────────────────────────
// Stages
// ────────────────────────────────────────────────────────────────────────────

/// Converts typographic quotes and single-quoted strings into double-quoted strings.
///
/// A `'` only opens a string where a value or key may start, so apostrophes in
/// unquoted prose are left for [`quote_barewords`].
pub fn normalize_quotes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '"' => i = copy_string(&chars, i, &mut out),
            '\u{201C}' | '\u{201D}' => i = copy_literal(&chars, i, &['\u{201D}', '"'], &mut out),
            '\'' if at_token_start(&out) => i = copy_literal(&chars, i, &['\''], &mut out),
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Quotes object keys written without quotes, including keys containing spaces.
pub fn quote_keys(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut stack: Vec<char> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '"' {
            i = copy_string(&chars, i, &mut out);
            continue;
        }

        let expects_key = stack.last() == Some(&'{')
            && matches!(last_significant(&out), Some('{') | Some(','));

        if expects_key && !c.is_whitespace() && !matches!(c, '}' | ',') {
            if let Some(colon) = find_key_colon(&chars, i) {
                let key: String = chars[i..colon].iter().collect();
                push_json_string(&mut out, key.trim());
                i = colon;
                continue;
            }
        }

        match c {
            '{' | '[' => stack.push(c),
            '}' | ']' => {
                stack.pop();
            }
            _ => {}
        }
        out.push(c);
        i += 1;
    }

    out
}

/// Quotes unquoted values that are not JSON literals or numbers.
///
/// Python-style `True`/`False`/`None` become JSON literals. Inside objects a bareword
/// may contain commas; it ends at a comma followed by something that looks like a key.
pub fn quote_barewords(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut stack: Vec<char> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '"' {
            i = copy_string(&chars, i, &mut out);
            continue;
        }

        let in_object = stack.last() == Some(&'{');
        let expects_value = match last_significant(&out) {
            Some(':') => in_object,
            Some('[') | Some(',') => stack.last() == Some(&'['),
            _ => false,
        };

        if expects_value && !c.is_whitespace() && !matches!(c, '{' | '[' | '}' | ']' | ',') {
            let end = scan_bareword(&chars, i, in_object);
            let token: String = chars[i..end].iter().collect();
            push_value_token(&mut out, token.trim());
            i = end;
            continue;
        }

        match c {
            '{' | '[' => stack.push(c),
            '}' | ']' => {
                stack.pop();
            }
            _ => {}
        }
        out.push(c);
        i += 1;
    }

    out
}

/// Inserts a comma between two values separated only by whitespace.
pub fn insert_missing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let starts_value = match c {
            '"' | '{' | '[' => true,
            c if c.is_ascii_alphanumeric() || c == '-' => out.ends_with(char::is_whitespace),
            _ => false,
        };
        if starts_value && ends_value(last_significant(&out)) {
            out.push(',');
        }
        if c == '"' {
            i = copy_string(&chars, i, &mut out);
            continue;
        }
        out.push(c);
        i += 1;
    }

    out
}

/// Drops leading, doubled and trailing commas. A key with no value gets `null`.
pub fn strip_stray_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '"' {
            i = copy_string(&chars, i, &mut out);
            continue;
        }

        if matches!(c, ',' | '}') && last_significant(&out) == Some(':') {
            out.push_str("null");
        }

        if c == ',' {
            let leading = matches!(last_significant(&out), None | Some('{') | Some('[') | Some(','));
            let trailing = matches!(next_significant(&chars, i + 1), None | Some('}') | Some(']'));
            if leading || trailing {
                i += 1;
                continue;
            }
        }

        out.push(c);
        i += 1;
    }

    out
}

/// Fixes mismatched closers and closes whatever truncation left open.
pub fn balance_brackets(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut stack: Vec<char> = Vec::new();
    let mut dangling_key = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '"' {
            dangling_key = stack.last() == Some(&'{')
                && matches!(last_significant(&out), Some('{') | Some(','));
            i = copy_string(&chars, i, &mut out);
            continue;
        }
        if !c.is_whitespace() {
            dangling_key = false;
        }

        match c {
            '{' | '[' => {
                stack.push(c);
                out.push(c);
            }
            '}' | ']' => {
                let opener = if c == '}' { '{' } else { '[' };
                if stack.contains(&opener) {
                    while let Some(open) = stack.pop() {
                        out.push(closer_for(open));
                        if open == opener {
                            break;
                        }
                    }
                }
            }
            _ => out.push(c),
        }
        i += 1;
    }

    if stack.is_empty() {
        return out;
    }

    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    if out.ends_with(',') {
        out.pop();
    }
    if out.ends_with(':') {
        out.push_str("null");
    } else if dangling_key {
        out.push_str(":null");
    }
    while let Some(open) = stack.pop() {
        out.push(closer_for(open));
    }

    out
}

// ────────────────────────────────────────────────────────────────────────────
// Scanning helpers
// ────────────────────────────────────────────────────────────────────────────

/// Copies a double-quoted literal starting at `start` and returns the index after it.
fn copy_string(chars: &[char], start: usize, out: &mut String) -> usize {
    copy_literal(chars, start, &['"'], out)
}

/// Copies the literal opened at `start`, re-emitting it double-quoted, and returns the
/// index after it.
///
/// A closer only ends the literal when the text after it reads as the rest of a JSON
/// document (see [`closes_literal`]); any other quote is kept as an escaped `\"`. A value
/// whose closing quote is missing ends before `, "key":`. Raw control characters are
/// escaped and a literal still open at end of input is closed there.
fn copy_literal(chars: &[char], start: usize, closers: &[char], out: &mut String) -> usize {
    let is_value = last_significant(out) == Some(':');
    out.push('"');

    // Output length and input index of the last comma not yet followed by content.
    let mut comma: Option<(usize, usize)> = None;
    let mut i = start + 1;

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' {
            match chars.get(i + 1) {
                Some('\'') => out.push('\''),
                Some(&next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => {}
            }
            comma = None;
            i += 2;
            continue;
        }

        if closers.contains(&c) && closes_literal(chars, i, is_value) {
            out.push('"');
            return i + 1;
        }

        if is_value && is_quote(c) {
            if let Some((len, at)) = comma.filter(|_| quoted_key_at(chars, i)) {
                out.truncate(len);
                let trimmed = out.trim_end().len();
                out.truncate(trimmed);
                out.push('"');
                return at;
            }
        }

        match c {
            ',' => comma = Some((out.len(), i)),
            c if c.is_whitespace() => {}
            _ => comma = None,
        }
        push_escaped_char(out, c);
        i += 1;
    }

    out.push('"');
    chars.len()
}

/// Whether the quote at `at` ends its literal, judged by what follows it.
///
/// Inside an object value a following `:` means the quote belongs to the text, and a
/// following `,` must lead to another member.
fn closes_literal(chars: &[char], at: usize, is_value: bool) -> bool {
    let Some(next) = next_significant_index(chars, at + 1) else {
        return true;
    };

    match chars[next] {
        '}' | ']' => true,
        ':' => !is_value,
        ',' => match next_significant_index(chars, next + 1) {
            None => true,
            Some(after) if is_value => {
                chars[after] == '}' || is_quote(chars[after]) || find_key_colon(chars, after).is_some()
            }
            Some(_) => true,
        },
        c if is_quote(c) => chars[at + 1].is_whitespace(),
        _ => false,
    }
}

/// Whether a quoted key followed by `:` starts at `at`.
fn quoted_key_at(chars: &[char], at: usize) -> bool {
    let mut i = at + 1;
    while i < chars.len() {
        match chars[i] {
            c if is_quote(c) => {
                return i > at + 1
                    && next_significant_index(chars, i + 1).map(|n| chars[n]) == Some(':');
            }
            ',' | '{' | '}' | '[' | ']' | ':' | '\n' => return false,
            _ => i += 1,
        }
    }
    false
}

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '\u{201C}' | '\u{201D}')
}

fn push_escaped_char(out: &mut String, c: char) {
    match c {
        '"' => out.push_str("\\\""),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
        c => out.push(c),
    }
}

fn push_json_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            c => push_escaped_char(out, c),
        }
    }
    out.push('"');
}

fn push_value_token(out: &mut String, token: &str) {
    match token {
        "true" | "false" | "null" => out.push_str(token),
        "True" => out.push_str("true"),
        "False" => out.push_str("false"),
        "None" | "undefined" => out.push_str("null"),
        _ if token.parse::<Number>().is_ok() => out.push_str(token),
        _ => push_json_string(out, token),
    }
}

/// Returns the index of the `:` ending an unquoted key at `start`, if there is one.
fn find_key_colon(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            ':' => return (i > start).then_some(i),
            ',' | '{' | '}' | '[' | ']' | '"' | '\n' => return None,
            _ => i += 1,
        }
    }
    None
}

/// Returns the index just past a bareword value starting at `start`.
fn scan_bareword(chars: &[char], start: usize, in_object: bool) -> usize {
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            '}' | ']' | '\n' => return i,
            ',' if !in_object || looks_like_key(chars, i + 1) => return i,
            _ => i += 1,
        }
    }
    i
}

/// Whether the text at `start` reads as the next member of an object.
fn looks_like_key(chars: &[char], start: usize) -> bool {
    let mut i = start;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    match chars.get(i) {
        None | Some('"') | Some('}') => true,
        Some(_) => find_key_colon(chars, i).is_some(),
    }
}

fn at_token_start(out: &str) -> bool {
    matches!(last_significant(out), None | Some('{') | Some('[') | Some(',') | Some(':'))
}

fn ends_value(c: Option<char>) -> bool {
    matches!(c, Some(c) if c == '"' || c == '}' || c == ']' || c.is_ascii_alphanumeric())
}

fn last_significant(out: &str) -> Option<char> {
    out.chars().rev().find(|c| !c.is_whitespace())
}

fn next_significant(chars: &[char], start: usize) -> Option<char> {
    next_significant_index(chars, start).map(|i| chars[i])
}

fn next_significant_index(chars: &[char], start: usize) -> Option<usize> {
    (start..chars.len()).find(|&i| !chars[i].is_whitespace())
}

fn closer_for(open: char) -> char {
    if open == '{' {
        '}'
    } else {
        ']'
    }
}
