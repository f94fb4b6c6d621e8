//! Properties text format.
//!
//! `key = value` lines, `#`/`!` comment lines preceding their key, blank
//! separator lines, backslash escapes and line continuations. Repeated keys
//! form a list.

use super::{Layout, PropertiesStore, PropertyValue};
use crate::error::StoreError;

pub(super) fn write(store: &PropertiesStore) -> String {
    let layout = store.layout();
    let mut out = String::new();

    if let Some(header) = layout.header_comment() {
        write_comment(&mut out, layout, header);
        out.push('\n');
    }

    for (key, value) in store.iter() {
        for _ in 0..layout.blank_lines_before(key) {
            out.push('\n');
        }
        if let Some(comment) = layout.comment(key) {
            write_comment(&mut out, layout, comment);
        }
        let key_text = escape(key, true);
        match value {
            PropertyValue::Single(v) => write_entry(&mut out, layout, &key_text, v),
            PropertyValue::List(items) if items.is_empty() => {
                write_entry(&mut out, layout, &key_text, "")
            }
            PropertyValue::List(items) => {
                for item in items {
                    write_entry(&mut out, layout, &key_text, item);
                }
            }
        }
    }
    out
}

fn write_entry(out: &mut String, layout: &Layout, key: &str, value: &str) {
    out.push_str(key);
    out.push_str(layout.separator());
    out.push_str(&escape(value, false));
    out.push('\n');
}

fn write_comment(out: &mut String, layout: &Layout, comment: &str) {
    for line in comment.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            out.push('#');
        } else if trimmed.starts_with('#') || trimmed.starts_with('!') {
            out.push_str(line);
        } else {
            out.push_str(layout.comment_leader());
            out.push_str(line);
        }
        out.push('\n');
    }
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{000C}' => out.push_str("\\f"),
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '=' | ':' | '#' | '!' if is_key => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

pub(super) fn read(input: &str) -> Result<PropertiesStore, StoreError> {
    let mut store = PropertiesStore::new();
    let mut pending_comment: Vec<String> = Vec::new();
    let mut pending_blank = 0usize;
    let mut lines = input.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let line_no = index + 1;
        let line = raw.trim_start();

        if line.is_empty() {
            if store.is_empty() && !pending_comment.is_empty() {
                let header = pending_comment.join("\n");
                store.layout_mut().set_header_comment(Some(header));
                pending_comment.clear();
                pending_blank = 0;
            } else {
                pending_blank += 1;
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix('#').or_else(|| line.strip_prefix('!')) {
            pending_comment.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
            continue;
        }

        let mut logical = line.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical, line_no)?;
        let first_time = !store.contains_key(&key);
        store.add_property(key.clone(), value);
        if first_time {
            if !pending_comment.is_empty() {
                store
                    .layout_mut()
                    .set_comment(key.clone(), pending_comment.join("\n"));
            }
            store.layout_mut().set_blank_lines_before(key, pending_blank);
        }
        pending_comment.clear();
        pending_blank = 0;
    }

    Ok(store)
}

/// Odd number of trailing backslashes.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_entry(line: &str, line_no: usize) -> Result<(String, String), StoreError> {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    let mut key_end = chars.len();
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '=' | ':' | ' ' | '\t' | '\u{000C}' => {
                key_end = i;
                break;
            }
            _ => i += 1,
        }
    }
    let key_raw: String = chars[..key_end.min(chars.len())].iter().collect();

    let mut j = key_end;
    while j < chars.len() && matches!(chars[j], ' ' | '\t' | '\u{000C}') {
        j += 1;
    }
    if j < chars.len() && matches!(chars[j], '=' | ':') {
        j += 1;
        while j < chars.len() && matches!(chars[j], ' ' | '\t' | '\u{000C}') {
            j += 1;
        }
    }
    let value_raw: String = chars[j.min(chars.len())..].iter().collect();

    Ok((unescape(&key_raw, line_no)?, unescape(&value_raw, line_no)?))
}

fn unescape(text: &str, line_no: usize) -> Result<String, StoreError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| StoreError::Syntax {
                        line: line_no,
                        message: format!("malformed \\u escape: \\u{}", hex),
                    })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}
