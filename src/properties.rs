//! Line-oriented `key=value` files.
//!
//! Configuration overrides and localization tables share this format: a
//! subset of Java properties with `#`/`!` comments, `=`, `:` or whitespace
//! separators, backslash continuation lines and `\uXXXX` escapes.

use crate::encoding::TextEncoding;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::path::Path;

/// Reads and parses a properties file at the given encoding.
pub fn load_properties<P: AsRef<Path>>(
    path: P,
    encoding: TextEncoding,
) -> Result<IndexMap<String, String>> {
    let path = path.as_ref();
    let content = encoding.read(path)?;
    parse_properties(&content, path)
}

/// Parses properties content. `origin` only names the source in errors.
///
/// Later duplicates of a key replace earlier values.
pub fn parse_properties<P: AsRef<Path>>(
    content: &str,
    origin: P,
) -> Result<IndexMap<String, String>> {
    let mut values = IndexMap::new();
    let mut lines = content.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let trimmed = raw.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while has_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        let invalid = |reason: String| Error::PropertiesError {
            path: origin.as_ref().to_path_buf(),
            line: index + 1,
            reason,
        };
        let key = unescape(key).map_err(invalid)?;
        let value = unescape(value).map_err(invalid)?;
        values.insert(key, value);
    }

    Ok(values)
}

fn has_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Splits at the first unescaped `=`, `:` or whitespace.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], line[i + 1..].trim_start()),
            c if c.is_whitespace() => {
                let rest = line[i..].trim_start();
                let rest = rest.strip_prefix(|c: char| c == '=' || c == ':').unwrap_or(rest);
                return (&line[..i], rest.trim_start());
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut units: Vec<u16> = Vec::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_units(&mut units, &mut out)?;
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let unit = u16::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .ok_or_else(|| format!("malformed \\u escape '\\u{hex}'"))?;
                units.push(unit);
                continue;
            }
            Some(escaped) => {
                flush_units(&mut units, &mut out)?;
                out.push(match escaped {
                    't' => '\t',
                    'n' => '\n',
                    'r' => '\r',
                    'f' => '\u{000C}',
                    other => other,
                });
            }
            None => flush_units(&mut units, &mut out)?,
        }
    }
    flush_units(&mut units, &mut out)?;
    Ok(out)
}

/// `\u` escapes are UTF-16 code units; surrogate pairs span two escapes.
fn flush_units(units: &mut Vec<u16>, out: &mut String) -> std::result::Result<(), String> {
    for decoded in char::decode_utf16(units.drain(..)) {
        out.push(decoded.map_err(|e| format!("unpaired surrogate {:#06x}", e.unpaired_surrogate()))?);
    }
    Ok(())
}
