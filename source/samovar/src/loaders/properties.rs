//! `.properties` decoding.
//!
//! Supports `=`/`:`/whitespace key separators, `#` and `!` comments,
//! backslash line continuations, the usual escape sequences including
//! `\uXXXX`, and multi-document files split on `#---` / `!---` lines.

use indexmap::IndexMap;

use crate::environment::PropertySet;
use crate::error::Result;
use crate::loader::PropertySetLoader;

pub struct PropertiesLoader;

impl PropertySetLoader for PropertiesLoader {
    fn extensions(&self) -> &[&str] {
        &["properties"]
    }

    fn load(&self, name: &str, content: &str) -> Result<Vec<PropertySet>> {
        let mut sets = Vec::new();
        for document in split_documents(content) {
            let entries = parse_document(&document);
            if entries.is_empty() {
                continue;
            }
            sets.push(PropertySet::with_entries(name, entries));
        }
        if sets.len() > 1 {
            for (index, set) in sets.iter_mut().enumerate() {
                set.set_name(format!("{name} (document #{index})"));
            }
        }
        Ok(sets)
    }
}

/// Split on document separator lines. The separator is a comment line whose
/// only content is `---`.
fn split_documents(content: &str) -> Vec<String> {
    let mut documents = vec![String::new()];
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed == "#---" || trimmed == "!---" {
            documents.push(String::new());
        } else {
            let document = documents.last_mut().expect("at least one document");
            document.push_str(line);
            document.push('\n');
        }
    }
    documents
}

fn parse_document(document: &str) -> IndexMap<String, String> {
    let mut entries = IndexMap::new();
    for line in logical_lines(document) {
        let (key, value) = split_key_value(&line);
        if !key.is_empty() {
            entries.insert(key, value);
        }
    }
    entries
}

/// Assemble logical lines, honouring backslash continuations. Leading
/// whitespace of continuation lines is dropped, as is the continuation
/// backslash itself.
fn logical_lines(document: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<String> = None;
    for raw in document.lines() {
        let line = raw.trim_start();
        match current.as_mut() {
            Some(acc) => {
                if ends_with_continuation(line) {
                    acc.push_str(&line[..line.len() - 1]);
                } else {
                    acc.push_str(line);
                    lines.push(current.take().expect("current line"));
                }
            }
            None => {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                if ends_with_continuation(line) {
                    current = Some(line[..line.len() - 1].to_string());
                } else {
                    lines.push(line.to_string());
                }
            }
        }
    }
    if let Some(acc) = current {
        lines.push(acc);
    }
    lines
}

/// A line continues when it ends with an odd number of backslashes.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (String, String) {
    let chars: Vec<char> = line.chars().collect();
    let mut key_end = chars.len();
    let mut index = 0;
    let mut escaped = false;
    while index < chars.len() {
        let c = chars[index];
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || c.is_whitespace() {
            key_end = index;
            break;
        }
        index += 1;
    }
    let key = unescape(&chars[..key_end]);

    let mut value_start = key_end;
    while value_start < chars.len() && chars[value_start].is_whitespace() {
        value_start += 1;
    }
    if value_start < chars.len() && (chars[value_start] == '=' || chars[value_start] == ':') {
        value_start += 1;
        while value_start < chars.len() && chars[value_start].is_whitespace() {
            value_start += 1;
        }
    }
    let value = unescape(&chars[value_start..]);
    (key, value)
}

fn unescape(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut index = 0;
    while index < chars.len() {
        let c = chars[index];
        if c != '\\' {
            out.push(c);
            index += 1;
            continue;
        }
        index += 1;
        match chars.get(index) {
            None => break,
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.iter().skip(index + 1).take(4).collect();
                if hex.len() == 4 {
                    if let Some(c) = u32::from_str_radix(&hex, 16)
                        .ok()
                        .and_then(char::from_u32)
                    {
                        out.push(c);
                        index += 4;
                    }
                }
            }
            Some(other) => out.push(*other),
        }
        index += 1;
    }
    out
}
