//! JSX tag scanning
//!
//! Only what MDX content needs: opening tags with literal, expression,
//! boolean and spread attributes, and matching closing tags.

use super::inline::decode_entities;
use crate::tree::{AttrValue, Attribute, Attributes};

/// An opening tag at the start of a string
#[derive(Debug, Clone, PartialEq)]
pub struct OpenTag {
    pub name: String,
    pub attributes: Attributes,
    pub self_closing: bool,
    /// Bytes consumed, including the final `>`
    pub len: usize,
}

/// Parse `<Name attr="x" {...spread} flag>` at the start of `s`
pub fn parse_open_tag(s: &str) -> Option<OpenTag> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'<') {
        return None;
    }
    let name_len = tag_name_len(&s[1..])?;
    let name = s[1..1 + name_len].to_string();
    let mut pos = 1 + name_len;
    let mut attributes = Vec::new();

    loop {
        pos += whitespace_len(&s[pos..]);
        let rest = &s[pos..];
        if rest.starts_with("/>") {
            return Some(OpenTag {
                name,
                attributes: Attributes::new(attributes),
                self_closing: true,
                len: pos + 2,
            });
        }
        if rest.starts_with('>') {
            return Some(OpenTag {
                name,
                attributes: Attributes::new(attributes),
                self_closing: false,
                len: pos + 1,
            });
        }
        if rest.starts_with('{') {
            let end = balanced_end(rest)?;
            attributes.push(Attribute {
                name: rest[..end].to_string(),
                value: None,
            });
            pos += end;
            continue;
        }

        let attr_len = attr_name_len(rest)?;
        let attr_name = rest[..attr_len].to_string();
        pos += attr_len;
        let after_ws = pos + whitespace_len(&s[pos..]);
        if !s[after_ws..].starts_with('=') {
            attributes.push(Attribute {
                name: attr_name,
                value: None,
            });
            continue;
        }
        pos = after_ws + 1;
        pos += whitespace_len(&s[pos..]);
        let rest = &s[pos..];
        let quote = rest.chars().next()?;
        match quote {
            '"' | '\'' => {
                let close = rest[1..].find(quote)? + 1;
                attributes.push(Attribute {
                    name: attr_name,
                    value: Some(AttrValue::Literal(decode_entities(&rest[1..close]))),
                });
                pos += close + 1;
            }
            '{' => {
                let end = balanced_end(rest)?;
                attributes.push(Attribute {
                    name: attr_name,
                    value: Some(AttrValue::Expression(rest[1..end - 1].to_string())),
                });
                pos += end;
            }
            _ => return None,
        }
    }
}

/// Find the closing tag matching an element whose opening tag ends at `from`.
/// Returns `(close_start, close_end)`. Nested elements with the same name are
/// counted; fenced code and code spans are skipped.
pub fn find_close(s: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = s.as_bytes();
    let mut depth = 1usize;
    let mut pos = from;
    let mut fence: Option<String> = None;
    let mut at_line_start = from == 0 || bytes.get(from.wrapping_sub(1)) == Some(&b'\n');

    while pos < bytes.len() {
        if at_line_start {
            let line_end = s[pos..].find('\n').map_or(s.len(), |i| pos + i);
            let trimmed = s[pos..line_end].trim_start();
            if let Some(open) = &fence {
                if trimmed.starts_with(open.as_str()) && trimmed.trim_end().chars().all(|c| c == open.as_bytes()[0] as char) {
                    fence = None;
                }
                pos = line_end + 1;
                continue;
            }
            if let Some(marker) = fence_marker(trimmed) {
                fence = Some(marker);
                pos = line_end + 1;
                continue;
            }
            at_line_start = false;
        }

        match bytes[pos] {
            b'\n' => {
                at_line_start = true;
                pos += 1;
            }
            b'`' => {
                let run = s[pos..].bytes().take_while(|&b| b == b'`').count();
                let ticks = &s[pos..pos + run];
                let line_end = s[pos..].find('\n').map_or(s.len(), |i| pos + i);
                match s[pos + run..line_end].find(ticks) {
                    Some(i) => pos += run + i + run,
                    None => pos += run,
                }
            }
            b'<' => {
                let rest = &s[pos..];
                if let Some(after) = rest.strip_prefix("</") {
                    if after.starts_with(name) {
                        let tail = &after[name.len()..];
                        let ws = whitespace_len(tail);
                        if tail[ws..].starts_with('>') {
                            depth -= 1;
                            let end = pos + 2 + name.len() + ws + 1;
                            if depth == 0 {
                                return Some((pos, end));
                            }
                            pos = end;
                            continue;
                        }
                    }
                    pos += 2;
                } else if let Some(tag) = parse_open_tag(rest) {
                    if tag.name == name && !tag.self_closing {
                        depth += 1;
                    }
                    pos += tag.len;
                } else {
                    pos += 1;
                }
            }
            _ => pos += s[pos..].chars().next().map_or(1, char::len_utf8),
        }
    }
    None
}

/// Opening fence (```` ``` ```` or `~~~`) at the start of a trimmed line
pub fn fence_marker(trimmed: &str) -> Option<String> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let run = trimmed.chars().take_while(|&c| c == first).count();
    (run >= 3).then(|| first.to_string().repeat(run))
}

/// Index just past the brace that closes the `{` at the start of `s`,
/// skipping string and template literals
pub fn balanced_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn tag_name_len(s: &str) -> Option<usize> {
    let first = s.chars().next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    Some(
        s.char_indices()
            .find(|&(_, c)| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':')))
            .map_or(s.len(), |(i, _)| i),
    )
}

fn attr_name_len(s: &str) -> Option<usize> {
    let first = s.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_' || first == ':') {
        return None;
    }
    Some(
        s.char_indices()
            .find(|&(_, c)| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':')))
            .map_or(s.len(), |(i, _)| i),
    )
}

fn whitespace_len(s: &str) -> usize {
    s.len() - s.trim_start().len()
}
