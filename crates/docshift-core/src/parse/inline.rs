//! Phrasing content parser
//!
//! Recognises code spans, strong/emphasis, links, images, autolinks, inline
//! JSX, expressions, HTML comments and entities. Backslash escapes stay in the
//! text verbatim so the printer can emit them unchanged.

use super::jsx::{balanced_end, find_close, parse_open_tag};
use crate::tree::{Image, Inline, InlineComponent, Link};

/// Parse a paragraph or heading body
pub fn parse_inlines(s: &str) -> Vec<Inline> {
    let mut parser = InlineParser {
        src: s,
        pos: 0,
        out: Vec::new(),
        text: String::new(),
    };
    parser.run();
    parser.out
}

struct InlineParser<'a> {
    src: &'a str,
    pos: usize,
    out: Vec<Inline>,
    text: String,
}

impl<'a> InlineParser<'a> {
    fn run(&mut self) {
        let src = self.src;
        while self.pos < src.len() {
            let rest = &src[self.pos..];
            let c = rest.chars().next().unwrap_or('\0');
            let consumed = match c {
                '\\' => self.escape(rest),
                '`' => self.code_span(rest),
                '*' | '_' => self.emphasis(rest, c),
                '!' if rest.starts_with("![") => self.image(rest),
                '[' => self.link(rest),
                '<' => self.angle(rest),
                '{' => self.expression(rest),
                '&' => self.entity(rest),
                '\n' => self.hard_break(),
                _ => None,
            };
            match consumed {
                Some(len) => self.pos += len,
                None => {
                    self.text.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
        self.flush();
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            self.out.push(Inline::Text(std::mem::take(&mut self.text)));
        }
    }

    fn push(&mut self, inline: Inline) {
        self.flush();
        self.out.push(inline);
    }

    fn escape(&mut self, rest: &str) -> Option<usize> {
        let next = rest[1..].chars().next()?;
        if next.is_ascii_punctuation() {
            self.text.push('\\');
            self.text.push(next);
            Some(1 + next.len_utf8())
        } else {
            None
        }
    }

    fn code_span(&mut self, rest: &str) -> Option<usize> {
        let run = rest.bytes().take_while(|&b| b == b'`').count();
        let ticks = &rest[..run];
        let body = &rest[run..];
        let mut search = 0;
        while let Some(i) = body[search..].find(ticks) {
            let at = search + i;
            let after = body[at + run..].bytes().next();
            if after != Some(b'`') {
                let content = &body[..at];
                let content = if content.len() >= 2
                    && content.starts_with(' ')
                    && content.ends_with(' ')
                    && !content.trim().is_empty()
                {
                    &content[1..content.len() - 1]
                } else {
                    content
                };
                self.push(Inline::Code(content.replace('\n', " ")));
                return Some(run + at + run);
            }
            search = at + run + body[at + run..].bytes().take_while(|&b| b == b'`').count();
        }
        self.text.push_str(ticks);
        Some(run)
    }

    fn emphasis(&mut self, rest: &str, marker: char) -> Option<usize> {
        if marker == '_' {
            let prev = self.src[..self.pos].chars().next_back();
            if prev.is_some_and(|p| p.is_alphanumeric()) {
                return None;
            }
        }
        let double: String = [marker, marker].iter().collect();
        if rest.starts_with(&double) {
            let body = &rest[2..];
            if body.starts_with(char::is_whitespace) {
                return None;
            }
            let close = find_delimiter(body, &double)?;
            if close == 0 {
                return None;
            }
            self.push(Inline::Strong(parse_inlines(&body[..close])));
            return Some(2 + close + 2);
        }
        let body = &rest[1..];
        if body.starts_with(char::is_whitespace) || body.is_empty() {
            return None;
        }
        let close = find_single_delimiter(body, marker)?;
        if close == 0 {
            return None;
        }
        self.push(Inline::Emphasis(parse_inlines(&body[..close])));
        Some(1 + close + 1)
    }

    fn image(&mut self, rest: &str) -> Option<usize> {
        let (alt, after_label) = bracketed(&rest[1..])?;
        let (url, title, len) = destination(&rest[1 + after_label..])?;
        self.push(Inline::Image(Image {
            url,
            alt: alt.to_string(),
            title,
        }));
        Some(1 + after_label + len)
    }

    fn link(&mut self, rest: &str) -> Option<usize> {
        let (label, after_label) = bracketed(rest)?;
        let (url, title, len) = destination(&rest[after_label..])?;
        self.push(Inline::Link(Link {
            url,
            title,
            children: parse_inlines(label),
            autolink: false,
        }));
        Some(after_label + len)
    }

    fn angle(&mut self, rest: &str) -> Option<usize> {
        if rest.starts_with("<!--") {
            let end = rest.find("-->")? + 3;
            self.push(Inline::Html(rest[..end].to_string()));
            return Some(end);
        }
        if let Some(len) = self.autolink(rest) {
            return Some(len);
        }
        let tag = parse_open_tag(rest)?;
        if tag.self_closing {
            self.push(Inline::Component(InlineComponent::new(
                tag.name,
                tag.attributes,
                Vec::new(),
            )));
            return Some(tag.len);
        }
        let (close_start, close_end) = find_close(rest, &tag.name, tag.len)?;
        let children = parse_inlines(&rest[tag.len..close_start]);
        self.push(Inline::Component(InlineComponent::new(
            tag.name,
            tag.attributes,
            children,
        )));
        Some(close_end)
    }

    fn autolink(&mut self, rest: &str) -> Option<usize> {
        let end = rest.find('>')?;
        let inner = &rest[1..end];
        let is_url = inner
            .split_once(':')
            .is_some_and(|(scheme, tail)| {
                !scheme.is_empty()
                    && scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '.' || c == '-')
                    && !tail.is_empty()
            })
            && !inner.contains(char::is_whitespace);
        if !is_url {
            return None;
        }
        self.push(Inline::Link(Link {
            url: inner.to_string(),
            title: None,
            children: vec![Inline::Text(inner.to_string())],
            autolink: true,
        }));
        Some(end + 1)
    }

    fn expression(&mut self, rest: &str) -> Option<usize> {
        let end = balanced_end(rest)?;
        self.push(Inline::Expression(rest[1..end - 1].to_string()));
        Some(end)
    }

    /// Two trailing spaces before a newline
    fn hard_break(&mut self) -> Option<usize> {
        if !self.text.ends_with("  ") {
            return None;
        }
        let kept = self.text.trim_end_matches(' ').len();
        self.text.truncate(kept);
        self.push(Inline::Break);
        Some(1)
    }

    fn entity(&mut self, rest: &str) -> Option<usize> {
        let (c, len) = decode_entity(rest)?;
        self.text.push(c);
        Some(len)
    }
}

/// `[label]` at the start of `s`; returns the label and the index after `]`
fn bracketed(s: &str) -> Option<(&str, usize)> {
    if !s.starts_with('[') {
        return None;
    }
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&s[1..i], i + 1));
                }
            }
            _ => {}
        }
    }
    None
}

/// `(url "title")` at the start of `s`
fn destination(s: &str) -> Option<(String, Option<String>, usize)> {
    if !s.starts_with('(') {
        return None;
    }
    let mut depth = 0usize;
    let mut close = None;
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' if depth == 1 && i > 1 => quote = Some('"'),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close?;
    let inner = s[1..close].trim();
    let (url, title) = match inner.find(" \"") {
        Some(i) if inner.ends_with('"') => {
            let title = inner[i + 2..inner.len() - 1].to_string();
            (inner[..i].trim(), Some(title))
        }
        _ => (inner, None),
    };
    let url = url
        .strip_prefix('<')
        .and_then(|u| u.strip_suffix('>'))
        .unwrap_or(url);
    if url.contains(char::is_whitespace) {
        return None;
    }
    Some((url.to_string(), title, close + 1))
}

/// Position of a closing `**`/`__` that is not preceded by whitespace
fn find_delimiter(body: &str, delim: &str) -> Option<usize> {
    let mut search = 0;
    while let Some(i) = body[search..].find(delim) {
        let at = search + i;
        let prev = body[..at].chars().next_back();
        if at > 0 && !prev.is_some_and(char::is_whitespace) && !body[..at].ends_with('\\') {
            return Some(at);
        }
        search = at + delim.len();
    }
    None
}

/// Position of a single closing marker, skipping doubled markers
fn find_single_delimiter(body: &str, marker: char) -> Option<usize> {
    let bytes = body.as_bytes();
    let m = marker as u8;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i] == b'`' {
            let run = body[i..].bytes().take_while(|&b| b == b'`').count();
            let ticks = &body[i..i + run];
            match body[i + run..].find(ticks) {
                Some(j) => i += run + j + run,
                None => i += run,
            }
            continue;
        }
        if bytes[i] == m {
            if bytes.get(i + 1) == Some(&m) {
                let close = find_delimiter(&body[i + 2..], &body[i..i + 2])?;
                i += 2 + close + 2;
                continue;
            }
            if i > 0 && !(bytes[i - 1] as char).is_whitespace() {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Decode one character reference at the start of `s`
pub fn decode_entity(s: &str) -> Option<(char, usize)> {
    let end = s.find(';')?;
    if end > 10 {
        return None;
    }
    let name = &s[1..end];
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(value)?
        }
    };
    Some((c, end + 1))
}

/// Decode every character reference in `s`
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pos = 0;
    while let Some(i) = s[pos..].find('&') {
        let at = pos + i;
        out.push_str(&s[pos..at]);
        match decode_entity(&s[at..]) {
            Some((c, len)) => {
                out.push(c);
                pos = at + len;
            }
            None => {
                out.push('&');
                pos = at + 1;
            }
        }
    }
    out.push_str(&s[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ComponentFamily;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_plain_text_with_entities() {
        assert_eq!(parse_inlines("a &amp; b &#39;c&#39;"), vec![text("a & b 'c'")]);
    }

    #[test]
    fn test_escapes_are_kept_verbatim() {
        assert_eq!(parse_inlines(r"use \{braces\} and \\"), vec![text(r"use \{braces\} and \\")]);
    }

    #[test]
    fn test_strong_emphasis_and_code() {
        let parsed = parse_inlines("**bold** and *it* and `x*y`");
        assert_eq!(
            parsed,
            vec![
                Inline::Strong(vec![text("bold")]),
                text(" and "),
                Inline::Emphasis(vec![text("it")]),
                text(" and "),
                Inline::Code("x*y".into()),
            ]
        );
    }

    #[test]
    fn test_snake_case_is_not_emphasis() {
        assert_eq!(parse_inlines("snake_case_name"), vec![text("snake_case_name")]);
    }

    #[test]
    fn test_links_and_images() {
        let parsed = parse_inlines(r#"see [the guide](../guide.mdx "Guide") ![shot](/images/a.png)"#);
        assert_eq!(parsed.len(), 4);
        match &parsed[1] {
            Inline::Link(link) => {
                assert_eq!(link.url, "../guide.mdx");
                assert_eq!(link.title.as_deref(), Some("Guide"));
                assert_eq!(link.children, vec![text("the guide")]);
            }
            other => panic!("expected link, got {other:?}"),
        }
        match &parsed[3] {
            Inline::Image(image) => {
                assert_eq!(image.url, "/images/a.png");
                assert_eq!(image.alt, "shot");
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn test_inline_component_and_expression() {
        let parsed = parse_inlines("run <Code>npm i</Code> then {props.x}");
        match &parsed[1] {
            Inline::Component(c) => {
                assert_eq!(c.name(), "Code");
                assert_eq!(c.family(), ComponentFamily::Code);
                assert_eq!(c.children, vec![text("npm i")]);
            }
            other => panic!("expected component, got {other:?}"),
        }
        assert_eq!(parsed[3], Inline::Expression("props.x".into()));
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        assert_eq!(parse_inlines("a < b"), vec![text("a < b")]);
    }

    #[test]
    fn test_hard_break() {
        assert_eq!(
            parse_inlines("one  \ntwo\nthree"),
            vec![text("one"), Inline::Break, text("two\nthree")]
        );
    }

    #[test]
    fn test_autolink() {
        let parsed = parse_inlines("<https://example.com>");
        assert!(matches!(&parsed[0], Inline::Link(l) if l.autolink && l.url == "https://example.com"));
    }
}
