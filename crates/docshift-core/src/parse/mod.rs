//! MDX block parser
//!
//! Turns document text into a [`Document`]. The grammar is the subset the
//! legacy documentation uses: frontmatter, ESM, headings, fenced code, lists,
//! flow JSX, container directives and paragraphs. Blockquotes, tables,
//! comments and thematic breaks are kept as raw text.

pub mod esm;
pub mod inline;
pub mod jsx;

use crate::tree::{Block, CodeBlock, Component, Directive, Document, Frontmatter, Heading, List, ListItem};
use inline::parse_inlines;
use jsx::{fence_marker, find_close, parse_open_tag};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(:{3,})([A-Za-z][\w-]*)(?:\[([^\]]*)\])?(?:\{([^}]*)\})?\s*$").unwrap()
});

static DIRECTIVE_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\.([\w-]+)|#([\w-]+)|([\w:.-]+)(?:=(?:"([^"]*)"|'([^']*)'|([^\s"']+)))?"#).unwrap()
});

static LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( *)([-*+]|(\d{1,9})[.)])( +|$)").unwrap());

/// Syntax error with the 1-based line it was detected on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Parse a whole document
pub fn parse(text: &str) -> Result<Document, ParseError> {
    let text = text.replace("\r\n", "\n");
    let mut children = Vec::new();
    let mut body = text.as_str();
    let mut line = 1;

    if let Some(after) = body.strip_prefix("---\n") {
        let (raw_end, rest_start) = frontmatter_end(after).ok_or_else(|| ParseError {
            line: 1,
            message: "unclosed frontmatter".to_string(),
        })?;
        let raw = after[..raw_end].strip_suffix('\n').unwrap_or(&after[..raw_end]);
        children.push(Block::Frontmatter(Frontmatter::new(raw)));
        line += 1 + after[..rest_start].matches('\n').count();
        body = &after[rest_start..];
    }

    children.extend(BlockParser::new(body, line, true).parse()?);
    Ok(Document::new(children))
}

/// `(end of the YAML body, start of the content after the closing fence)`
fn frontmatter_end(after: &str) -> Option<(usize, usize)> {
    let mut pos = 0;
    for line in after.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((pos, pos + line.len()));
        }
        pos += line.len();
    }
    None
}

struct BlockParser<'a> {
    src: &'a str,
    pos: usize,
    base_line: usize,
    top_level: bool,
}

/// A list item marker at the start of a line
#[derive(Debug, Clone, Copy)]
struct Marker {
    indent: usize,
    ordered: bool,
    number: u32,
    content_offset: usize,
}

enum ItemEnd {
    NextItem,
    EndOfList,
}

impl<'a> BlockParser<'a> {
    fn new(src: &'a str, base_line: usize, top_level: bool) -> Self {
        Self {
            src,
            pos: 0,
            base_line,
            top_level,
        }
    }

    fn parse(mut self) -> Result<Vec<Block>, ParseError> {
        let mut blocks = Vec::new();
        while self.pos < self.src.len() {
            let (line, next) = self.line_at(self.pos);
            if line.trim().is_empty() {
                self.pos = next;
                continue;
            }
            blocks.push(self.block(line, next)?);
        }
        Ok(blocks)
    }

    fn line_at(&self, pos: usize) -> (&'a str, usize) {
        match self.src[pos..].find('\n') {
            Some(i) => (&self.src[pos..pos + i], pos + i + 1),
            None => (&self.src[pos..], self.src.len()),
        }
    }

    fn line_number(&self, pos: usize) -> usize {
        self.base_line + self.src[..pos].matches('\n').count()
    }

    fn error(&self, pos: usize, message: String) -> ParseError {
        ParseError {
            line: self.line_number(pos),
            message,
        }
    }

    fn block(&mut self, line: &'a str, next: usize) -> Result<Block, ParseError> {
        let indent = indent_of(line);
        let trimmed = &line[indent..];

        if let Some(marker) = opening_fence(trimmed) {
            return Ok(self.code(trimmed, indent, &marker, next));
        }
        if self.top_level && indent == 0 {
            if trimmed.starts_with("import ") || trimmed.starts_with("import{") {
                return Ok(self.import());
            }
            if trimmed.starts_with("export ") {
                return Ok(Block::Esm(self.until_blank().join("\n")));
            }
        }
        if let Some(heading) = atx_heading(trimmed) {
            self.pos = next;
            return Ok(Block::Heading(heading));
        }
        if DIRECTIVE_RE.is_match(trimmed) {
            return self.directive(trimmed, next);
        }
        if trimmed.starts_with("<!--") {
            return Ok(self.comment(indent));
        }
        if trimmed.starts_with('<') {
            if let Some(block) = self.jsx(indent)? {
                return Ok(block);
            }
        }
        if trimmed.starts_with('>') || trimmed.starts_with('|') {
            return Ok(Block::Raw(dedent(&self.until_blank().join("\n"))));
        }
        if is_thematic_break(trimmed) {
            self.pos = next;
            return Ok(Block::Raw(trimmed.trim_end().to_string()));
        }
        if let Some(marker) = list_marker(line) {
            return self.list(marker);
        }
        Ok(self.paragraph())
    }

    /// Lines from the current position up to the next blank line
    fn until_blank(&mut self) -> Vec<&'a str> {
        let mut lines = Vec::new();
        while self.pos < self.src.len() {
            let (line, next) = self.line_at(self.pos);
            if line.trim().is_empty() {
                break;
            }
            lines.push(line.trim_end());
            self.pos = next;
        }
        lines
    }

    fn code(&mut self, trimmed: &str, indent: usize, marker: &str, next: usize) -> Block {
        let info = trimmed[marker.len()..].trim();
        let (lang, meta) = match info.split_once(char::is_whitespace) {
            Some((lang, meta)) => (Some(lang.to_string()), Some(meta.trim().to_string())),
            None if info.is_empty() => (None, None),
            None => (Some(info.to_string()), None),
        };
        let fence_char = marker.chars().next().unwrap_or('`');

        let mut lines = Vec::new();
        let mut pos = next;
        let mut end = self.src.len();
        while pos < self.src.len() {
            let (line, after) = self.line_at(pos);
            let t = line.trim();
            if t.len() >= marker.len() && t.chars().all(|c| c == fence_char) {
                end = after;
                break;
            }
            lines.push(strip_spaces(line, indent));
            pos = after;
        }
        self.pos = end;

        Block::Code(CodeBlock {
            fence: marker.to_string(),
            lang,
            meta,
            value: lines.join("\n"),
        })
    }

    fn import(&mut self) -> Block {
        let start = self.pos;
        let mut pos = self.pos;
        while pos < self.src.len() {
            let (line, after) = self.line_at(pos);
            if pos != start && line.trim().is_empty() {
                break;
            }
            pos = after;
            if esm::import_complete(&self.src[start..pos]) {
                break;
            }
        }
        self.pos = pos;
        esm::parse_import(&self.src[start..pos])
    }

    fn directive(&mut self, opener: &str, next: usize) -> Result<Block, ParseError> {
        let caps = DIRECTIVE_RE
            .captures(opener)
            .ok_or_else(|| self.error(self.pos, "malformed directive".to_string()))?;
        let name = caps[2].to_string();
        let label = caps.get(3).map(|m| m.as_str().to_string());
        let (classes, attributes) = caps
            .get(4)
            .map(|m| directive_attributes(m.as_str()))
            .unwrap_or_default();

        let mut depth = 1usize;
        let mut pos = next;
        let mut fence: Option<String> = None;
        let mut body_end = self.src.len();
        let mut after_close = self.src.len();
        while pos < self.src.len() {
            let (line, after) = self.line_at(pos);
            let t = line.trim();
            if let Some(open) = &fence {
                if t.starts_with(open.as_str()) {
                    fence = None;
                }
            } else if let Some(marker) = opening_fence(t) {
                fence = Some(marker);
            } else if DIRECTIVE_RE.is_match(t) {
                depth += 1;
            } else if t.len() >= 3 && t.chars().all(|c| c == ':') {
                depth -= 1;
                if depth == 0 {
                    body_end = pos;
                    after_close = after;
                    break;
                }
            }
            pos = after;
        }

        let body = dedent(&self.src[next..body_end]);
        let children = BlockParser::new(&body, self.line_number(next), false).parse()?;
        self.pos = after_close;
        Ok(Block::Directive(Directive {
            name,
            label,
            classes,
            attributes,
            children,
        }))
    }

    fn comment(&mut self, indent: usize) -> Block {
        let start = self.pos + indent;
        let end = match self.src[start..].find("-->") {
            Some(i) => {
                let close = start + i + 3;
                self.src[close..].find('\n').map_or(self.src.len(), |j| close + j)
            }
            None => self.src.len(),
        };
        self.pos = (end + 1).min(self.src.len());
        Block::Raw(self.src[start..end].trim_end().to_string())
    }

    /// Flow JSX element; `None` when the line is really a paragraph that
    /// starts with inline markup
    fn jsx(&mut self, indent: usize) -> Result<Option<Block>, ParseError> {
        let start = self.pos + indent;
        let s = &self.src[start..];
        let Some(tag) = parse_open_tag(s) else {
            return Ok(None);
        };

        let close = if tag.self_closing {
            None
        } else {
            let found = find_close(s, &tag.name, tag.len)
                .ok_or_else(|| self.error(start, format!("unclosed <{}>", tag.name)))?;
            Some(found)
        };
        let end = close.map_or(tag.len, |(_, close_end)| close_end);
        let line_rest = s[end..].split('\n').next().unwrap_or_default();
        if !line_rest.trim().is_empty() {
            return Ok(None);
        }

        let children = match close {
            Some((close_start, _)) => {
                self.jsx_children(&s[tag.len..close_start], start + tag.len)?
            }
            None => Vec::new(),
        };
        let after = start + end + line_rest.len();
        self.pos = (after + 1).min(self.src.len());
        Ok(Some(Block::Component(Component::new(
            tag.name,
            tag.attributes,
            children,
        ))))
    }

    /// True when the line at `pos` opens a complete component element with
    /// nothing after it on its closing line. Such a line ends a paragraph.
    fn starts_flow_component(&self, pos: usize) -> bool {
        let (line, _) = self.line_at(pos);
        let s = &self.src[pos + indent_of(line)..];
        let mut chars = s.chars();
        if chars.next() != Some('<') || !chars.next().is_some_and(|c| c.is_ascii_uppercase()) {
            return false;
        }
        let Some(tag) = parse_open_tag(s) else {
            return false;
        };
        let end = if tag.self_closing {
            Some(tag.len)
        } else {
            find_close(s, &tag.name, tag.len).map(|(_, close_end)| close_end)
        };
        end.is_some_and(|end| s[end..].split('\n').next().unwrap_or_default().trim().is_empty())
    }

    fn jsx_children(&self, inner: &str, offset: usize) -> Result<Vec<Block>, ParseError> {
        let Some((first, rest)) = inner.split_once('\n') else {
            let text = inner.trim();
            return Ok(if text.is_empty() {
                Vec::new()
            } else {
                vec![Block::Paragraph(parse_inlines(text))]
            });
        };
        let mut body = String::new();
        let mut line = self.line_number(offset);
        if first.trim().is_empty() {
            line += 1;
        } else {
            body.push_str(first.trim());
            body.push('\n');
        }
        body.push_str(&dedent(rest));
        BlockParser::new(&body, line, false).parse()
    }

    fn list(&mut self, first: Marker) -> Result<Block, ParseError> {
        let mut items = Vec::new();
        let mut spread = false;
        let mut marker = first;

        loop {
            let item_line = self.line_number(self.pos);
            let (line, next) = self.line_at(self.pos);
            let mut content = String::new();
            content.push_str(line.get(marker.content_offset..).unwrap_or_default());
            content.push('\n');
            self.pos = next;

            let mut last_content_end = self.pos;
            let mut blank_run = false;
            let mut end = ItemEnd::EndOfList;
            while self.pos < self.src.len() {
                let (line, next) = self.line_at(self.pos);
                if line.trim().is_empty() {
                    content.push('\n');
                    blank_run = true;
                    self.pos = next;
                    continue;
                }
                if indent_of(line) >= marker.content_offset {
                    if blank_run {
                        spread = true;
                    }
                    content.push_str(&line[marker.content_offset..]);
                    content.push('\n');
                    blank_run = false;
                    self.pos = next;
                    last_content_end = next;
                    continue;
                }
                if let Some(sibling) = list_marker(line)
                    .filter(|m| m.ordered == first.ordered && m.indent < marker.content_offset)
                {
                    if blank_run {
                        spread = true;
                    }
                    marker = sibling;
                    end = ItemEnd::NextItem;
                    break;
                }
                let t = &line[indent_of(line)..];
                if !blank_run && !interrupts_paragraph(t) && !self.starts_flow_component(self.pos) {
                    content.push_str(t);
                    content.push('\n');
                    self.pos = next;
                    last_content_end = next;
                    continue;
                }
                break;
            }

            let children =
                BlockParser::new(content.trim_end(), item_line, false).parse()?;
            items.push(ListItem { children });
            match end {
                ItemEnd::NextItem => continue,
                ItemEnd::EndOfList => {
                    self.pos = last_content_end;
                    break;
                }
            }
        }

        Ok(Block::List(List {
            ordered: first.ordered,
            start: first.number,
            spread,
            items,
        }))
    }

    fn paragraph(&mut self) -> Block {
        let mut lines: Vec<&str> = Vec::new();
        while self.pos < self.src.len() {
            let (line, next) = self.line_at(self.pos);
            let t = &line[indent_of(line)..];
            if t.trim().is_empty() {
                break;
            }
            if !lines.is_empty() {
                if let Some(depth) = setext_depth(t) {
                    self.pos = next;
                    return Block::Heading(Heading {
                        depth,
                        children: parse_inlines(&join_paragraph(&lines)),
                    });
                }
                if interrupts_paragraph(t) || self.starts_flow_component(self.pos) {
                    break;
                }
            }
            lines.push(t);
            self.pos = next;
        }
        Block::Paragraph(parse_inlines(&join_paragraph(&lines)))
    }
}

/// Join paragraph lines, keeping a two-space hard break marker
fn join_paragraph(lines: &[&str]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_end();
        out.push_str(trimmed);
        if i + 1 < lines.len() {
            if line.ends_with("  ") {
                out.push_str("  ");
            }
            out.push('\n');
        }
    }
    out
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Remove up to `n` leading spaces
fn strip_spaces(line: &str, n: usize) -> &str {
    let strip = indent_of(line).min(n);
    &line[strip..]
}

/// Remove the indentation shared by every non-blank line
fn dedent(s: &str) -> String {
    let common = s
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(indent_of)
        .min()
        .unwrap_or(0);
    s.lines()
        .map(|l| if l.trim().is_empty() { "" } else { &l[common..] })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A code fence opener; backtick fences may not carry backticks in the info string
fn opening_fence(trimmed: &str) -> Option<String> {
    let marker = fence_marker(trimmed)?;
    if marker.starts_with('`') && trimmed[marker.len()..].contains('`') {
        return None;
    }
    Some(marker)
}

fn atx_heading(trimmed: &str) -> Option<Heading> {
    let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    let mut content = rest.trim();
    let without_closing = content.trim_end_matches('#');
    if without_closing.is_empty() {
        content = "";
    } else if without_closing.ends_with([' ', '\t']) {
        content = without_closing.trim_end();
    }
    Some(Heading {
        depth: hashes as u8,
        children: parse_inlines(content),
    })
}

fn setext_depth(trimmed: &str) -> Option<u8> {
    let t = trimmed.trim_end();
    if t.is_empty() {
        None
    } else if t.chars().all(|c| c == '=') {
        Some(1)
    } else if t.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

fn is_thematic_break(trimmed: &str) -> bool {
    let compact: Vec<char> = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && matches!(compact[0], '-' | '*' | '_')
        && compact.iter().all(|&c| c == compact[0])
}

fn list_marker(line: &str) -> Option<Marker> {
    let caps = LIST_RE.captures(line)?;
    let indent = caps[1].len();
    let marker_len = caps[2].len();
    let spaces = caps[4].len();
    let number = caps
        .get(3)
        .and_then(|n| n.as_str().parse::<u32>().ok());
    let gap = if spaces == 0 || spaces > 4 { 1 } else { spaces };
    Some(Marker {
        indent,
        ordered: number.is_some(),
        number: number.unwrap_or(1),
        content_offset: indent + marker_len + gap,
    })
}

/// Block starts that end a running paragraph without a blank line
fn interrupts_paragraph(trimmed: &str) -> bool {
    opening_fence(trimmed).is_some()
        || atx_heading(trimmed).is_some()
        || DIRECTIVE_RE.is_match(trimmed)
        || trimmed.starts_with("<!--")
        || trimmed.starts_with('>')
        || is_thematic_break(trimmed)
        || list_marker(trimmed).is_some_and(|m| !m.ordered || m.number == 1)
}

fn directive_attributes(raw: &str) -> (Vec<String>, Vec<(String, String)>) {
    let mut classes = Vec::new();
    let mut attributes = Vec::new();
    for caps in DIRECTIVE_ATTR_RE.captures_iter(raw) {
        if let Some(class) = caps.get(1) {
            classes.push(class.as_str().to_string());
        } else if let Some(id) = caps.get(2) {
            attributes.push(("id".to_string(), id.as_str().to_string()));
        } else if let Some(key) = caps.get(3) {
            let value = caps
                .get(4)
                .or_else(|| caps.get(5))
                .or_else(|| caps.get(6))
                .map_or("", |m| m.as_str());
            attributes.push((key.as_str().to_string(), value.to_string()));
        }
    }
    (classes, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{ComponentFamily, Inline};

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_frontmatter_imports_and_heading() {
        let doc = parse(
            "---\ntitle: Intro\n---\n\nimport { Callout } from 'nextra/components'\n\n# Welcome\n\nHello there.\n",
        )
        .unwrap();
        assert_eq!(doc.children.len(), 4);
        assert_eq!(doc.frontmatter().unwrap().raw, "title: Intro");
        assert_eq!(doc.imports().count(), 1);
        match &doc.children[2] {
            Block::Heading(h) => {
                assert_eq!(h.depth, 1);
                assert_eq!(h.text(), "Welcome");
            }
            other => panic!("expected heading, got {other:?}"),
        }
        assert_eq!(doc.children[3], Block::Paragraph(vec![text("Hello there.")]));
    }

    #[test]
    fn test_unclosed_frontmatter_is_an_error() {
        let err = parse("---\ntitle: x\n\nbody").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_fenced_code_keeps_content() {
        let doc = parse("```ts title=\"a.ts\"\nconst a = <Callout>;\n\n```\n").unwrap();
        match &doc.children[0] {
            Block::Code(code) => {
                assert_eq!(code.lang.as_deref(), Some("ts"));
                assert_eq!(code.meta.as_deref(), Some("title=\"a.ts\""));
                assert_eq!(code.value, "const a = <Callout>;\n");
            }
            other => panic!("expected code, got {other:?}"),
        }
    }

    #[test]
    fn test_single_line_component_has_one_paragraph() {
        let doc = parse("<Callout type=\"warning\">Be careful</Callout>\n").unwrap();
        let callout = doc.children[0].as_component().unwrap();
        assert_eq!(callout.family(), ComponentFamily::Callout);
        assert_eq!(callout.attributes.literal("type"), Some("warning"));
        assert_eq!(callout.children, vec![Block::Paragraph(vec![text("Be careful")])]);
    }

    #[test]
    fn test_nested_components_are_dedented() {
        let src = "<Tabs items={['npm', 'yarn']}>\n  <Tabs.Tab>\n    ```bash\n    npm i\n    ```\n  </Tabs.Tab>\n  <Tabs.Tab>yarn add</Tabs.Tab>\n</Tabs>\n\nAfter.";
        let doc = parse(src).unwrap();
        assert_eq!(doc.children.len(), 2);
        let tabs = doc.children[0].as_component().unwrap();
        assert_eq!(tabs.children.len(), 2);
        let first = tabs.children[0].as_component().unwrap();
        assert_eq!(first.name(), "Tabs.Tab");
        assert!(matches!(&first.children[0], Block::Code(c) if c.value == "npm i"));
    }

    #[test]
    fn test_component_with_trailing_text_is_a_paragraph() {
        let doc = parse("<Code>npm</Code> installs things").unwrap();
        assert!(matches!(&doc.children[0], Block::Paragraph(inlines) if inlines.len() == 2));
    }

    #[test]
    fn test_component_right_after_text_starts_a_block() {
        let doc = parse("Intro text\n<Callout type=\"warning\">Be careful</Callout>\nOutro\n").unwrap();
        assert_eq!(doc.children.len(), 3);
        assert_eq!(doc.children[0], Block::Paragraph(vec![text("Intro text")]));
        let callout = doc.children[1].as_component().unwrap();
        assert_eq!(callout.name(), "Callout");
        assert_eq!(callout.children, vec![Block::Paragraph(vec![text("Be careful")])]);
        assert_eq!(doc.children[2], Block::Paragraph(vec![text("Outro")]));
    }

    #[test]
    fn test_multiline_component_after_text_starts_a_block() {
        let doc = parse("See below:\n<Cards>\n  <Card title=\"A\" href=\"/a\" />\n</Cards>\n").unwrap();
        assert_eq!(doc.children.len(), 2);
        let cards = doc.children[1].as_component().unwrap();
        assert_eq!(cards.name(), "Cards");
        assert_eq!(cards.children[0].as_component().unwrap().name(), "Card");
    }

    #[test]
    fn test_inline_markup_after_text_stays_in_paragraph() {
        let doc = parse("Run this\n<Code>npm</Code> first\n").unwrap();
        assert_eq!(doc.children.len(), 1);
        assert!(matches!(&doc.children[0], Block::Paragraph(_)));
    }

    #[test]
    fn test_unclosed_component_reports_line() {
        let err = parse("Intro\n\n<Steps>\n### One\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("Steps"));
    }

    #[test]
    fn test_container_directive() {
        let doc = parse(":::caution{.titled data-title=\"Heads up\"}\nMind the gap.\n:::\n").unwrap();
        match &doc.children[0] {
            Block::Directive(d) => {
                assert_eq!(d.name, "caution");
                assert_eq!(d.classes, vec!["titled"]);
                assert_eq!(d.attributes, vec![("data-title".to_string(), "Heads up".to_string())]);
                assert_eq!(d.children.len(), 1);
            }
            other => panic!("expected directive, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_tight_list() {
        let doc = parse("- src/\n  - index.ts\n- README.md\n").unwrap();
        match &doc.children[0] {
            Block::List(list) => {
                assert!(!list.ordered);
                assert!(!list.spread);
                assert_eq!(list.items.len(), 2);
                assert!(matches!(&list.items[0].children[1], Block::List(inner) if inner.items.len() == 1));
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_loose_ordered_list() {
        let doc = parse("3. one\n\n   more\n\n4. two\n\nAfter").unwrap();
        match &doc.children[0] {
            Block::List(list) => {
                assert!(list.ordered);
                assert!(list.spread);
                assert_eq!(list.start, 3);
                assert_eq!(list.items[0].children.len(), 2);
            }
            other => panic!("expected list, got {other:?}"),
        }
        assert_eq!(doc.children[1], Block::Paragraph(vec![text("After")]));
    }

    #[test]
    fn test_setext_heading_and_raw_blocks() {
        let doc = parse("Title\n=====\n\n> quoted\n> more\n\n| a | b |\n|---|---|\n\n---\n").unwrap();
        assert!(matches!(&doc.children[0], Block::Heading(h) if h.depth == 1));
        assert_eq!(doc.children[1], Block::Raw("> quoted\n> more".into()));
        assert_eq!(doc.children[2], Block::Raw("| a | b |\n|---|---|".into()));
        assert_eq!(doc.children[3], Block::Raw("---".into()));
    }

    #[test]
    fn test_export_stays_raw() {
        let doc = parse("export const meta = {\n  a: 1,\n}\n\nText").unwrap();
        assert_eq!(doc.children[0], Block::Esm("export const meta = {\n  a: 1,\n}".into()));
    }
}
