//! Serializes a [`Document`] back to MDX text
//!
//! Sibling blocks are separated by exactly one blank line, JSX children are
//! indented by two spaces and ordered lists are renumbered from their start.
//! Plain text is entity-escaped; backslash escapes already present in the
//! source are copied through untouched.

use crate::tree::{
    AttrValue, Attributes, Block, CodeBlock, Component, Directive, Document, Frontmatter,
    ImportDecl, Inline, InlineComponent, List,
};

/// Print a whole document, ending with a newline
pub fn print(doc: &Document) -> String {
    let body = print_blocks(&doc.children, "\n\n");
    if body.is_empty() {
        body
    } else {
        body + "\n"
    }
}

fn print_blocks(blocks: &[Block], separator: &str) -> String {
    blocks
        .iter()
        .map(print_block)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Print a single block without trailing newline
pub fn print_block(block: &Block) -> String {
    match block {
        Block::Frontmatter(fm) => print_frontmatter(fm),
        Block::Import(import) => print_import(import),
        Block::Esm(raw) | Block::Raw(raw) => raw.clone(),
        Block::Heading(h) => {
            let text = print_inlines(&h.children, false);
            format!("{} {}", "#".repeat(h.depth.clamp(1, 6) as usize), text)
        }
        Block::Paragraph(inlines) => print_inlines(inlines, false),
        Block::List(list) => print_list(list),
        Block::Code(code) => print_code(code),
        Block::Component(c) => print_component(c),
        Block::Directive(d) => print_directive(d),
    }
}

fn print_frontmatter(fm: &Frontmatter) -> String {
    let raw = fm.raw.trim_end_matches('\n');
    if raw.is_empty() {
        "---\n---".to_string()
    } else {
        format!("---\n{raw}\n---")
    }
}

pub fn print_import(import: &ImportDecl) -> String {
    let mut bindings = Vec::new();
    if let Some(default) = &import.default {
        bindings.push(default.clone());
    }
    if !import.names.is_empty() {
        bindings.push(format!("{{ {} }}", import.names.join(", ")));
    }
    format!("import {} from '{}';", bindings.join(", "), import.source)
}

fn print_list(list: &List) -> String {
    let item_separator = if list.spread { "\n\n" } else { "\n" };
    list.items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if list.ordered {
                format!("{}. ", list.start as usize + i)
            } else {
                "- ".to_string()
            };
            let body = print_blocks(&item.children, item_separator);
            let pad = " ".repeat(marker.len());
            let mut lines = body.lines();
            let mut out = format!("{}{}", marker, lines.next().unwrap_or_default()).trim_end().to_string();
            for line in lines {
                out.push('\n');
                if !line.is_empty() {
                    out.push_str(&pad);
                    out.push_str(line);
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(item_separator)
}

fn print_code(code: &CodeBlock) -> String {
    let mut info = code.lang.clone().unwrap_or_default();
    if let Some(meta) = code.meta.as_deref().filter(|m| !m.is_empty()) {
        if !info.is_empty() {
            info.push(' ');
        }
        info.push_str(meta);
    }
    if code.value.is_empty() {
        format!("{}{}\n{}", code.fence, info, code.fence)
    } else {
        format!("{}{}\n{}\n{}", code.fence, info, code.value, code.fence)
    }
}

fn print_component(c: &Component) -> String {
    let open = open_tag(c.name(), &c.attributes);
    if c.children.is_empty() {
        return self_closing(&open);
    }
    if let [Block::Paragraph(inlines)] = c.children.as_slice() {
        let text = print_inlines(inlines, false);
        if !text.contains('\n') {
            return format!("{open}>{text}</{}>", c.name());
        }
    }
    let body = indent(&print_blocks(&c.children, "\n\n"), "  ");
    format!("{open}>\n{body}\n</{}>", c.name())
}

fn print_directive(d: &Directive) -> String {
    let mut head = format!(":::{}", d.name);
    if let Some(label) = &d.label {
        head.push_str(&format!("[{label}]"));
    }
    if !d.classes.is_empty() || !d.attributes.is_empty() {
        let mut parts: Vec<String> = d.classes.iter().map(|c| format!(".{c}")).collect();
        parts.extend(
            d.attributes
                .iter()
                .map(|(k, v)| format!("{k}=\"{}\"", v.replace('"', "&quot;"))),
        );
        head.push_str(&format!("{{{}}}", parts.join(" ")));
    }
    let body = print_blocks(&d.children, "\n\n");
    if body.is_empty() {
        format!("{head}\n:::")
    } else {
        format!("{head}\n{body}\n:::")
    }
}

/// `<Name a="b"` without the closing bracket
pub fn open_tag(name: &str, attributes: &Attributes) -> String {
    let mut out = format!("<{name}");
    for attr in attributes.iter() {
        out.push(' ');
        out.push_str(&attr.name);
        match &attr.value {
            Some(AttrValue::Literal(v)) => {
                out.push_str(&format!("=\"{}\"", v.replace('&', "&amp;").replace('"', "&quot;")))
            }
            Some(AttrValue::Expression(e)) => out.push_str(&format!("={{{e}}}")),
            None => {}
        }
    }
    out
}

fn self_closing(open: &str) -> String {
    format!("{open} />")
}

fn indent(text: &str, pad: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print phrasing content; `in_strong` enables brace escaping
pub fn print_inlines(inlines: &[Inline], in_strong: bool) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(t) => {
                let escaped = escape_text(t);
                if in_strong {
                    out.push_str(&escape_braces(&escaped));
                } else {
                    out.push_str(&escaped);
                }
            }
            Inline::Emphasis(children) => {
                out.push('*');
                out.push_str(&print_inlines(children, in_strong));
                out.push('*');
            }
            Inline::Strong(children) => {
                out.push_str("**");
                out.push_str(&print_inlines(children, true));
                out.push_str("**");
            }
            Inline::Code(code) => out.push_str(&code_span(code)),
            Inline::Link(link) if link.autolink => {
                out.push('<');
                out.push_str(&link.url);
                out.push('>');
            }
            Inline::Link(link) => {
                out.push('[');
                out.push_str(&print_inlines(&link.children, in_strong));
                out.push_str("](");
                out.push_str(&link.url);
                if let Some(title) = &link.title {
                    out.push_str(&format!(" \"{title}\""));
                }
                out.push(')');
            }
            Inline::Image(image) => {
                out.push_str(&format!("![{}]({}", image.alt, image.url));
                if let Some(title) = &image.title {
                    out.push_str(&format!(" \"{title}\""));
                }
                out.push(')');
            }
            Inline::Component(c) => out.push_str(&print_inline_component(c)),
            Inline::Html(html) => out.push_str(html),
            Inline::Expression(expr) => {
                out.push('{');
                out.push_str(expr);
                out.push('}');
            }
            Inline::Break => out.push_str("  \n"),
        }
    }
    out
}

fn print_inline_component(c: &InlineComponent) -> String {
    let open = open_tag(c.name(), &c.attributes);
    if c.children.is_empty() {
        self_closing(&open)
    } else {
        format!("{open}>{}</{}>", print_inlines(&c.children, false), c.name())
    }
}

fn code_span(code: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in code.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    let ticks = "`".repeat(longest + 1);
    let pad = code.starts_with('`')
        || code.ends_with('`')
        || (code.len() >= 2 && code.starts_with(' ') && code.ends_with(' ') && !code.trim().is_empty());
    if pad {
        format!("{ticks} {code} {ticks}")
    } else {
        format!("{ticks}{code}{ticks}")
    }
}

/// Entity-escape `& < > ' "`, copying backslash escapes through verbatim
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some(&next) = chars.peek() {
                    if next.is_ascii_punctuation() {
                        out.push(next);
                        chars.next();
                    }
                }
            }
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Backslash-escape `{` and `}` that are not escaped already
pub fn escape_braces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
