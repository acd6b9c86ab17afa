//! Document tree for MDX content
//!
//! A [`Document`] owns an ordered list of [`Block`]s. Every node has exactly one
//! owner; transformers mutate the tree in place and the printer turns it back
//! into text.
//!
//! Embedded components carry a [`ComponentFamily`] that is computed once when
//! the node is built (or renamed), so transformers dispatch on the family
//! instead of re-matching names at every visit.

pub mod attrs;
pub mod visit;

pub use attrs::{AttrValue, Attribute, Attributes};

/// Root of one parsed file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub children: Vec<Block>,
}

impl Document {
    pub fn new(children: Vec<Block>) -> Self {
        Self { children }
    }

    /// Index of the first frontmatter block, if any
    pub fn frontmatter_index(&self) -> Option<usize> {
        self.children
            .iter()
            .position(|b| matches!(b, Block::Frontmatter(_)))
    }

    pub fn frontmatter(&self) -> Option<&Frontmatter> {
        self.children.iter().find_map(|b| match b {
            Block::Frontmatter(fm) => Some(fm),
            _ => None,
        })
    }

    pub fn frontmatter_mut(&mut self) -> Option<&mut Frontmatter> {
        self.children.iter_mut().find_map(|b| match b {
            Block::Frontmatter(fm) => Some(fm),
            _ => None,
        })
    }

    /// All parsed import statements, in document order
    pub fn imports(&self) -> impl Iterator<Item = &ImportDecl> {
        self.children.iter().filter_map(|b| match b {
            Block::Import(import) => Some(import),
            _ => None,
        })
    }
}

/// Block-level node
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Frontmatter(Frontmatter),
    Import(ImportDecl),
    /// ESM the import parser could not read (exports, namespace imports, ...)
    Esm(String),
    Heading(Heading),
    Paragraph(Vec<Inline>),
    List(List),
    Code(CodeBlock),
    Component(Component),
    Directive(Directive),
    /// Passed through verbatim: comments, blockquotes, tables, thematic breaks
    Raw(String),
}

impl Block {
    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Block::Component(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_component_mut(&mut self) -> Option<&mut Component> {
        match self {
            Block::Component(c) => Some(c),
            _ => None,
        }
    }

    /// Child blocks owned by this block, if it is a container
    pub fn child_blocks(&self) -> Option<&Vec<Block>> {
        match self {
            Block::Component(c) => Some(&c.children),
            Block::Directive(d) => Some(&d.children),
            _ => None,
        }
    }

    /// True for paragraphs that print as nothing but whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            Block::Paragraph(inlines) => inlines.iter().all(|i| match i {
                Inline::Text(t) => t.trim().is_empty(),
                Inline::Break => true,
                _ => false,
            }),
            Block::Raw(raw) => raw.trim().is_empty(),
            _ => false,
        }
    }

    /// True for blocks that belong to the document head (frontmatter and ESM)
    pub fn is_head(&self) -> bool {
        matches!(self, Block::Frontmatter(_) | Block::Import(_) | Block::Esm(_))
    }
}

/// YAML metadata at the top of a document, kept as raw text
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    pub raw: String,
}

impl Frontmatter {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Parse the block as a YAML mapping; `None` when it is not valid YAML
    pub fn mapping(&self) -> Option<serde_yaml::Mapping> {
        if self.raw.trim().is_empty() {
            return Some(serde_yaml::Mapping::new());
        }
        serde_yaml::from_str::<serde_yaml::Mapping>(&self.raw).ok()
    }

    /// String value of a top-level key, falling back to a line scan when the
    /// block is not valid YAML
    pub fn value(&self, key: &str) -> Option<String> {
        if let Some(mapping) = self.mapping() {
            return match mapping.get(key) {
                Some(serde_yaml::Value::String(s)) => Some(s.clone()),
                Some(serde_yaml::Value::Number(n)) => Some(n.to_string()),
                Some(serde_yaml::Value::Bool(b)) => Some(b.to_string()),
                _ => None,
            };
        }
        self.raw.lines().find_map(|line| {
            let (k, v) = line.split_once(':')?;
            (k.trim_end() == key && !k.starts_with(char::is_whitespace))
                .then(|| unquote(v.trim()).to_string())
        })
    }
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// `import Default, { a, b as c } from 'source'`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub default: Option<String>,
    /// Named specifiers as written (`a`, `b as c`)
    pub names: Vec<String>,
    pub source: String,
}

impl ImportDecl {
    pub fn named(source: impl Into<String>, names: Vec<String>) -> Self {
        Self {
            default: None,
            names,
            source: source.into(),
        }
    }

    /// Local binding names introduced by this statement
    pub fn locals(&self) -> Vec<&str> {
        let mut locals: Vec<&str> = self.default.iter().map(String::as_str).collect();
        locals.extend(self.names.iter().map(|n| local_name(n)));
        locals
    }

    pub fn binds(&self, local: &str) -> bool {
        self.locals().contains(&local)
    }

    /// Drop every binding whose local name matches; returns how many were dropped
    pub fn remove_locals(&mut self, doomed: &[&str]) -> usize {
        let before = self.names.len() + usize::from(self.default.is_some());
        self.names.retain(|n| !doomed.contains(&local_name(n)));
        if self
            .default
            .as_deref()
            .is_some_and(|d| doomed.contains(&d))
        {
            self.default = None;
        }
        before - self.names.len() - usize::from(self.default.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.names.is_empty()
    }
}

/// Local name of a named import specifier (`a as b` binds `b`)
pub fn local_name(specifier: &str) -> &str {
    specifier
        .rsplit_once(" as ")
        .map(|(_, local)| local.trim())
        .unwrap_or_else(|| specifier.trim())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub depth: u8,
    pub children: Vec<Inline>,
}

impl Heading {
    pub fn text(&self) -> String {
        inline_text(&self.children)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub ordered: bool,
    pub start: u32,
    /// Loose lists print a blank line between items
    pub spread: bool,
    pub items: Vec<ListItem>,
}

impl List {
    /// Tight list numbered from 1
    pub fn new(ordered: bool, items: Vec<ListItem>) -> Self {
        Self {
            ordered,
            start: 1,
            spread: false,
            items,
        }
    }

    pub fn with_spread(mut self, spread: bool) -> Self {
        self.spread = spread;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItem {
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub fence: String,
    pub lang: Option<String>,
    pub meta: Option<String>,
    pub value: String,
}

/// Embedded JSX element at block or inline level
#[derive(Debug, Clone, PartialEq)]
pub struct Component<C = Block> {
    name: String,
    family: ComponentFamily,
    pub attributes: Attributes,
    pub children: Vec<C>,
}

/// Inline embedded element; children are phrasing content
pub type InlineComponent = Component<Inline>;

impl<C> Component<C> {
    pub fn new(name: impl Into<String>, attributes: Attributes, children: Vec<C>) -> Self {
        let name = name.into();
        Self {
            family: ComponentFamily::of(&name),
            name,
            attributes,
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> ComponentFamily {
        self.family
    }

    /// Rename the node, recomputing its family
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.family = ComponentFamily::of(&self.name);
    }
}

impl Component<Block> {
    /// Concatenated text of every paragraph and heading below this node
    pub fn text(&self) -> String {
        blocks_text(&self.children)
    }
}

/// Component families recognised by the migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentFamily {
    Callout,
    Cards,
    Tabs,
    Steps,
    FileTree,
    Code,
    Other,
}

impl ComponentFamily {
    /// Classify a tag name; dotted names belong to the family of their prefix
    pub fn of(name: &str) -> Self {
        let head = name.split('.').next().unwrap_or(name);
        match head {
            "Callout" | "Aside" => ComponentFamily::Callout,
            "Cards" | "Card" | "CardGrid" | "LinkCard" => ComponentFamily::Cards,
            "Tabs" | "Tab" | "TabItem" => ComponentFamily::Tabs,
            "Steps" => ComponentFamily::Steps,
            "FileTree" => ComponentFamily::FileTree,
            "Code" | "code" => ComponentFamily::Code,
            _ => ComponentFamily::Other,
        }
    }
}

/// `:::name[label]{.class key="value"}` container
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub name: String,
    pub label: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Block>,
}

/// Phrasing content
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Code(String),
    Link(Link),
    Image(Image),
    Component(InlineComponent),
    /// Inline HTML comment or other raw markup
    Html(String),
    Expression(String),
    Break,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub url: String,
    pub title: Option<String>,
    pub children: Vec<Inline>,
    /// `<https://...>` form
    pub autolink: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub url: String,
    pub alt: String,
    pub title: Option<String>,
}

/// Plain text of phrasing content, without markup
pub fn inline_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(t) => out.push_str(t),
            Inline::Code(c) => out.push_str(c),
            Inline::Emphasis(c) | Inline::Strong(c) => out.push_str(&inline_text(c)),
            Inline::Link(link) => out.push_str(&inline_text(&link.children)),
            Inline::Image(image) => out.push_str(&image.alt),
            Inline::Component(c) => out.push_str(&inline_text(&c.children)),
            Inline::Break => out.push(' '),
            Inline::Html(_) | Inline::Expression(_) => {}
        }
    }
    out
}

/// Plain text of a block sequence; paragraphs are joined by a single space
pub fn blocks_text(blocks: &[Block]) -> String {
    let mut parts = Vec::new();
    for block in blocks {
        let text = match block {
            Block::Paragraph(inlines) => inline_text(inlines),
            Block::Heading(h) => h.text(),
            Block::Component(c) => c.text(),
            Block::Directive(d) => blocks_text(&d.children),
            Block::List(list) => list
                .items
                .iter()
                .map(|item| blocks_text(&item.children))
                .collect::<Vec<_>>()
                .join(" "),
            _ => String::new(),
        };
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            parts.push(text);
        }
    }
    parts.join(" ")
}
