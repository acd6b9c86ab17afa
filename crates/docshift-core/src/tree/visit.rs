//! Tree traversal helpers
//!
//! Structural edits never splice while iterating. Callers receive one sibling
//! list at a time, collect the indices they want to change, and hand them to
//! [`splice_all`], which applies them from the highest index down.

use super::{Block, CodeBlock, Component, Inline, InlineComponent};

/// Call `f` on every sibling list of blocks, innermost lists first
pub fn for_each_block_list_mut<F>(blocks: &mut Vec<Block>, f: &mut F)
where
    F: FnMut(&mut Vec<Block>),
{
    for block in blocks.iter_mut() {
        match block {
            Block::Component(c) => for_each_block_list_mut(&mut c.children, f),
            Block::Directive(d) => for_each_block_list_mut(&mut d.children, f),
            Block::List(list) => {
                for item in &mut list.items {
                    for_each_block_list_mut(&mut item.children, f);
                }
            }
            _ => {}
        }
    }
    f(blocks);
}

/// Pre-order visit of every block-level component
pub fn for_each_component_mut<F>(blocks: &mut [Block], f: &mut F)
where
    F: FnMut(&mut Component),
{
    for block in blocks.iter_mut() {
        match block {
            Block::Component(c) => {
                f(c);
                for_each_component_mut(&mut c.children, f);
            }
            Block::Directive(d) => for_each_component_mut(&mut d.children, f),
            Block::List(list) => {
                for item in &mut list.items {
                    for_each_component_mut(&mut item.children, f);
                }
            }
            _ => {}
        }
    }
}

/// Read-only search over block-level and inline components
pub fn any_component<P>(blocks: &[Block], pred: &P) -> bool
where
    P: Fn(&str, super::ComponentFamily) -> bool,
{
    blocks.iter().any(|block| match block {
        Block::Component(c) => pred(c.name(), c.family()) || any_component(&c.children, pred),
        Block::Directive(d) => any_component(&d.children, pred),
        Block::List(list) => list
            .items
            .iter()
            .any(|item| any_component(&item.children, pred)),
        Block::Paragraph(inlines) => any_inline_component(inlines, pred),
        Block::Heading(h) => any_inline_component(&h.children, pred),
        _ => false,
    })
}

fn any_inline_component<P>(inlines: &[Inline], pred: &P) -> bool
where
    P: Fn(&str, super::ComponentFamily) -> bool,
{
    inlines.iter().any(|inline| match inline {
        Inline::Component(c) => {
            pred(c.name(), c.family()) || any_inline_component(&c.children, pred)
        }
        Inline::Emphasis(children) | Inline::Strong(children) => {
            any_inline_component(children, pred)
        }
        Inline::Link(link) => any_inline_component(&link.children, pred),
        _ => false,
    })
}

/// Collect every component name used anywhere in the tree
pub fn component_names(blocks: &[Block]) -> Vec<String> {
    let mut names = Vec::new();
    collect_names(blocks, &mut names);
    names.sort();
    names.dedup();
    names
}

fn collect_names(blocks: &[Block], names: &mut Vec<String>) {
    for block in blocks {
        match block {
            Block::Component(c) => {
                names.push(root_name(c.name()).to_string());
                collect_names(&c.children, names);
            }
            Block::Directive(d) => collect_names(&d.children, names),
            Block::List(list) => {
                for item in &list.items {
                    collect_names(&item.children, names);
                }
            }
            Block::Paragraph(inlines) => collect_inline_names(inlines, names),
            Block::Heading(h) => collect_inline_names(&h.children, names),
            _ => {}
        }
    }
}

fn collect_inline_names(inlines: &[Inline], names: &mut Vec<String>) {
    for inline in inlines {
        match inline {
            Inline::Component(c) => {
                names.push(root_name(c.name()).to_string());
                collect_inline_names(&c.children, names);
            }
            Inline::Emphasis(children) | Inline::Strong(children) => {
                collect_inline_names(children, names)
            }
            Inline::Link(link) => collect_inline_names(&link.children, names),
            _ => {}
        }
    }
}

/// `Tabs.Tab` is bound by the `Tabs` import
fn root_name(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Call `f` on every list of phrasing content (paragraphs, headings and
/// nested inline containers), innermost first
pub fn for_each_inline_list_mut<F>(blocks: &mut [Block], f: &mut F)
where
    F: FnMut(&mut Vec<Inline>),
{
    for block in blocks.iter_mut() {
        match block {
            Block::Paragraph(inlines) => inline_lists(inlines, f),
            Block::Heading(h) => inline_lists(&mut h.children, f),
            Block::Component(c) => for_each_inline_list_mut(&mut c.children, f),
            Block::Directive(d) => for_each_inline_list_mut(&mut d.children, f),
            Block::List(list) => {
                for item in &mut list.items {
                    for_each_inline_list_mut(&mut item.children, f);
                }
            }
            _ => {}
        }
    }
}

fn inline_lists<F>(inlines: &mut Vec<Inline>, f: &mut F)
where
    F: FnMut(&mut Vec<Inline>),
{
    for inline in inlines.iter_mut() {
        match inline {
            Inline::Emphasis(children) | Inline::Strong(children) => inline_lists(children, f),
            Inline::Link(link) => inline_lists(&mut link.children, f),
            Inline::Component(c) => inline_lists(&mut c.children, f),
            _ => {}
        }
    }
    f(inlines);
}

/// Visit every inline node, including those nested in inline containers
pub fn for_each_inline_mut<F>(blocks: &mut [Block], f: &mut F)
where
    F: FnMut(&mut Inline),
{
    for_each_inline_list_mut(blocks, &mut |inlines: &mut Vec<Inline>| {
        for inline in inlines.iter_mut() {
            f(inline);
        }
    });
}

/// Visit every inline component
pub fn for_each_inline_component_mut<F>(blocks: &mut [Block], f: &mut F)
where
    F: FnMut(&mut InlineComponent),
{
    for_each_inline_mut(blocks, &mut |inline: &mut Inline| {
        if let Inline::Component(c) = inline {
            f(c);
        }
    });
}

/// Visit every fenced code block
pub fn for_each_code_mut<F>(blocks: &mut [Block], f: &mut F)
where
    F: FnMut(&mut CodeBlock),
{
    for block in blocks.iter_mut() {
        match block {
            Block::Code(code) => f(code),
            Block::Component(c) => for_each_code_mut(&mut c.children, f),
            Block::Directive(d) => for_each_code_mut(&mut d.children, f),
            Block::List(list) => {
                for item in &mut list.items {
                    for_each_code_mut(&mut item.children, f);
                }
            }
            _ => {}
        }
    }
}

/// Replace `items[index]` with the given nodes for every edit, applying the
/// edits from the highest index to the lowest so earlier indices stay valid.
/// An empty replacement removes the node.
pub fn splice_all<T>(items: &mut Vec<T>, mut edits: Vec<(usize, Vec<T>)>) {
    edits.sort_by(|a, b| b.0.cmp(&a.0));
    edits.dedup_by_key(|e| e.0);
    for (index, replacement) in edits {
        if index < items.len() {
            items.splice(index..=index, replacement);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Attributes, ListItem, List};

    fn para(text: &str) -> Block {
        Block::Paragraph(vec![Inline::Text(text.to_string())])
    }

    #[test]
    fn test_splice_all_applies_high_to_low() {
        let mut items = vec![1, 2, 3, 4];
        splice_all(&mut items, vec![(0, vec![]), (2, vec![30, 31]), (3, vec![])]);
        assert_eq!(items, vec![2, 30, 31]);
    }

    #[test]
    fn test_block_lists_visit_innermost_first() {
        let inner = Component::<Block>::new("Steps", Attributes::default(), vec![para("a")]);
        let mut blocks = vec![
            Block::List(List::new(false, vec![ListItem { children: vec![para("x")] }])),
            Block::Component(inner),
        ];
        let mut sizes = Vec::new();
        for_each_block_list_mut(&mut blocks, &mut |list: &mut Vec<Block>| sizes.push(list.len()));
        assert_eq!(sizes, vec![1, 1, 2]);
    }

    #[test]
    fn test_component_names_use_dotted_root() {
        let tab = Component::<Block>::new("Tabs.Tab", Attributes::default(), vec![]);
        let tabs = Component::<Block>::new("Tabs", Attributes::default(), vec![Block::Component(tab)]);
        let inline = InlineComponent::new("Code", Attributes::default(), vec![]);
        let blocks = vec![
            Block::Component(tabs),
            Block::Paragraph(vec![Inline::Component(inline)]),
        ];
        assert_eq!(component_names(&blocks), vec!["Code", "Tabs"]);
    }
}
