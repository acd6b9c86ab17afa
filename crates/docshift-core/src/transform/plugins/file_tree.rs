//! FileTree: Folder/File elements → nested bullet list

use crate::{
    transform::{
        component::{ComponentSpec, STARLIGHT_COMPONENTS},
        Binding, TransformContext, TransformStats, Transformer,
    },
    tree::{visit, Block, Component, Document, Inline, List, ListItem},
    Result,
};

const SPEC: ComponentSpec = ComponentSpec {
    transformer: "file-tree",
    legacy: &["FileTree"],
    owned: &["FileTree"],
};

pub struct FileTreeTransformer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Folder,
    File,
}

fn entry_kind(name: &str) -> Option<Entry> {
    match name {
        "FileTree.Folder" | "Folder" => Some(Entry::Folder),
        "FileTree.File" | "File" => Some(Entry::File),
        _ => None,
    }
}

fn has_entries(blocks: &[Block]) -> bool {
    blocks
        .iter()
        .filter_map(Block::as_component)
        .any(|c| entry_kind(c.name()).is_some())
}

/// List items for the Folder/File elements among `blocks`; nameless entries
/// and anything that is not an entry are dropped
fn convert(blocks: &[Block]) -> Vec<ListItem> {
    blocks
        .iter()
        .filter_map(Block::as_component)
        .filter_map(|c| {
            let kind = entry_kind(c.name())?;
            let name = c.attributes.literal("name")?.trim();
            if name.is_empty() {
                return None;
            }
            let item = match kind {
                Entry::File => ListItem {
                    children: vec![Block::Paragraph(vec![Inline::Text(name.to_string())])],
                },
                Entry::Folder => {
                    let mut children = vec![Block::Paragraph(vec![Inline::Text(format!(
                        "{}/",
                        name.trim_end_matches('/')
                    ))])];
                    let nested = convert(&c.children);
                    if !nested.is_empty() {
                        children.push(Block::List(List::new(false, nested)));
                    }
                    ListItem { children }
                }
            };
            Some(item)
        })
        .collect()
}

impl Transformer for FileTreeTransformer {
    fn name(&self) -> &str {
        "file-tree"
    }

    fn run_after(&self) -> Vec<&str> {
        vec!["steps"]
    }

    fn component_map(&self) -> Vec<(&str, &str)> {
        vec![("FileTree", "FileTree")]
    }

    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new(STARLIGHT_COMPONENTS, SPEC.owned)]
    }

    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        SPEC.apply(doc, ctx, |doc, stats| {
            visit::for_each_block_list_mut(&mut doc.children, &mut |blocks: &mut Vec<Block>| {
                let mut removals = Vec::new();
                for index in 0..blocks.len() {
                    let Some(tree) = blocks[index].as_component_mut() else {
                        continue;
                    };
                    if tree.name() != "FileTree" {
                        continue;
                    }
                    // already a bullet list
                    if !has_entries(&tree.children) && !tree.children.is_empty() {
                        continue;
                    }

                    let items = convert(&tree.children);
                    if items.is_empty() {
                        removals.push((index, Vec::new()));
                        if index > 0 && blocks[index - 1].is_blank() {
                            removals.push((index - 1, Vec::new()));
                        }
                        if blocks.get(index + 1).is_some_and(Block::is_blank) {
                            removals.push((index + 1, Vec::new()));
                        }
                        stats.removed += 1;
                    } else {
                        tree.children = vec![Block::List(List::new(false, items))];
                        stats.rewritten += 1;
                    }
                }
                visit::splice_all(blocks, removals);
            });
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::run_on;
    use crate::tree::{Attribute, Attributes};

    #[test]
    fn test_folder_and_file_become_nested_list() {
        let src = "import { FileTree } from 'nextra/components'\n\n<FileTree>\n  <FileTree.Folder name=\"src\" defaultOpen>\n    <FileTree.File name=\"index.ts\" />\n  </FileTree.Folder>\n</FileTree>\n";
        let (out, stats) = run_on(&FileTreeTransformer, src, "a.mdx");
        assert_eq!(
            out,
            "import { FileTree } from '@astrojs/starlight/components';\n\n<FileTree>\n  - src/\n    - index.ts\n</FileTree>\n"
        );
        assert_eq!(stats.rewritten, 1);
    }

    #[test]
    fn test_empty_tree_is_removed() {
        let src = "import { FileTree } from 'nextra/components'\n\nIntro\n\n<FileTree>\n  <FileTree.File />\n</FileTree>\n\nOutro\n";
        let (out, stats) = run_on(&FileTreeTransformer, src, "a.mdx");
        assert_eq!(out, "Intro\n\nOutro\n");
        assert_eq!(stats.removed, 1);
    }

    #[test]
    fn test_blank_siblings_go_with_the_tree() {
        let mut doc = Document::new(vec![
            Block::Paragraph(vec![Inline::Text("Intro".into())]),
            Block::Paragraph(vec![Inline::Text("  ".into())]),
            Block::Component(Component::new("FileTree", Attributes::default(), Vec::new())),
            Block::Raw(String::new()),
            Block::Paragraph(vec![Inline::Text("Outro".into())]),
        ]);
        let options = crate::config::MigrationOptions::default();
        let file = crate::paths::FileContext::new("a.mdx");
        let observer = crate::observer::TracingObserver;
        let ctx = TransformContext::new(&options, &file, &observer);
        FileTreeTransformer.transform(&mut doc, &ctx).unwrap();
        assert_eq!(doc.children.len(), 2);
    }

    #[test]
    fn test_nameless_entries_are_dropped() {
        let blocks = vec![
            Block::Component(Component::new("FileTree.File", Attributes::default(), Vec::new())),
            Block::Component(Component::new(
                "FileTree.File",
                Attributes::new(vec![Attribute::literal("name", "a.md")]),
                Vec::new(),
            )),
        ];
        assert_eq!(convert(&blocks).len(), 1);
    }

    #[test]
    fn test_migrated_tree_is_stable() {
        let src = "import { FileTree } from '@astrojs/starlight/components';\n\n<FileTree>\n  - src/\n    - index.ts\n</FileTree>\n";
        let (out, stats) = run_on(&FileTreeTransformer, src, "a.mdx");
        assert_eq!(out, src);
        assert!(!stats.has_changes());
    }
}
