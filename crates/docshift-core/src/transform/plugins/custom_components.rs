//! Custom site components
//!
//! Components that are not ready for the new site are replaced by a one-line
//! HTML comment that records the original tag and its attributes, so the page
//! still builds and the removed widget stays visible to editors. Components
//! that are ready keep their markup; their imports move to the shared
//! components module, one statement per component.

use crate::{
    config::ComponentOptions,
    print::open_tag,
    transform::{component::drop_empty_imports, Binding, TransformContext, TransformStats, Transformer},
    tree::{visit, Attributes, Block, Document, ImportDecl, Inline},
    Result,
};

pub struct CustomComponentTransformer {
    not_ready: Vec<String>,
    ready: Vec<String>,
    ready_module: String,
}

impl CustomComponentTransformer {
    pub fn new(options: &ComponentOptions) -> Self {
        Self {
            not_ready: options.not_ready.clone(),
            ready: options.ready.clone(),
            ready_module: options.ready_module.trim_end_matches('/').to_string(),
        }
    }

    fn is_not_ready(&self, name: &str) -> bool {
        let root = name.split('.').next().unwrap_or(name);
        self.not_ready.iter().any(|n| n == root)
    }

    fn module_for(&self, name: &str) -> String {
        format!("{}/{}", self.ready_module, name)
    }

    fn comment_out(&self, doc: &mut Document, stats: &mut TransformStats) {
        visit::for_each_block_list_mut(&mut doc.children, &mut |blocks: &mut Vec<Block>| {
            let edits: Vec<(usize, Vec<Block>)> = blocks
                .iter()
                .enumerate()
                .filter_map(|(i, block)| {
                    let c = block.as_component()?;
                    self.is_not_ready(c.name()).then(|| {
                        let comment = placeholder(c.name(), &c.attributes, !c.children.is_empty());
                        (i, vec![Block::Raw(comment)])
                    })
                })
                .collect();
            stats.removed += edits.len();
            visit::splice_all(blocks, edits);
        });

        visit::for_each_inline_list_mut(&mut doc.children, &mut |inlines: &mut Vec<Inline>| {
            let edits: Vec<(usize, Vec<Inline>)> = inlines
                .iter()
                .enumerate()
                .filter_map(|(i, inline)| match inline {
                    Inline::Component(c) if self.is_not_ready(c.name()) => {
                        let comment = placeholder(c.name(), &c.attributes, !c.children.is_empty());
                        Some((i, vec![Inline::Html(comment)]))
                    }
                    _ => None,
                })
                .collect();
            stats.removed += edits.len();
            visit::splice_all(inlines, edits);
        });
    }

    /// Drop not-ready symbols and split ready symbols into per-component imports
    fn rewrite_imports(&self, doc: &mut Document, stats: &mut TransformStats) {
        let not_ready: Vec<&str> = self.not_ready.iter().map(String::as_str).collect();
        let mut edits = Vec::new();

        for (index, block) in doc.children.iter_mut().enumerate() {
            let Block::Import(import) = block else {
                continue;
            };
            stats.imports_removed += import.remove_locals(&not_ready);

            let mut split = Vec::new();
            if let Some(default) = import.default.clone() {
                if self.ready.contains(&default) && import.source != self.module_for(&default) {
                    import.default = None;
                    split.push(ImportDecl {
                        default: Some(default.clone()),
                        names: Vec::new(),
                        source: self.module_for(&default),
                    });
                }
            }
            let specifiers = std::mem::take(&mut import.names);
            for specifier in specifiers {
                let imported = specifier.split(" as ").next().unwrap_or(&specifier).trim().to_string();
                if self.ready.contains(&imported) && import.source != self.module_for(&imported) {
                    split.push(ImportDecl::named(self.module_for(&imported), vec![specifier]));
                } else {
                    import.names.push(specifier);
                }
            }

            if !split.is_empty() {
                stats.rewritten += split.len();
                let mut replacement = Vec::new();
                if !import.is_empty() {
                    replacement.push(Block::Import(import.clone()));
                }
                replacement.extend(split.into_iter().map(Block::Import));
                edits.push((index, replacement));
            }
        }

        visit::splice_all(&mut doc.children, edits);
        drop_empty_imports(doc);
    }
}

impl Transformer for CustomComponentTransformer {
    fn name(&self) -> &str {
        "custom-components"
    }

    fn run_after(&self) -> Vec<&str> {
        vec!["frontmatter"]
    }

    fn bindings(&self) -> Vec<Binding> {
        self.ready
            .iter()
            .map(|name| Binding::new(self.module_for(name), &[name.as_str()]))
            .collect()
    }

    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        let mut stats = TransformStats::new();
        self.comment_out(doc, &mut stats);
        self.rewrite_imports(doc, &mut stats);
        if stats.has_changes() {
            ctx.log(self.name(), format!("custom components: {stats}"));
        }
        Ok(stats)
    }
}

/// `<!-- <Video src="a.mp4">...</Video> -->`
fn placeholder(name: &str, attributes: &Attributes, has_children: bool) -> String {
    let open = open_tag(name, attributes);
    let tag = if has_children {
        format!("{open}>...</{name}>")
    } else {
        format!("{open} />")
    };
    let mut text = tag.replace('\n', " ");
    while text.contains("--") {
        text = text.replace("--", "- -");
    }
    format!("<!-- {text} -->")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::run_on;

    fn transformer() -> CustomComponentTransformer {
        CustomComponentTransformer::new(&ComponentOptions::default())
    }

    #[test]
    fn test_not_ready_component_becomes_comment() {
        let src = "import { Video, Faucet } from '../components'\n\n<Video src=\"/a.mp4\" autoPlay>\n  Fallback text\n</Video>\n\nAfter\n";
        let (out, stats) = run_on(&transformer(), src, "a.mdx");
        assert_eq!(
            out,
            "import { Faucet } from '~/components/Faucet';\n\n<!-- <Video src=\"/a.mp4\" autoPlay>...</Video> -->\n\nAfter\n"
        );
        assert_eq!(stats.removed, 1);
        assert_eq!(stats.imports_removed, 1);
    }

    #[test]
    fn test_inline_and_self_closing_placeholders() {
        let (out, _) = run_on(&transformer(), "See <Banner note=\"a--b\" /> here\n", "a.mdx");
        assert_eq!(out, "See <!-- <Banner note=\"a- -b\" /> --> here\n");
    }

    #[test]
    fn test_ready_imports_are_split_per_component() {
        let src = "import { GraphQLExplorer, Search as S, Other } from '@/components'\n\n<GraphQLExplorer />\n";
        let (out, _) = run_on(&transformer(), src, "a.mdx");
        assert_eq!(
            out,
            "import { Other } from '@/components';\n\nimport { GraphQLExplorer } from '~/components/GraphQLExplorer';\n\nimport { Search as S } from '~/components/Search';\n\n<GraphQLExplorer />\n"
        );
    }

    #[test]
    fn test_migrated_imports_are_stable() {
        let src = "import { Faucet } from '~/components/Faucet';\n\n<Faucet />\n";
        let (out, stats) = run_on(&transformer(), src, "a.mdx");
        assert_eq!(out, src);
        assert!(!stats.has_changes());
    }
}
