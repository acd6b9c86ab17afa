//! Code language normalization
//!
//! Fence languages are mapped onto the canonical lowercase set the highlighter
//! knows. `<code>`/`<Code>` elements holding text become plain inline code,
//! and a `<Code>` wrapped around a fence is replaced by the fence. Elements
//! with a `code` attribute are kept and imported from the new library.

use crate::{
    transform::{
        component::{ensure_import, strip_legacy_imports, STARLIGHT_COMPONENTS},
        Binding, TransformContext, TransformStats, Transformer,
    },
    tree::{inline_text, visit, Block, CodeBlock, Component, ComponentFamily, Document, Inline},
    Result,
};

/// Languages the highlighter does not support; the fence keeps no language
const UNSUPPORTED: &[&str] = &["move"];

pub struct CodeLanguageTransformer;

impl CodeLanguageTransformer {
    fn normalize_fences(doc: &mut Document, stats: &mut TransformStats) {
        visit::for_each_code_mut(&mut doc.children, &mut |code: &mut CodeBlock| {
            let Some(lang) = code.lang.as_deref() else {
                return;
            };
            let normalized = canonical_language(lang);
            if normalized.as_deref() != Some(lang) {
                code.lang = normalized;
                stats.rewritten += 1;
            }
        });
    }

    fn flatten_code_components(doc: &mut Document, stats: &mut TransformStats) {
        visit::for_each_inline_mut(&mut doc.children, &mut |inline: &mut Inline| {
            let Inline::Component(c) = inline else {
                return;
            };
            if !is_flattenable(c) {
                return;
            }
            let text = match c.children.first() {
                Some(first @ Inline::Text(_)) => inline_text(std::slice::from_ref(first)),
                _ => return,
            };
            *inline = Inline::Code(text);
            stats.rewritten += 1;
        });

        visit::for_each_block_list_mut(&mut doc.children, &mut |blocks: &mut Vec<Block>| {
            let mut edits = Vec::new();
            for (index, block) in blocks.iter().enumerate() {
                let Some(c) = block.as_component().filter(|c| is_flattenable(*c)) else {
                    continue;
                };
                let fences: Vec<Block> = c
                    .children
                    .iter()
                    .filter(|child| matches!(child, Block::Code(_)))
                    .cloned()
                    .collect();
                if !fences.is_empty() {
                    edits.push((index, fences));
                    continue;
                }
                let text = match c.children.first() {
                    Some(Block::Paragraph(inlines)) => match inlines.first() {
                        Some(first @ Inline::Text(_)) => inline_text(std::slice::from_ref(first)),
                        _ => continue,
                    },
                    _ => continue,
                };
                edits.push((index, vec![Block::Paragraph(vec![Inline::Code(text)])]));
            }
            stats.rewritten += edits.len();
            visit::splice_all(blocks, edits);
        });
    }
}

/// Code elements that carry their source in children rather than in a
/// `code` attribute
fn is_flattenable<C>(c: &Component<C>) -> bool {
    c.family() == ComponentFamily::Code && !c.attributes.contains("code")
}

impl Transformer for CodeLanguageTransformer {
    fn name(&self) -> &str {
        "code-language"
    }

    fn run_after(&self) -> Vec<&str> {
        vec!["callout"]
    }

    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new(STARLIGHT_COMPONENTS, &["Code"])]
    }

    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        let mut stats = TransformStats::new();
        Self::normalize_fences(doc, &mut stats);

        let before = stats.rewritten;
        Self::flatten_code_components(doc, &mut stats);
        let kept = visit::component_names(&doc.children).iter().any(|n| n == "Code");
        if stats.rewritten > before || kept {
            stats.imports_removed += strip_legacy_imports(doc, &["Code"]);
        }
        if kept {
            stats.imports_added += ensure_import(doc, STARLIGHT_COMPONENTS, &["Code"]);
        }

        if stats.has_changes() {
            ctx.log(self.name(), format!("normalized code: {stats}"));
        }
        Ok(stats)
    }
}

/// Canonical highlighter name for a fence language; `None` drops the language
pub fn canonical_language(lang: &str) -> Option<String> {
    let lower = lang.trim().to_lowercase();
    if UNSUPPORTED.contains(&lower.as_str()) {
        return None;
    }
    let canonical = match lower.as_str() {
        "bash" | "sh" | "shell" | "zsh" | "console" | "shellscript" => "shellscript",
        "ts" => "typescript",
        "js" => "javascript",
        "yml" => "yaml",
        "py" => "python",
        "rs" => "rust",
        "md" => "markdown",
        other => other,
    };
    Some(canonical.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::run_on;

    #[test]
    fn test_language_table() {
        assert_eq!(canonical_language("Bash").as_deref(), Some("shellscript"));
        assert_eq!(canonical_language("TS").as_deref(), Some("typescript"));
        assert_eq!(canonical_language("graphql").as_deref(), Some("graphql"));
        assert_eq!(canonical_language("move"), None);
    }

    #[test]
    fn test_fences_are_rewritten() {
        let src = "```sh\nnpm i\n```\n\n```Move\nmodule a {}\n```\n\n```ts title=\"a.ts\"\nconst a = 1\n```\n";
        let (out, stats) = run_on(&CodeLanguageTransformer, src, "a.mdx");
        assert_eq!(
            out,
            "```shellscript\nnpm i\n```\n\n```\nmodule a {}\n```\n\n```typescript title=\"a.ts\"\nconst a = 1\n```\n"
        );
        assert_eq!(stats.rewritten, 3);
    }

    #[test]
    fn test_code_components_become_inline_code() {
        let src = "import { Code } from 'nextra/components'\n\nRun <code>a | b</code> now\n";
        let (out, _) = run_on(&CodeLanguageTransformer, src, "a.mdx");
        assert_eq!(out, "Run `a | b` now\n");
    }

    #[test]
    fn test_code_attribute_components_are_kept() {
        let src = "import { Code } from 'nextra/components'\n\n<Code code={snippet} lang=\"ts\" />\n";
        let (out, stats) = run_on(&CodeLanguageTransformer, src, "a.mdx");
        assert_eq!(
            out,
            "import { Code } from '@astrojs/starlight/components';\n\n<Code code={snippet} lang=\"ts\" />\n"
        );
        assert_eq!(stats.rewritten, 0);

        let (twice, stats) = run_on(&CodeLanguageTransformer, &out, "a.mdx");
        assert_eq!(twice, out);
        assert!(!stats.has_changes());
    }

    #[test]
    fn test_wrapped_fence_is_hoisted() {
        let src = "<Code>\n  ```bash\n  npm i\n  ```\n</Code>\n\nAfter\n";
        let (out, stats) = run_on(&CodeLanguageTransformer, src, "a.mdx");
        assert_eq!(out, "```shellscript\nnpm i\n```\n\nAfter\n");
        assert_eq!(stats.rewritten, 2);
    }

    #[test]
    fn test_empty_code_elements_are_left_alone() {
        let src = "Use <code /> here\n";
        let (out, stats) = run_on(&CodeLanguageTransformer, src, "a.mdx");
        assert_eq!(out, src);
        assert!(!stats.has_changes());
    }

    #[test]
    fn test_canonical_fences_are_stable() {
        let src = "```shellscript\nls\n```\n";
        let (out, stats) = run_on(&CodeLanguageTransformer, src, "a.mdx");
        assert_eq!(out, src);
        assert!(!stats.has_changes());
    }
}
