//! Callout → Aside
//!
//! Renames legacy callouts and maps their `type` onto the new variants. In
//! directive mode the callout becomes a `:::type` container instead, and a
//! title is carried as a class plus data attribute.

use crate::{
    config::SyntaxStyle,
    transform::{
        component::{ComponentSpec, STARLIGHT_COMPONENTS},
        Binding, TransformContext, TransformStats, Transformer,
    },
    tree::{visit, Attribute, Block, Component, ComponentFamily, Directive, Document, InlineComponent},
    Result,
};

const SPEC: ComponentSpec = ComponentSpec {
    transformer: "callout",
    legacy: &["Callout"],
    owned: &["Aside"],
};

pub struct CalloutTransformer {
    syntax: SyntaxStyle,
}

impl CalloutTransformer {
    pub fn new(syntax: SyntaxStyle) -> Self {
        Self { syntax }
    }

    fn is_callout<C>(c: &Component<C>) -> bool {
        c.family() == ComponentFamily::Callout && c.name() == "Callout"
    }

    fn rename_to_aside<C>(c: &mut Component<C>, stats: &mut TransformStats) {
        if !Self::is_callout(c) {
            return;
        }
        let kind = aside_type(c.attributes.literal("type"));
        c.attributes.remove("emoji");
        c.attributes.set(Attribute::literal("type", kind));
        c.rename("Aside");
        stats.renamed += 1;
    }

    /// Callouts inside a line of text have no directive form
    fn inline_to_aside(doc: &mut Document, stats: &mut TransformStats) {
        visit::for_each_inline_component_mut(&mut doc.children, &mut |c: &mut InlineComponent| {
            Self::rename_to_aside(c, stats)
        });
    }

    fn to_aside(doc: &mut Document, stats: &mut TransformStats) {
        visit::for_each_component_mut(&mut doc.children, &mut |c: &mut Component| {
            Self::rename_to_aside(c, stats)
        });
        Self::inline_to_aside(doc, stats);
    }

    fn to_directive(doc: &mut Document, stats: &mut TransformStats) {
        visit::for_each_block_list_mut(&mut doc.children, &mut |blocks: &mut Vec<Block>| {
            let edits: Vec<(usize, Vec<Block>)> = blocks
                .iter()
                .enumerate()
                .filter_map(|(i, block)| {
                    let c = block.as_component().filter(|c| Self::is_callout(*c))?;
                    let title = c
                        .attributes
                        .literal("title")
                        .map(str::trim)
                        .filter(|t| !t.is_empty());
                    let (classes, attributes) = match title {
                        Some(title) => (
                            vec!["titled".to_string()],
                            vec![("data-title".to_string(), title.to_string())],
                        ),
                        None => (Vec::new(), Vec::new()),
                    };
                    let directive = Directive {
                        name: aside_type(c.attributes.literal("type")),
                        label: None,
                        classes,
                        attributes,
                        children: c.children.clone(),
                    };
                    Some((i, vec![Block::Directive(directive)]))
                })
                .collect();
            stats.rewritten += edits.len();
            visit::splice_all(blocks, edits);
        });
        Self::inline_to_aside(doc, stats);
    }
}

impl Transformer for CalloutTransformer {
    fn name(&self) -> &str {
        "callout"
    }

    fn run_after(&self) -> Vec<&str> {
        vec!["custom-components"]
    }

    fn component_map(&self) -> Vec<(&str, &str)> {
        vec![("Callout", "Aside")]
    }

    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new(STARLIGHT_COMPONENTS, SPEC.owned)]
    }

    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        SPEC.apply(doc, ctx, |doc, stats| {
            match self.syntax {
                SyntaxStyle::Component => Self::to_aside(doc, stats),
                SyntaxStyle::Directive => Self::to_directive(doc, stats),
            }
            Ok(())
        })
    }
}

/// Map a legacy callout type onto the Aside variants
fn aside_type(kind: Option<&str>) -> String {
    let kind = kind.map(|k| k.trim().to_lowercase()).unwrap_or_default();
    match kind.as_str() {
        "" | "default" | "info" => "note".to_string(),
        "warning" => "caution".to_string(),
        "error" => "danger".to_string(),
        _ => kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::run_on;

    #[test]
    fn test_type_table() {
        assert_eq!(aside_type(Some("warning")), "caution");
        assert_eq!(aside_type(Some("Info")), "note");
        assert_eq!(aside_type(Some("error")), "danger");
        assert_eq!(aside_type(None), "note");
        assert_eq!(aside_type(Some("TIP")), "tip");
    }

    #[test]
    fn test_callout_becomes_aside_with_import() {
        let src = "import { Callout } from 'nextra/components'\n\n<Callout type=\"warning\" emoji=\"⚠️\">Be careful</Callout>\n";
        let (out, stats) = run_on(&CalloutTransformer::new(SyntaxStyle::Component), src, "a.mdx");
        assert_eq!(
            out,
            "import { Aside } from '@astrojs/starlight/components';\n\n<Aside type=\"caution\">Be careful</Aside>\n"
        );
        assert_eq!(stats.renamed, 1);
        assert_eq!(stats.imports_added, 1);
    }

    #[test]
    fn test_missing_type_defaults_to_note() {
        let src = "<Callout>\n  First\n\n  Second\n</Callout>\n";
        let (out, _) = run_on(&CalloutTransformer::new(SyntaxStyle::Component), src, "a.mdx");
        assert_eq!(
            out,
            "import { Aside } from '@astrojs/starlight/components';\n\n<Aside type=\"note\">\n  First\n\n  Second\n</Aside>\n"
        );
    }

    #[test]
    fn test_directive_mode_with_title() {
        let src = "<Callout type=\"error\" title=\"Heads up\">Do not run this</Callout>\n";
        let (out, _) = run_on(&CalloutTransformer::new(SyntaxStyle::Directive), src, "a.mdx");
        assert_eq!(out, ":::danger{.titled data-title=\"Heads up\"}\nDo not run this\n:::\n");
    }

    #[test]
    fn test_inline_callouts_are_renamed_in_both_modes() {
        let src = "import { Callout } from 'nextra/components'\n\nNote: <Callout type=\"info\">inline</Callout> here\n";
        for syntax in [SyntaxStyle::Component, SyntaxStyle::Directive] {
            let (out, stats) = run_on(&CalloutTransformer::new(syntax), src, "a.mdx");
            assert_eq!(
                out,
                "import { Aside } from '@astrojs/starlight/components';\n\nNote: <Aside type=\"note\">inline</Aside> here\n"
            );
            assert_eq!(stats.renamed, 1);
        }
    }

    #[test]
    fn test_existing_aside_is_left_alone() {
        let src = "import { Aside } from '@astrojs/starlight/components';\n\n<Aside type=\"tip\">Done</Aside>\n";
        let (out, stats) = run_on(&CalloutTransformer::new(SyntaxStyle::Component), src, "a.mdx");
        assert_eq!(out, src);
        assert!(!stats.has_changes());
    }

    #[test]
    fn test_documents_without_callouts_are_untouched() {
        let src = "import { Tabs } from 'nextra/components'\n\nText\n";
        let (out, stats) = run_on(&CalloutTransformer::new(SyntaxStyle::Component), src, "a.mdx");
        assert_eq!(out, "import { Tabs } from 'nextra/components';\n\nText\n");
        assert!(!stats.has_changes());
    }
}
