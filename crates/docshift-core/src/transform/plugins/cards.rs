//! Cards → CardGrid

use crate::{
    transform::{
        component::{ComponentSpec, STARLIGHT_COMPONENTS},
        Binding, TransformContext, TransformStats, Transformer,
    },
    tree::{visit, Component, Document, Inline, InlineComponent},
    Result,
};

const SPEC: ComponentSpec = ComponentSpec {
    transformer: "cards",
    legacy: &["Cards"],
    owned: &["CardGrid"],
};

pub struct CardsTransformer;

impl Transformer for CardsTransformer {
    fn name(&self) -> &str {
        "cards"
    }

    fn run_after(&self) -> Vec<&str> {
        vec!["code-language"]
    }

    fn component_map(&self) -> Vec<(&str, &str)> {
        vec![("Cards", "CardGrid")]
    }

    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new(STARLIGHT_COMPONENTS, SPEC.owned)]
    }

    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        SPEC.apply(doc, ctx, |doc, stats| {
            visit::for_each_component_mut(&mut doc.children, &mut |c: &mut Component| {
                if rename_card_family(c, stats) {
                    strip_class_names(c, stats);
                }
            });
            visit::for_each_inline_component_mut(&mut doc.children, &mut |c: &mut InlineComponent| {
                if rename_card_family(c, stats) {
                    strip_inline_class_names(std::slice::from_mut(c), stats);
                }
            });
            Ok(())
        })
    }
}

/// Rename a grid or a namespaced card; true when `c` became a grid
fn rename_card_family<C>(c: &mut Component<C>, stats: &mut TransformStats) -> bool {
    match c.name() {
        "Cards" => {
            c.rename("CardGrid");
            stats.renamed += 1;
            true
        }
        // `<Cards.Card>` is the namespaced spelling of `<Card>`
        "Cards.Card" => {
            c.rename("Card");
            stats.renamed += 1;
            false
        }
        _ => false,
    }
}

/// Remove `className` from a grid and everything inside it
fn strip_class_names(grid: &mut Component, stats: &mut TransformStats) {
    if grid.attributes.remove("className").is_some() {
        stats.rewritten += 1;
    }
    visit::for_each_component_mut(&mut grid.children, &mut |c: &mut Component| {
        if c.attributes.remove("className").is_some() {
            stats.rewritten += 1;
        }
    });
}

fn strip_inline_class_names(components: &mut [InlineComponent], stats: &mut TransformStats) {
    for c in components {
        if c.attributes.remove("className").is_some() {
            stats.rewritten += 1;
        }
        for child in c.children.iter_mut() {
            if let Inline::Component(nested) = child {
                strip_inline_class_names(std::slice::from_mut(nested), stats);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::run_on;

    #[test]
    fn test_cards_become_card_grid() {
        let src = "import { Cards } from 'nextra/components'\n\n<Cards className=\"mt-4\" num={2}>\n  <Cards.Card title=\"A\" className=\"x\" />\n</Cards>\n";
        let (out, stats) = run_on(&CardsTransformer, src, "a.mdx");
        assert_eq!(
            out,
            "import { CardGrid } from '@astrojs/starlight/components';\n\n<CardGrid num={2}>\n  <Card title=\"A\" />\n</CardGrid>\n"
        );
        assert_eq!(stats.renamed, 2);
        assert_eq!(stats.rewritten, 2);
    }

    #[test]
    fn test_inline_grid_is_renamed() {
        let src = "See <Cards className=\"x\"><Card title=\"A\" className=\"y\" /></Cards> here\n";
        let (out, stats) = run_on(&CardsTransformer, src, "a.mdx");
        assert_eq!(
            out,
            "import { CardGrid } from '@astrojs/starlight/components';\n\nSee <CardGrid><Card title=\"A\" /></CardGrid> here\n"
        );
        assert_eq!(stats.renamed, 1);
        assert_eq!(stats.rewritten, 2);
    }

    #[test]
    fn test_card_grid_is_stable() {
        let src = "import { CardGrid } from '@astrojs/starlight/components';\n\n<CardGrid>\n  <Card title=\"A\" />\n</CardGrid>\n";
        let (out, stats) = run_on(&CardsTransformer, src, "a.mdx");
        assert_eq!(out, src);
        assert!(!stats.has_changes());
    }
}
