//! Steps: level-3 headings → ordered list
//!
//! Every `###` heading starts a step. The heading text becomes the lead
//! paragraph of a list item and the blocks up to the next heading follow it.
//! Content before the first heading forms a step of its own.

use crate::{
    transform::{
        component::{ComponentSpec, STARLIGHT_COMPONENTS},
        Binding, TransformContext, TransformStats, Transformer,
    },
    tree::{visit, Block, Component, Document, List, ListItem},
    Result,
};

const SPEC: ComponentSpec = ComponentSpec {
    transformer: "steps",
    legacy: &["Steps"],
    owned: &["Steps"],
};

const STEP_DEPTH: u8 = 3;

pub struct StepsTransformer;

/// A Steps body that is already one ordered list
fn is_migrated(steps: &Component) -> bool {
    matches!(steps.children.as_slice(), [Block::List(list)] if list.ordered)
}

fn into_items(children: Vec<Block>) -> Vec<ListItem> {
    let mut items: Vec<ListItem> = Vec::new();
    let mut current: Option<ListItem> = None;

    for block in children {
        match block {
            Block::Heading(h) if h.depth == STEP_DEPTH => {
                items.extend(current.take());
                current = Some(ListItem {
                    children: vec![Block::Paragraph(h.children)],
                });
            }
            other => current.get_or_insert_with(ListItem::default).children.push(other),
        }
    }
    items.extend(current);
    items.retain(|item| !item.children.iter().all(Block::is_blank));
    items
}

impl Transformer for StepsTransformer {
    fn name(&self) -> &str {
        "steps"
    }

    fn run_after(&self) -> Vec<&str> {
        vec!["tabs"]
    }

    fn component_map(&self) -> Vec<(&str, &str)> {
        vec![("Steps", "Steps")]
    }

    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new(STARLIGHT_COMPONENTS, SPEC.owned)]
    }

    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        SPEC.apply(doc, ctx, |doc, stats| {
            visit::for_each_component_mut(&mut doc.children, &mut |c: &mut Component| {
                if c.name() != "Steps" || is_migrated(c) || c.children.is_empty() {
                    return;
                }
                let items = into_items(std::mem::take(&mut c.children));
                if !items.is_empty() {
                    c.children = vec![Block::List(List::new(true, items).with_spread(true))];
                }
                stats.rewritten += 1;
            });
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::run_on;

    #[test]
    fn test_headings_become_numbered_steps() {
        let src = "import { Steps } from 'nextra/components'\n\n<Steps>\n### Install\n\nRun the installer.\n\n### Configure\n\nEdit the file.\n</Steps>\n";
        let (out, stats) = run_on(&StepsTransformer, src, "a.mdx");
        assert_eq!(
            out,
            "import { Steps } from '@astrojs/starlight/components';\n\n<Steps>\n  1. Install\n\n     Run the installer.\n\n  2. Configure\n\n     Edit the file.\n</Steps>\n"
        );
        assert_eq!(stats.rewritten, 1);
    }

    #[test]
    fn test_leading_content_is_its_own_step() {
        let src = "<Steps>\n  Prepare a wallet.\n\n  ### Deploy\n</Steps>\n";
        let (out, _) = run_on(&StepsTransformer, src, "a.mdx");
        assert!(out.contains("<Steps>\n  1. Prepare a wallet.\n\n  2. Deploy\n</Steps>"));
    }

    #[test]
    fn test_second_pass_is_stable() {
        let src = "<Steps>\n### One\n\nA\n\n### Two\n\nB\n</Steps>\n";
        let (once, _) = run_on(&StepsTransformer, src, "a.mdx");
        let (twice, stats) = run_on(&StepsTransformer, &once, "a.mdx");
        assert_eq!(once, twice);
        assert!(!stats.has_changes());
    }
}
