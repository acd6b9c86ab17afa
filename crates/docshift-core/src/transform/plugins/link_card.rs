//! Card with href → LinkCard
//!
//! A linked card moves all of its content into attributes: `href`, `title`,
//! `description` and, for external targets only, `target="_blank"`. Title and
//! description come from attributes first, then from `Card.Title` /
//! `Card.Description` children; any other prose becomes the description.

use crate::{
    paths::is_external,
    transform::{
        component::{ComponentSpec, STARLIGHT_COMPONENTS},
        Binding, TransformContext, TransformStats, Transformer,
    },
    tree::{
        blocks_text, inline_text, visit, Attribute, Attributes, Block, Component, Document, Inline,
        InlineComponent,
    },
    Result,
};

const SPEC: ComponentSpec = ComponentSpec {
    transformer: "link-card",
    legacy: &["Card"],
    owned: &["LinkCard", "Card"],
};

const TITLE_PART: &str = "Card.Title";
const DESCRIPTION_PART: &str = "Card.Description";

pub struct LinkCardTransformer;

/// Title and description found in a card's body
#[derive(Debug)]
struct CardText {
    title: Option<String>,
    description: Option<String>,
}

impl CardText {
    fn from_blocks(children: &[Block]) -> Self {
        Self {
            title: part_text(children, TITLE_PART),
            description: part_text(children, DESCRIPTION_PART)
                .or_else(|| Some(remaining_text(children))),
        }
    }

    fn from_inlines(children: &[Inline]) -> Self {
        let part = |name: &str| {
            children.iter().find_map(|inline| match inline {
                Inline::Component(c) if c.name() == name => Some(inline_text(&c.children).trim().to_string()),
                _ => None,
            })
        };
        let rest: Vec<Inline> = children
            .iter()
            .filter(|i| !matches!(i, Inline::Component(c) if is_part(c.name())))
            .cloned()
            .collect();
        Self {
            title: part(TITLE_PART),
            description: part(DESCRIPTION_PART).or_else(|| Some(inline_text(&rest).trim().to_string())),
        }
    }
}

impl LinkCardTransformer {
    fn rebuild<C>(card: &mut Component<C>, body: CardText) {
        let Some(href) = card.attributes.literal("href").map(str::to_string) else {
            return;
        };
        let external = card.attributes.literal("linkType") == Some("external") || is_external(&href);

        let title = card.attributes.literal("title").map(str::to_string).or(body.title);
        let description = card
            .attributes
            .literal("description")
            .map(str::to_string)
            .or(body.description);

        let mut attributes = Attributes::new(vec![Attribute::literal("href", href)]);
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            attributes.set(Attribute::literal("title", title));
        }
        if let Some(description) = description.filter(|t| !t.is_empty()) {
            attributes.set(Attribute::literal("description", description));
        }
        if external {
            attributes.set(Attribute::literal("target", "_blank"));
        }

        card.attributes = attributes;
        card.children.clear();
        card.rename("LinkCard");
    }
}

fn is_linked_card<C>(c: &Component<C>) -> bool {
    c.name() == "Card" && c.attributes.contains("href")
}

fn is_part(name: &str) -> bool {
    name == TITLE_PART || name == DESCRIPTION_PART
}

impl Transformer for LinkCardTransformer {
    fn name(&self) -> &str {
        "link-card"
    }

    fn run_after(&self) -> Vec<&str> {
        vec!["cards"]
    }

    fn component_map(&self) -> Vec<(&str, &str)> {
        vec![("Card", "LinkCard")]
    }

    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new(STARLIGHT_COMPONENTS, SPEC.owned)]
    }

    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        SPEC.apply(doc, ctx, |doc, stats| {
            visit::for_each_component_mut(&mut doc.children, &mut |c: &mut Component| {
                if is_linked_card(c) {
                    let body = CardText::from_blocks(&c.children);
                    Self::rebuild(c, body);
                    stats.renamed += 1;
                }
            });
            visit::for_each_inline_component_mut(&mut doc.children, &mut |c: &mut InlineComponent| {
                if is_linked_card(c) {
                    let body = CardText::from_inlines(&c.children);
                    Self::rebuild(c, body);
                    stats.renamed += 1;
                }
            });
            Ok(())
        })
    }
}

/// Text of the first `part` element among the card's direct children,
/// written either as its own block or inside a paragraph
fn part_text(children: &[Block], part: &str) -> Option<String> {
    children.iter().find_map(|block| match block {
        Block::Component(c) if c.name() == part => Some(c.text()),
        Block::Paragraph(inlines) => inlines.iter().find_map(|inline| match inline {
            Inline::Component(c) if c.name() == part => {
                Some(inline_text(&c.children).trim().to_string())
            }
            _ => None,
        }),
        _ => None,
    })
}

/// Card prose outside the title and description parts
fn remaining_text(children: &[Block]) -> String {
    let rest: Vec<Block> = children
        .iter()
        .filter(|b| !b.as_component().is_some_and(|c| is_part(c.name())))
        .map(|b| match b {
            Block::Paragraph(inlines) => Block::Paragraph(
                inlines
                    .iter()
                    .filter(|i| !matches!(i, Inline::Component(c) if is_part(c.name())))
                    .cloned()
                    .collect(),
            ),
            other => other.clone(),
        })
        .collect();
    blocks_text(&rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::run_on;

    #[test]
    fn test_internal_card_with_parts() {
        let src = "import { Card } from 'nextra/components'\n\n<Card href=\"/guides/start\" icon={<Icon />}>\n  <Card.Title>Start</Card.Title>\n  <Card.Description>First steps</Card.Description>\n</Card>\n";
        let (out, stats) = run_on(&LinkCardTransformer, src, "a.mdx");
        assert_eq!(
            out,
            "import { LinkCard } from '@astrojs/starlight/components';\n\n<LinkCard href=\"/guides/start\" title=\"Start\" description=\"First steps\" />\n"
        );
        assert_eq!(stats.renamed, 1);
    }

    #[test]
    fn test_external_card_gets_blank_target() {
        let src = "<Card title=\"Repo\" href=\"https://github.com/org/repo\">\n  Source code and issues\n</Card>\n";
        let (out, _) = run_on(&LinkCardTransformer, src, "a.mdx");
        assert_eq!(
            out,
            "import { LinkCard } from '@astrojs/starlight/components';\n\n<LinkCard href=\"https://github.com/org/repo\" title=\"Repo\" description=\"Source code and issues\" target=\"_blank\" />\n"
        );
    }

    #[test]
    fn test_link_type_marks_external() {
        let src = "<Card title=\"Docs\" href=\"/api\" linkType=\"external\" />\n";
        let (out, _) = run_on(&LinkCardTransformer, src, "a.mdx");
        assert!(out.contains("<LinkCard href=\"/api\" title=\"Docs\" target=\"_blank\" />"));
    }

    #[test]
    fn test_inline_card_with_href() {
        let src = "Next: <Card href=\"/guides/next\">Keep going</Card>\n";
        let (out, stats) = run_on(&LinkCardTransformer, src, "a.mdx");
        assert_eq!(
            out,
            "import { LinkCard } from '@astrojs/starlight/components';\n\nNext: <LinkCard href=\"/guides/next\" description=\"Keep going\" />\n"
        );
        assert_eq!(stats.renamed, 1);
    }

    #[test]
    fn test_cards_without_href_keep_their_name() {
        let src = "<Card title=\"Plain\">\n  Body\n</Card>\n";
        let (out, _) = run_on(&LinkCardTransformer, src, "a.mdx");
        assert_eq!(
            out,
            "import { Card } from '@astrojs/starlight/components';\n\n<Card title=\"Plain\">Body</Card>\n"
        );
    }
}
