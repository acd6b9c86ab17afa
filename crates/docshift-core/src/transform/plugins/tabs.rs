//! Tabs / Tabs.Tab → Tabs / TabItem
//!
//! Legacy tab sets list their labels in an `items` array on the parent; the
//! new vocabulary puts a `label` on every tab.

use crate::{
    transform::{
        component::{ComponentSpec, STARLIGHT_COMPONENTS},
        Binding, TransformContext, TransformStats, Transformer,
    },
    tree::{visit, AttrValue, Attribute, Block, Component, Document, Inline, InlineComponent},
    Result,
};

const SPEC: ComponentSpec = ComponentSpec {
    transformer: "tabs",
    legacy: &["Tabs", "Tab"],
    owned: &["Tabs", "TabItem"],
};

pub struct TabsTransformer;

fn is_legacy_tab(name: &str) -> bool {
    name == "Tabs.Tab" || name == "Tab"
}

impl TabsTransformer {
    /// Remove the `items` array from a tab set and return its labels
    fn take_items<C>(tabs: &mut Component<C>, stats: &mut TransformStats) -> Vec<String> {
        let items = tabs
            .attributes
            .remove("items")
            .and_then(|attr| attr.value)
            .map(|value| match value {
                AttrValue::Literal(v) | AttrValue::Expression(v) => parse_items(&v),
            });
        if items.is_some() {
            stats.rewritten += 1;
        }
        items.unwrap_or_default()
    }

    fn label_tab<C>(tab: &mut Component<C>, item: Option<&String>, stats: &mut TransformStats) {
        let label = item
            .cloned()
            .or_else(|| tab.attributes.literal("label").map(str::to_string))
            .unwrap_or_default();
        tab.attributes.set(Attribute::literal("label", label));
        tab.rename("TabItem");
        stats.renamed += 1;
    }

    fn label_children(tabs: &mut Component, stats: &mut TransformStats) {
        let items = Self::take_items(tabs, stats);
        let tabs_children = tabs
            .children
            .iter_mut()
            .filter_map(Block::as_component_mut)
            .filter(|c| is_legacy_tab(c.name()));
        for (index, tab) in tabs_children.enumerate() {
            Self::label_tab(tab, items.get(index), stats);
        }
    }

    fn label_inline_children(tabs: &mut InlineComponent, stats: &mut TransformStats) {
        let items = Self::take_items(tabs, stats);
        let tabs_children = tabs.children.iter_mut().filter_map(|inline| match inline {
            Inline::Component(c) if is_legacy_tab(c.name()) => Some(c),
            _ => None,
        });
        for (index, tab) in tabs_children.enumerate() {
            Self::label_tab(tab, items.get(index), stats);
        }
    }
}

impl Transformer for TabsTransformer {
    fn name(&self) -> &str {
        "tabs"
    }

    fn run_after(&self) -> Vec<&str> {
        vec!["link-card"]
    }

    fn component_map(&self) -> Vec<(&str, &str)> {
        vec![("Tabs", "Tabs"), ("Tab", "TabItem")]
    }

    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::new(STARLIGHT_COMPONENTS, SPEC.owned)]
    }

    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        SPEC.apply(doc, ctx, |doc, stats| {
            visit::for_each_component_mut(&mut doc.children, &mut |c: &mut Component| {
                if c.name() == "Tabs" {
                    Self::label_children(c, stats);
                }
            });
            visit::for_each_inline_component_mut(&mut doc.children, &mut |c: &mut InlineComponent| {
                if c.name() == "Tabs" {
                    Self::label_inline_children(c, stats);
                }
            });
            // tabs outside a Tabs parent still need the new name
            visit::for_each_component_mut(&mut doc.children, &mut |c: &mut Component| {
                if is_legacy_tab(c.name()) {
                    c.rename("TabItem");
                    stats.renamed += 1;
                }
            });
            visit::for_each_inline_component_mut(&mut doc.children, &mut |c: &mut InlineComponent| {
                if is_legacy_tab(c.name()) {
                    c.rename("TabItem");
                    stats.renamed += 1;
                }
            });
            Ok(())
        })
    }
}

/// Labels of an `items` array: `['npm', "yarn"]` → `["npm", "yarn"]`.
/// Commas inside quotes do not split.
fn parse_items(value: &str) -> Vec<String> {
    let inner = value.trim();
    let inner = inner.strip_prefix('[').unwrap_or(inner);
    let inner = inner.strip_suffix(']').unwrap_or(inner);

    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for c in inner.chars() {
        match (quote, c) {
            (None, '"' | '\'' | '`') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, ',') => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    items.push(current);

    let mut items: Vec<String> = items.into_iter().map(|s| s.trim().to_string()).collect();
    if items.last().is_some_and(|s| s.is_empty()) {
        items.pop();
    }
    items
}
