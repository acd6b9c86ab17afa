//! Link target rewriting
//!
//! Relative and root-relative link targets are resolved to absolute site
//! paths for the new layout. External and same-page targets are kept.

use crate::{
    paths::{resolve_href, FileContext},
    transform::{TransformContext, TransformStats, Transformer},
    tree::{visit, AttrValue, Attributes, Component, Document, Inline},
    Result,
};

pub struct HrefTransformer;

/// Rewrite a literal `href` attribute in place; true when it changed
fn rewrite_attribute(attributes: &mut Attributes, file: &FileContext) -> bool {
    for attr in attributes.iter_mut().filter(|a| a.name == "href") {
        if let Some(AttrValue::Literal(href)) = &mut attr.value {
            if let Some(resolved) = resolve_href(href, file).filter(|r| r.as_str() != href.as_str()) {
                *href = resolved;
                return true;
            }
        }
    }
    false
}

impl Transformer for HrefTransformer {
    fn name(&self) -> &str {
        "href"
    }

    fn run_after(&self) -> Vec<&str> {
        vec!["file-tree"]
    }

    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        let mut stats = TransformStats::new();
        let file = ctx.file;

        visit::for_each_inline_mut(&mut doc.children, &mut |inline: &mut Inline| match inline {
            Inline::Link(link) if !link.autolink => {
                if let Some(resolved) = resolve_href(&link.url, file).filter(|r| *r != link.url) {
                    link.url = resolved;
                    stats.rewritten += 1;
                }
            }
            Inline::Component(c) => {
                if rewrite_attribute(&mut c.attributes, file) {
                    stats.rewritten += 1;
                }
            }
            _ => {}
        });
        visit::for_each_component_mut(&mut doc.children, &mut |c: &mut Component| {
            if rewrite_attribute(&mut c.attributes, file) {
                stats.rewritten += 1;
            }
        });

        if stats.has_changes() {
            ctx.log(self.name(), format!("rewrote {} link targets", stats.rewritten));
        }
        Ok(stats)
    }
}
