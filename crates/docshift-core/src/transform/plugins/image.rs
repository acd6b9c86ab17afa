//! Image path rewriting
//!
//! Images served from the legacy static directory move under the asset
//! alias, so `/images/a.png`, `./public/images/a.png` and `../images/a.png`
//! all become `~/assets/images/a.png`.

use crate::{
    config::AssetOptions,
    paths::is_external,
    transform::{TransformContext, TransformStats, Transformer},
    tree::{visit, AttrValue, Attributes, Component, Document, Inline},
    Result,
};

pub struct ImageTransformer;

/// New location of an image, or `None` when it stays where it is
pub fn rewrite_image_path(url: &str, assets: &AssetOptions) -> Option<String> {
    if url.is_empty() || url.starts_with('~') || is_external(url) {
        return None;
    }

    let mut path = url;
    loop {
        if let Some(rest) = path.strip_prefix("../").or_else(|| path.strip_prefix("./")) {
            path = rest;
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest;
        } else {
            break;
        }
    }

    let alias = assets.alias.trim_end_matches('/');
    if let Some(rest) = path.strip_prefix(assets.legacy_prefix.as_str()) {
        return Some(format!("{alias}/{rest}"));
    }
    assets
        .image_prefixes
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()))
        .then(|| format!("{alias}/{path}"))
}

fn rewrite_source(attributes: &mut Attributes, assets: &AssetOptions) -> bool {
    let mut changed = false;
    for attr in attributes.iter_mut().filter(|a| a.name == "src") {
        if let Some(AttrValue::Literal(src)) = &mut attr.value {
            if let Some(rewritten) = rewrite_image_path(src, assets) {
                *src = rewritten;
                changed = true;
            }
        }
    }
    changed
}

impl Transformer for ImageTransformer {
    fn name(&self) -> &str {
        "image"
    }

    fn run_after(&self) -> Vec<&str> {
        vec!["href"]
    }

    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        let mut stats = TransformStats::new();
        let assets = &ctx.options.assets;

        visit::for_each_inline_mut(&mut doc.children, &mut |inline: &mut Inline| match inline {
            Inline::Image(image) => {
                if let Some(rewritten) = rewrite_image_path(&image.url, assets) {
                    image.url = rewritten;
                    stats.rewritten += 1;
                }
            }
            Inline::Component(c) => {
                if rewrite_source(&mut c.attributes, assets) {
                    stats.rewritten += 1;
                }
            }
            _ => {}
        });
        visit::for_each_component_mut(&mut doc.children, &mut |c: &mut Component| {
            if rewrite_source(&mut c.attributes, assets) {
                stats.rewritten += 1;
            }
        });

        if stats.has_changes() {
            ctx.log(self.name(), format!("moved {} images under {}", stats.rewritten, assets.alias));
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::run_on;

    #[test]
    fn test_rewrite_rules() {
        let assets = AssetOptions::default();
        let rewrite = |url: &str| rewrite_image_path(url, &assets);
        assert_eq!(rewrite("/images/a.png").as_deref(), Some("~/assets/images/a.png"));
        assert_eq!(rewrite("../../public/logo.svg").as_deref(), Some("~/assets/logo.svg"));
        assert_eq!(rewrite("./screenshots/b.png").as_deref(), Some("~/assets/screenshots/b.png"));
        assert_eq!(rewrite("https://cdn.example.com/images/a.png"), None);
        assert_eq!(rewrite("data:image/png;base64,AAAA"), None);
        assert_eq!(rewrite("~/assets/images/a.png"), None);
        assert_eq!(rewrite("./diagram.png"), None);
    }

    #[test]
    fn test_markdown_images_and_src_attributes() {
        let src = "![Flow](/images/flow.png)\n\n<img src=\"/public/hero.jpg\" alt=\"Hero\" />\n";
        let (out, stats) = run_on(&ImageTransformer, src, "a.mdx");
        assert_eq!(
            out,
            "![Flow](~/assets/images/flow.png)\n\n<img src=\"~/assets/hero.jpg\" alt=\"Hero\" />\n"
        );
        assert_eq!(stats.rewritten, 2);
    }
}
