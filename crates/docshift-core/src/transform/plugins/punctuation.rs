//! Prose punctuation cleanup
//!
//! Typographic quotes become ASCII quotes, non-breaking spaces become plain
//! spaces and zero-width characters are dropped. Code is never touched.

use crate::{
    transform::{TransformContext, TransformStats, Transformer},
    tree::{visit, Document, Inline},
    Result,
};

pub struct PunctuationTransformer;

/// Normalized text, or `None` when nothing changes
pub fn normalize_punctuation(text: &str) -> Option<String> {
    let needs_work = text.chars().any(|c| {
        matches!(
            c,
            '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' | '\u{00A0}' | '\u{200B}' | '\u{FEFF}'
        )
    });
    if !needs_work {
        return None;
    }
    Some(
        text.chars()
            .filter_map(|c| match c {
                '\u{2018}' | '\u{2019}' => Some('\''),
                '\u{201C}' | '\u{201D}' => Some('"'),
                '\u{00A0}' => Some(' '),
                '\u{200B}' | '\u{FEFF}' => None,
                other => Some(other),
            })
            .collect(),
    )
}

impl Transformer for PunctuationTransformer {
    fn name(&self) -> &str {
        "punctuation"
    }

    fn run_after(&self) -> Vec<&str> {
        vec!["image"]
    }

    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        let mut stats = TransformStats::new();
        visit::for_each_inline_mut(&mut doc.children, &mut |inline: &mut Inline| {
            if let Inline::Text(text) = inline {
                if let Some(normalized) = normalize_punctuation(text) {
                    *text = normalized;
                    stats.rewritten += 1;
                }
            }
        });
        if stats.has_changes() {
            ctx.log(self.name(), format!("normalized punctuation in {} text nodes", stats.rewritten));
        }
        Ok(stats)
    }
}
