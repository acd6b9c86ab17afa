//! Canonical page title
//!
//! Picks one title per document and stores it in the frontmatter. Candidates,
//! highest priority first: a `Title:` key, a `title:` key, the leading level-1
//! heading, the file name. A heading with CJK text beats an ASCII frontmatter
//! title. The leading heading is removed once its text has been consumed.

use crate::{
    transform::{TransformContext, TransformStats, Transformer},
    tree::{Block, Document, Frontmatter},
    Result,
};

pub struct TitleTransformer;

impl TitleTransformer {
    /// Index of a level-1 heading that opens the content
    fn leading_heading(doc: &Document) -> Option<usize> {
        let index = doc.children.iter().position(|b| !b.is_head())?;
        matches!(&doc.children[index], Block::Heading(h) if h.depth == 1).then_some(index)
    }
}

impl Transformer for TitleTransformer {
    fn name(&self) -> &str {
        "title"
    }

    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        let mut stats = TransformStats::new();

        let heading_index = Self::leading_heading(doc);
        let heading_text = heading_index.and_then(|i| match &doc.children[i] {
            Block::Heading(h) => Some(h.text().trim().to_string()),
            _ => None,
        });
        let heading_text = heading_text.filter(|t| !t.is_empty());

        let fm_title = doc.frontmatter().and_then(|fm| {
            fm.value("Title")
                .or_else(|| fm.value("title"))
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
        });

        let title = match (&fm_title, &heading_text) {
            (Some(fm), Some(heading)) if contains_cjk(heading) && fm.is_ascii() => heading.clone(),
            (Some(fm), _) => fm.clone(),
            (None, Some(heading)) => heading.clone(),
            (None, None) => ctx.file.fallback_title(),
        };

        if let Some(index) = heading_index.filter(|_| heading_text.is_some()) {
            doc.children.remove(index);
            stats.removed += 1;
        }

        let title_line = format!("title: {}", yaml_scalar(&title));
        match doc.frontmatter_mut() {
            Some(fm) => {
                let rewritten = set_title_line(&fm.raw, &title_line);
                if rewritten != fm.raw {
                    fm.raw = rewritten;
                    stats.rewritten += 1;
                }
            }
            None => {
                doc.children.insert(0, Block::Frontmatter(Frontmatter::new(title_line)));
                stats.inserted += 1;
            }
        }

        if stats.has_changes() {
            ctx.log(self.name(), format!("title resolved to {title:?}"));
        }
        Ok(stats)
    }
}

/// Drop every top-level `title:`/`Title:` entry and append `title_line`
fn set_title_line(raw: &str, title_line: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut in_title = false;
    for line in raw.lines() {
        let is_key = !line.starts_with([' ', '\t']) && !line.trim().is_empty();
        if is_key {
            in_title = line.starts_with("title:") || line.starts_with("Title:");
        }
        if !in_title {
            lines.push(line);
        }
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines.push(title_line);
    lines.join("\n")
}

/// Single-line YAML rendering of a string scalar; plain when it reads back
/// as the same string
fn yaml_scalar(value: &str) -> String {
    let plain = !value.contains('\n')
        && value.trim() == value
        && serde_yaml::from_str::<serde_yaml::Value>(value).ok()
            == Some(serde_yaml::Value::String(value.to_string()));
    if plain {
        return value.to_string();
    }
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{value:?}"))
}

/// Han, Hiragana, Katakana or Hangul characters
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c as u32,
            0x3040..=0x30FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xAC00..=0xD7AF
            | 0xF900..=0xFAFF
            | 0xFF66..=0xFF9F)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::run_on;

    #[test]
    fn test_heading_becomes_frontmatter_title() {
        let (out, stats) = run_on(&TitleTransformer, "# Getting Started\n\nBody\n", "guides/intro.mdx");
        assert_eq!(out, "---\ntitle: Getting Started\n---\n\nBody\n");
        assert_eq!(stats.removed, 1);
        assert_eq!(stats.inserted, 1);
    }

    #[test]
    fn test_capitalized_key_wins_and_heading_is_deleted() {
        let src = "---\nTitle: Legacy Name\ntitle: other\nsidebar: true\n---\n\n# Heading Text\n\nBody\n";
        let (out, _) = run_on(&TitleTransformer, src, "a.mdx");
        assert_eq!(out, "---\nsidebar: true\ntitle: Legacy Name\n---\n\nBody\n");
    }

    #[test]
    fn test_cjk_heading_beats_ascii_frontmatter_title() {
        let src = "---\ntitle: Introduction\n---\n\n# はじめに\n\n本文\n";
        let (out, _) = run_on(&TitleTransformer, src, "ja/intro.mdx");
        assert_eq!(out, "---\ntitle: はじめに\n---\n\n本文\n");
    }

    #[test]
    fn test_filename_fallback_and_quoting() {
        let (out, _) = run_on(&TitleTransformer, "Body only\n", "guides/node-setup.mdx");
        assert_eq!(out, "---\ntitle: Node Setup\n---\n\nBody only\n");

        let (out, _) = run_on(&TitleTransformer, "# Setup: Part 1\n", "a.mdx");
        assert_eq!(out, "---\ntitle: 'Setup: Part 1'\n---\n");
    }

    #[test]
    fn test_later_h1_is_not_consumed() {
        let src = "Intro paragraph\n\n# Not a title\n";
        let (out, _) = run_on(&TitleTransformer, src, "guides/faq.mdx");
        assert_eq!(out, "---\ntitle: Faq\n---\n\nIntro paragraph\n\n# Not a title\n");
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let (once, _) = run_on(&TitleTransformer, "---\nsidebar: true\n---\n\n# Hello\n\nText\n", "a.mdx");
        let (twice, stats) = run_on(&TitleTransformer, &once, "a.mdx");
        assert_eq!(once, twice);
        assert!(!stats.has_changes());
    }
}
