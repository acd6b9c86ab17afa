//! Frontmatter normalization
//!
//! After this pass a document has at most one frontmatter block, it is the
//! first child, and it carries exactly one top-level `title:` entry.

use crate::{
    transform::{TransformContext, TransformStats, Transformer},
    tree::{Block, Document, Frontmatter},
    Result,
};

pub struct FrontmatterTransformer;

impl Transformer for FrontmatterTransformer {
    fn name(&self) -> &str {
        "frontmatter"
    }

    fn run_after(&self) -> Vec<&str> {
        vec!["title"]
    }

    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        let mut stats = TransformStats::new();

        let blocks: Vec<Frontmatter> = doc
            .children
            .iter()
            .filter_map(|b| match b {
                Block::Frontmatter(fm) => Some(fm.clone()),
                _ => None,
            })
            .collect();
        if blocks.is_empty() {
            return Ok(stats);
        }

        let already_first = matches!(doc.children.first(), Some(Block::Frontmatter(_)));
        if blocks.len() > 1 || !already_first {
            doc.children.retain(|b| !matches!(b, Block::Frontmatter(_)));
            stats.removed += blocks.len() - 1;
            let merged = blocks
                .iter()
                .map(|fm| fm.raw.trim_end())
                .filter(|raw| !raw.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            doc.children.insert(0, Block::Frontmatter(Frontmatter::new(merged)));
            stats.rewritten += 1;
        }

        if let Some(fm) = doc.frontmatter_mut() {
            let normalized = normalize(&fm.raw);
            if normalized != fm.raw {
                fm.raw = normalized;
                stats.rewritten += 1;
            }
            if fm.mapping().is_none() {
                ctx.log(self.name(), "frontmatter is not valid YAML, kept as written");
            }
        }

        if stats.has_changes() {
            ctx.log(self.name(), format!("normalized frontmatter: {stats}"));
        }
        Ok(stats)
    }
}

/// Strip trailing whitespace and keep only the last top-level title entry
fn normalize(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().map(str::trim_end).collect();
    let title_starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.starts_with("title:"))
        .map(|(i, _)| i)
        .collect();

    let mut out = Vec::with_capacity(lines.len());
    let mut skipping = false;
    for (i, line) in lines.iter().enumerate() {
        if !line.starts_with([' ', '\t']) && !line.is_empty() {
            skipping = title_starts.contains(&i) && title_starts.last() != Some(&i);
        }
        if !skipping {
            out.push(*line);
        }
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    while out.first().is_some_and(|l| l.is_empty()) {
        out.remove(0);
    }
    out.join("\n")
}
