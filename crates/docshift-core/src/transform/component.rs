//! Shared steps of every component-family rewrite
//!
//! A component rewrite scans for its vocabulary, strips the family's symbols
//! from legacy imports, applies its family-specific change and finally makes
//! sure the new component path imports every owned name still in use.
//! Documents without any node of the family are left untouched.

use super::{TransformContext, TransformStats};
use crate::tree::{visit, Block, Document, ImportDecl};
use crate::Result;

/// Import paths of the legacy component library
pub const LEGACY_SOURCES: [&str; 2] = ["nextra/components", "nextra-theme-docs"];

/// Import path of the new component library
pub const STARLIGHT_COMPONENTS: &str = "@astrojs/starlight/components";

/// Vocabulary of one component family
#[derive(Debug, Clone, Copy)]
pub struct ComponentSpec {
    /// Transformer name used in log lines
    pub transformer: &'static str,
    /// Legacy names (dotted children match through their prefix)
    pub legacy: &'static [&'static str],
    /// New names this rewrite introduces
    pub owned: &'static [&'static str],
}

impl ComponentSpec {
    /// True when any node of the family appears in the document
    pub fn present(&self, doc: &Document) -> bool {
        visit::any_component(&doc.children, &|name, _| {
            let root = name.split('.').next().unwrap_or(name);
            self.legacy.contains(&root) || self.owned.contains(&root)
        })
    }

    /// Run `rewrite` with the shared pre- and post-steps
    pub fn apply<F>(&self, doc: &mut Document, ctx: &TransformContext<'_>, rewrite: F) -> Result<TransformStats>
    where
        F: FnOnce(&mut Document, &mut TransformStats) -> Result<()>,
    {
        let mut stats = TransformStats::new();
        if !self.present(doc) {
            return Ok(stats);
        }

        stats.imports_removed += strip_legacy_imports(doc, self.legacy);
        rewrite(doc, &mut stats)?;

        let used = visit::component_names(&doc.children);
        let needed: Vec<&str> = self
            .owned
            .iter()
            .copied()
            .filter(|name| used.iter().any(|u| u == name))
            .collect();
        if !needed.is_empty() {
            stats.imports_added += ensure_import(doc, STARLIGHT_COMPONENTS, &needed);
        }

        if stats.has_changes() {
            ctx.log(self.transformer, format!("rewrote {} family: {stats}", self.legacy.join("/")));
        }
        Ok(stats)
    }
}

/// Remove `names` from imports of the legacy library, dropping statements
/// that end up empty. Returns the number of specifiers removed.
pub fn strip_legacy_imports(doc: &mut Document, names: &[&str]) -> usize {
    let mut removed = 0;
    for block in doc.children.iter_mut() {
        if let Block::Import(import) = block {
            if LEGACY_SOURCES.contains(&import.source.as_str()) {
                removed += import.remove_locals(names);
            }
        }
    }
    drop_empty_imports(doc);
    removed
}

pub fn drop_empty_imports(doc: &mut Document) {
    doc.children
        .retain(|b| !matches!(b, Block::Import(import) if import.is_empty()));
}

/// Make sure one import from `source` binds each of `names`. Extends the first
/// existing statement for `source`, or inserts a new one after the frontmatter.
/// Returns the number of specifiers added.
pub fn ensure_import(doc: &mut Document, source: &str, names: &[&str]) -> usize {
    let missing: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| !doc.imports().any(|i| i.source == source && i.binds(name)))
        .collect();
    if missing.is_empty() {
        return 0;
    }

    let existing = doc.children.iter_mut().find_map(|b| match b {
        Block::Import(import) if import.source == source => Some(import),
        _ => None,
    });
    match existing {
        Some(import) => {
            import.names.extend(missing.iter().map(|n| n.to_string()));
            import.names.sort();
        }
        None => {
            let mut names: Vec<String> = missing.iter().map(|n| n.to_string()).collect();
            names.sort();
            let at = doc.frontmatter_index().map_or(0, |i| i + 1);
            doc.children
                .insert(at, Block::Import(ImportDecl::named(source, names)));
        }
    }
    missing.len()
}
