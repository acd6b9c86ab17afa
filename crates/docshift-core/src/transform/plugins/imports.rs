//! Import consolidation
//!
//! Runs after every other transformer. Imports from the legacy library are
//! renamed through the gathered component maps and moved to the path that
//! owns the new name. Statements are then merged per source with sorted
//! specifiers, unused component imports are pruned, missing ones are added,
//! and the result is placed right after the frontmatter, sorted by source.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    transform::{component::LEGACY_SOURCES, Binding, TransformContext, TransformStats, Transformer},
    tree::{local_name, visit, Block, Document, ImportDecl},
    Result,
};

#[derive(Debug, Default)]
struct Group {
    defaults: Vec<String>,
    names: BTreeSet<String>,
}

pub struct ImportConsolidator {
    renames: Vec<(String, String)>,
    bindings: Vec<Binding>,
    after: Vec<String>,
}

impl ImportConsolidator {
    /// Gather renames and bindings from every transformer that runs before
    pub fn from_transformers(transformers: &[Box<dyn Transformer>]) -> Self {
        let mut renames = Vec::new();
        let mut bindings = Vec::new();
        let mut after = Vec::new();
        for transformer in transformers {
            renames.extend(
                transformer
                    .component_map()
                    .into_iter()
                    .map(|(old, new)| (old.to_string(), new.to_string())),
            );
            bindings.extend(transformer.bindings());
            after.push(transformer.name().to_string());
        }
        Self {
            renames,
            bindings,
            after,
        }
    }

    fn binding_for(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.owns(name))
    }

    fn owned_by(&self, source: &str, name: &str) -> bool {
        self.bindings.iter().any(|b| b.source == source && b.owns(name))
    }

    /// Target of a legacy specifier, or `None` when it has no counterpart
    fn rehome(&self, imported: &str) -> Option<(String, String)> {
        let new_name = self
            .renames
            .iter()
            .find(|(old, _)| old == imported)
            .map_or(imported, |(_, new)| new.as_str());
        let binding = self.binding_for(new_name)?;
        Some((binding.source.clone(), new_name.to_string()))
    }

    fn group(&self, imports: Vec<ImportDecl>, ctx: &TransformContext<'_>) -> BTreeMap<String, Group> {
        let mut groups: BTreeMap<String, Group> = BTreeMap::new();
        for import in imports {
            if LEGACY_SOURCES.contains(&import.source.as_str()) {
                if let Some(default) = &import.default {
                    ctx.log(self.name(), format!("dropped default import {default} from {}", import.source));
                }
                for specifier in &import.names {
                    let imported = imported_name(specifier);
                    match self.rehome(imported) {
                        Some((source, name)) => {
                            groups.entry(source).or_default().names.insert(name);
                        }
                        None => ctx.log(
                            self.name(),
                            format!("dropped {imported} from {}: no replacement", import.source),
                        ),
                    }
                }
                continue;
            }

            let group = groups.entry(import.source).or_default();
            if let Some(default) = import.default {
                if !group.defaults.contains(&default) {
                    group.defaults.push(default);
                }
            }
            group.names.extend(import.names);
        }
        groups
    }
}

impl Transformer for ImportConsolidator {
    fn name(&self) -> &str {
        "imports"
    }

    fn run_after(&self) -> Vec<&str> {
        self.after.iter().map(String::as_str).collect()
    }

    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        let mut stats = TransformStats::new();

        let mut before = Vec::new();
        let mut original_positions = Vec::new();
        for (index, block) in doc.children.iter().enumerate() {
            if let Block::Import(import) = block {
                before.push(import.clone());
                original_positions.push(index);
            }
        }

        let used = visit::component_names(&doc.children);
        let is_used = |local: &str| used.iter().any(|u| u == local);

        let mut groups = self.group(before.clone(), ctx);

        // unused component imports
        for (source, group) in groups.iter_mut() {
            group
                .names
                .retain(|spec| !self.owned_by(source, imported_name(spec)) || is_used(local_name(spec)));
            group
                .defaults
                .retain(|d| !self.owned_by(source, d) || is_used(d.as_str()));
        }

        // used components nobody imports
        let bound: BTreeSet<String> = groups
            .values()
            .flat_map(|g| {
                g.defaults
                    .iter()
                    .map(String::as_str)
                    .chain(g.names.iter().map(|n| local_name(n)))
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        for name in &used {
            if bound.contains(name) {
                continue;
            }
            if let Some(binding) = self.binding_for(name) {
                groups
                    .entry(binding.source.clone())
                    .or_default()
                    .names
                    .insert(name.clone());
            }
        }

        let after: Vec<ImportDecl> = groups
            .into_iter()
            .flat_map(|(source, group)| {
                let mut defaults = group.defaults.into_iter();
                let mut decls = vec![ImportDecl {
                    default: defaults.next(),
                    names: group.names.into_iter().collect(),
                    source: source.clone(),
                }];
                decls.extend(defaults.map(|d| ImportDecl {
                    default: Some(d),
                    names: Vec::new(),
                    source: source.clone(),
                }));
                decls
            })
            .filter(|decl| !decl.is_empty())
            .collect();

        let at = doc.frontmatter_index().map_or(0, |i| i + 1);
        let in_place = original_positions.iter().enumerate().all(|(n, &p)| p == at + n);
        if before == after && in_place {
            return Ok(stats);
        }

        let count = |decls: &[ImportDecl]| -> BTreeSet<(String, String)> {
            decls
                .iter()
                .flat_map(|d| d.locals().into_iter().map(|l| (d.source.clone(), l.to_string())))
                .collect()
        };
        let (old, new) = (count(&before), count(&after));
        stats.imports_added += new.difference(&old).count();
        stats.imports_removed += old.difference(&new).count();
        stats.rewritten += 1;

        doc.children.retain(|b| !matches!(b, Block::Import(_)));
        let at = doc.frontmatter_index().map_or(0, |i| i + 1);
        doc.children.splice(at..at, after.into_iter().map(Block::Import));

        ctx.log(self.name(), format!("consolidated imports: {stats}"));
        Ok(stats)
    }
}

/// Exported name of a specifier (`a as b` imports `a`)
fn imported_name(specifier: &str) -> &str {
    specifier
        .split_once(" as ")
        .map_or(specifier, |(imported, _)| imported)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::run_on;

    fn consolidator() -> ImportConsolidator {
        let transformers: Vec<Box<dyn Transformer>> = vec![
            Box::new(crate::transform::CalloutTransformer::new(Default::default())),
            Box::new(crate::transform::TabsTransformer),
            Box::new(crate::transform::LinkCardTransformer),
            Box::new(crate::transform::CustomComponentTransformer::new(&Default::default())),
        ];
        ImportConsolidator::from_transformers(&transformers)
    }

    #[test]
    fn test_merges_and_sorts_per_source() {
        let src = "---\ntitle: A\n---\n\nimport { Tabs } from '@astrojs/starlight/components';\n\nimport { helper } from './util';\n\nimport { Aside } from '@astrojs/starlight/components';\n\n<Aside>x</Aside>\n\n<Tabs>y</Tabs>\n";
        let (out, stats) = run_on(&consolidator(), src, "a.mdx");
        assert_eq!(
            out,
            "---\ntitle: A\n---\n\nimport { helper } from './util';\n\nimport { Aside, Tabs } from '@astrojs/starlight/components';\n\n<Aside>x</Aside>\n\n<Tabs>y</Tabs>\n"
        );
        assert_eq!(stats.imports_added, 0);
        assert_eq!(stats.imports_removed, 0);
    }

    #[test]
    fn test_legacy_leftovers_are_rehomed_or_pruned() {
        let src = "import { Tabs, Callout, Bleed } from 'nextra/components'\n\n<Tabs>a</Tabs>\n";
        let (out, _) = run_on(&consolidator(), src, "a.mdx");
        assert_eq!(out, "import { Tabs } from '@astrojs/starlight/components';\n\n<Tabs>a</Tabs>\n");
    }

    #[test]
    fn test_unused_component_imports_are_pruned_and_missing_added() {
        let src = "import { Aside, LinkCard } from '@astrojs/starlight/components';\n\nimport { Faucet } from '~/components/Faucet';\n\n<TabItem label=\"a\">b</TabItem>\n";
        let (out, stats) = run_on(&consolidator(), src, "a.mdx");
        assert_eq!(out, "import { TabItem } from '@astrojs/starlight/components';\n\n<TabItem label=\"a\">b</TabItem>\n");
        assert_eq!(stats.imports_added, 1);
        assert_eq!(stats.imports_removed, 3);
    }

    #[test]
    fn test_imports_are_hoisted_after_frontmatter() {
        let src = "---\ntitle: A\n---\n\nIntro\n\nimport { x } from './x';\n";
        let (out, _) = run_on(&consolidator(), src, "a.mdx");
        assert_eq!(out, "---\ntitle: A\n---\n\nimport { x } from './x';\n\nIntro\n");
    }

    #[test]
    fn test_consolidated_imports_are_stable() {
        let src = "import Thing from './thing';\n\nimport { Aside } from '@astrojs/starlight/components';\n\n<Aside>x</Aside>\n\n<Thing />\n";
        let (out, stats) = run_on(&consolidator(), src, "a.mdx");
        assert_eq!(out, src);
        assert!(!stats.has_changes());
    }
}
