//! Transformer registry and execution engine
//!
//! Holds the transformers for a run and executes them in dependency order.

use super::{
    CalloutTransformer, CardsTransformer, CodeLanguageTransformer, CustomComponentTransformer,
    FileTreeTransformer, FrontmatterTransformer, HrefTransformer, ImageTransformer,
    ImportConsolidator, LinkCardTransformer, PunctuationTransformer, StepsTransformer,
    TabsTransformer, TitleTransformer, TransformContext, TransformStats, Transformer,
};
use crate::{config::MigrationOptions, tree::Document, MigrateError, Result};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::debug;

/// Registry of transformers with dependency-aware execution
pub struct TransformerRegistry {
    transformers: Vec<Box<dyn Transformer>>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self {
            transformers: Vec::new(),
        }
    }

    /// The full migration chain, ending with import consolidation
    pub fn standard(options: &MigrationOptions) -> Self {
        let mut registry = Self::new();
        registry.add(Box::new(TitleTransformer));
        registry.add(Box::new(FrontmatterTransformer));
        registry.add(Box::new(CustomComponentTransformer::new(&options.components)));
        registry.add(Box::new(CalloutTransformer::new(options.syntax)));
        registry.add(Box::new(CodeLanguageTransformer));
        registry.add(Box::new(CardsTransformer));
        registry.add(Box::new(LinkCardTransformer));
        registry.add(Box::new(TabsTransformer));
        registry.add(Box::new(StepsTransformer));
        registry.add(Box::new(FileTreeTransformer));
        registry.add(Box::new(HrefTransformer));
        registry.add(Box::new(ImageTransformer));
        registry.add(Box::new(PunctuationTransformer));

        let consolidator = ImportConsolidator::from_transformers(&registry.transformers);
        registry.add(Box::new(consolidator));
        registry
    }

    pub fn add(&mut self, transformer: Box<dyn Transformer>) {
        debug!("Registering transformer: {}", transformer.name());
        self.transformers.push(transformer);
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Names in execution order
    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self
            .ordered()?
            .iter()
            .map(|t| t.name().to_string())
            .collect())
    }

    /// Run every transformer on `doc` and return the combined statistics.
    /// The first failing transformer aborts the document.
    pub fn run_all(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats> {
        let mut total = TransformStats::new();
        for transformer in self.ordered()? {
            ctx.observer.on_transform(ctx.file.relative(), transformer.name());
            let stats = transformer.transform(doc, ctx).map_err(|e| match e {
                MigrateError::Transform { .. } => e,
                other => MigrateError::transform_error(transformer.name(), other.to_string()),
            })?;
            if stats.has_changes() {
                ctx.log(transformer.name(), stats.to_string());
            }
            total.merge(&stats);
        }
        Ok(total)
    }

    /// Sort transformers by their run_before/run_after constraints
    pub fn ordered(&self) -> Result<Vec<&dyn Transformer>> {
        let name_to_idx: HashMap<&str, usize> = self
            .transformers
            .iter()
            .enumerate()
            .map(|(idx, t)| (t.name(), idx))
            .collect();

        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..self.transformers.len())
            .map(|idx| graph.add_node(idx))
            .collect();

        for (idx, transformer) in self.transformers.iter().enumerate() {
            // this -> later
            for before in transformer.run_before() {
                if let Some(&other) = name_to_idx.get(before) {
                    graph.add_edge(nodes[idx], nodes[other], ());
                }
            }
            // earlier -> this
            for after in transformer.run_after() {
                if let Some(&other) = name_to_idx.get(after) {
                    graph.add_edge(nodes[other], nodes[idx], ());
                }
            }
        }

        let sorted = toposort(&graph, None).map_err(|cycle| MigrateError::Ordering {
            message: format!(
                "circular dependency at transformer '{}'",
                self.transformers[graph[cycle.node_id()]].name()
            ),
        })?;

        Ok(sorted
            .into_iter()
            .map(|node| self.transformers[graph[node]].as_ref())
            .collect())
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
