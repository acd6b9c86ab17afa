//! Transformer framework for migrating document trees
//!
//! ## Architecture
//!
//! - **Transformer Trait**: one rewrite pass over a [`Document`], with declared
//!   ordering constraints
//! - **TransformerRegistry**: runs transformers in dependency order
//! - **TransformStats**: counts the changes each pass made
//! - **component**: the scan / strip / rewrite / import steps shared by every
//!   component-family rewrite
//!
//! Every transformer must be a no-op on documents that contain none of its
//! target nodes, and must leave already-migrated content unchanged.

pub mod component;
pub mod plugins;
pub mod registry;
pub mod stats;

pub use plugins::*;
pub use registry::*;
pub use stats::*;

use crate::{
    config::MigrationOptions, observer::MigrationObserver, paths::FileContext, tree::Document,
    Result,
};

/// Import path and the component names a transformer introduces from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub source: String,
    pub names: Vec<String>,
}

impl Binding {
    pub fn new(source: impl Into<String>, names: &[&str]) -> Self {
        Self {
            source: source.into(),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn owns(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Everything a transformer may read besides the tree
pub struct TransformContext<'a> {
    pub options: &'a MigrationOptions,
    pub file: &'a FileContext,
    pub observer: &'a dyn MigrationObserver,
}

impl<'a> TransformContext<'a> {
    pub fn new(
        options: &'a MigrationOptions,
        file: &'a FileContext,
        observer: &'a dyn MigrationObserver,
    ) -> Self {
        Self {
            options,
            file,
            observer,
        }
    }

    /// Structured log line tagged with the transformer name
    pub fn log(&self, source: &str, message: impl AsRef<str>) {
        self.observer
            .log(self.file.relative(), source, message.as_ref());
    }
}

/// Base trait for all transformers
pub trait Transformer: Send + Sync {
    /// Unique name, also used in ordering constraints and log lines
    fn name(&self) -> &str;

    /// Transformers that must run after this one
    fn run_before(&self) -> Vec<&str> {
        vec![]
    }

    /// Transformers that must run before this one
    fn run_after(&self) -> Vec<&str> {
        vec![]
    }

    /// Legacy name → new name renames this transformer performs
    fn component_map(&self) -> Vec<(&str, &str)> {
        vec![]
    }

    /// Imports this transformer is responsible for
    fn bindings(&self) -> Vec<Binding> {
        vec![]
    }

    /// Rewrite the document in place and report what changed
    fn transform(&self, doc: &mut Document, ctx: &TransformContext<'_>) -> Result<TransformStats>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::observer::TracingObserver;
    use crate::parse::parse;
    use crate::print::print;

    /// Parse `src`, run one transformer as if the file lived at `path`, print
    pub fn run_on(transformer: &dyn Transformer, src: &str, path: &str) -> (String, TransformStats) {
        run_with(transformer, src, path, &MigrationOptions::default())
    }

    pub fn run_with(
        transformer: &dyn Transformer,
        src: &str,
        path: &str,
        options: &MigrationOptions,
    ) -> (String, TransformStats) {
        let mut doc = parse(src).unwrap();
        let file = FileContext::new(path);
        let observer = TracingObserver;
        let ctx = TransformContext::new(options, &file, &observer);
        let stats = transformer.transform(&mut doc, &ctx).unwrap();
        (print(&doc), stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Document;

    struct Noop;

    impl Transformer for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn transform(&self, _doc: &mut Document, _ctx: &TransformContext<'_>) -> Result<TransformStats> {
            Ok(TransformStats::new())
        }
    }

    #[test]
    fn test_transformer_defaults() {
        let t = Noop;
        assert_eq!(t.name(), "noop");
        assert!(t.run_before().is_empty());
        assert!(t.run_after().is_empty());
        assert!(t.component_map().is_empty());
        assert!(t.bindings().is_empty());
    }

    #[test]
    fn test_binding_owns() {
        let binding = Binding::new("@astrojs/starlight/components", &["Aside", "Tabs"]);
        assert!(binding.owns("Aside"));
        assert!(!binding.owns("Callout"));
    }
}
