//! Docshift Core
//!
//! Migration engine that moves MDX documentation from the Nextra component
//! vocabulary to Starlight. This crate provides the document tree, the MDX
//! parser and printer, the transformer chain and the concurrent migrator
//! that drives it over a whole documentation tree.

pub mod config;
pub mod detect;
pub mod error;
pub mod fetch;
pub mod observer;
pub mod parse;
pub mod paths;
pub mod pipeline;
pub mod print;
pub mod transform;
pub mod tree;

// Re-export commonly used types
pub use config::{ConfigLoader, MigrationOptions, SyntaxStyle};
pub use detect::{LanguageDetector, LanguageReport};
pub use error::{MigrateError, Result};
pub use observer::{MigrationObserver, TracingObserver};
pub use parse::{parse, ParseError};
pub use paths::FileContext;
pub use pipeline::{FileOutcome, MigrationSummary, Migrator};
pub use print::print;
pub use transform::{TransformStats, Transformer, TransformerRegistry};
pub use tree::{Block, Document};

/// Version of the migration engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
