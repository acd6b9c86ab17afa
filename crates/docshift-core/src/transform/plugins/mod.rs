//! Built-in transformers
//!
//! Each transformer declares the one it runs after, which yields the chain
//! title → frontmatter → custom-components → callout → code-language → cards
//! → link-card → tabs → steps → file-tree → href → image → punctuation →
//! imports.

pub mod callout;
pub mod cards;
pub mod code_language;
pub mod custom_components;
pub mod file_tree;
pub mod frontmatter;
pub mod href;
pub mod image;
pub mod imports;
pub mod link_card;
pub mod punctuation;
pub mod steps;
pub mod tabs;
pub mod title;

pub use callout::*;
pub use cards::*;
pub use code_language::*;
pub use custom_components::*;
pub use file_tree::*;
pub use frontmatter::*;
pub use href::*;
pub use image::*;
pub use imports::*;
pub use link_card::*;
pub use punctuation::*;
pub use steps::*;
pub use tabs::*;
pub use title::*;
