//! ESM statement parsing (imports only; everything else stays raw)

use crate::tree::{Block, ImportDecl};
use std::sync::LazyLock;
use regex::Regex;

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)^import\s+(?:([A-Za-z_$][\w$]*)\s*(?:,\s*)?)?(?:\{([^}]*)\}\s*)?from\s*['"]([^'"]+)['"]\s*;?\s*$"#,
    )
    .expect("import pattern is valid")
});

static SPECIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][\w$]*(?:\s+as\s+[A-Za-z_$][\w$]*)?$").expect("specifier pattern is valid")
});

static FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"from\s*['"][^'"]+['"]\s*;?\s*$"#).expect("from pattern is valid"));

/// True once an import statement spanning `text` is complete
pub fn import_complete(text: &str) -> bool {
    let trimmed = text.trim_end();
    FROM_RE.is_match(trimmed)
        || (trimmed.starts_with("import '") || trimmed.starts_with("import \""))
}

/// Parse one import statement. Statements the parser cannot read, including a
/// malformed specifier list, become [`Block::Esm`] and are left alone.
pub fn parse_import(statement: &str) -> Block {
    let Some(caps) = IMPORT_RE.captures(statement.trim()) else {
        return Block::Esm(statement.trim_end().to_string());
    };
    let default = caps.get(1).map(|m| m.as_str().to_string());
    let source = caps[3].to_string();
    let mut names = Vec::new();
    if let Some(list) = caps.get(2) {
        for raw in list.as_str().split(',') {
            let spec = raw.split_whitespace().collect::<Vec<_>>().join(" ");
            if spec.is_empty() {
                continue;
            }
            if !SPECIFIER_RE.is_match(&spec) {
                return Block::Esm(statement.trim_end().to_string());
            }
            if !names.contains(&spec) {
                names.push(spec);
            }
        }
    }
    if default.is_none() && caps.get(2).is_none() {
        return Block::Esm(statement.trim_end().to_string());
    }
    Block::Import(ImportDecl {
        default,
        names,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_and_default_imports() {
        let block = parse_import("import Layout, { Callout, Tabs as T } from 'nextra/components';");
        assert_eq!(
            block,
            Block::Import(ImportDecl {
                default: Some("Layout".into()),
                names: vec!["Callout".into(), "Tabs as T".into()],
                source: "nextra/components".into(),
            })
        );
    }

    #[test]
    fn test_multiline_import() {
        let text = "import {\n  Cards,\n  Card,\n} from \"nextra/components\"";
        assert!(import_complete(text));
        match parse_import(text) {
            Block::Import(import) => assert_eq!(import.names, vec!["Cards", "Card"]),
            other => panic!("expected import, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_imports_stay_raw() {
        assert!(matches!(parse_import("import * as All from 'x'"), Block::Esm(_)));
        assert!(matches!(parse_import("import { a b } from 'x'"), Block::Esm(_)));
        assert!(matches!(parse_import("import 'styles.css'"), Block::Esm(_)));
        assert!(!import_complete("import {\n  Cards,"));
    }
}
