//! Per-file path context: locale, output location, link resolution

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").unwrap());

/// Where a document sits inside the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    relative: PathBuf,
    locale: Option<String>,
}

impl FileContext {
    /// `relative` is the document path relative to the source root
    pub fn new(relative: impl Into<PathBuf>) -> Self {
        let relative = relative.into();
        let locale = segments(&relative)
            .first()
            .filter(|first| is_locale(first) && segments(&relative).len() > 1)
            .cloned();
        Self { relative, locale }
    }

    /// Context for `path` found under `source_root`
    pub fn from_source(source_root: &Path, path: &Path) -> Self {
        Self::new(path.strip_prefix(source_root).unwrap_or(path))
    }

    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Two-letter locale directory the file lives under, if any
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Mirrored location under `output_root`
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        output_root.join(&self.relative)
    }

    /// Directory segments below the locale directory
    fn site_dir(&self) -> Vec<String> {
        let mut segs = segments(&self.relative);
        segs.pop();
        if self.locale.is_some() && !segs.is_empty() {
            segs.remove(0);
        }
        segs
    }

    /// Title derived from the file name; `index` files use their directory
    pub fn fallback_title(&self) -> String {
        let stem = self
            .relative
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let source = if stem.eq_ignore_ascii_case("index") {
            segments(&self.relative)
                .iter()
                .rev()
                .nth(1)
                .filter(|dir| !is_locale(dir))
                .cloned()
                .unwrap_or_else(|| stem.to_string())
        } else {
            stem.to_string()
        };
        title_case(&source)
    }
}

/// Locale directories of the documentation tree
pub const LOCALES: &[&str] = &["en", "ja", "zh", "ko", "es", "fr", "de", "pt", "ru"];

/// Directory name of a known locale; other two-letter folders (`go/`, `ui/`)
/// are ordinary sections
pub fn is_locale(segment: &str) -> bool {
    LOCALES.contains(&segment)
}

/// Targets with a URL scheme or protocol-relative targets
pub fn is_external(url: &str) -> bool {
    SCHEME_RE.is_match(url) || url.starts_with("//")
}

/// Resolve a link target against the document's directory. Returns `None`
/// when the target must be left alone (external or same-page anchors).
pub fn resolve_href(href: &str, ctx: &FileContext) -> Option<String> {
    if href.is_empty() || href.starts_with('#') || is_external(href) {
        return None;
    }
    let split = href.find(['?', '#']).unwrap_or(href.len());
    let (path, suffix) = href.split_at(split);

    let mut resolved: Vec<String> = if path.starts_with('/') {
        Vec::new()
    } else {
        ctx.site_dir()
    };
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                resolved.pop();
            }
            other => resolved.push(other.to_string()),
        }
    }
    if let Some(last) = resolved.last_mut() {
        for ext in [".mdx", ".md"] {
            if let Some(stripped) = last.strip_suffix(ext) {
                *last = stripped.to_string();
                break;
            }
        }
    }

    if let Some(locale) = ctx.locale() {
        if resolved.first().map(String::as_str) != Some(locale) {
            resolved.insert(0, locale.to_string());
        }
    }
    let mut out = format!("/{}", resolved.join("/"));
    if path.ends_with('/') && !resolved.is_empty() {
        out.push('/');
    }
    out.push_str(suffix);
    Some(out)
}

/// `getting-started` / `getting_started` → `Getting Started`
pub fn title_case(name: &str) -> String {
    name.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str().map(str::to_string),
            _ => None,
        })
        .collect()
}
