//! Language check for localized documents
//!
//! Locale directories in the legacy tree contain pages that were never
//! translated. A page under a non-English locale is kept only when it looks
//! like it is written in that language.

use crate::config::DetectionOptions;
use crate::paths::FileContext;
use crate::tree::Frontmatter;

/// Measurements behind a keep/skip decision
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageReport {
    /// ASCII share of non-whitespace prose characters, 0.0..=1.0
    pub ascii_share: f64,
    /// Occurrences of the locale's function words
    pub markers: usize,
    /// Frontmatter title contains non-ASCII characters
    pub non_ascii_title: bool,
}

#[derive(Debug, Clone)]
pub struct LanguageDetector {
    ascii_threshold: f64,
    marker_threshold: usize,
}

impl LanguageDetector {
    pub fn new(options: &DetectionOptions) -> Self {
        Self {
            ascii_threshold: options.ascii_threshold,
            marker_threshold: options.marker_threshold,
        }
    }

    pub fn analyze(&self, text: &str, locale: &str) -> LanguageReport {
        let (frontmatter, body) = split_frontmatter(text);
        let prose = strip_fences(body);

        let mut total = 0usize;
        let mut ascii = 0usize;
        for c in prose.chars().filter(|c| !c.is_whitespace()) {
            total += 1;
            if c.is_ascii() {
                ascii += 1;
            }
        }
        let ascii_share = if total == 0 {
            1.0
        } else {
            ascii as f64 / total as f64
        };

        let non_ascii_title = frontmatter
            .and_then(|fm| fm.value("title").or_else(|| fm.value("Title")))
            .is_some_and(|title| !title.is_ascii());

        LanguageReport {
            ascii_share,
            markers: count_markers(&prose, locale),
            non_ascii_title,
        }
    }

    /// Decide whether a document belongs in its locale. English documents,
    /// documents outside a locale directory and locales without a marker
    /// table are always kept.
    pub fn should_keep(&self, text: &str, ctx: &FileContext) -> bool {
        match ctx.locale() {
            Some(locale) if !markers_for(locale).is_empty() => {
                self.keeps(&self.analyze(text, locale))
            }
            _ => true,
        }
    }

    pub fn keeps(&self, report: &LanguageReport) -> bool {
        report.non_ascii_title
            || report.markers >= self.marker_threshold
            || report.ascii_share < self.ascii_threshold
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new(&DetectionOptions::default())
    }
}

/// Function words per locale. CJK words are matched as substrings, the rest
/// as whole words.
pub fn markers_for(locale: &str) -> &'static [&'static str] {
    match locale {
        "ja" => &["は", "が", "を", "に", "の", "です", "ます", "する", "します", "ください"],
        "zh" => &["的", "是", "在", "了", "和", "我们", "可以", "这个", "使用"],
        "ko" => &["은", "는", "이", "가", "을", "를", "습니다", "에서"],
        "es" => &["el", "la", "los", "las", "que", "para", "con", "una", "es", "del"],
        "fr" => &["le", "les", "des", "est", "une", "pour", "avec", "dans", "que", "du"],
        "de" => &["der", "die", "das", "und", "ist", "nicht", "mit", "für", "ein", "eine"],
        "pt" => &["os", "as", "que", "não", "para", "com", "uma", "é", "do", "da"],
        "ru" => &["и", "в", "не", "на", "что", "это", "как", "для", "с", "по"],
        _ => &[],
    }
}

fn is_cjk_locale(locale: &str) -> bool {
    matches!(locale, "ja" | "zh" | "ko")
}

fn count_markers(prose: &str, locale: &str) -> usize {
    let markers = markers_for(locale);
    if markers.is_empty() {
        return 0;
    }
    if is_cjk_locale(locale) {
        return markers.iter().map(|m| prose.matches(m).count()).sum();
    }
    prose
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .filter(|word| {
            let lower = word.to_lowercase();
            markers.contains(&lower.as_str())
        })
        .count()
}

fn split_frontmatter(text: &str) -> (Option<Frontmatter>, &str) {
    let Some(after) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return (None, text);
    };
    let mut pos = 0;
    for line in after.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let raw = after[..pos].trim_end_matches(['\r', '\n']);
            return (Some(Frontmatter::new(raw)), &after[pos + line.len()..]);
        }
        pos += line.len();
    }
    (None, text)
}

fn strip_fences(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut fence: Option<&str> = None;
    for line in body.lines() {
        let trimmed = line.trim_start();
        match fence {
            Some(marker) => {
                if trimmed.starts_with(marker) {
                    fence = None;
                }
            }
            None if trimmed.starts_with("```") => fence = Some("```"),
            None if trimmed.starts_with("~~~") => fence = Some("~~~"),
            None => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    out
}
