//! Transformation statistics
//!
//! Tracks what each transformer changed so runs can be reported and logged.

use std::fmt;

/// Counts of changes made to one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Nodes renamed to the new vocabulary
    pub renamed: usize,

    /// Nodes whose structure or attributes were rewritten
    pub rewritten: usize,

    /// Nodes created
    pub inserted: usize,

    /// Nodes deleted
    pub removed: usize,

    /// Import specifiers added
    pub imports_added: usize,

    /// Import specifiers removed
    pub imports_removed: usize,
}

impl TransformStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }

    pub fn total_changes(&self) -> usize {
        self.renamed
            + self.rewritten
            + self.inserted
            + self.removed
            + self.imports_added
            + self.imports_removed
    }

    /// Merge statistics from another transformer
    pub fn merge(&mut self, other: &TransformStats) {
        self.renamed += other.renamed;
        self.rewritten += other.rewritten;
        self.inserted += other.inserted;
        self.removed += other.removed;
        self.imports_added += other.imports_added;
        self.imports_removed += other.imports_removed;
    }
}

impl fmt::Display for TransformStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_changes() {
            return write!(f, "No changes");
        }

        let counts = [
            (self.renamed, "renamed"),
            (self.rewritten, "rewritten"),
            (self.inserted, "inserted"),
            (self.removed, "removed"),
            (self.imports_added, "imports added"),
            (self.imports_removed, "imports removed"),
        ];
        let parts: Vec<String> = counts
            .iter()
            .filter(|(n, _)| *n > 0)
            .map(|(n, label)| format!("{n} {label}"))
            .collect();

        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_have_no_changes() {
        let stats = TransformStats::new();
        assert!(!stats.has_changes());
        assert_eq!(stats.to_string(), "No changes");
    }

    #[test]
    fn test_merge_and_display() {
        let mut stats = TransformStats {
            renamed: 2,
            imports_added: 1,
            ..Default::default()
        };
        stats.merge(&TransformStats {
            renamed: 1,
            removed: 4,
            ..Default::default()
        });
        assert_eq!(stats.total_changes(), 8);
        assert_eq!(stats.to_string(), "3 renamed, 4 removed, 1 imports added");
    }
}
