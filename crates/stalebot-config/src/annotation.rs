//! Check-run annotations for configuration failures
//!
//! Maps each violation back to a line of the source file so the hosting
//! platform can show it inline.

use crate::{ConfigError, Violation};
use serde::Serialize;

/// Severity of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationLevel {
    /// Informational
    Notice,
    /// Warning
    Warning,
    /// Failure
    Failure,
}

/// One annotation on a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Repository-relative file path
    pub path: String,
    /// First line (1-based)
    pub start_line: usize,
    /// Last line (1-based)
    pub end_line: usize,
    /// Severity
    pub annotation_level: AnnotationLevel,
    /// Message shown to the user
    pub message: String,
}

/// A complete report for a failed configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Check-run name
    pub name: String,
    /// Output title
    pub title: String,
    /// Output summary
    pub summary: String,
    /// Per-field annotations
    pub annotations: Vec<Annotation>,
}

impl ValidationReport {
    /// Build a report for `error`, locating fields in `source`
    ///
    /// Errors without violations (e.g. syntax errors) produce a single
    /// annotation on line 1.
    pub fn from_error(error: &ConfigError, path: &str, source: &str) -> Self {
        let annotations = if error.violations().is_empty() {
            vec![Annotation {
                path: path.to_string(),
                start_line: 1,
                end_line: 1,
                annotation_level: AnnotationLevel::Failure,
                message: error.to_string(),
            }]
        } else {
            error
                .violations()
                .iter()
                .map(|violation| annotate(violation, path, source))
                .collect()
        };

        Self {
            name: "Stale YAML validation".to_string(),
            title: "Stale config validation".to_string(),
            summary: error.to_string(),
            annotations,
        }
    }
}

fn annotate(violation: &Violation, path: &str, source: &str) -> Annotation {
    let line = locate_line(source, violation.field());
    Annotation {
        path: path.to_string(),
        start_line: line,
        end_line: line,
        annotation_level: AnnotationLevel::Failure,
        message: violation.to_string(),
    }
}

/// 1-based line declaring a dotted field path, or 1 if it cannot be found
///
/// Nested segments are searched for after the line of their parent, which
/// handles both indented YAML blocks and TOML tables.
///
/// # Examples
///
/// ```
/// use stalebot_config::locate_line;
///
/// let source = "daysUntilStale: 60\npulls:\n  daysUntilStale: x\n";
/// assert_eq!(locate_line(source, "daysUntilStale"), 1);
/// assert_eq!(locate_line(source, "pulls.daysUntilStale"), 3);
/// assert_eq!(locate_line(source, "missing"), 1);
/// ```
pub fn locate_line(source: &str, field: &str) -> usize {
    let lines: Vec<&str> = source.lines().collect();
    let mut from = 0;
    let mut found = None;

    for segment in field.split('.') {
        match (from..lines.len()).find(|&i| declares_key(lines[i], segment)) {
            Some(index) => {
                found = Some(index);
                from = index + 1;
            }
            None => return found.map_or(1, |index| index + 1),
        }
    }

    found.map_or(1, |index| index + 1)
}

fn declares_key(line: &str, key: &str) -> bool {
    let trimmed = line.trim_start();
    let rest = trimmed
        .strip_prefix('"')
        .and_then(|r| r.strip_prefix(key))
        .and_then(|r| r.strip_prefix('"'))
        .or_else(|| trimmed.strip_prefix('[').and_then(|r| r.strip_prefix(key)))
        .or_else(|| trimmed.strip_prefix(key));

    match rest {
        Some(rest) => {
            let rest = rest.trim_start();
            rest.starts_with(':') || rest.starts_with('=') || rest.starts_with(']')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_toml_and_json_keys() {
        let toml = "daysUntilStale = 1\n\n[pulls]\nperform = \"no\"\n";
        assert_eq!(locate_line(toml, "pulls.perform"), 4);

        let json = "{\n  \"limitPerRun\": 0\n}\n";
        assert_eq!(locate_line(json, "limitPerRun"), 2);
    }

    #[test]
    fn test_prefix_keys_do_not_match() {
        let source = "daysUntilStaleX: 1\ndaysUntilStale: nope\n";
        assert_eq!(locate_line(source, "daysUntilStale"), 2);
    }

    #[test]
    fn test_report_from_violations() {
        let error = ConfigError::Invalid(vec![Violation::WrongType {
            field: "daysUntilStale".to_string(),
            expected: "a number",
        }]);
        let source = "staleLabel: stale\ndaysUntilStale: soon\n";
        let report = ValidationReport::from_error(&error, ".github/stale.yml", source);

        assert_eq!(report.annotations.len(), 1);
        let annotation = &report.annotations[0];
        assert_eq!(annotation.start_line, 2);
        assert_eq!(annotation.annotation_level, AnnotationLevel::Failure);
        assert_eq!(annotation.message, "\"daysUntilStale\" must be a number");
    }
}
