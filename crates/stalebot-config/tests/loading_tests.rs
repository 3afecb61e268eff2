//! Integration tests for loading configuration files from disk

use stalebot_config::{
    CliOverrides, CloseAfter, ConfigError, ConfigSource, Settings, ValidationReport,
};
use stalebot_domain::ResourceType;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let source = ConfigSource::read(dir.path().join("absent.yml")).unwrap();
    assert!(source.text.is_empty());

    let config = source.resolve(&CliOverrides::default()).unwrap();
    assert_eq!(config.global, Settings::default());
}

#[test]
fn test_yaml_file_with_per_type_overrides() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "stale.yml",
        r#"
daysUntilStale: 45
daysUntilClose: 10
staleLabel: stale
exemptLabels:
  - pinned
  - roadmap
closeComment: Closing due to inactivity.
issues:
  daysUntilClose: false
pulls:
  staleLabel: stale-pr
  markComment: false
"#,
    );

    let config = ConfigSource::read(&path)
        .unwrap()
        .resolve(&CliOverrides::default())
        .unwrap();

    let issues = config.resolve(ResourceType::Issues);
    assert_eq!(issues.days_until_stale, 45);
    assert_eq!(issues.days_until_close, CloseAfter::Never);
    assert_eq!(issues.stale_label, "stale");
    assert!(issues.mark_comment.is_some());

    let pulls = config.resolve(ResourceType::Pulls);
    assert_eq!(pulls.days_until_close, CloseAfter::Days(10));
    assert_eq!(pulls.stale_label, "stale-pr");
    assert_eq!(pulls.mark_comment, None);
    assert_eq!(pulls.exempt_labels, vec!["pinned", "roadmap"]);
    assert_eq!(pulls.close_comment.as_deref(), Some("Closing due to inactivity."));
}

#[test]
fn test_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "stale.toml",
        r#"
daysUntilStale = 14
perform = false
only = "pulls"

[pulls]
limitPerRun = 5
"#,
    );

    let config = ConfigSource::read(&path)
        .unwrap()
        .resolve(&CliOverrides::default())
        .unwrap();

    assert_eq!(config.only, Some(ResourceType::Pulls));
    let pulls = config.resolve(ResourceType::Pulls);
    assert!(!pulls.perform);
    assert_eq!(pulls.run_limit(), 5);
}

#[test]
fn test_invalid_file_produces_located_report() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "stale.yml",
        "staleLabel: stale\npulls:\n  perform: sometimes\ndaysUntilStale: later\n",
    );

    let source = ConfigSource::read(&path).unwrap();
    let error = source.resolve(&CliOverrides::default()).unwrap_err();
    assert!(matches!(error, ConfigError::Invalid(ref v) if v.len() == 2));

    let report = ValidationReport::from_error(&error, ".github/stale.yml", &source.text);
    let mut lines: Vec<usize> = report.annotations.iter().map(|a| a.start_line).collect();
    lines.sort_unstable();
    assert_eq!(lines, vec![3, 4]);
    assert!(report.summary.contains("\"daysUntilStale\" must be a number"));
}
