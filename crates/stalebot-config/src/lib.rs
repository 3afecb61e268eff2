//! Stalebot Configuration
//!
//! Validates raw configuration documents and resolves them into typed,
//! defaulted settings.
//!
//! The resolver provides:
//! - Schema validation that reports every offending field
//! - Defaults for every unset field
//! - Per-type (`issues:` / `pulls:`) overrides with explicit resolution
//! - Line-located annotations for reporting failures on the config file
//!
//! # Examples
//!
//! ```
//! use stalebot_config::{CliOverrides, ConfigSource};
//! use stalebot_domain::ResourceType;
//!
//! let yaml = "daysUntilStale: 30\nstaleLabel: stale\npulls:\n  daysUntilClose: false\n";
//! let config = ConfigSource::from_text("stale.yml", yaml)
//!     .resolve(&CliOverrides::default())
//!     .unwrap();
//!
//! let pulls = config.resolve(ResourceType::Pulls);
//! assert_eq!(pulls.days_until_stale, 30);
//! assert!(!pulls.days_until_close.is_enabled());
//! ```

#![warn(missing_docs)]

mod annotation;
mod error;
mod loader;
mod settings;
mod validator;

pub use annotation::{locate_line, Annotation, AnnotationLevel, ValidationReport};
pub use error::ConfigError;
pub use loader::{CliOverrides, ConfigFormat, ConfigSource, DEFAULT_CONFIG_PATH};
pub use settings::{
    AssigneeExemption, CloseAfter, Overrides, Settings, StaleConfig, DEFAULT_MARK_COMMENT,
    MAX_ACTIONS_PER_RUN,
};
pub use validator::{ConfigValidator, Violation, SETTING_KEYS};
