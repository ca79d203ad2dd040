//! Optional RON configuration file.
//!
//! Every field is optional; anything left out falls back to the engine
//! defaults, and command-line flags override whatever the file sets.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use giftscan_engine::FetchSettings;
use ron::extensions::Extensions;
use serde::Deserialize;
use thiserror::Error;

use crate::cli::Attribute;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScannerConfig {
    /// Page address template containing `{name}`.
    pub base_template: Option<String>,
    pub threads: Option<usize>,
    pub attribute: Option<Attribute>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub max_bytes: Option<u64>,
    pub user_agent: Option<String>,
    pub accept: Option<String>,
    pub accept_language: Option<String>,
}

impl ScannerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses RON text. Optional fields may be written without `Some(..)`.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(text)
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Engine fetch settings with this file's overrides applied.
    pub fn fetch_settings(&self) -> FetchSettings {
        let defaults = FetchSettings::default();
        FetchSettings {
            connect_timeout: self
                .connect_timeout_secs
                .map_or(defaults.connect_timeout, Duration::from_secs),
            request_timeout: self
                .timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            max_bytes: self.max_bytes.unwrap_or(defaults.max_bytes),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            accept: self.accept.clone().unwrap_or(defaults.accept),
            accept_language: self
                .accept_language
                .clone()
                .unwrap_or(defaults.accept_language),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let config = ScannerConfig::parse("()").unwrap();
        assert_eq!(config, ScannerConfig::default());
        let settings = config.fetch_settings();
        assert_eq!(settings.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides_apply_over_engine_defaults() {
        let config = ScannerConfig::parse(
            r#"(
                threads: 25,
                attribute: backdrop,
                timeout_secs: 3,
                accept_language: "de-DE,de;q=0.8",
            )"#,
        )
        .unwrap();
        assert_eq!(config.threads, Some(25));
        assert_eq!(config.attribute, Some(Attribute::Backdrop));

        let settings = config.fetch_settings();
        assert_eq!(settings.request_timeout, Duration::from_secs(3));
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
        assert_eq!(settings.accept_language, "de-DE,de;q=0.8");
        assert_eq!(settings.user_agent, FetchSettings::default().user_agent);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = ScannerConfig::parse("(retries: 3)").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file_and_reports_missing_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(base_template: \"http://localhost:8080/nft/{{name}}-\")").unwrap();
        let config = ScannerConfig::load(file.path()).unwrap();
        assert_eq!(
            config.base_template.as_deref(),
            Some("http://localhost:8080/nft/{name}-")
        );

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            ScannerConfig::load(&missing),
            Err(ConfigError::Read { .. })
        ));
    }
}
