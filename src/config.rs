//! Options store: the YAML preferences file and how it layers with the CLI.
//!
//! # File format
//!
//! ```yaml
//! api-key: YOUR_KEY
//! topic: cricket
//! order-by: relevance
//! page-size: 20
//! show-fields: [byline]
//! show-tags: [contributor]
//! base-url: https://content.guardianapis.com/search
//! ```
//!
//! Every key is optional. Values are opaque strings as far as the client is
//! concerned; `order-by` in particular is not checked against the known
//! sort orders.
//!
//! # Precedence
//!
//! CLI flag / environment variable > options file > built-in default.

use crate::cli::Cli;
use crate::error::AppError;
use crate::pipeline::HttpSettings;
use crate::request::{GUARDIAN_SEARCH_URL, SearchOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

const APP_DIR: &str = "extra_extra_news";
const CONFIG_FILE: &str = "config.yaml";

/// Contents of the options file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Preferences {
    pub api_key: Option<String>,
    pub topic: Option<String>,
    pub order_by: Option<String>,
    pub page_size: Option<u32>,
    pub show_fields: Option<Vec<String>>,
    pub show_tags: Option<Vec<String>>,
    pub base_url: Option<String>,
}

/// Everything the screen needs to run, after layering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub options: SearchOptions,
    pub http: HttpSettings,
}

/// `<config dir>/extra_extra_news/config.yaml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

/// Read and parse an options file.
///
/// # Errors
///
/// [`AppError::Config`] if the file cannot be read or is not valid YAML for
/// [`Preferences`].
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_preferences(path: &Path) -> Result<Preferences, AppError> {
    let text = std::fs::read_to_string(path).map_err(|e| AppError::Config {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_preferences(&text).map_err(|message| AppError::Config {
        path: path.display().to_string(),
        message,
    })
}

fn parse_preferences(text: &str) -> Result<Preferences, String> {
    if text.trim().is_empty() {
        return Ok(Preferences::default());
    }
    serde_yaml::from_str(text).map_err(|e| e.to_string())
}

/// Find and load the options file.
///
/// An explicit `--config` path must exist. The default location is only used
/// when a file is actually there.
pub fn discover_preferences(explicit: Option<&str>) -> Result<Preferences, AppError> {
    if let Some(path) = explicit {
        let prefs = load_preferences(Path::new(path))?;
        info!(path, "Loaded options file");
        return Ok(prefs);
    }
    match default_config_path() {
        Some(path) if path.is_file() => {
            let prefs = load_preferences(&path)?;
            info!(path = %path.display(), "Loaded options file");
            Ok(prefs)
        }
        _ => {
            debug!("No options file; using defaults");
            Ok(Preferences::default())
        }
    }
}

/// Layer CLI values over the options file over built-in defaults.
pub fn resolve_settings(cli: &Cli, prefs: Preferences) -> Settings {
    let defaults = SearchOptions::default();

    let options = SearchOptions {
        api_key: cli.api_key.clone().or(prefs.api_key).unwrap_or(defaults.api_key),
        topic: cli.topic.clone().or(prefs.topic).unwrap_or(defaults.topic),
        order_by: cli
            .order_by
            .map(|o| o.to_string())
            .or(prefs.order_by)
            .unwrap_or(defaults.order_by),
        page_size: cli.page_size.or(prefs.page_size).unwrap_or(defaults.page_size),
        show_fields: cli
            .show_fields
            .clone()
            .or(prefs.show_fields)
            .unwrap_or(defaults.show_fields),
        show_tags: cli.show_tags.clone().or(prefs.show_tags).unwrap_or(defaults.show_tags),
    };

    let base_url = cli
        .base_url
        .clone()
        .or(prefs.base_url)
        .unwrap_or_else(|| GUARDIAN_SEARCH_URL.to_string());

    let http = HttpSettings {
        connect_timeout: Duration::from_secs(cli.connect_timeout),
        read_timeout: Duration::from_secs(cli.read_timeout),
    };

    Settings {
        base_url,
        options,
        http,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_parse_full_preferences() {
        let yaml = r#"
api-key: abc123
topic: cricket
order-by: relevance
page-size: 20
show-fields: [byline, thumbnail]
show-tags: [contributor]
base-url: https://example.com/search
"#;
        let prefs = parse_preferences(yaml).unwrap();
        assert_eq!(prefs.api_key.as_deref(), Some("abc123"));
        assert_eq!(prefs.page_size, Some(20));
        assert_eq!(
            prefs.show_fields,
            Some(vec!["byline".to_string(), "thumbnail".to_string()])
        );
    }

    #[test]
    fn test_parse_empty_file_is_default() {
        assert_eq!(parse_preferences("").unwrap(), Preferences::default());
        assert_eq!(parse_preferences("\n  \n").unwrap(), Preferences::default());
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = parse_preferences("colour: blue\n").unwrap_err();
        assert!(err.contains("colour"), "{err}");
    }

    #[test]
    fn test_load_preferences_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "topic: politics").unwrap();

        let prefs = load_preferences(file.path()).unwrap();
        assert_eq!(prefs.topic.as_deref(), Some("politics"));
    }

    #[test]
    fn test_load_preferences_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_preferences(&tmp.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.yaml");
        assert!(discover_preferences(missing.to_str()).is_err());
    }

    #[test]
    fn test_resolve_defaults() {
        let cli = Cli::parse_from(["extra_extra_news"]);
        let settings = resolve_settings(&cli, Preferences::default());

        assert_eq!(settings.base_url, GUARDIAN_SEARCH_URL);
        assert_eq!(settings.options, SearchOptions::default());
        assert_eq!(settings.http, HttpSettings::default());
    }

    #[test]
    fn test_resolve_file_over_defaults_and_cli_over_file() {
        let prefs = Preferences {
            topic: Some("cricket".to_string()),
            order_by: Some("oldest".to_string()),
            page_size: Some(30),
            ..Preferences::default()
        };
        let cli = Cli::parse_from(["extra_extra_news", "--topic", "tennis"]);
        let settings = resolve_settings(&cli, prefs);

        assert_eq!(settings.options.topic, "tennis");
        assert_eq!(settings.options.order_by, "oldest");
        assert_eq!(settings.options.page_size, 30);
        assert_eq!(settings.options.show_tags, vec!["contributor".to_string()]);
    }

    #[test]
    fn test_resolve_timeouts_from_cli() {
        let cli = Cli::parse_from(["extra_extra_news", "--read-timeout", "3"]);
        let settings = resolve_settings(&cli, Preferences::default());
        assert_eq!(settings.http.read_timeout, Duration::from_secs(3));
        assert_eq!(settings.http.connect_timeout, Duration::from_secs(15));
    }
}
