//! Non-fatal configuration checks run before the pipeline starts.
use std::collections::HashSet;

use super::Config;
use super::config_files::ConfigFile;
use super::preferences::PreferenceImport;
use super::remote_app::RemoteApp;

/// Length of a hex-encoded SHA-256 digest.
const SHA256_HEX_LEN: usize = 64;

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration source (e.g. `"preferences"`, `"remote_app"`).
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a new warning.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for configuration validators.
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self) -> Vec<ValidationWarning>;
}

/// Checks the data files the pipeline parses.
#[derive(Debug)]
pub struct DataFileValidator<'a> {
    config: &'a Config,
}

impl<'a> DataFileValidator<'a> {
    /// Wrap `config`.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl ConfigValidator for DataFileValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        if !self.config.brewfile.exists() {
            warnings.push(ValidationWarning::new(
                "brewfile",
                self.config.brewfile.display().to_string(),
                "file does not exist; the bundle step will abort",
            ));
        }
        if !self.config.extensions.exists() {
            warnings.push(ValidationWarning::new(
                "extensions",
                self.config.extensions.display().to_string(),
                "file does not exist; extensions will be skipped",
            ));
        }
        warnings
    }
}

/// Checks preference import specs.
#[derive(Debug)]
pub struct PreferenceValidator<'a> {
    preferences: &'a [PreferenceImport],
}

impl<'a> PreferenceValidator<'a> {
    /// Wrap `preferences`.
    #[must_use]
    pub const fn new(preferences: &'a [PreferenceImport]) -> Self {
        Self { preferences }
    }
}

impl ConfigValidator for PreferenceValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for pref in self.preferences {
            if pref.domain.trim().is_empty() {
                warnings.push(ValidationWarning::new(
                    "preferences",
                    pref.source.display().to_string(),
                    "domain is empty",
                ));
            } else if !seen.insert(pref.domain.as_str()) {
                warnings.push(ValidationWarning::new(
                    "preferences",
                    &pref.domain,
                    "domain is imported more than once; the last import wins",
                ));
            }

            if !pref.source.exists() {
                warnings.push(ValidationWarning::new(
                    "preferences",
                    &pref.domain,
                    format!("source does not exist: {}", pref.source.display()),
                ));
            }
        }

        warnings
    }
}

/// Checks static config copies.
#[derive(Debug)]
pub struct ConfigFileValidator<'a> {
    files: &'a [ConfigFile],
}

impl<'a> ConfigFileValidator<'a> {
    /// Wrap `files`.
    #[must_use]
    pub const fn new(files: &'a [ConfigFile]) -> Self {
        Self { files }
    }
}

impl ConfigValidator for ConfigFileValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for file in self.files {
            if !file.destination.starts_with("~/") {
                warnings.push(ValidationWarning::new(
                    "config_files",
                    &file.destination,
                    "destination should start with ~/",
                ));
            }

            if !file.source.exists() {
                warnings.push(ValidationWarning::new(
                    "config_files",
                    &file.destination,
                    format!("source does not exist: {}", file.source.display()),
                ));
                continue;
            }

            if file.source.extension().is_some_and(|e| e == "json")
                && let Ok(content) = std::fs::read_to_string(&file.source)
                && let Err(e) = serde_json::from_str::<serde_json::Value>(&content)
            {
                warnings.push(ValidationWarning::new(
                    "config_files",
                    file.source.display().to_string(),
                    format!("not valid JSON: {e}"),
                ));
            }
        }

        warnings
    }
}

/// Checks the remote application spec.
#[derive(Debug)]
pub struct RemoteAppValidator<'a> {
    app: &'a RemoteApp,
}

impl<'a> RemoteAppValidator<'a> {
    /// Wrap `app`.
    #[must_use]
    pub const fn new(app: &'a RemoteApp) -> Self {
        Self { app }
    }
}

impl ConfigValidator for RemoteAppValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let app = self.app;

        if app.name.trim().is_empty() || app.name.contains('/') {
            warnings.push(ValidationWarning::new(
                "remote_app",
                &app.name,
                "name must be a plain bundle name without '.app'",
            ));
        }
        if !app.url.starts_with("https://") {
            warnings.push(ValidationWarning::new(
                "remote_app",
                &app.url,
                "archive URL is not HTTPS",
            ));
        }
        if let Some(sum) = &app.sha256
            && (sum.len() != SHA256_HEX_LEN || !sum.chars().all(|c| c.is_ascii_hexdigit()))
        {
            warnings.push(ValidationWarning::new(
                "remote_app",
                sum,
                "sha256 is not a 64-character hex digest",
            ));
        }
        if app.search_depth == 0 {
            warnings.push(ValidationWarning::new(
                "remote_app",
                &app.name,
                "search_depth of 0 only matches the archive root",
            ));
        }

        warnings
    }
}

/// Run every validator over `config`.
#[must_use]
pub fn validate_all(config: &Config) -> Vec<ValidationWarning> {
    let validators: [&dyn ConfigValidator; 4] = [
        &DataFileValidator::new(config),
        &PreferenceValidator::new(&config.preferences),
        &ConfigFileValidator::new(&config.config_files),
        &RemoteAppValidator::new(&config.remote_app),
    ];
    validators
        .iter()
        .flat_map(|v| v.validate())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::test_helpers::empty_config;
    use std::path::PathBuf;

    fn pref(domain: &str, source: PathBuf) -> PreferenceImport {
        PreferenceImport {
            domain: domain.to_string(),
            source,
        }
    }

    #[test]
    fn missing_data_files_warn() {
        let dir = tempfile::tempdir().unwrap();
        let config = empty_config(dir.path().to_path_buf());
        let warnings = DataFileValidator::new(&config).validate();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].source, "brewfile");
        assert_eq!(warnings[1].source, "extensions");
    }

    #[test]
    fn duplicate_domain_warns_once() {
        let dir = tempfile::tempdir().unwrap();
        let plist = dir.path().join("a.plist");
        std::fs::write(&plist, "").unwrap();
        let prefs = vec![
            pref("com.apple.dock", plist.clone()),
            pref("com.apple.dock", plist),
        ];
        let warnings = PreferenceValidator::new(&prefs).validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("more than once"));
    }

    #[test]
    fn missing_preference_source_warns() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = vec![pref("com.apple.dock", dir.path().join("missing.plist"))];
        let warnings = PreferenceValidator::new(&prefs).validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("source does not exist"));
    }

    #[test]
    fn invalid_json_source_warns() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("settings.json");
        std::fs::write(&src, "{ \"editor.fontSize\": 14,, }").unwrap();
        let files = vec![ConfigFile {
            source: src,
            destination: "~/Library/Application Support/Code/User/settings.json".to_string(),
        }];
        let warnings = ConfigFileValidator::new(&files).validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("not valid JSON"));
    }

    #[test]
    fn valid_json_and_home_destination_pass() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("karabiner.json");
        std::fs::write(&src, "{\"profiles\": []}").unwrap();
        let files = vec![ConfigFile {
            source: src,
            destination: "~/.config/karabiner/karabiner.json".to_string(),
        }];
        assert!(ConfigFileValidator::new(&files).validate().is_empty());
    }

    #[test]
    fn absolute_destination_warns() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("x.conf");
        std::fs::write(&src, "").unwrap();
        let files = vec![ConfigFile {
            source: src,
            destination: "/etc/x.conf".to_string(),
        }];
        let warnings = ConfigFileValidator::new(&files).validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("~/"));
    }

    #[test]
    fn remote_app_http_and_bad_digest_warn() {
        let app = RemoteApp {
            name: "Hammerspoon".to_string(),
            url: "http://example.com/a.zip".to_string(),
            sha256: Some("abc".to_string()),
            search_depth: 3,
        };
        let warnings = RemoteAppValidator::new(&app).validate();
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn remote_app_valid_passes() {
        let app = RemoteApp {
            name: "Hammerspoon".to_string(),
            url: "https://example.com/a.zip".to_string(),
            sha256: Some("a".repeat(64)),
            search_depth: 3,
        };
        assert!(RemoteAppValidator::new(&app).validate().is_empty());
    }

    #[test]
    fn validate_all_collects_from_every_validator() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = empty_config(dir.path().to_path_buf());
        config.remote_app.url = "http://example.com/a.zip".to_string();
        let warnings = config.validate();
        let sources: HashSet<&str> = warnings.iter().map(|w| w.source.as_str()).collect();
        assert!(sources.contains("brewfile"));
        assert!(sources.contains("remote_app"));
    }
}
