// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::services::redaction::{RedactionPolicy, RedactionRule, RuleScope};

/// Redaction rules of the issue tracker and the remotes allowed to carry them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedactionConfig {
    /// Scopes whose issues must only be reviewed on a secure remote
    #[serde(default)]
    pub redact: Vec<String>,

    /// Scopes that waive redaction for the whole change
    #[serde(default)]
    pub exempt: Vec<String>,

    /// Remotes with restricted access, in order of preference
    #[serde(default)]
    pub secure_remotes: Vec<String>,
}

impl RedactionConfig {
    pub fn policy(&self) -> Result<RedactionPolicy> {
        let redact = self
            .redact
            .iter()
            .map(|s| s.parse::<RuleScope>().map(RedactionRule::redact));
        let exempt = self
            .exempt
            .iter()
            .map(|s| s.parse::<RuleScope>().map(RedactionRule::exempt));
        let rules = redact.chain(exempt).collect::<Result<Vec<_>>>()?;
        Ok(RedactionPolicy::new(rules))
    }

    pub fn is_secure(&self, remote: &str) -> bool {
        self.secure_remotes.iter().any(|r| r == remote)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Branch the pull request merges into (default "main")
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// Remote used when nothing calls for a secure one (default "origin")
    #[serde(default = "default_remote")]
    pub default_remote: String,

    /// Force HTML (true) or Markdown (false) bodies; the backend decides when unset
    #[serde(default)]
    pub linkify: Option<bool>,

    #[serde(default)]
    pub redaction: RedactionConfig,
}

fn default_base_branch() -> String {
    "main".into()
}

fn default_remote() -> String {
    "origin".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_branch: default_base_branch(),
            default_remote: default_remote(),
            linkify: None,
            redaction: RedactionConfig::default(),
        }
    }
}

impl Config {
    /// Load with priority: CLI > ENV > user config > project config > defaults
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Project-level config (.prsync.toml in repo root)
        if let Ok(cwd) = std::env::current_dir() {
            let project_config = cwd.join(".prsync.toml");
            if project_config.exists() {
                figment = figment.merge(Toml::file(&project_config));
            }
        }

        if let Some(path) = Self::config_path()
            && path.exists()
        {
            figment = figment.merge(Toml::file(&path));
        }

        // Environment variables (PRSYNC_BASE_BRANCH, PRSYNC_REDACTION__SECURE_REMOTES, ...)
        figment = figment.merge(Env::prefixed("PRSYNC_").split("__"));

        let mut config: Config = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "prsync").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref base) = cli.base {
            self.base_branch = base.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_branch.trim().is_empty() {
            return Err(Error::Config("base_branch cannot be empty".into()));
        }

        if self.default_remote.trim().is_empty() {
            return Err(Error::Config("default_remote cannot be empty".into()));
        }

        if let Some(empty) = self.redaction.secure_remotes.iter().find(|r| r.trim().is_empty()) {
            return Err(Error::Config(format!(
                "secure_remotes contains an empty remote name: {empty:?}"
            )));
        }

        // Surfaces invalid scopes at load time rather than mid-flow
        self.redaction.policy()?;
        Ok(())
    }

    /// Create default config file with secure permissions
    pub fn create_default() -> Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            return Err(Error::Config("Cannot determine config directory".into()));
        };

        fs::create_dir_all(&dir)?;

        let path = dir.join("config.toml");
        let content = r#"# prsync Configuration

# Branch pull requests merge into
base_branch = "main"

# Remote used unless a redacted issue requires a secure one
default_remote = "origin"

# Force HTML (<pre>, linkified) or Markdown (```) bodies.
# Unset: GitHub gets HTML, Bitbucket gets Markdown.
# linkify = true

[redaction]
# Issues matching these scopes may only be reviewed on a secure remote.
# Scopes: ".*" (every issue), "component:<name>", "project:<name>"
redact = []

# One exempt issue waives redaction for the whole pull request
exempt = []

# Remotes with restricted access, most preferred first
secure_remotes = []
"#;

        fs::write(&path, content)?;

        // Set secure permissions (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }
}
