use std::path::PathBuf;

use anyhow::{bail, Context};
use site_core::validation::RuleSet;

/// How the report is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unknown report format `{other}` (expected `text` or `json`)"),
        }
    }
}

/// Checker configuration loaded from environment variables.
///
/// Command line flags are layered on top with [`CheckConfig::with_overrides`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckConfig {
    /// JSON rule-set file; the standard rules apply when unset.
    pub rules_path: Option<PathBuf>,
    /// Count warnings as failures.
    pub strict: bool,
    pub format: ReportFormat,
}

impl CheckConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `SITE_CHECK_RULES`   | unset   |
    /// | `SITE_CHECK_STRICT`  | `false` |
    /// | `SITE_CHECK_FORMAT`  | `text`  |
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let rules_path = lookup("SITE_CHECK_RULES")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let strict = match lookup("SITE_CHECK_STRICT") {
            Some(v) => parse_flag(&v).context("SITE_CHECK_STRICT must be a boolean")?,
            None => false,
        };

        let format = match lookup("SITE_CHECK_FORMAT") {
            Some(v) => v.parse().context("invalid SITE_CHECK_FORMAT")?,
            None => ReportFormat::default(),
        };

        Ok(Self {
            rules_path,
            strict,
            format,
        })
    }

    /// Apply command line flags. A flag that was not given keeps the
    /// environment value; `--strict` can only switch strict mode on.
    pub fn with_overrides(
        mut self,
        rules_path: Option<PathBuf>,
        format: Option<ReportFormat>,
        strict: bool,
    ) -> Self {
        if rules_path.is_some() {
            self.rules_path = rules_path;
        }
        if let Some(format) = format {
            self.format = format;
        }
        self.strict |= strict;
        self
    }

    /// The active rule set: the configured file, or the standard rules.
    pub fn load_rules(&self) -> anyhow::Result<RuleSet> {
        let Some(path) = &self.rules_path else {
            return Ok(RuleSet::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rule file {}", path.display()))?;
        RuleSet::from_json_str(&json)
            .with_context(|| format!("invalid rule file {}", path.display()))
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got `{other}`"),
    }
}
