//! Build configuration.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the source root and is optional: stock defaults are used for everything it
//! does not mention.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output_dir = ".simple-docs"    # Default output directory, under the source root
//!
//! [walk]
//! prune = [".git", ".hg", ".svn", "node_modules", "target", ".idea", ".vscode", ".simple-docs"]
//!
//! [naming]
//! separator_token = "__SLASH__"  # Replaces path separators in artifact names
//!
//! [tree]
//! script = "tree.js"             # Navigation tree script filename
//! queue_var = "__docsQueue"      # Global queue the script pushes onto
//! command = "tree:init"          # Command name of the pushed event
//! junk_files = [".DS_Store", "Thumbs.db", "desktop.ini"]
//!
//! [highlight]
//! theme = "InspiredGitHub"       # syntect theme used for highlight.css
//! stylesheet = "highlight.css"
//!
//! [processing]
//! max_processes = 4              # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [walk]
//! prune = [".git", "vendor"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Output directory used when the CLI gets no `--output`, relative to
    /// the source root.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    pub walk: WalkConfig,
    pub naming: NamingConfig,
    pub tree: TreeConfig,
    pub highlight: HighlightConfig,
    pub processing: ProcessingConfig,
}

/// Dedicated name so a project's own `docs/` is never mistaken for output.
pub const DEFAULT_OUTPUT_DIR: &str = ".simple-docs";

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            walk: WalkConfig::default(),
            naming: NamingConfig::default(),
            tree: TreeConfig::default(),
            highlight: HighlightConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let token = &self.naming.separator_token;
        if token.is_empty() {
            return Err(ConfigError::Validation(
                "naming.separator_token must not be empty".into(),
            ));
        }
        if token.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "naming.separator_token must not contain path separators".into(),
            ));
        }
        for (key, name) in [
            ("tree.script", &self.tree.script),
            ("highlight.stylesheet", &self.highlight.stylesheet),
        ] {
            if name.is_empty() || name.contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a plain filename"
                )));
            }
            // Artifact names always start with the token
            if name.starts_with(token.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "{key} must not start with naming.separator_token"
                )));
            }
        }
        if self.tree.script == self.highlight.stylesheet {
            return Err(ConfigError::Validation(
                "tree.script and highlight.stylesheet must differ".into(),
            ));
        }
        if !is_js_identifier(&self.tree.queue_var) {
            return Err(ConfigError::Validation(
                "tree.queue_var must be a JavaScript identifier".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Directory walking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkConfig {
    /// Directory names whose whole subtree is skipped.
    pub prune: Vec<String>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            prune: [
                ".git",
                ".hg",
                ".svn",
                "node_modules",
                "target",
                ".idea",
                ".vscode",
                DEFAULT_OUTPUT_DIR,
            ]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Artifact naming settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Replaces each path separator when flattening a relative path.
    pub separator_token: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            separator_token: crate::naming::DEFAULT_SEPARATOR_TOKEN.to_string(),
        }
    }
}

/// Navigation tree script settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    pub script: String,
    pub queue_var: String,
    pub command: String,
    /// OS-generated files left out of the tree.
    pub junk_files: Vec<String>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            script: "tree.js".to_string(),
            queue_var: "__docsQueue".to_string(),
            command: "tree:init".to_string(),
            junk_files: [".DS_Store", "Thumbs.db", "desktop.ini"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Syntax highlighting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HighlightConfig {
    /// Name of a bundled syntect theme.
    pub theme: String,
    pub stylesheet: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "InspiredGitHub".to_string(),
            stylesheet: "highlight.css".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers for walking and rendering.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Docs Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Place this file in the source root.
# Unknown keys will cause an error.

# Output directory used when --output is not given, under the source root.
output_dir = ".simple-docs"

# ---------------------------------------------------------------------------
# Walking
# ---------------------------------------------------------------------------
[walk]
# Directory names skipped together with everything below them, at any depth.
prune = [".git", ".hg", ".svn", "node_modules", "target", ".idea", ".vscode", ".simple-docs"]

# ---------------------------------------------------------------------------
# Artifact naming
# ---------------------------------------------------------------------------
[naming]
# Every artifact is written flat into the output directory. Path separators
# in the source-relative path are replaced with this token:
#   src/app.js -> __SLASH__src__SLASH__app.js.html
# Files whose names already contain the token can collide; colliding files
# are reported and skipped rather than overwritten.
separator_token = "__SLASH__"

# ---------------------------------------------------------------------------
# Navigation tree
# ---------------------------------------------------------------------------
[tree]
# Script written next to the artifacts. It pushes [command, tree] onto
# window[queue_var], creating the queue if the host page has not.
script = "tree.js"
queue_var = "__docsQueue"
command = "tree:init"

# System files left out of the tree (they still get artifacts).
junk_files = [".DS_Store", "Thumbs.db", "desktop.ini"]

# ---------------------------------------------------------------------------
# Syntax highlighting
# ---------------------------------------------------------------------------
[highlight]
# Bundled themes: InspiredGitHub, Solarized (dark), Solarized (light),
# base16-eighties.dark, base16-mocha.dark, base16-ocean.dark, base16-ocean.light
theme = "InspiredGitHub"

# Class-based stylesheet generated from the theme.
stylesheet = "highlight.css"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for walking and rendering.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
