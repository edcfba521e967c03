use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".intlxrc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/__tests__/**",
];

/// How descriptors are read from localizable markup components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkupMode {
    /// Literal `id` / `description` attributes; `defaultMessage` is synthesized from `id`.
    Attribute,
    /// Every descriptor attribute must be statically evaluable.
    #[default]
    Descriptor,
}

/// Which descriptor field holds the message text that is validated and normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageField {
    Id,
    #[default]
    DefaultMessage,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_ignore_test_files")]
    pub ignore_test_files: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_source_name: Option<String>,
    /// Catalog output directory, relative to the project root. Catalog paths
    /// mirror source paths relative to the same root.
    #[serde(default, alias = "messagesRoot", skip_serializing_if = "Option::is_none")]
    pub messages_dir: Option<String>,
    #[serde(default)]
    pub enforce_descriptions: bool,
    #[serde(default)]
    pub markup_mode: MarkupMode,
    #[serde(default)]
    pub message_field: MessageField,
    #[serde(default = "default_component_names")]
    pub component_names: Vec<String>,
    #[serde(default = "default_deprecated_component_names")]
    pub deprecated_component_names: Vec<String>,
    #[serde(default = "default_translate_functions")]
    pub translate_functions: Vec<String>,
    #[serde(default = "default_define_messages_functions")]
    pub define_messages_functions: Vec<String>,
    #[serde(default = "default_internal_path_markers")]
    pub internal_path_markers: Vec<String>,
    #[serde(default = "default_wrapper_function")]
    pub wrapper_function: String,
    #[serde(default = "default_wrapper_module")]
    pub wrapper_module: String,
    #[serde(default = "default_base_component_names")]
    pub base_component_names: Vec<String>,
    #[serde(default = "default_excluded_base_class")]
    pub excluded_base_class: String,
    #[serde(default = "default_props_identifier")]
    pub props_identifier: String,
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_ignore_test_files() -> bool {
    true
}

fn default_component_names() -> Vec<String> {
    vec!["FormattedMessage".to_string()]
}

fn default_deprecated_component_names() -> Vec<String> {
    vec!["FormattedHTMLMessage".to_string()]
}

fn default_translate_functions() -> Vec<String> {
    vec!["translate".to_string()]
}

fn default_define_messages_functions() -> Vec<String> {
    vec!["defineMessages".to_string()]
}

fn default_internal_path_markers() -> Vec<String> {
    vec!["i18n".to_string()]
}

fn default_wrapper_function() -> String {
    "injectIntl".to_string()
}

fn default_wrapper_module() -> String {
    "react-intl".to_string()
}

fn default_base_component_names() -> Vec<String> {
    ["Component", "PureComponent"].map(String::from).to_vec()
}

fn default_excluded_base_class() -> String {
    "BaseComponent".to_string()
}

fn default_props_identifier() -> String {
    "props".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignores: Vec::new(),
            includes: default_includes(),
            source_root: default_source_root(),
            ignore_test_files: default_ignore_test_files(),
            module_source_name: None,
            messages_dir: None,
            enforce_descriptions: false,
            markup_mode: MarkupMode::default(),
            message_field: MessageField::default(),
            component_names: default_component_names(),
            deprecated_component_names: default_deprecated_component_names(),
            translate_functions: default_translate_functions(),
            define_messages_functions: default_define_messages_functions(),
            internal_path_markers: default_internal_path_markers(),
            wrapper_function: default_wrapper_function(),
            wrapper_module: default_wrapper_module(),
            base_component_names: default_base_component_names(),
            excluded_base_class: default_excluded_base_class(),
            props_identifier: default_props_identifier(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid glob patterns in `ignores` or `includes`,
    /// and for an empty `wrapperFunction`.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal directory paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if self.wrapper_function.trim().is_empty() {
            bail!("'wrapperFunction' must not be empty");
        }

        Ok(())
    }

    /// Module that localizable components and helpers are imported from.
    pub fn module_source(&self) -> &str {
        match (&self.module_source_name, self.markup_mode) {
            (Some(name), _) => name,
            (None, MarkupMode::Descriptor) => "react-intl",
            (None, MarkupMode::Attribute) => "i18n",
        }
    }
}

pub fn config_json(config: &Config) -> Result<String> {
    serde_json::to_string_pretty(config).context("Failed to generate config.")
}

pub fn default_config_json() -> Result<String> {
    config_json(&Config::default())
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
