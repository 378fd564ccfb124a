use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use creditsim_core::config::{AppConfig, LoadOptions};
use serde::Serialize;
use toml::Value;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct ConfigField {
    key: &'static str,
    value: String,
    source: String,
}

/// Config keys with their env var. Aliases are listed after the primary name.
const FIELDS: &[(&str, &[&str])] = &[
    ("database.url", &["CREDITSIM_DATABASE_URL"]),
    ("database.max_connections", &["CREDITSIM_DATABASE_MAX_CONNECTIONS"]),
    ("database.timeout_secs", &["CREDITSIM_DATABASE_TIMEOUT_SECS"]),
    ("simulator.default_budget", &["CREDITSIM_SIMULATOR_DEFAULT_BUDGET"]),
    ("simulator.default_months", &["CREDITSIM_SIMULATOR_DEFAULT_MONTHS"]),
    ("logging.level", &["CREDITSIM_LOGGING_LEVEL", "CREDITSIM_LOG_LEVEL"]),
    ("logging.format", &["CREDITSIM_LOGGING_FORMAT", "CREDITSIM_LOG_FORMAT"]),
];

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_path = detect_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields = FIELDS
        .iter()
        .map(|&(key, env_keys)| ConfigField {
            key,
            value: field_value(&config, key),
            source: field_source(
                key,
                env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        })
        .collect::<Vec<_>>();

    match serde_json::to_value(&fields) {
        Ok(data) => CommandResult::success_with_data(
            "config",
            "effective config (source precedence: env > file > default)",
            Some(data),
        ),
        Err(error) => CommandResult::failure("config", "serialization", error.to_string(), 1),
    }
}

fn field_value(config: &AppConfig, key: &str) -> String {
    match key {
        "database.url" => config.database.url.clone(),
        "database.max_connections" => config.database.max_connections.to_string(),
        "database.timeout_secs" => config.database.timeout_secs.to_string(),
        "simulator.default_budget" => config.simulator.default_budget.clone(),
        "simulator.default_months" => config.simulator.default_months.clone(),
        "logging.level" => config.logging.level.clone(),
        "logging.format" => format!("{:?}", config.logging.format).to_ascii_lowercase(),
        _ => "<unknown>".to_string(),
    }
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    [PathBuf::from("creditsim.toml"), PathBuf::from("config/creditsim.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|env_key| env_is_set(env_key)) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

// Blank values are ignored by the loader, so they do not count as a source.
fn env_is_set(key: &str) -> bool {
    env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use toml::Value;

    use super::{contains_path, field_source};

    #[test]
    fn nested_keys_are_found_in_file_document() {
        let doc: Value = "[simulator]\ndefault_budget = \"90000\"\n".parse().expect("toml");

        assert!(contains_path(&doc, "simulator.default_budget"));
        assert!(!contains_path(&doc, "simulator.default_months"));
        assert!(!contains_path(&doc, "logging.level"));
    }

    #[test]
    fn file_source_names_the_file() {
        let doc: Value = "[logging]\nlevel = \"warn\"\n".parse().expect("toml");

        let source = field_source(
            "logging.level",
            &["CREDITSIM_TEST_UNSET_LEVEL"],
            Some(&doc),
            Some(Path::new("config/creditsim.toml")),
        );

        assert_eq!(source, "file (config/creditsim.toml)");
    }

    #[test]
    fn missing_everywhere_is_default() {
        let source = field_source("database.url", &["CREDITSIM_TEST_UNSET_URL"], None, None);
        assert_eq!(source, "default");
    }
}
