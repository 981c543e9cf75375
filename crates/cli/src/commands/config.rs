use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use hotdeal_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILE};
use toml::Value;

struct ConfigField<'a> {
    key_path: &'static str,
    env_key: &'static str,
    value: &'a str,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let max_connections = config.database.max_connections.to_string();
    let timeout_secs = config.database.timeout_secs.to_string();
    let admin_password = if config.admin.is_configured() { "<redacted>" } else { "<unset>" };
    let max_results = config.matching.max_results.to_string();
    let cutoff = config.matching.cutoff.to_string();

    let fields = [
        ConfigField {
            key_path: "database.url",
            env_key: "HOTDEAL_DATABASE_URL",
            value: &config.database.url,
        },
        ConfigField {
            key_path: "database.max_connections",
            env_key: "HOTDEAL_DATABASE_MAX_CONNECTIONS",
            value: &max_connections,
        },
        ConfigField {
            key_path: "database.timeout_secs",
            env_key: "HOTDEAL_DATABASE_TIMEOUT_SECS",
            value: &timeout_secs,
        },
        ConfigField {
            key_path: "admin.password",
            env_key: "HOTDEAL_ADMIN_PASSWORD",
            value: admin_password,
        },
        ConfigField {
            key_path: "matching.max_results",
            env_key: "HOTDEAL_MATCHING_MAX_RESULTS",
            value: &max_results,
        },
        ConfigField {
            key_path: "matching.cutoff",
            env_key: "HOTDEAL_MATCHING_CUTOFF",
            value: &cutoff,
        },
        ConfigField {
            key_path: "logging.level",
            env_key: "HOTDEAL_LOGGING_LEVEL",
            value: &config.logging.level,
        },
        ConfigField {
            key_path: "logging.format",
            env_key: "HOTDEAL_LOGGING_FORMAT",
            value: config.logging.format.as_str(),
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in &fields {
        lines.push(render_line(
            field.key_path,
            field.value,
            field_source(
                field.key_path,
                Some(field.env_key),
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        ));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from(DEFAULT_CONFIG_FILE);
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config").join(DEFAULT_CONFIG_FILE);
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
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

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use super::contains_path;

    #[test]
    fn dotted_paths_resolve_nested_tables() {
        let doc: toml::Value = "[admin]\npassword = \"x\"\n".parse().expect("valid toml");

        assert!(contains_path(&doc, "admin.password"));
        assert!(!contains_path(&doc, "matching.cutoff"));
    }
}
