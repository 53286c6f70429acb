//! `hae config` command
//!
//! Get or set configuration values. Keys are checked against the
//! fields `hae` actually reads, so a typo fails instead of silently
//! writing a dead key, and values are validated before they land in
//! the file. Writes go through `toml_edit` to keep the user's
//! comments intact.
//!
//! # Usage
//! ```bash
//! hae config                          # Show effective config
//! hae config server.url               # Get one value
//! hae config server.url <url>         # Set one value
//! hae config chat.classifier inferred
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use toml_edit::DocumentMut;

use crate::config::Config;
use crate::core::classifier::ClassifierMode;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config key (e.g., server.url, chat.classifier)
    pub key: Option<String>,

    /// Value to set
    pub value: Option<String>,

    /// List all config values
    #[arg(long)]
    pub list: bool,

    /// Edit config file in $EDITOR
    #[arg(short, long)]
    pub edit: bool,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Use global config (~/.hae/config.toml) instead of local
    #[arg(short, long)]
    pub global: bool,
}

/// Every key the crate reads; anything else is rejected
const KNOWN_KEYS: &[&str] = &[
    "server.url",
    "server.timeout_secs",
    "auth.token",
    "auth.email",
    "auth.display_name",
    "chat.classifier",
];

/// Template written by `--edit` when no file exists yet
const TEMPLATE: &str = "\
# hae configuration

[server]
# url = \"https://api.hae.app\"
# timeout_secs = 30

[chat]
# classifier = \"explicit\"  # or \"inferred\"
";

fn get_config_path(global: bool) -> PathBuf {
    if global {
        crate::config::dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".hae")
            .join("config.toml")
    } else {
        PathBuf::from(".hae").join("config.toml")
    }
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let config_path = get_config_path(args.global);

    if args.path {
        println!("Global: {}", get_config_path(true).display());
        println!("Local:  {}", get_config_path(false).display());
        println!();
        if config_path.exists() {
            println!("✓ Active: {}", config_path.display());
        } else {
            println!("⚠ No config file found at {}", config_path.display());
        }
        return Ok(());
    }

    if args.edit {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&config_path, TEMPLATE)?;
            println!("Created {}", config_path.display());
        }

        std::process::Command::new(&editor)
            .arg(&config_path)
            .status()
            .with_context(|| format!("Failed to open editor: {}", editor))?;
        return Ok(());
    }

    if args.list || (args.key.is_none() && args.value.is_none()) {
        // Effective config: file values with defaults filled in, token
        // redacted.
        let mut config = load_or_default(&config_path)?;
        if config.auth.token.is_some() {
            config.auth.token = Some("(set)".to_string());
        }
        println!("📋 Configuration ({}):\n", config_path.display());
        print!("{}", toml::to_string_pretty(&config)?);
        if !config_path.exists() {
            println!("\n(defaults; no file yet — set a value or run `hae config --edit`)");
        }
        return Ok(());
    }

    if let Some(key) = &args.key {
        if let Some(value) = &args.value {
            let toml_value = validate(key, value)?;
            set_config_value(&config_path, key, toml_value)?;
            println!("✅ Set {} = {} (in {})", key, value, config_path.display());
        } else {
            match get_config_value(&config_path, key)? {
                Some(v) => println!("{}", v),
                None => println!("(not set)"),
            }
        }
    }

    Ok(())
}

/// Check the key and value, returning the TOML representation to write
fn validate(key: &str, val: &str) -> Result<toml_edit::Value> {
    match key {
        "server.url" => {
            url::Url::parse(val).with_context(|| format!("Invalid server URL: {}", val))?;
            Ok(val.into())
        }
        "server.timeout_secs" => {
            let secs: u32 = val
                .parse()
                .with_context(|| format!("server.timeout_secs must be an integer, got '{}'", val))?;
            Ok(i64::from(secs).into())
        }
        "chat.classifier" => {
            val.parse::<ClassifierMode>()?;
            Ok(val.to_lowercase().into())
        }
        "auth.token" | "auth.email" | "auth.display_name" => Ok(val.into()),
        _ => anyhow::bail!(
            "Unknown config key: {}.\nKnown keys: {}",
            key,
            KNOWN_KEYS.join(", ")
        ),
    }
}

/// Write one validated value, preserving comments and layout
fn set_config_value(path: &Path, key: &str, val: toml_edit::Value) -> Result<()> {
    let (section, field) = key
        .split_once('.')
        .with_context(|| format!("Key must be section.field, got '{}'", key))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };
    let mut doc: DocumentMut = content.parse().context("Failed to parse config.toml")?;

    if doc.get(section).is_none() {
        doc[section] = toml_edit::table();
    }
    doc[section][field] = toml_edit::value(val);

    fs::write(path, doc.to_string())?;
    Ok(())
}

/// Read one value through the typed config, so defaults are reported
/// for keys that carry one
fn get_config_value(path: &Path, key: &str) -> Result<Option<String>> {
    let config = load_or_default(path)?;

    match key {
        "server.url" => Ok(config.server.url),
        "server.timeout_secs" => Ok(Some(config.server.timeout_secs.to_string())),
        "auth.token" => Ok(config.auth.token),
        "auth.email" => Ok(config.auth.email),
        "auth.display_name" => Ok(config.auth.display_name),
        "chat.classifier" => Ok(Some(config.chat.classifier)),
        _ => anyhow::bail!(
            "Unknown config key: {}.\nKnown keys: {}",
            key,
            KNOWN_KEYS.join(", ")
        ),
    }
}

fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load_from(path)
    } else {
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(validate("server.url", "https://api.hae.app").is_ok());
        assert!(validate("server.password", "x").is_err());
        assert!(validate("user.name", "x").is_err());
        assert!(get_config_value(Path::new("/nonexistent"), "search.limit").is_err());
    }

    #[test]
    fn test_values_are_checked_per_key() {
        assert!(validate("server.url", "not a url").is_err());
        assert!(validate("server.timeout_secs", "45").is_ok());
        assert!(validate("server.timeout_secs", "soon").is_err());
        assert!(validate("chat.classifier", "inferred").is_ok());
        assert!(validate("chat.classifier", "Explicit").is_ok());
        assert!(validate("chat.classifier", "hybrid").is_err());
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let val = validate("server.url", "https://api.hae.app").unwrap();
        set_config_value(&path, "server.url", val).unwrap();

        assert_eq!(
            get_config_value(&path, "server.url").unwrap().as_deref(),
            Some("https://api.hae.app")
        );
        // Keys with defaults report the default even when unset.
        assert_eq!(
            get_config_value(&path, "chat.classifier").unwrap().as_deref(),
            Some("explicit")
        );
    }

    #[test]
    fn test_classifier_value_is_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let val = validate("chat.classifier", "Inferred").unwrap();
        set_config_value(&path, "chat.classifier", val).unwrap();

        assert_eq!(
            get_config_value(&path, "chat.classifier").unwrap().as_deref(),
            Some("inferred")
        );
    }

    #[test]
    fn test_set_preserves_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "# my notes\n[server]\nurl = \"http://old\"\n").unwrap();

        let val = validate("server.url", "http://new").unwrap();
        set_config_value(&path, "server.url", val).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("# my notes"));
        assert!(content.contains("http://new"));
        assert!(!content.contains("http://old"));
    }
}
