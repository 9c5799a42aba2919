//! Configuration loading and resolution.
//!
//! Effective configuration is merged with the precedence
//! CLI arguments > config file > built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cli::{Args, ConfigFormat};

// Default configuration constants
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Server configuration. Host/port binding is the only externally
/// recognized option besides logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: Some(DEFAULT_BIND_ADDR.to_string()),
            port: Some(DEFAULT_PORT),
            log_level: Some("info".into()),
        }
    }
}

impl Config {
    pub fn bind_addr(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn http_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

/// Resolves configuration from CLI args, config file, and defaults.
/// CLI values override the config file only when actually supplied.
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(bind_ip) = args.bind {
        config.bind = Some(bind_ip.to_string());
    }

    if let Some(cli_port) = args.port {
        config.port = Some(cli_port);
    }

    Ok(config)
}

/// Configuration loading with multiple format support (YAML/JSON/TOML,
/// selected by file extension).
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = path {
        p.to_path_buf()
    } else {
        // Try default locations
        let defaults = [
            "/etc/sysdash/sysdash.yaml",
            "/etc/sysdash/sysdash.yml",
            "/etc/sysdash/sysdash.json",
            "./sysdash.yaml",
            "./sysdash.yml",
            "./sysdash.json",
        ];

        match defaults.iter().find(|p| Path::new(p).exists()) {
            Some(p) => PathBuf::from(p),
            None => return Ok(Config::default()),
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON config {}", path.display()))?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("invalid TOML config {}", path.display()))?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML config {}", path.display()))?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<()> {
    let bind = cfg.bind_addr();
    bind.parse::<std::net::IpAddr>()
        .with_context(|| format!("invalid bind address '{bind}'"))?;

    if cfg.http_port() == 0 {
        bail!("port must be nonzero");
    }

    Ok(())
}

/// Renders configuration in the requested format.
pub fn render_config(config: &Config, format: &ConfigFormat) -> Result<String> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: &ConfigFormat) -> Result<()> {
    println!("{}", render_config(config, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn defaults_bind_all_interfaces_on_port_5000() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0");
        assert_eq!(config.http_port(), 5000);
    }

    #[test]
    fn cli_overrides_win_over_defaults() {
        let args = Args::parse_from(["sysdash", "--no-config", "-p", "8080", "--bind", "127.0.0.1"]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1");
        assert_eq!(config.http_port(), 8080);
    }

    #[test]
    fn cli_overrides_win_over_config_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "bind: \"10.0.0.1\"\nport: 9000\nlog_level: debug").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let args = Args::parse_from(["sysdash", "-c", &path, "-p", "8080"]);
        let config = resolve_config(&args).unwrap();

        // Port comes from CLI, bind from the file.
        assert_eq!(config.http_port(), 8080);
        assert_eq!(config.bind_addr(), "10.0.0.1");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn loads_json_and_toml_by_extension() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, "{{\"bind\": \"0.0.0.0\", \"port\": 6001, \"log_level\": null}}").unwrap();
        let config = load_config(Some(json.path())).unwrap();
        assert_eq!(config.http_port(), 6001);

        let mut toml_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(toml_file, "bind = \"0.0.0.0\"\nport = 6002").unwrap();
        let config = load_config(Some(toml_file.path())).unwrap();
        assert_eq!(config.http_port(), 6002);
    }

    #[test]
    fn validation_rejects_bad_bind_and_port() {
        let mut config = Config::default();
        config.bind = Some("not-an-ip".into());
        assert!(validate_effective_config(&config).is_err());

        let mut config = Config::default();
        config.port = Some(0);
        assert!(validate_effective_config(&config).is_err());

        assert!(validate_effective_config(&Config::default()).is_ok());
    }

    #[test]
    fn renders_all_config_formats() {
        let config = Config::default();
        for format in [ConfigFormat::Yaml, ConfigFormat::Json, ConfigFormat::Toml] {
            let rendered = render_config(&config, &format).unwrap();
            assert!(rendered.contains("5000"), "missing port in {rendered}");
        }
    }
}
