use std::{fs, io, path::Path};

use galois_render::RenderConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    #[serde(flatten)]
    pub render: RenderConfig,
    /// Base URL of the solver service.
    pub solver_url: String,
    /// Width in pixels that fields are fitted into.
    pub container_width: f32,
    /// Seconds to wait for the solver before giving up.
    pub solver_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            render: RenderConfig::default(),
            solver_url: "http://localhost:8001".to_string(),
            container_width: 600.0,
            solver_timeout_secs: 60,
        }
    }
}

/// Error type for configuration loading operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads and deserializes the configuration from a TOML file.
///
/// Keys that are missing from the file keep their default values.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok(config)
}

#[inline]
fn parse_config(s: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(s)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use galois_render::LineBreak;

    use super::*;

    #[test]
    fn test_full_config() {
        let toml_content = r#"
solver-url = "https://galois.example.org"
container-width = 420.0
solver-timeout-secs = 5
scale = [40.0, 30.0, 20.0]
debounce-ms = 50
measure-timeout-ms = 800
line-break = "greedy"
terms-per-line = 4
fallback-char-width = 0.5
        "#;
        let config = parse_config(toml_content).unwrap();
        assert_eq!(config.solver_url, "https://galois.example.org");
        assert_eq!(config.container_width, 420.0);
        assert_eq!(config.solver_timeout_secs, 5);
        assert_eq!(config.render.scale.sizes(), &[40.0, 30.0, 20.0]);
        assert_eq!(config.render.debounce_ms, 50);
        assert_eq!(config.render.measure_timeout_ms, 800);
        assert_eq!(config.render.line_break, LineBreak::Greedy);
        assert_eq!(config.render.terms_per_line, 4);
        assert_eq!(config.render.fallback_char_width, 0.5);
    }

    #[test]
    fn test_invalid_config() {
        let invalid_toml = "invalid_toml";
        let result = parse_config(invalid_toml);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unordered_scale() {
        let result = parse_config("scale = [16.0, 32.0]");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_partial_config() {
        let toml_content = r#"
container-width = 300.0
        "#;
        let config = parse_config(toml_content).unwrap();
        assert_eq!(config.container_width, 300.0);
        assert_eq!(config.solver_url, "http://localhost:8001");
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let result = load_config_file(Path::new("/nonexistent/galois-render.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
