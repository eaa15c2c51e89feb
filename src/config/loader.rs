//! Configuration loader for YAML files
//!
//! Conversion settings come from one YAML file; credentials never do.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::AppError;

use super::types::AppConfig;

/// Load and validate the conversion settings file
///
/// # Example
/// ```ignore
/// use std::path::Path;
/// use fiat_bridge::config::load_config;
///
/// let config = load_config(Path::new("config.yaml"))?;
/// let request = config.conversion.to_request();
/// ```
pub fn load_config(path: &Path) -> Result<AppConfig, AppError> {
    let yaml = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::Config(format!(
            "Conversion settings not found at {} (copy config.example.yaml)",
            path.display()
        )),
        _ => AppError::Io(e),
    })?;
    parse(&yaml, &path.display().to_string())
}

/// Load conversion settings from a YAML string
pub fn load_config_from_str(yaml_content: &str) -> Result<AppConfig, AppError> {
    parse(yaml_content, "<inline>")
}

fn parse(yaml: &str, source: &str) -> Result<AppConfig, AppError> {
    let config: AppConfig = serde_yaml::from_str(yaml)
        .map_err(|e| AppError::Config(format!("Invalid conversion settings in {}: {}", source, e)))?;
    config.validate()?;
    Ok(config)
}

// ============================================================================
// Tests
// ============================================================================
