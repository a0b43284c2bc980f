use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub provider: ProviderConfig,
    pub agent: AgentConfig,
    pub memory: MemoryConfig,
    pub streaming: StreamingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub name: String,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            model: "wayfarer-mock".to_string(),
            max_tokens: 2048,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub temperature: f64,
    pub max_iterations: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_iterations: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Messages kept per session after pruning
    pub max_messages: usize,
    /// Recent turns included in the prompt transcript
    pub context_messages: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_messages: 20,
            context_messages: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    pub enabled: bool,
    /// Inter-token display delay applied by the CLI, not the classifier
    pub delay_ms: u64,
    /// Colorized stderr trace of classified events
    pub terminal_logging: bool,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 10,
            terminal_logging: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            provider: ProviderConfig::default(),
            agent: AgentConfig::default(),
            memory: MemoryConfig::default(),
            streaming: StreamingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Sanity-check settings; returns human-readable problems
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(0.0..=2.0).contains(&self.agent.temperature) {
            errors.push("agent.temperature must be between 0 and 2".to_string());
        }
        if self.agent.max_iterations < 1 {
            errors.push("agent.max_iterations must be at least 1".to_string());
        }
        if self.memory.max_messages < 1 {
            errors.push("memory.max_messages must be at least 1".to_string());
        }
        if self.memory.context_messages > self.memory.max_messages {
            errors.push("memory.context_messages cannot exceed memory.max_messages".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.provider.name, "mock");
        assert_eq!(config.agent.temperature, 0.7);
        assert_eq!(config.memory.max_messages, 20);
        assert!(config.streaming.enabled);
        assert_eq!(config.streaming.delay_ms, 10);
    }

    #[test]
    fn test_defaults_validate_clean() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = Config::default();
        config.agent.temperature = 2.5;
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("temperature"));
    }

    #[test]
    fn test_validate_memory_settings() {
        let mut config = Config::default();
        config.memory.max_messages = 0;
        config.memory.context_messages = 5;
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("max_messages")));
        assert!(errors.iter().any(|e| e.contains("context_messages")));
    }

    #[test]
    fn test_load_from_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "provider:\n  name: gemini\n  model: gemini-1.5-flash\nstreaming:\n  delay_ms: 0"
        )
        .unwrap();

        let path = file.path().to_path_buf();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.provider.name, "gemini");
        assert_eq!(config.provider.model, "gemini-1.5-flash");
        assert_eq!(config.streaming.delay_ms, 0);
        // Unspecified sections keep defaults
        assert_eq!(config.memory.max_messages, 20);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let path = PathBuf::from("/nonexistent/wayfarer.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "provider: [not a mapping").unwrap();
        let path = file.path().to_path_buf();
        assert!(Config::load(Some(&path)).is_err());
    }
}
