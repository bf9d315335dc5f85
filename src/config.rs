//! Configuration management

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub glm: GlmConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlmConfig {
    /// Chat-completions endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer key for the GLM API
    pub api_key: String,
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Prefer the GLM API over the local keyword rules
    pub use_api: bool,
    /// Sampling temperature for classification calls
    pub classify_temperature: f32,
    /// Token cap for classification replies (a single label)
    pub classify_max_tokens: u32,
    /// Sampling temperature for case and advice generation
    pub generate_temperature: f32,
    /// Token cap for generated comments and advice
    pub generate_max_tokens: u32,
}

fn default_api_url() -> String {
    "https://open.bigmodel.cn/api/paas/v4/chat/completions".to_string()
}

fn default_model() -> String {
    "glm-4".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            use_api: true,
            classify_temperature: 0.1,
            classify_max_tokens: 10,
            generate_temperature: 0.8,
            generate_max_tokens: 50,
        }
    }
}

impl Config {
    /// Load configuration from file, with WEIBO_* environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let Some(path) = path.as_ref().to_str() else {
            anyhow::bail!("config path is not valid UTF-8");
        };

        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("WEIBO").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    /// Load from default locations
    pub fn load_default() -> anyhow::Result<Self> {
        let paths = ["config.toml", "~/.config/weibo-sentiment/config.toml"];

        for path in paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::load(expanded.as_ref());
            }
        }

        anyhow::bail!("No configuration file found")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_file() {
        let cfg: Config = toml::from_str(
            r#"
            [glm]
            api_key = "test-key"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.glm.api_key, "test-key");
        assert_eq!(cfg.glm.model, "glm-4");
        assert!(cfg.glm.api_url.contains("bigmodel.cn"));
        assert_eq!(cfg.glm.timeout_secs, 30);
        assert!(cfg.analysis.use_api);
    }

    #[test]
    fn test_analysis_overrides() {
        let cfg: Config = toml::from_str(
            r#"
            [glm]
            api_key = "k"

            [analysis]
            use_api = false
            classify_max_tokens = 16
            "#,
        )
        .unwrap();

        assert!(!cfg.analysis.use_api);
        assert_eq!(cfg.analysis.classify_max_tokens, 16);
        // Untouched fields keep their defaults
        assert_eq!(cfg.analysis.generate_max_tokens, 50);
    }

    #[test]
    fn test_sampling_defaults() {
        let cfg = AnalysisConfig::default();
        assert!((cfg.classify_temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(cfg.classify_max_tokens, 10);
        assert!((cfg.generate_temperature - 0.8).abs() < f32::EPSILON);
        assert_eq!(cfg.generate_max_tokens, 50);
    }

    #[test]
    fn test_missing_key_rejected() {
        let res = toml::from_str::<Config>("[glm]\nmodel = \"glm-4\"\n");
        assert!(res.is_err());
    }
}
