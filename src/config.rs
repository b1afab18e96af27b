use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

// ============================================================
// Analysis Config
// ============================================================

/// Thresholds for coordinated-activity detection and red-flag generation.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    #[serde(default = "default_min_coordinated_trades")]
    pub min_coordinated_trades: usize,
    #[serde(default = "default_min_coordination_value")]
    pub min_coordination_value: f64,
    #[serde(default)]
    pub detect_mixed_windows: bool,
    #[serde(default = "default_large_cluster_size")]
    pub large_cluster_size: usize,
    #[serde(default = "default_heavy_selling_ratio")]
    pub heavy_selling_ratio: f64,
    #[serde(default = "default_heavy_buying_ratio")]
    pub heavy_buying_ratio: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            min_coordinated_trades: default_min_coordinated_trades(),
            min_coordination_value: default_min_coordination_value(),
            detect_mixed_windows: false,
            large_cluster_size: default_large_cluster_size(),
            heavy_selling_ratio: default_heavy_selling_ratio(),
            heavy_buying_ratio: default_heavy_buying_ratio(),
        }
    }
}

/// One century; longer windows overflow calendar arithmetic.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

fn default_window_days() -> i64 {
    5
}

fn default_min_coordinated_trades() -> usize {
    3
}

fn default_min_coordination_value() -> f64 {
    1_000_000.0
}

fn default_large_cluster_size() -> usize {
    5
}

fn default_heavy_selling_ratio() -> f64 {
    0.3
}

fn default_heavy_buying_ratio() -> f64 {
    3.0
}

impl AnalysisConfig {
    pub fn validate(&self) -> eyre::Result<()> {
        if !(0..=MAX_WINDOW_DAYS).contains(&self.window_days) {
            return Err(eyre::eyre!(
                "window_days must be between 0 and {}, got {}",
                MAX_WINDOW_DAYS,
                self.window_days
            ));
        }
        if self.min_coordinated_trades == 0 {
            return Err(eyre::eyre!("min_coordinated_trades must be at least 1"));
        }
        if !self.min_coordination_value.is_finite() || self.min_coordination_value < 0.0 {
            return Err(eyre::eyre!(
                "min_coordination_value must be a non-negative number, got {}",
                self.min_coordination_value
            ));
        }
        if self.large_cluster_size < 2 {
            return Err(eyre::eyre!("large_cluster_size must be at least 2"));
        }
        if self.heavy_selling_ratio >= self.heavy_buying_ratio {
            return Err(eyre::eyre!(
                "heavy_selling_ratio ({}) must be below heavy_buying_ratio ({})",
                self.heavy_selling_ratio,
                self.heavy_buying_ratio
            ));
        }
        Ok(())
    }
}

// ============================================================
// API Config
// ============================================================

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_api_port")]
    pub port: u16,
    #[serde(default = "default_api_host")]
    pub host: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

fn default_api_port() -> u16 {
    3000
}

fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

impl Config {
    pub fn load(path: &str) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("Failed to read config file '{}': {}", path, e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| eyre::eyre!("Failed to parse config file '{}': {}", path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &str) -> eyre::Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::load(path)
        } else {
            tracing::info!(path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> eyre::Result<()> {
        self.analysis.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
[analysis]
window_days = 7
min_coordination_value = 250000.0

[api]
port = 8080
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.analysis.window_days, 7);
        assert_eq!(config.analysis.min_coordination_value, 250_000.0);
        assert_eq!(config.analysis.min_coordinated_trades, 3); // default
        assert!(!config.analysis.detect_mixed_windows); // default
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.host, "0.0.0.0"); // default
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.analysis, AnalysisConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_trades() {
        let config = Config {
            analysis: AnalysisConfig {
                min_coordinated_trades: 0,
                ..AnalysisConfig::default()
            },
            api: ApiConfig::default(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_inverted_ratios() {
        let analysis = AnalysisConfig {
            heavy_selling_ratio: 4.0,
            heavy_buying_ratio: 3.0,
            ..AnalysisConfig::default()
        };
        assert!(analysis.validate().is_err());
    }

    #[test]
    fn test_validate_negative_window() {
        let analysis = AnalysisConfig {
            window_days: -1,
            ..AnalysisConfig::default()
        };
        assert!(analysis.validate().is_err());
    }

    #[test]
    fn test_validate_oversized_window() {
        let analysis = AnalysisConfig {
            window_days: 200_000_000,
            ..AnalysisConfig::default()
        };
        assert!(analysis.validate().is_err());

        let century = AnalysisConfig {
            window_days: MAX_WINDOW_DAYS,
            ..AnalysisConfig::default()
        };
        assert!(century.validate().is_ok());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("/nonexistent/insider-network.toml").unwrap();
        assert_eq!(config.analysis.window_days, 5);
    }
}
