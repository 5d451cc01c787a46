use serde::{Deserialize, Serialize};

use crate::error::{CoopervalError, Result};

/// Connection settings for the hosted content store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project identifier assigned by the hosting service.
    pub project_id: String,
    /// Dataset name, e.g. "production".
    pub dataset: String,
    /// API version date, e.g. "2024-01-01".
    pub api_version: String,
    /// Write token. Read-only queries work without one.
    pub token: Option<String>,
}

impl StoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            token: None,
        }
    }

    /// Build the configuration from `COOPERVAL_*` environment variables.
    ///
    /// `COOPERVAL_PROJECT_ID` is required; dataset defaults to
    /// "production" and the API version to "2024-01-01".
    pub fn from_env() -> Result<Self> {
        let project_id = std::env::var("COOPERVAL_PROJECT_ID")
            .map_err(|_| CoopervalError::MissingConfig("COOPERVAL_PROJECT_ID is not set".into()))?;

        let mut config = Self::new(project_id);
        if let Ok(dataset) = std::env::var("COOPERVAL_DATASET") {
            config.dataset = dataset;
        }
        if let Ok(version) = std::env::var("COOPERVAL_API_VERSION") {
            config.api_version = version;
        }
        config.token = std::env::var("COOPERVAL_TOKEN").ok().filter(|t| !t.is_empty());

        Ok(config)
    }

    /// Base URL for the data API, without a trailing slash.
    pub fn api_base(&self) -> String {
        format!(
            "https://{}.api.sanity.io/v{}",
            self.project_id, self.api_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::new("abc123");
        assert_eq!(config.dataset, "production");
        assert_eq!(config.api_version, "2024-01-01");
        assert!(config.token.is_none());
    }

    #[test]
    fn test_api_base() {
        let config = StoreConfig::new("abc123");
        assert_eq!(config.api_base(), "https://abc123.api.sanity.io/v2024-01-01");
    }

    #[test]
    fn test_serialization() {
        let config = StoreConfig::new("abc123");
        let json = serde_json::to_string(&config).unwrap();
        let parsed: StoreConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.project_id, config.project_id);
        assert_eq!(parsed.dataset, config.dataset);
    }
}
