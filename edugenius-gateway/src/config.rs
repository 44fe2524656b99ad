use anyhow::{bail, Context, Result};
use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8007;

/// Process-wide settings, read once at startup.
#[derive(Clone)]
pub struct GatewayConfig {
    pub gemini_api_key: String,
    pub host: String,
    pub port: u16,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("gemini_api_key", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Values are trimmed; Windows env
    /// vars are easy to set with trailing whitespace.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let Some(gemini_api_key) = read("GEMINI_API_KEY") else {
            bail!("GEMINI_API_KEY not found in environment variables");
        };

        let host = read("EDUGENIUS_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match read("EDUGENIUS_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("EDUGENIUS_PORT must be a valid port number, got '{}'", raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            gemini_api_key,
            host,
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<GatewayConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));

        assert!(config_from(&[("GEMINI_API_KEY", "   ")]).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("GEMINI_API_KEY", " secret \n")]).unwrap();
        assert_eq!(config.gemini_api_key, "secret");
        assert_eq!(config.bind_addr(), "0.0.0.0:8007");
    }

    #[test]
    fn test_overrides_and_bad_port() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "k"),
            ("EDUGENIUS_HOST", "127.0.0.1"),
            ("EDUGENIUS_PORT", "9100"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9100");

        let err = config_from(&[("GEMINI_API_KEY", "k"), ("EDUGENIUS_PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("EDUGENIUS_PORT"));
    }

    #[test]
    fn test_debug_hides_key() {
        let config = config_from(&[("GEMINI_API_KEY", "super-secret")]).unwrap();
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
