//! Environment variable parsing utilities.

use std::collections::HashMap;
use std::time::Duration;

use super::ConfigError;

/// Where configuration values come from.
///
/// The process environment in production; a fixed map in tests so parallel
/// tests never race on `std::env::set_var`.
#[derive(Clone, Debug, Default)]
pub struct EnvSource {
    vars: Option<HashMap<String, String>>,
}

impl EnvSource {
    /// Read from the process environment.
    pub fn process() -> Self {
        Self { vars: None }
    }

    /// Read from a fixed set of pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: Some(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Raw variable lookup.
    pub fn var(&self, key: &str) -> Option<String> {
        match &self.vars {
            None => std::env::var(key).ok(),
            Some(vars) => vars.get(key).cloned(),
        }
    }

    /// Get variable with default value.
    pub fn env_or(&self, key: &str, default: &str) -> String {
        self.var(key).unwrap_or_else(|| default.to_string())
    }

    /// Get optional variable (None if empty or missing).
    pub fn env_opt(&self, key: &str) -> Option<String> {
        self.var(key).filter(|s| !s.is_empty())
    }

    /// Comma-separated list, trimmed, empty items dropped.
    pub fn env_list(&self, key: &str) -> Vec<String> {
        self.env_opt(key)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Parse variable as duration (None for "off" or "0").
    pub fn env_duration(&self, key: &str, default: &str) -> Result<Option<Duration>, ConfigError> {
        let value = self.env_or(key, default);
        parse_duration(&value).map_err(|e| ConfigError::Parse {
            key: key.into(),
            value,
            error: e,
        })
    }
}

/// Parse duration string (e.g., "30s", "2m", "1h", "1d", "500ms").
/// Returns None for "off" or "0".
pub fn parse_duration(s: &str) -> Result<Option<Duration>, String> {
    let s = s.trim().to_lowercase();

    if s == "off" || s == "0" || s.is_empty() {
        return Ok(None);
    }

    if let Some(num_str) = s.strip_suffix("ms") {
        let num: u64 = num_str
            .parse()
            .map_err(|_| format!("invalid number: {}", num_str))?;
        return Ok(Some(Duration::from_millis(num)));
    }

    // Try to split into number and unit
    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('d') {
        (n, 86400)
    } else {
        // Try parsing as seconds
        return s
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| format!("invalid duration: {}", s));
    };

    let num: u64 = num_str
        .parse()
        .map_err(|_| format!("invalid number: {}", num_str))?;
    let secs = num
        .checked_mul(multiplier)
        .ok_or_else(|| format!("duration too large: {}", s))?;

    Ok(Some(Duration::from_secs(secs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("off").unwrap(), None);
        assert_eq!(parse_duration("0").unwrap(), None);
        assert_eq!(parse_duration("").unwrap(), None);

        assert_eq!(
            parse_duration("30s").unwrap(),
            Some(Duration::from_secs(30))
        );
        assert_eq!(
            parse_duration("2m").unwrap(),
            Some(Duration::from_secs(120))
        );
        assert_eq!(
            parse_duration("1h").unwrap(),
            Some(Duration::from_secs(3600))
        );
        assert_eq!(
            parse_duration("1d").unwrap(),
            Some(Duration::from_secs(86400))
        );
        assert_eq!(
            parse_duration("250ms").unwrap(),
            Some(Duration::from_millis(250))
        );

        // Plain seconds
        assert_eq!(
            parse_duration("120").unwrap(),
            Some(Duration::from_secs(120))
        );

        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("xs").is_err());

        // Unit multiplication must not wrap
        assert_eq!(
            parse_duration("300000000000000d").unwrap_err(),
            "duration too large: 300000000000000d"
        );
        assert_eq!(
            parse_duration("18446744073709551615s").unwrap(),
            Some(Duration::from_secs(u64::MAX))
        );
    }

    #[test]
    fn test_env_list() {
        let env = EnvSource::from_pairs([("KEYS", " system, ,metrics ")]);
        assert_eq!(env.env_list("KEYS"), vec!["system", "metrics"]);
        assert!(env.env_list("MISSING").is_empty());
    }

    #[test]
    fn test_env_opt_filters_empty() {
        let env = EnvSource::from_pairs([("EMPTY", ""), ("SET", "x")]);
        assert_eq!(env.env_opt("EMPTY"), None);
        assert_eq!(env.env_opt("SET").as_deref(), Some("x"));
        assert_eq!(env.env_or("MISSING", "fallback"), "fallback");
    }

    #[test]
    fn test_env_duration_overflow_is_parse_error() {
        let env = EnvSource::from_pairs([("TTL", "999999999999999h")]);
        assert!(matches!(
            env.env_duration("TTL", "300s"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_env_duration_error() {
        let env = EnvSource::from_pairs([("TTL", "forever")]);
        let err = env.env_duration("TTL", "300s").unwrap_err();
        assert!(err.to_string().contains("TTL"));
    }
}
