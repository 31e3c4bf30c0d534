use crate::offers::Locale;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    pub scoring_url: String,
    pub scoring_timeout: Duration,
    pub offer_locale: Locale,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            port: var("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            database_url: var("DB_URL")
                .or_else(|| var("DATABASE_URL"))
                .filter(|url| !url.trim().is_empty())
                .map(|url| {
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DB_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })
                .transpose()?,
            scoring_url: var("SCORING_URL")
                .ok_or_else(|| anyhow::anyhow!("SCORING_URL environment variable required"))
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("SCORING_URL cannot be empty");
                    }
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("SCORING_URL must start with http:// or https://");
                    }
                    Ok(url)
                })?,
            scoring_timeout: var("SCORING_TIMEOUT_MS")
                .unwrap_or_else(|| "3000".to_string())
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or_else(|| {
                    anyhow::anyhow!("SCORING_TIMEOUT_MS must be a positive millisecond count")
                })?,
            offer_locale: var("OFFER_LOCALE")
                .unwrap_or_else(|| "en".to_string())
                .parse()
                .map_err(|e: String| anyhow::anyhow!("OFFER_LOCALE: {}", e))?,
            rate_limit_per_second: var("RATE_LIMIT_PER_SECOND")
                .unwrap_or_else(|| "10".to_string())
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    anyhow::anyhow!("RATE_LIMIT_PER_SECOND must be a positive number")
                })?,
            rate_limit_burst: var("RATE_LIMIT_BURST")
                .unwrap_or_else(|| "20".to_string())
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    anyhow::anyhow!("RATE_LIMIT_BURST must be a positive number")
                })?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        match config.database_url {
            Some(ref url) => tracing::debug!("Database URL: {}...", url_prefix(url, 20)),
            None => {
                tracing::warn!("No DB_URL configured, client records will be kept in memory")
            }
        }
        tracing::debug!("Scoring URL: {}", config.scoring_url);
        tracing::debug!("Scoring timeout: {:?}", config.scoring_timeout);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

/// First `max_chars` characters of a URL, cut on a character boundary.
fn url_prefix(url: &str, max_chars: usize) -> String {
    url.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("SCORING_URL", "http://scoring:8000/predict")]).unwrap();

        assert_eq!(config.port, 3000);
        assert!(config.database_url.is_none());
        assert_eq!(config.scoring_timeout, Duration::from_millis(3000));
        assert_eq!(config.offer_locale, Locale::En);
        assert_eq!(config.rate_limit_per_second, 10);
        assert_eq!(config.rate_limit_burst, 20);
    }

    #[test]
    fn test_scoring_url_required() {
        assert!(load(&[]).is_err());
        assert!(load(&[("SCORING_URL", "scoring:8000")]).is_err());
    }

    #[test]
    fn test_database_url_scheme_checked() {
        let err = load(&[
            ("SCORING_URL", "http://scoring"),
            ("DB_URL", "mysql://localhost/clients"),
        ]);
        assert!(err.is_err());

        let config = load(&[
            ("SCORING_URL", "http://scoring"),
            ("DATABASE_URL", "postgres://localhost/clients"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/clients")
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SCORING_URL", "https://scoring"),
            ("PORT", "8080"),
            ("SCORING_TIMEOUT_MS", "250"),
            ("OFFER_LOCALE", "fr"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.scoring_timeout, Duration::from_millis(250));
        assert_eq!(config.offer_locale, Locale::Fr);
    }

    #[test]
    fn test_rejects_zero_timeout_and_unknown_locale() {
        assert!(load(&[("SCORING_URL", "http://s"), ("SCORING_TIMEOUT_MS", "0")]).is_err());
        assert!(load(&[("SCORING_URL", "http://s"), ("OFFER_LOCALE", "xx")]).is_err());
    }

    #[test]
    fn test_url_prefix_respects_char_boundaries() {
        // 'é' occupies bytes 19 and 20.
        let url = "postgres://aaaaaaaaé@localhost/db";
        assert_eq!(url_prefix(url, 20), "postgres://aaaaaaaaé");
        assert_eq!(url_prefix("postgres://h", 20), "postgres://h");
    }

    #[test]
    fn test_non_ascii_database_url_with_debug_logging() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            load(&[
                ("SCORING_URL", "http://scoring"),
                ("DB_URL", "postgres://aaaaaaaaé@localhost/db"),
            ])
        })
        .unwrap();

        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://aaaaaaaaé@localhost/db")
        );
    }
}
