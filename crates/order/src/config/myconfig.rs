use crate::domain::policy::StockPolicy;
use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    pub metric_port: u16,
    pub db_max_conn: u32,
    pub db_min_conn: u32,
    pub stock_policy: StockPolicy,
    pub is_dev: bool,
    pub enable_file_log: bool,
}

fn flag(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, `std::env::var` in production.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;

        let run_migrations = match lookup("RUN_MIGRATIONS").as_deref() {
            None | Some("true") => true,
            Some("false") => false,
            Some(other) => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let metric_port = lookup("METRIC_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("METRIC_PORT must be a valid u16 integer")?;

        let db_max_conn: u32 = lookup("DB_MAX_CONNECTION")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MAX_CONNECTION as u32")?;

        let db_min_conn: u32 = lookup("DB_MIN_CONNECTION")
            .unwrap_or_else(|| "1".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MIN_CONNECTION as u32")?;

        if db_min_conn > db_max_conn {
            return Err(anyhow!(
                "DB_MIN_CONNECTION ({db_min_conn}) exceeds DB_MAX_CONNECTION ({db_max_conn})"
            ));
        }

        let stock_policy = match lookup("ORDER_STOCK_POLICY") {
            Some(raw) => raw.parse::<StockPolicy>().map_err(|e| anyhow!(e))?,
            None => StockPolicy::default(),
        };

        Ok(Self {
            database_url,
            run_migrations,
            metric_port,
            db_max_conn,
            db_min_conn,
            stock_policy,
            is_dev: flag(lookup("DEV_MODE"), false),
            enable_file_log: flag(lookup("ENABLE_FILE_LOG"), false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_the_url_is_set() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/orders")])
            .expect("config");

        assert!(config.run_migrations);
        assert_eq!(config.metric_port, 8080);
        assert_eq!(config.db_max_conn, 5);
        assert_eq!(config.db_min_conn, 1);
        assert_eq!(config.stock_policy, StockPolicy::Permissive);
        assert!(!config.is_dev);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = config_from(&[]).expect_err("no url");
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn reject_policy_and_flags_are_read() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/orders"),
            ("ORDER_STOCK_POLICY", "Reject"),
            ("RUN_MIGRATIONS", "false"),
            ("DEV_MODE", "1"),
        ])
        .expect("config");

        assert_eq!(config.stock_policy, StockPolicy::Reject);
        assert!(!config.run_migrations);
        assert!(config.is_dev);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(
            config_from(&[
                ("DATABASE_URL", "postgres://localhost/orders"),
                ("RUN_MIGRATIONS", "yes"),
            ])
            .is_err()
        );
        assert!(
            config_from(&[
                ("DATABASE_URL", "postgres://localhost/orders"),
                ("ORDER_STOCK_POLICY", "lenient"),
            ])
            .is_err()
        );
        assert!(
            config_from(&[
                ("DATABASE_URL", "postgres://localhost/orders"),
                ("METRIC_PORT", "not-a-port"),
            ])
            .is_err()
        );
    }
}
