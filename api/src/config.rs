use std::env;

use crate::app::charges::{DEFAULT_LATE_FEE_PER_DAY, DEFAULT_LOAN_DAYS};
use crate::app::LoanPolicy;
use crate::domain::entities::Money;
use crate::error::ConfigError;

#[derive(Clone)]
pub struct Config {
    /// Postgres connection string; the in-memory store is used when unset
    pub database_url: Option<String>,
    pub port: u16,
    pub policy: LoanPolicy,
    /// Lowercase SHA-256 hex digests of the accepted staff keys
    pub staff_key_hashes: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => 8080,
        };

        let late_fee_per_day = match var("LATE_FEE_PER_DAY") {
            Some(raw) => {
                let fee = raw
                    .parse::<Money>()
                    .map_err(|reason| ConfigError::Invalid {
                        name: "LATE_FEE_PER_DAY",
                        reason,
                    })?;
                if fee.is_negative() {
                    return Err(ConfigError::Invalid {
                        name: "LATE_FEE_PER_DAY",
                        reason: "must not be negative".to_string(),
                    });
                }
                fee
            }
            None => DEFAULT_LATE_FEE_PER_DAY,
        };

        let default_loan_days = match var("DEFAULT_LOAN_DAYS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(days) if days > 0 => days,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        name: "DEFAULT_LOAN_DAYS",
                        reason: "must be positive".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: "DEFAULT_LOAN_DAYS",
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_LOAN_DAYS,
        };

        let staff_key_hashes = match var("STAFF_API_KEY_HASHES") {
            Some(raw) => parse_key_hashes(&raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            database_url: var("DATABASE_URL"),
            port,
            policy: LoanPolicy {
                late_fee_per_day,
                default_loan_days,
            },
            staff_key_hashes,
        })
    }
}

fn parse_key_hashes(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(|h| {
            if h.len() == 64 && h.chars().all(|c| c.is_ascii_hexdigit()) {
                Ok(h.to_ascii_lowercase())
            } else {
                Err(ConfigError::Invalid {
                    name: "STAFF_API_KEY_HASHES",
                    reason: format!("'{}' is not a SHA-256 hex digest", h),
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert!(config.database_url.is_none());
        assert_eq!(config.port, 8080);
        assert_eq!(config.policy, LoanPolicy::default());
        assert!(config.staff_key_hashes.is_empty());
    }

    #[test]
    fn reads_every_variable() {
        let digest = "A".repeat(64);
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/circulation"),
            ("PORT", "9000"),
            ("LATE_FEE_PER_DAY", "2.50"),
            ("DEFAULT_LOAN_DAYS", "21"),
            ("STAFF_API_KEY_HASHES", &format!(" {} , ", digest)),
        ])
        .unwrap();

        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/circulation")
        );
        assert_eq!(config.port, 9000);
        assert_eq!(config.policy.late_fee_per_day, Money::from_cents(250));
        assert_eq!(config.policy.default_loan_days, 21);
        assert_eq!(config.staff_key_hashes, vec!["a".repeat(64)]);
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn malformed_values_name_the_variable() {
        let cases = [
            ("PORT", "eighty"),
            ("LATE_FEE_PER_DAY", "five"),
            ("LATE_FEE_PER_DAY", "-1.00"),
            ("DEFAULT_LOAN_DAYS", "0"),
            ("STAFF_API_KEY_HASHES", "not-a-digest"),
        ];

        for (name, value) in cases {
            match config_from(&[(name, value)]) {
                Err(ConfigError::Invalid { name: reported, .. }) => assert_eq!(reported, name),
                Ok(_) => panic!("{}={} should be rejected", name, value),
            }
        }
    }
}
