use std::{fmt::Display, str::FromStr};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DATABASE_TIMEOUT: u64 = 100;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be {1}, got {2:?}")]
    InvalidValue(&'static str, &'static str, String),
    #[error("{0} not found in env file")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Memory,
    Postgres { url: String, timeout: u64 },
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => f.write_str("memory"),
            StoreBackend::Postgres { .. } => f.write_str("postgres"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub store: StoreBackend,
}

impl Config {
    /// Reads the process environment. Call `dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "PORT", "an u16", DEFAULT_PORT)?;
        let store = match lookup("PERSON_STORE").as_deref() {
            None | Some("memory") => StoreBackend::Memory,
            Some("postgres") => StoreBackend::Postgres {
                url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
                timeout: parse_or(
                    &lookup,
                    "DATABASE_TIMEOUT",
                    "an u64",
                    DEFAULT_DATABASE_TIMEOUT,
                )?,
            },
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "PERSON_STORE",
                    "memory or postgres",
                    other.to_string(),
                ))
            }
        };
        Ok(Self { port, store })
    }
}

fn parse_or<F, T>(
    lookup: &F,
    key: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, expected, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_of(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_to_memory_store_on_3001() {
        assert_eq!(
            config_of(&[]),
            Ok(Config {
                port: 3001,
                store: StoreBackend::Memory
            })
        );
    }

    #[test]
    fn test_postgres_store() {
        let config = config_of(&[
            ("PORT", "8080"),
            ("PERSON_STORE", "postgres"),
            ("DATABASE_URL", "postgres://localhost/phonebook"),
        ]);
        assert_eq!(
            config,
            Ok(Config {
                port: 8080,
                store: StoreBackend::Postgres {
                    url: "postgres://localhost/phonebook".to_string(),
                    timeout: 100
                }
            })
        );
    }

    #[test]
    fn test_postgres_requires_database_url() {
        assert_eq!(
            config_of(&[("PERSON_STORE", "postgres")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config_of(&[("PORT", "http")]),
            Err(ConfigError::InvalidValue("PORT", "an u16", "http".to_string()))
        );
        assert_eq!(
            config_of(&[("PERSON_STORE", "mongo")]),
            Err(ConfigError::InvalidValue(
                "PERSON_STORE",
                "memory or postgres",
                "mongo".to_string()
            ))
        );
    }
}
