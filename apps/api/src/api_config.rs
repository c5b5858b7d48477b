use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use ledger_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerStoreConfig {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestrationEngineConfig {
    Http {
        endpoint: Url,
        timeout: Option<Duration>,
    },
    Simulated,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub ledger_store: LedgerStoreConfig,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub internal_api_key: String,
    pub orchestration_engine: OrchestrationEngineConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    fn from_lookup(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let ledger_store = match lookup("LEDGER_STORE")
            .unwrap_or_else(|| "postgres".to_owned())
            .as_str()
        {
            "postgres" => LedgerStoreConfig::Postgres {
                database_url: required_non_empty(&lookup, "DATABASE_URL")?,
                max_connections: parsed_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            },
            "memory" => {
                if migrate_only {
                    return Err(AppError::Validation(
                        "the migrate command requires LEDGER_STORE=postgres".to_owned(),
                    ));
                }
                LedgerStoreConfig::Memory
            }
            other => {
                return Err(AppError::Validation(format!(
                    "LEDGER_STORE must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parsed_or(&lookup, "API_PORT", 3001)?;

        // Migrations do not talk to the engine or serve requests.
        if migrate_only {
            return Ok(Self {
                migrate_only,
                ledger_store,
                frontend_url,
                api_host,
                api_port,
                internal_api_key: String::new(),
                orchestration_engine: OrchestrationEngineConfig::Simulated,
            });
        }

        let internal_api_key = required_non_empty(&lookup, "INTERNAL_API_KEY")?;

        let orchestration_engine = match lookup("ORCHESTRATION_ENGINE")
            .unwrap_or_else(|| "http".to_owned())
            .as_str()
        {
            "http" => {
                let raw_url = required_non_empty(&lookup, "ORCHESTRATION_ENGINE_URL")?;
                let endpoint = Url::parse(raw_url.as_str()).map_err(|error| {
                    AppError::Validation(format!("invalid ORCHESTRATION_ENGINE_URL: {error}"))
                })?;
                let timeout = lookup("ORCHESTRATION_ENGINE_TIMEOUT_SECONDS")
                    .filter(|value| !value.trim().is_empty())
                    .map(|value| {
                        value.trim().parse::<u64>().map(Duration::from_secs).map_err(|error| {
                            AppError::Validation(format!(
                                "invalid ORCHESTRATION_ENGINE_TIMEOUT_SECONDS: {error}"
                            ))
                        })
                    })
                    .transpose()?;

                OrchestrationEngineConfig::Http { endpoint, timeout }
            }
            "simulated" => OrchestrationEngineConfig::Simulated,
            other => {
                return Err(AppError::Validation(format!(
                    "ORCHESTRATION_ENGINE must be either 'http' or 'simulated', got '{other}'"
                )));
            }
        };

        Ok(Self {
            migrate_only,
            ledger_store,
            frontend_url,
            api_host,
            api_port,
            internal_api_key,
            orchestration_engine,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parsed_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name).filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}
