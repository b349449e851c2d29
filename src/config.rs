use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    /// Pause before each mutation, standing in for a network round trip.
    pub simulated_latency: Duration,

    pub log_dir: String,
    pub seed_sample_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            api_prefix: "/api".to_string(),
            rate_protected_per_min: 1000,
            simulated_latency: Duration::from_millis(500),
            log_dir: "logs".to_string(),
            seed_sample_data: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, falling back to defaults for
    /// absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or(defaults.server_addr),
            api_prefix: lookup("API_PREFIX").unwrap_or(defaults.api_prefix),
            rate_protected_per_min: parse_or(
                &lookup,
                "RATE_PROTECTED_PER_MIN",
                defaults.rate_protected_per_min,
            )?,
            simulated_latency: Duration::from_millis(parse_or(
                &lookup,
                "SIMULATED_LATENCY_MS",
                defaults.simulated_latency.as_millis() as u64,
            )?),
            log_dir: lookup("LOG_DIR").unwrap_or(defaults.log_dir),
            seed_sample_data: parse_or(&lookup, "SEED_SAMPLE_DATA", defaults.seed_sample_data)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
