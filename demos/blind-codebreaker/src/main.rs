//! Standalone codebreaker server.
//!
//! Configured from the environment:
//!
//! | variable | default | meaning |
//! |---|---|---|
//! | `PORT` | `8080` | listening port |
//! | `HOST` | `0.0.0.0` | bind host |
//! | `CODEBREAKER_ERRORS` | `silent` | `silent` or `report` |
//! | `CODEBREAKER_IDLE_SECS` | unset | close connections idle this long |
//! | `RUST_LOG` | `info` | tracing filter |

use std::time::Duration;

use codebreaker::prelude::*;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";

/// Builds a server config from `var`, which looks up one variable.
fn config_from(var: impl Fn(&str) -> Option<String>) -> Result<ServerConfig, String> {
    let port = match var("PORT") {
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .map_err(|e| format!("PORT={raw:?}: {e}"))?,
        None => DEFAULT_PORT,
    };
    let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

    let error_policy = match var("CODEBREAKER_ERRORS") {
        Some(raw) => raw.parse::<ErrorPolicy>()?,
        None => ErrorPolicy::default(),
    };

    let idle_timeout = match var("CODEBREAKER_IDLE_SECS") {
        Some(raw) => {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("CODEBREAKER_IDLE_SECS={raw:?}: {e}"))?;
            (secs > 0).then(|| Duration::from_secs(secs))
        }
        None => None,
    };

    Ok(ServerConfig {
        bind_addr: format!("{host}:{port}"),
        error_policy,
        idle_timeout,
        ..ServerConfig::default()
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = config_from(|name| std::env::var(name).ok())?;
    tracing::info!(
        addr = %config.bind_addr,
        policy = ?config.error_policy,
        idle = ?config.idle_timeout,
        "starting blind-codebreaker"
    );

    let server = CodebreakerServerBuilder::new().config(config).build().await?;
    server.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<ServerConfig, String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config_from(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_config_from_empty_env_uses_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.error_policy, ErrorPolicy::Silent);
        assert!(config.idle_timeout.is_none());
    }

    #[test]
    fn test_config_from_reads_every_variable() {
        let config = config(&[
            ("PORT", "9001"),
            ("HOST", "127.0.0.1"),
            ("CODEBREAKER_ERRORS", "report"),
            ("CODEBREAKER_IDLE_SECS", "30"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9001");
        assert_eq!(config.error_policy, ErrorPolicy::Report);
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_config_from_zero_idle_disables_timeout() {
        let config = config(&[("CODEBREAKER_IDLE_SECS", "0")]).unwrap();
        assert!(config.idle_timeout.is_none());
    }

    #[test]
    fn test_config_from_rejects_bad_values() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("PORT", "70000")]).is_err());
        assert!(config(&[("CODEBREAKER_ERRORS", "loud")]).is_err());
        assert!(config(&[("CODEBREAKER_IDLE_SECS", "-1")]).is_err());
    }
}
