use std::net::SocketAddr;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

#[derive(Clone, Debug, PartialEq)]
pub enum Env {
    Dev,
    Staging,
    Production,
}

pub struct ServerConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub cors_allowed_origins: Vec<String>,
}

fn var(key: &str) -> Result<Option<String>, String> {
    match std::env::var(key) {
        Ok(env) => Ok(Some(env)),
        Err(std::env::VarError::NotPresent) => {
            tracing::debug!("Missing environment variable `{key}`");
            Ok(None)
        }
        Err(std::env::VarError::NotUnicode(_)) => Err(format!(
            "Could not get the environment variable `{key}` due to unicode error"
        )),
    }
}

fn required_var(key: &str) -> String {
    let val = var(key);
    match val {
        Ok(val) => match val {
            Some(val) => val,
            None => {
                tracing::error!("Environment variable `{key}` is required");
                std::process::exit(1)
            }
        },
        Err(e) => {
            tracing::error!(
                "Environment variable `{key}` is required, but could not retrieve: {e}"
            );
            std::process::exit(1)
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    match var(key) {
        Ok(Some(val)) => val,
        Ok(None) => default.into(),
        Err(e) => {
            tracing::warn!("{e}, falling back to `{default}`");
            default.into()
        }
    }
}

fn parse_env(raw: Option<&str>) -> Env {
    match raw {
        Some("dev") => Env::Dev,
        Some("staging") => Env::Staging,
        Some("production") => Env::Production,
        _ => Env::Dev,
    }
}

/// The deployment environment named by `ENVIRONMENT`, `dev` when unset.
pub fn env_from_var() -> Env {
    parse_env(var("ENVIRONMENT").ok().flatten().as_deref())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

impl ServerConfig {
    pub fn new_from_env() -> Self {
        let listen_addr = var_or("LISTEN_ADDR", DEFAULT_LISTEN_ADDR);
        let listen_addr = match listen_addr.parse() {
            Ok(addr) => addr,
            Err(e) => {
                tracing::error!("`LISTEN_ADDR` is not a socket address ({listen_addr}): {e}");
                std::process::exit(1)
            }
        };

        ServerConfig {
            database_url: required_var("DATABASE_URL"),
            listen_addr,
            cors_allowed_origins: parse_origins(&var_or(
                "CORS_ALLOWED_ORIGINS",
                DEFAULT_CORS_ORIGINS,
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_env_defaults_to_dev() {
        assert_eq!(parse_env(None), Env::Dev);
        assert_eq!(parse_env(Some("qa")), Env::Dev);
        assert_eq!(parse_env(Some("production")), Env::Production);
        assert_eq!(parse_env(Some("staging")), Env::Staging);
    }

    #[test]
    fn test_parse_origins_trims_and_skips_empty() {
        assert_eq!(
            parse_origins(" http://a.test, ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_default_origins_are_the_dev_frontends() {
        assert_eq!(
            parse_origins(DEFAULT_CORS_ORIGINS),
            vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string()
            ]
        );
    }

    #[test]
    fn test_default_listen_addr_parses() {
        assert!(DEFAULT_LISTEN_ADDR.parse::<SocketAddr>().is_ok());
    }
}
