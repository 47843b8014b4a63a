use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};
pub mod models;
pub use models::*;

/// Marker value that is replaced with the matching environment variable.
pub const SECRET_FROM_ENV: &str = "secret_from_env";

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "COURTBOOK";

/// Loads the application configuration.
///
/// Sources, later ones overriding earlier ones:
/// 1. `config/default` (any format the `config` crate understands)
/// 2. `config/{RUN_ENV}`, where `RUN_ENV` defaults to `debug`
/// 3. environment variables such as `COURTBOOK__SERVER__PORT=9000`
///
/// The config directory can be moved with `COURTBOOK_CONFIG_DIR`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string());
    let config_dir =
        PathBuf::from(env::var("COURTBOOK_CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    debug!(
        "Loading config from {} and {}",
        default_path.display(),
        env_path.display()
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all "secret_from_env" string values with environment variable values
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_FROM_ENV => {
                let env_key = path.join("_").to_uppercase();
                if let Ok(env_val) = env::var(&env_key) {
                    *obj = Value::String(env_val);
                } else {
                    warn!("env var {} not found for {}", env_key, SECRET_FROM_ENV);
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, once.
///
/// The path comes from `DOTENV_OVERRIDE`, then from the first command line
/// argument if it starts with `.env`, and falls back to `.env`.
/// Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_secret_marker_is_replaced_from_env() {
        env::set_var("COURTBOOK_TEST_SECRET", "sqlite::memory:");
        let mut value = json!({
            "courtbook": { "test": { "secret": "secret_from_env" } },
            "server": { "host": "127.0.0.1", "port": 8000 }
        });

        inject_env_secrets(&mut value);

        assert_eq!(value["courtbook"]["test"]["secret"], "sqlite::memory:");
        assert_eq!(value["server"]["host"], "127.0.0.1");
    }

    #[test]
    fn test_missing_secret_leaves_marker() {
        env::remove_var("COURTBOOK_MISSING_VALUE");
        let mut value = json!({ "courtbook": { "missing": { "value": "secret_from_env" } } });

        inject_env_secrets(&mut value);

        assert_eq!(value["courtbook"]["missing"]["value"], SECRET_FROM_ENV);
    }

    #[test]
    fn test_database_url_marker_reads_database_url() {
        env::set_var("DATABASE_URL", "sqlite://tmp/test.db");
        let config = AppConfig {
            database: Some(DatabaseConfig {
                url: SECRET_FROM_ENV.to_string(),
                max_connections: Some(2),
            }),
            ..AppConfig::default()
        };

        let config = apply_env_overrides_from_marker(config).unwrap();

        let database = config.database.unwrap();
        assert_eq!(database.url, "sqlite://tmp/test.db");
        assert_eq!(database.max_connections, Some(2));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert!(config.database.is_none());
        assert_eq!(
            DatabaseConfig::default().url,
            "sqlite://data/courtbook.db".to_string()
        );
    }
}
