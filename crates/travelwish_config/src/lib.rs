use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;

pub mod models;
pub use models::*;

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures the dotenv file is loaded into the environment exactly once.
pub fn ensure_dotenv_loaded() {
    INIT_DOTENV.get_or_init(|| {
        let _ = dotenv::dotenv();
    });
}

/// Loads the application configuration.
///
/// Sources, later ones overriding earlier ones:
/// 1. `config/default` (any format the `config` crate understands)
/// 2. `config/{RUN_ENV}` (RUN_ENV defaults to `debug`)
/// 3. Environment variables with the `TW` prefix and `__` separator,
///    e.g. `TW__SERVER__PORT=8086`.
///
/// Secrets (gateway secret key, mail relay key) are never part of the config
/// tree; feature crates read them directly from the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "TW".to_string());

    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", run_env)).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_deserializes_with_defaults() {
        let cfg: AppConfig = serde_json::from_value(serde_json::json!({
            "server": { "host": "127.0.0.1", "port": 8086 }
        }))
        .unwrap();
        assert!(!cfg.development);
        assert!(!cfg.use_payments);
        assert!(cfg.database.is_none());
        assert!(cfg.gateway.is_none());
    }

    #[test]
    fn feature_sections_are_optional_and_partial() {
        let cfg: AppConfig = serde_json::from_value(serde_json::json!({
            "server": { "host": "0.0.0.0", "port": 80 },
            "use_payments": true,
            "gateway": { "default_currency": "lkr" },
            "notify": { "feed_capacity": 50 }
        }))
        .unwrap();
        assert!(cfg.use_payments);
        let gateway = cfg.gateway.unwrap();
        assert_eq!(gateway.default_currency.as_deref(), Some("lkr"));
        assert!(gateway.api_base_url.is_none());
        assert_eq!(cfg.notify.unwrap().feed_capacity, Some(50));
    }
}
