use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Application-level constants
pub const APP_NAME: &str = "Salud Vital";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory under the platform data dir holding the database.
const DATA_DIR_NAME: &str = "SaludVital";
const DB_FILE_NAME: &str = "salud_vital.db";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,salud_vital=debug,tower_http=info"
}

/// Get the application data directory
/// `{data_dir}/SaludVital`, falling back to the working directory.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

pub fn default_db_path() -> PathBuf {
    app_data_dir().join(DB_FILE_NAME)
}

/// Server settings, from flags with environment fallback.
#[derive(Debug, Clone, Parser)]
#[command(name = "salud-vital", version, about = "Clinic records service")]
pub struct ServerConfig {
    /// SQLite database file
    #[arg(long, env = "SALUD_VITAL_DB")]
    pub db: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "SALUD_VITAL_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Debug mode (verbose logs, permissive CORS unless overridden)
    #[arg(
        long,
        env = "SALUD_VITAL_DEBUG",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub debug: bool,

    /// Allow cross-origin requests from any origin (defaults to `debug`)
    #[arg(long, env = "SALUD_VITAL_CORS_ALLOW_ALL", action = clap::ArgAction::Set)]
    pub cors_allow_all: Option<bool>,
}

impl ServerConfig {
    pub fn db_path(&self) -> PathBuf {
        self.db.clone().unwrap_or_else(default_db_path)
    }

    pub fn cors_allow_all(&self) -> bool {
        self.cors_allow_all.unwrap_or(self.debug)
    }

    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            default_log_filter()
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV_VARS: [&str; 4] = [
        "SALUD_VITAL_DB",
        "SALUD_VITAL_BIND",
        "SALUD_VITAL_DEBUG",
        "SALUD_VITAL_CORS_ALLOW_ALL",
    ];

    /// Parse flags only; exported variables or a loaded `.env` must not leak in.
    fn parse(args: &[&str]) -> ServerConfig {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
        ServerConfig::try_parse_from(std::iter::once("salud-vital").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn db_path_under_app_data() {
        let path = default_db_path();
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with("SaludVital/salud_vital.db"));
    }

    #[test]
    fn defaults_when_no_flags() {
        let config = parse(&[]);
        assert_eq!(config.bind, "127.0.0.1:8000".parse().unwrap());
        assert!(config.debug);
        assert!(config.cors_allow_all());
    }

    #[test]
    fn cors_follows_debug_unless_set() {
        let config = parse(&["--debug", "false"]);
        assert!(!config.cors_allow_all());
        assert_eq!(config.log_filter(), "info");

        let config = parse(&["--debug", "false", "--cors-allow-all", "true"]);
        assert!(config.cors_allow_all());
    }

    #[test]
    fn explicit_db_overrides_default() {
        let config = parse(&["--db", "/tmp/clinic.db"]);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/clinic.db"));
    }

    #[test]
    fn app_name_is_salud_vital() {
        assert_eq!(APP_NAME, "Salud Vital");
    }
}
