use std::path::PathBuf;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3001";
pub const DEFAULT_LOG_SPEC: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub default_server_url: String,
    pub db_path: PathBuf,
    pub log_spec: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let default_server_url = non_empty("CONTEXTOS_API_URL")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let db_path = non_empty("CONTEXTOS_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let home_dir = lookup("HOME").unwrap_or_else(|| ".".to_string());
                PathBuf::from(home_dir).join(".contextos.db")
            });

        let log_spec = non_empty("CONTEXTOS_LOG").unwrap_or_else(|| DEFAULT_LOG_SPEC.to_string());

        Self {
            default_server_url,
            db_path,
            log_spec,
        }
    }
}
