use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub channels_path: PathBuf,
    /// Remote benchmark source; benchmark refresh is skipped when unset.
    pub benchmark_source_url: Option<String>,
    pub benchmark_api_key: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub benchmark_timeout_secs: u64,
    pub social_scan_timeout_ms: u64,
    pub http_user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("channels_path", &self.channels_path)
            .field("database_url", &"[redacted]")
            .field("benchmark_source_url", &self.benchmark_source_url)
            .field(
                "benchmark_api_key",
                &self.benchmark_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("benchmark_timeout_secs", &self.benchmark_timeout_secs)
            .field("social_scan_timeout_ms", &self.social_scan_timeout_ms)
            .field("http_user_agent", &self.http_user_agent)
            .finish()
    }
}
