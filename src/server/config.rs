use super::RequestsLoggingLevel;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    /// Enables the Content-Security-Policy header.
    pub production: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            content_cache_age_sec: 3600,
            production: false,
        }
    }
}
