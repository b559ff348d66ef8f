mod http_cache;
mod requests_logging;
mod security_headers;

pub use http_cache::http_cache;
pub use requests_logging::{log_requests, RequestsLoggingLevel};
pub use security_headers::security_headers;
