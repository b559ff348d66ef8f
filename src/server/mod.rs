pub mod config;
mod download_routes;
mod error;
mod http_layers;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::*;
pub use server::{bind_first_available, make_app, run_server};
