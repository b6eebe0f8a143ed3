pub mod config;
pub mod error;
pub mod graphql;
pub mod logging;
pub mod metrics;
pub mod server;
