use async_graphql::ServerError as GraphQLError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while starting or running the listener.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: hyper::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] hyper::Error),

    #[error("failed to install Prometheus recorder: {0}")]
    Metrics(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("failed to create log directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open log file: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),
}

/// Per-request failures that happen before the query reaches the executor.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Must provide query string.")]
    MissingQuery,

    #[error("Variables are invalid: {0}")]
    InvalidVariables(String),

    #[error("POST body sent invalid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("POST body is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    #[error("Invalid query string: {0}")]
    InvalidQueryString(String),

    #[error("Unsupported content-type \"{0}\".")]
    UnsupportedMediaType(String),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Body of every non-200 GraphQL response: `{"errors": [...]}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub errors: Vec<GraphQLError>,
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            errors: vec![GraphQLError::new(self.to_string(), None)],
        };
        (self.status(), Json(body)).into_response()
    }
}

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("iteration {iteration} returned errors: {message}")]
    Execution { iteration: u64, message: String },
}

pub type Result<T> = std::result::Result<T, ServerError>;
