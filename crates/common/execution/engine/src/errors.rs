use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Bad or missing JWT secret, or an execution engine that cannot be used at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection refused, timeout, DNS failure and friends.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Engine returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("engine API does not support method '{0}'")]
    Capability(String),

    #[error("Could not encode jwt token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}
