use std::{path::PathBuf, time::Duration};

use url::Url;

pub const DEFAULT_ENGINE_URL: &str = "http://127.0.0.1:8551";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Idle pooled connections are dropped after this long.
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone)]
pub struct ExecutionEngineConfig {
    pub engine_url: Url,
    pub jwt_secret_path: PathBuf,
    pub request_timeout: Duration,
}

impl ExecutionEngineConfig {
    pub fn new(engine_url: Url, jwt_secret_path: PathBuf) -> Self {
        Self {
            engine_url,
            jwt_secret_path,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}
