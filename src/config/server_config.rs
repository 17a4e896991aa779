//! HTTP server configuration parsing from environment variables.

/// Server environment configuration
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub port: u16,
    pub bind_address: String,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "0.0.0.0".to_string(),
        }
    }
}

impl ServerEnvConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            port: lookup("SERVER_PORT")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8000),
            bind_address: lookup("SERVER_BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string()),
        }
    }

    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
