use reqwest::Client;
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates an HTTP client whose whole request is bounded by `timeout`.
    ///
    /// No retry middleware: every upstream call is a single attempt.
    pub fn create_client(timeout: Duration) -> Client {
        let connect_timeout = timeout.min(Duration::from_secs(10));

        Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(concat!("pricecast/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}
