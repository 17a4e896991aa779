use crate::domain::errors::PriceSourceError;
use crate::domain::ports::PriceSource;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-process price source returning scripted results.
///
/// Scripted results are served in order; once the script is exhausted every
/// further call returns `then`.
pub struct MockPriceSource {
    script: Mutex<VecDeque<Result<f64, PriceSourceError>>>,
    then: Result<f64, PriceSourceError>,
    calls: AtomicUsize,
}

impl MockPriceSource {
    pub fn fixed(price: f64) -> Self {
        Self::scripted(Vec::new(), Ok(price))
    }

    pub fn failing() -> Self {
        Self::scripted(
            Vec::new(),
            Err(PriceSourceError::unavailable("mock", "connection refused")),
        )
    }

    pub fn scripted(
        script: Vec<Result<f64, PriceSourceError>>,
        then: Result<f64, PriceSourceError>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            then,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn fetch_price(&self) -> Result<f64, PriceSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = match self.script.lock() {
            Ok(mut script) => script.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        next.unwrap_or_else(|| self.then.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
