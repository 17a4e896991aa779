pub mod price_fetcher;
pub mod sampler;

pub use price_fetcher::{PriceFetcher, PriceQuote};
pub use sampler::PriceSampler;
