pub mod price_sample;

pub use price_sample::PriceSample;
