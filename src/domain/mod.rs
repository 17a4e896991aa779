// Domain-specific error types
pub mod errors;

// Price observations
pub mod market;

// Features, algorithms and model outputs
pub mod ml;

// Port interfaces
pub mod ports;
