pub mod core;
pub mod factory;
pub mod mock;
pub mod persistence;
pub mod price_sources;

pub use factory::ServiceFactory;
pub use persistence::ModelStore;
