pub mod pool;
pub mod provision;

pub use pool::{connect, health_check, PoolError};
