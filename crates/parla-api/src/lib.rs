pub mod config;
pub mod deck;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod review;
pub mod router;
pub mod state;
pub mod tracing;
pub mod v1;

pub use config::ApiConfig;
pub use state::ApiState;
