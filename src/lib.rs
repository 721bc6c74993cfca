pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod observability;
pub mod output;
pub mod report;
pub mod types;
pub mod util;
