pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;

// Domain data shapes shared across layers
pub mod domain;

// The legacy record transformation engine
pub mod transform;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;
