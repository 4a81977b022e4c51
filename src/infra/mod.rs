// Infrastructure adapters implementing app::ports

pub mod error_reporter;
pub mod legacy_http;
pub mod register_http;

pub use error_reporter::TracingErrorReporter;
pub use legacy_http::HttpLegacySource;
pub use register_http::HttpRegisterSink;
