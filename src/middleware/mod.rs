pub mod auth;
pub mod metrics;
pub mod security_headers;

pub use auth::AuthMiddleware;
pub use metrics::RequestMetrics;
pub use security_headers::SecurityHeaders;
