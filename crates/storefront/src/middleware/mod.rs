//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with an empty `request_id` field)
//! 3. Request ID (fills the span field, tags Sentry, echoes the header)
//! 4. CSP nonce (generate per-request nonce for the inline script)
//! 5. Security headers (CSP using the nonce, frame and referrer policy)
//! 6. Rate limiting on cart and order routes (governor)

pub mod csp;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use rate_limit::mutation_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
