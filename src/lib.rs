//! Client adapter for the SEP (Saman Electronic Payment) bank gateway.
//!
//! [`SepClient`] issues payment tokens, verifies completed payments and
//! reverses them. Every failure the gateway reports comes back as a single
//! [`GatewayError`] carrying the gateway's code and description, with the
//! documented catalog entry attached when the code is known.

pub mod config;
pub mod payments;

pub use config::SepConfig;
pub use payments::codes::{
    lookup_error_code, lookup_error_name, lookup_result_code, ErrorCodeEntry, ResultCodeEntry,
};
pub use payments::errors::{CatalogEntry, GatewayError, SepError, SepResult, TransportError};
pub use payments::providers::SepClient;
pub use payments::traits::{GatewayTransport, PaymentGateway};
pub use payments::transport::HttpTransport;
pub use payments::types::{TokenResult, TransactionDetail, VerifyResult};
