//! SEP payment gateway integration module
//!
//! Token issuance, verification and reversal against the SEP online payment
//! gateway, with the gateway's error and result code catalogs.

pub mod codes;
pub mod errors;
pub mod providers;
pub mod traits;
pub mod transport;
pub mod types;
