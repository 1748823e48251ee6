//! Payment gateway implementations
//!
//! Concrete implementations of the PaymentGateway trait.

pub mod sep;

pub use sep::SepClient;
