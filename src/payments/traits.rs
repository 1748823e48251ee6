//! Payment gateway trait definitions
//!
//! `PaymentGateway` is the surface callers program against; `GatewayTransport`
//! is the seam between the client and the HTTP stack.

use crate::payments::errors::{SepResult, TransportError};
use crate::payments::types::{TokenResult, VerifyResult};
use async_trait::async_trait;

/// Posts JSON bodies to the gateway.
///
/// Implementations own the base URL, connection handling and timeouts. They
/// must not retry on their own; a failed exchange is reported as a
/// [`TransportError`].
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// Post `body` to `path` (relative to the gateway base URL).
    ///
    /// # Returns
    /// * `Ok(Some(value))` - 2xx reply with a JSON body
    /// * `Ok(None)` - 2xx reply with an empty body
    /// * `Err(_)` - the exchange failed or the reply was not JSON
    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Option<serde_json::Value>, TransportError>;
}

/// Operations offered by the SEP payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Request a payment token for redirecting the payer to the hosted page.
    ///
    /// # Arguments
    /// * `amount` - Amount in Rials, must be positive
    /// * `res_num` - Merchant reservation number, unique per transaction
    /// * `redirect_url` - Absolute URL the payer returns to
    /// * `cell_number` - Optional payer mobile number
    async fn request_token(
        &self,
        amount: u64,
        res_num: &str,
        redirect_url: &str,
        cell_number: Option<&str>,
    ) -> SepResult<TokenResult>;

    /// Confirm a payment the payer completed on the hosted page.
    async fn verify_transaction(&self, ref_num: &str) -> SepResult<VerifyResult>;

    /// Reverse (refund) a previously verified payment.
    ///
    /// A reversal that the gateway accepted cannot be undone; callers must not
    /// treat retrying a reversal like retrying a verification.
    async fn reverse_transaction(&self, ref_num: &str) -> SepResult<VerifyResult>;

    /// URL of the hosted payment page for `token`.
    fn redirect_url(&self, token: &str) -> String;
}
