//! SEP (Saman Electronic Payment) gateway client
//!
//! Issues payment tokens, verifies completed payments and reverses them
//! through the SEP online payment gateway on the Shaparak network. Every
//! gateway-reported failure is returned as a [`GatewayError`]; transport
//! failures are passed through untouched.

use crate::config::SepConfig;
use crate::payments::codes::SettlementOperation;
use crate::payments::errors::{GatewayError, SepError, SepResult, TransportError, UNKNOWN_CODE};
use crate::payments::traits::{GatewayTransport, PaymentGateway};
use crate::payments::transport::HttpTransport;
use crate::payments::types::{
    SettlementOutcome, SettlementRequest, TokenOutcome, TokenRequest, TokenResponse, TokenResult,
    VerifyResponse, VerifyResult,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info, warn};

pub const TOKEN_PATH: &str = "/onlinepg/onlinepg";
pub const VERIFY_PATH: &str = "/verifyTxnRandomSessionkey/ipg/VerifyTransaction";
pub const REVERSE_PATH: &str = "/verifyTxnRandomSessionkey/ipg/ReverseTransaction";

const TOKEN_FAILED_DESCRIPTION: &str = "Token request failed";

impl SettlementOperation {
    fn path(&self) -> &'static str {
        match self {
            Self::Verify => VERIFY_PATH,
            Self::Reverse => REVERSE_PATH,
        }
    }

    fn failure_description(&self) -> &'static str {
        match self {
            Self::Verify => "Verification failed",
            Self::Reverse => "Reverse failed",
        }
    }
}

/// SEP gateway client
pub struct SepClient<T = HttpTransport> {
    config: SepConfig,
    transport: T,
}

impl SepClient<HttpTransport> {
    /// Create a client talking HTTP to `config.base_url`.
    pub fn new(config: SepConfig) -> SepResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;

        info!(
            "SEP client initialized for terminal {} with URL: {}",
            config.terminal_id, config.base_url
        );

        Ok(Self { config, transport })
    }

    /// Create client from environment variables
    pub fn from_env() -> SepResult<Self> {
        Self::new(SepConfig::from_env()?)
    }
}

impl<T: GatewayTransport> SepClient<T> {
    /// Client over a caller-supplied transport. `config` is not validated
    /// here; verify and reverse still check the terminal number per call.
    pub fn with_transport(config: SepConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Settings this client was built with.
    pub fn config(&self) -> &SepConfig {
        &self.config
    }

    /// Request a payment token. See [`PaymentGateway::request_token`].
    pub async fn request_token(
        &self,
        amount: u64,
        res_num: &str,
        redirect_url: &str,
        cell_number: Option<&str>,
    ) -> SepResult<TokenResult> {
        validate_token_params(amount, res_num, redirect_url)?;

        info!("Requesting SEP token: amount={} res_num={}", amount, res_num);

        let request = TokenRequest::new(
            self.config.terminal_id.clone(),
            amount,
            res_num,
            redirect_url,
            cell_number.map(str::to_string),
        );

        let response: TokenResponse = match self.call(TOKEN_PATH, &request).await? {
            Some(response) => response,
            None => {
                error!("SEP token request returned no response: res_num={}", res_num);
                return Err(GatewayError::no_response().into());
            }
        };

        match response.into_outcome() {
            TokenOutcome::Issued { token } => {
                info!("SEP token issued: res_num={}", res_num);
                Ok(TokenResult { token })
            }
            TokenOutcome::Rejected {
                error_code,
                error_desc,
            } => {
                let err = GatewayError::from_error_code(
                    error_code.unwrap_or_else(|| UNKNOWN_CODE.to_string()),
                    error_desc.unwrap_or_else(|| TOKEN_FAILED_DESCRIPTION.to_string()),
                );
                error!("SEP Gateway error: code={}, desc={}", err.code, err.description);
                Err(err.into())
            }
        }
    }

    /// Hosted payment page URL for `token`.
    pub fn redirect_url(&self, token: &str) -> String {
        format!(
            "{}/OnlinePG/SendToken?token={}",
            self.config.base_url.trim_end_matches('/'),
            token
        )
    }

    /// Verify a completed payment by its gateway reference number.
    pub async fn verify_transaction(&self, ref_num: &str) -> SepResult<VerifyResult> {
        self.settle(SettlementOperation::Verify, ref_num).await
    }

    /// Reverse a verified payment by its gateway reference number.
    pub async fn reverse_transaction(&self, ref_num: &str) -> SepResult<VerifyResult> {
        self.settle(SettlementOperation::Reverse, ref_num).await
    }

    async fn settle(&self, operation: SettlementOperation, ref_num: &str) -> SepResult<VerifyResult> {
        let terminal_number = self.config.terminal_number()?;
        if ref_num.trim().is_empty() {
            return Err(SepError::invalid_request("reference number cannot be empty"));
        }

        info!("SEP {} transaction: ref_num={}", operation, ref_num);

        let request = SettlementRequest::new(ref_num, terminal_number);
        let response: VerifyResponse = match self.call(operation.path(), &request).await? {
            Some(response) => response,
            None => {
                error!("SEP {} returned no response: ref_num={}", operation, ref_num);
                return Err(GatewayError::no_response().into());
            }
        };

        match response.into_outcome() {
            SettlementOutcome::Settled(result) => {
                match &result.transaction_detail {
                    Some(detail) => info!(
                        "SEP {} succeeded: ref_num={}, rrn={}, amount={}",
                        operation,
                        ref_num,
                        detail.rrn.as_deref().unwrap_or("-"),
                        detail
                            .affective_amount
                            .map(|a| a.to_string())
                            .unwrap_or_else(|| "-".to_string())
                    ),
                    None => warn!(
                        "SEP {} succeeded without transaction detail: ref_num={}",
                        operation, ref_num
                    ),
                }
                Ok(result)
            }
            SettlementOutcome::Failed {
                result_code,
                result_description,
            } => {
                let err = GatewayError::from_result_code(
                    result_code,
                    result_description
                        .unwrap_or_else(|| operation.failure_description().to_string()),
                );
                if let Some(entry) = err.result_code_entry() {
                    if !entry.applies_to(operation) {
                        warn!(
                            "SEP {} returned result code {} documented for another operation",
                            operation, entry.code
                        );
                    }
                }
                error!("SEP {} error: code={}, desc={}", operation, err.code, err.description);
                Err(err.into())
            }
        }
    }

    /// Post `body` and decode the reply. `None` means the gateway sent nothing.
    async fn call<B, R>(&self, path: &str, body: &B) -> SepResult<Option<R>>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(TransportError::from)?;
        match self.transport.post(path, body).await? {
            Some(value) => {
                let response = serde_json::from_value(value).map_err(|e| {
                    error!("Failed to parse SEP response from {}: {}", path, e);
                    TransportError::from(e)
                })?;
                Ok(Some(response))
            }
            None => Ok(None),
        }
    }
}

fn validate_token_params(amount: u64, res_num: &str, redirect_url: &str) -> SepResult<()> {
    if amount == 0 {
        return Err(SepError::invalid_request("amount must be greater than 0"));
    }
    if res_num.trim().is_empty() {
        return Err(SepError::invalid_request("reservation number cannot be empty"));
    }
    let url = reqwest::Url::parse(redirect_url).map_err(|e| {
        SepError::invalid_request(format!("redirect URL is not valid ({}): {}", e, redirect_url))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SepError::invalid_request(format!(
            "redirect URL must be http or https, got {}",
            url.scheme()
        )));
    }
    Ok(())
}

#[async_trait]
impl<T: GatewayTransport> PaymentGateway for SepClient<T> {
    async fn request_token(
        &self,
        amount: u64,
        res_num: &str,
        redirect_url: &str,
        cell_number: Option<&str>,
    ) -> SepResult<TokenResult> {
        SepClient::request_token(self, amount, res_num, redirect_url, cell_number).await
    }

    async fn verify_transaction(&self, ref_num: &str) -> SepResult<VerifyResult> {
        SepClient::verify_transaction(self, ref_num).await
    }

    async fn reverse_transaction(&self, ref_num: &str) -> SepResult<VerifyResult> {
        SepClient::reverse_transaction(self, ref_num).await
    }

    fn redirect_url(&self, token: &str) -> String {
        SepClient::redirect_url(self, token)
    }
}
