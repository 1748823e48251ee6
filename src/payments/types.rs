//! SEP gateway wire models
//!
//! Request and response bodies for token issuance, verify and reverse. Field
//! names on the wire are the gateway's own and must not be changed.

use crate::payments::codes::{lookup_error_code, lookup_error_name, ErrorCodeEntry};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Action discriminator for token requests.
pub const TOKEN_ACTION: &str = "token";

/// Body of a token request (`POST /onlinepg/onlinepg`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    /// Always "token"
    pub action: String,
    /// Merchant terminal identifier assigned by the bank
    #[serde(rename = "TerminalId")]
    pub terminal_id: String,
    /// Amount in Rials
    #[serde(rename = "Amount")]
    pub amount: u64,
    /// Merchant reservation number, unique per transaction
    #[serde(rename = "ResNum")]
    pub res_num: String,
    /// Where the payer lands after the hosted payment page
    #[serde(rename = "RedirectUrl")]
    pub redirect_url: String,
    /// Payer mobile number (e.g. "9120000000")
    #[serde(rename = "CellNumber", default, skip_serializing_if = "Option::is_none")]
    pub cell_number: Option<String>,
}

impl TokenRequest {
    /// Builds a token request with the `action` discriminator filled in.
    pub fn new(
        terminal_id: impl Into<String>,
        amount: u64,
        res_num: impl Into<String>,
        redirect_url: impl Into<String>,
        cell_number: Option<String>,
    ) -> Self {
        Self {
            action: TOKEN_ACTION.to_string(),
            terminal_id: terminal_id.into(),
            amount,
            res_num: res_num.into(),
            redirect_url: redirect_url.into(),
            cell_number,
        }
    }
}

/// Token response.
///
/// `status == 1` carries a token; anything else (usually -1) carries
/// `errorCode` and `errorDesc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "errorCode", default)]
    pub error_code: Option<String>,
    #[serde(rename = "errorDesc", default)]
    pub error_desc: Option<String>,
}

/// What a [`TokenResponse`] says happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    Issued {
        token: String,
    },
    Rejected {
        error_code: Option<String>,
        error_desc: Option<String>,
    },
}

impl TokenResponse {
    /// The gateway issued a token (`status == 1`).
    pub fn is_success(&self) -> bool {
        self.status == Some(1)
    }

    /// A successful status with no token is reported as a rejection with no
    /// code, since there is nothing to redirect the payer with.
    pub fn into_outcome(self) -> TokenOutcome {
        match (self.is_success(), self.token) {
            (true, Some(token)) => TokenOutcome::Issued { token },
            _ => TokenOutcome::Rejected {
                error_code: self.error_code,
                error_desc: self.error_desc,
            },
        }
    }
}

/// Result of a successful token request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResult {
    pub token: String,
}

/// Body of a verify or reverse request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// Gateway reference number from the payment callback
    #[serde(rename = "RefNum")]
    pub ref_num: String,
    #[serde(rename = "TerminalNumber")]
    pub terminal_number: i64,
}

impl SettlementRequest {
    pub fn new(ref_num: impl Into<String>, terminal_number: i64) -> Self {
        Self {
            ref_num: ref_num.into(),
            terminal_number,
        }
    }
}

/// Transaction data returned by a successful verify or reverse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetail {
    /// Retrieval reference number from the bank
    #[serde(rename = "RRN", default)]
    pub rrn: Option<String>,
    #[serde(rename = "RefNum", default)]
    pub ref_num: Option<String>,
    /// Masked card number (e.g. "621986****8080")
    #[serde(rename = "MaskedPan", default)]
    pub masked_pan: Option<String>,
    #[serde(rename = "HashedPan", default)]
    pub hashed_pan: Option<String>,
    #[serde(rename = "TerminalNumber", default)]
    pub terminal_number: Option<i64>,
    // The gateway spells it this way.
    #[serde(rename = "OrginalAmount", default)]
    pub original_amount: Option<u64>,
    #[serde(rename = "AffectiveAmount", default)]
    pub affective_amount: Option<u64>,
    /// e.g. "2019-09-16 18:11:06"
    #[serde(rename = "StraceDate", default)]
    pub strace_date: Option<String>,
    #[serde(rename = "StraceNo", default)]
    pub strace_no: Option<String>,
}

impl TransactionDetail {
    /// Parses `StraceDate`. Returns `None` when absent or in an unknown format.
    pub fn trace_date(&self) -> Option<NaiveDateTime> {
        let raw = self.strace_date.as_deref()?.trim();
        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    }
}

/// Verify / reverse response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    #[serde(rename = "TransactionDetail", default)]
    pub transaction_detail: Option<TransactionDetail>,
    #[serde(rename = "ResultCode", default)]
    pub result_code: Option<i32>,
    #[serde(rename = "ResultDescription", default)]
    pub result_description: Option<String>,
    #[serde(rename = "Success", default)]
    pub success: Option<bool>,
}

/// What a [`VerifyResponse`] says happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    Settled(VerifyResult),
    Failed {
        result_code: Option<i32>,
        result_description: Option<String>,
    },
}

impl VerifyResponse {
    /// Both the flag and the result code must agree.
    pub fn is_success(&self) -> bool {
        self.success == Some(true) && self.result_code == Some(0)
    }

    /// A failure keeps the raw code and description for the caller to resolve.
    pub fn into_outcome(self) -> SettlementOutcome {
        if self.is_success() {
            SettlementOutcome::Settled(VerifyResult {
                result_description: self.result_description,
                transaction_detail: self.transaction_detail,
            })
        } else {
            SettlementOutcome::Failed {
                result_code: self.result_code,
                result_description: self.result_description,
            }
        }
    }
}

/// Result of a successful verify or reverse. The result code is always 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResult {
    pub result_description: Option<String>,
    pub transaction_detail: Option<TransactionDetail>,
}

/// Payload the gateway posts to the merchant's redirect URL when the payer
/// leaves the payment page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCallback {
    /// Merchant ID
    #[serde(rename = "MID", default)]
    pub mid: Option<i64>,
    #[serde(rename = "TerminalId", default)]
    pub terminal_id: Option<i64>,
    /// e.g. "OK", "Failed", "CanceledByUser"
    #[serde(rename = "State", default)]
    pub state: Option<String>,
    /// 2 = OK, 3 = Failed, ...
    #[serde(rename = "Status", default)]
    pub status: Option<i32>,
    #[serde(rename = "RRN", default)]
    pub rrn: Option<i64>,
    #[serde(rename = "RefNum", default)]
    pub ref_num: Option<String>,
    #[serde(rename = "ResNum", default)]
    pub res_num: Option<String>,
    #[serde(rename = "TraceNo", default)]
    pub trace_no: Option<i64>,
    #[serde(rename = "Amount", default)]
    pub amount: Option<u64>,
    #[serde(rename = "Wage", default)]
    pub wage: Option<u64>,
    #[serde(rename = "SecurePan", default)]
    pub secure_pan: Option<String>,
    #[serde(rename = "HashedCardNumber", default)]
    pub hashed_card_number: Option<String>,
}

impl PaymentCallback {
    /// The payer completed the payment (`Status == 2`).
    pub fn is_success(&self) -> bool {
        self.status == Some(OK_STATUS)
    }

    /// Catalog entry for the callback.
    ///
    /// Resolves `Status` first. Cancellation has no numeric code ("-"), so
    /// `State` is matched against the entry names when the status does not
    /// resolve.
    pub fn status_entry(&self) -> Option<&'static ErrorCodeEntry> {
        self.status
            .and_then(|status| lookup_error_code(&status.to_string()))
            .or_else(|| self.state.as_deref().and_then(lookup_error_name))
    }
}

const OK_STATUS: i32 = 2;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::codes::{
        lookup_result_code, CANCELED_BY_USER, FAILED, INVALID_PARAMETERS, OK, TRANSACTION_NOT_FOUND,
    };
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_token_request_wire_format() {
        let request = TokenRequest::new("134754", 10000, "RN1", "https://merchant/return", None);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "action": "token",
                "TerminalId": "134754",
                "Amount": 10000,
                "ResNum": "RN1",
                "RedirectUrl": "https://merchant/return",
            })
        );

        let request = TokenRequest::new(
            "134754",
            10000,
            "RN1",
            "https://merchant/return",
            Some("9120000000".to_string()),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["CellNumber"], "9120000000");
    }

    #[test]
    fn test_token_response_success() {
        let response: TokenResponse =
            serde_json::from_value(json!({"status": 1, "token": "ABC123"})).unwrap();
        assert!(response.is_success());
        assert_eq!(
            response.into_outcome(),
            TokenOutcome::Issued {
                token: "ABC123".to_string()
            }
        );
    }

    #[test]
    fn test_token_response_failure() {
        let response: TokenResponse = serde_json::from_value(json!({
            "status": -1,
            "errorCode": "5",
            "errorDesc": "پارامترهای ارسالی نامعتبر است"
        }))
        .unwrap();
        assert!(!response.is_success());
        assert_eq!(
            response.error_code.as_deref().and_then(lookup_error_code),
            Some(&INVALID_PARAMETERS)
        );
        assert_eq!(
            response.into_outcome(),
            TokenOutcome::Rejected {
                error_code: Some("5".to_string()),
                error_desc: Some("پارامترهای ارسالی نامعتبر است".to_string()),
            }
        );
    }

    #[test]
    fn test_token_response_status_other_than_one_fails() {
        for status in [0, 2, -1, 100] {
            let response = TokenResponse {
                status: Some(status),
                token: Some("ABC".to_string()),
                ..Default::default()
            };
            assert!(!response.is_success(), "status {} must not succeed", status);
        }
        assert!(!TokenResponse::default().is_success());
    }

    #[test]
    fn test_token_response_success_without_token_is_rejected() {
        let response = TokenResponse {
            status: Some(1),
            ..Default::default()
        };
        assert!(matches!(
            response.into_outcome(),
            TokenOutcome::Rejected {
                error_code: None,
                ..
            }
        ));
    }

    #[test]
    fn test_settlement_request_wire_format() {
        let value = serde_json::to_value(SettlementRequest::new("R1", 134754)).unwrap();
        assert_eq!(value, json!({"RefNum": "R1", "TerminalNumber": 134754}));
    }

    #[test]
    fn test_verify_response_success_with_detail() {
        let response: VerifyResponse = serde_json::from_value(json!({
            "TransactionDetail": {
                "RRN": "14226761817",
                "RefNum": "50",
                "MaskedPan": "621986****8080",
                "HashedPan": "b9b2ea2b2d5e0b6a",
                "TerminalNumber": 2015,
                "OrginalAmount": 1000,
                "AffectiveAmount": 1000,
                "StraceDate": "2019-09-16 18:11:06",
                "StraceNo": "100428"
            },
            "ResultCode": 0,
            "ResultDescription": "عملیات با موفقیت انجام شد",
            "Success": true
        }))
        .unwrap();

        assert!(response.is_success());
        let detail = response.transaction_detail.clone().unwrap();
        assert_eq!(detail.original_amount, Some(1000));
        assert_eq!(detail.masked_pan.as_deref(), Some("621986****8080"));

        match response.into_outcome() {
            SettlementOutcome::Settled(result) => {
                assert_eq!(result.transaction_detail, Some(detail));
            }
            other => panic!("expected settled outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_response_requires_flag_and_code() {
        let cases = [
            (Some(true), Some(0), true),
            (Some(true), Some(2), false),
            (Some(false), Some(0), false),
            (None, Some(0), false),
            (Some(true), None, false),
            (None, None, false),
        ];
        for (success, result_code, expected) in cases {
            let response = VerifyResponse {
                success,
                result_code,
                ..Default::default()
            };
            assert_eq!(response.is_success(), expected, "{:?}/{:?}", success, result_code);
        }
    }

    #[test]
    fn test_verify_response_failure_outcome() {
        let response: VerifyResponse = serde_json::from_value(json!({
            "Success": false,
            "ResultCode": -2,
            "ResultDescription": "تراکنش یافت نشد."
        }))
        .unwrap();
        assert_eq!(
            response.result_code.and_then(lookup_result_code),
            Some(&TRANSACTION_NOT_FOUND)
        );
        assert_eq!(
            response.into_outcome(),
            SettlementOutcome::Failed {
                result_code: Some(-2),
                result_description: Some("تراکنش یافت نشد.".to_string()),
            }
        );
    }

    #[test]
    fn test_transaction_detail_keeps_gateway_spelling() {
        let detail = TransactionDetail {
            original_amount: Some(5000),
            ..Default::default()
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["OrginalAmount"], 5000);
        assert!(value.get("OriginalAmount").is_none());
    }

    #[test]
    fn test_trace_date() {
        let mut detail = TransactionDetail {
            strace_date: Some("2019-09-16 18:11:06".to_string()),
            ..Default::default()
        };
        let date = detail.trace_date().unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2019, 9, 16));
        assert_eq!((date.hour(), date.minute(), date.second()), (18, 11, 6));

        detail.strace_date = Some("2019-09-16T18:11:06".to_string());
        assert!(detail.trace_date().is_some());

        detail.strace_date = Some("16/09/2019".to_string());
        assert!(detail.trace_date().is_none());

        detail.strace_date = None;
        assert!(detail.trace_date().is_none());
    }

    #[test]
    fn test_payment_callback() {
        let callback: PaymentCallback = serde_json::from_value(json!({
            "MID": 0,
            "TerminalId": 2015,
            "State": "OK",
            "Status": 2,
            "RRN": 14226761817u64,
            "RefNum": "50",
            "ResNum": "RN1",
            "TraceNo": 100428,
            "Amount": 10000,
            "Wage": 0,
            "SecurePan": "621986****8080",
            "HashedCardNumber": "b9b2ea2b2d5e0b6a"
        }))
        .unwrap();
        assert!(callback.is_success());
        assert_eq!(callback.status_entry(), Some(&OK));
        assert_eq!(callback.ref_num.as_deref(), Some("50"));

        let failed = PaymentCallback {
            status: Some(3),
            ..Default::default()
        };
        assert!(!failed.is_success());
        assert_eq!(failed.status_entry(), Some(&FAILED));
        assert_eq!(PaymentCallback::default().status_entry(), None);
    }

    #[test]
    fn test_canceled_callback_resolves_by_state() {
        let callback: PaymentCallback = serde_json::from_value(json!({
            "State": "CanceledByUser",
            "Status": 1,
            "RefNum": "",
            "ResNum": "RN1"
        }))
        .unwrap();
        assert!(!callback.is_success());
        assert_eq!(callback.status_entry(), Some(&CANCELED_BY_USER));

        let state_only = PaymentCallback {
            state: Some("CanceledByUser".to_string()),
            ..Default::default()
        };
        assert_eq!(state_only.status_entry(), Some(&CANCELED_BY_USER));

        // A resolvable status wins over the state text.
        let both = PaymentCallback {
            state: Some("CanceledByUser".to_string()),
            status: Some(3),
            ..Default::default()
        };
        assert_eq!(both.status_entry(), Some(&FAILED));

        let unknown = PaymentCallback {
            state: Some("SomethingNew".to_string()),
            status: Some(99),
            ..Default::default()
        };
        assert_eq!(unknown.status_entry(), None);
    }
}
