//! SEP error and result code catalogs
//!
//! Two fixed tables documenting the codes the gateway reports. Token issuance
//! and payment-page states use string error codes; the verify and reverse
//! APIs use integer result codes. Lookups are exact matches; a miss means the
//! gateway sent a code we have no documentation for.

use serde::Serialize;

/// A documented token-issuance / payment-state error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorCodeEntry {
    /// Code as it appears on the wire (e.g. "5").
    pub code: &'static str,
    /// Short English name.
    pub name: &'static str,
    /// Persian description as documented by the gateway.
    pub description: &'static str,
}

/// Which settlement API a result code is documented for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultScope {
    Verify,
    Reverse,
    Both,
}

/// A settlement API, as far as result code scoping is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementOperation {
    Verify,
    Reverse,
}

impl SettlementOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verify => "verify",
            Self::Reverse => "reverse",
        }
    }
}

impl std::fmt::Display for SettlementOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A documented verify/reverse result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultCodeEntry {
    pub code: i32,
    pub name: &'static str,
    pub description: &'static str,
    pub scope: ResultScope,
}

impl ResultCodeEntry {
    /// Whether the code is documented for `operation`.
    pub fn applies_to(&self, operation: SettlementOperation) -> bool {
        match (self.scope, operation) {
            (ResultScope::Both, _) => true,
            (ResultScope::Verify, SettlementOperation::Verify) => true,
            (ResultScope::Reverse, SettlementOperation::Reverse) => true,
            _ => false,
        }
    }

    /// Only result code 0 means the settlement went through.
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS.code
    }
}

pub const CANCELED_BY_USER: ErrorCodeEntry = ErrorCodeEntry {
    code: "-",
    name: "CanceledByUser",
    description: "کاربر انصراف داده است",
};

pub const OK: ErrorCodeEntry = ErrorCodeEntry {
    code: "2",
    name: "OK",
    description: "پرداخت با موفقیت انجام شد",
};

pub const FAILED: ErrorCodeEntry = ErrorCodeEntry {
    code: "3",
    name: "Failed",
    description: "پرداخت انجام نشد",
};

pub const SESSION_IS_NULL: ErrorCodeEntry = ErrorCodeEntry {
    code: "4",
    name: "SessionIsNull",
    description: "کاربر در بازه زمانی تعیین شده پاسخی ارسال نکرده است",
};

pub const INVALID_PARAMETERS: ErrorCodeEntry = ErrorCodeEntry {
    code: "5",
    name: "InvalidParameters",
    description: "پارامترهای ارسالی نامعتبر است",
};

pub const MERCHANT_IP_ADDRESS_IS_INVALID: ErrorCodeEntry = ErrorCodeEntry {
    code: "8",
    name: "MerchantIpAddressIsInvalid",
    description: "در پرداخت های بر پایه توکن آدرس سرور پذیرنده نامعتبر است",
};

pub const TOKEN_NOT_FOUND: ErrorCodeEntry = ErrorCodeEntry {
    code: "10",
    name: "TokenNotFound",
    description: "توکن ارسال شده یافت نشد",
};

pub const TOKEN_REQUIRED: ErrorCodeEntry = ErrorCodeEntry {
    code: "11",
    name: "TokenRequired",
    description: "با این شماره ترمینال فقط تراکنش های توکنی قابل پرداخت هستند",
};

pub const TERMINAL_NOT_FOUND: ErrorCodeEntry = ErrorCodeEntry {
    code: "12",
    name: "TerminalNotFound",
    description: "شماره ترمینال ارسال شده یافت نشد",
};

pub const MULTISETTLE_POLICY_ERRORS: ErrorCodeEntry = ErrorCodeEntry {
    code: "21",
    name: "MultisettlePolicyErrors",
    description: "محدودیت های مدل چند حسابی رعایت نشده",
};

/// All documented error codes, in the gateway's documentation order.
pub static ERROR_CODES: &[ErrorCodeEntry] = &[
    CANCELED_BY_USER,
    OK,
    FAILED,
    SESSION_IS_NULL,
    INVALID_PARAMETERS,
    MERCHANT_IP_ADDRESS_IS_INVALID,
    TOKEN_NOT_FOUND,
    TOKEN_REQUIRED,
    TERMINAL_NOT_FOUND,
    MULTISETTLE_POLICY_ERRORS,
];

pub const TRANSACTION_NOT_FOUND: ResultCodeEntry = ResultCodeEntry {
    code: -2,
    name: "TransactionNotFound",
    description: "تراکنش یافت نشد.",
    scope: ResultScope::Verify,
};

/// More than 30 minutes have passed since the transaction.
pub const TRANSACTION_EXPIRED: ResultCodeEntry = ResultCodeEntry {
    code: -6,
    name: "TransactionExpired",
    description: "بیش از نیم ساعت از زمان اجرای تراکنش گذشته است.",
    scope: ResultScope::Verify,
};

pub const SUCCESS: ResultCodeEntry = ResultCodeEntry {
    code: 0,
    name: "Success",
    description: "موفق",
    scope: ResultScope::Both,
};

pub const DUPLICATE_REQUEST: ResultCodeEntry = ResultCodeEntry {
    code: 2,
    name: "DuplicateRequest",
    description: "درخواست تکراری می باشد.",
    scope: ResultScope::Both,
};

pub const ALREADY_REVERSED: ResultCodeEntry = ResultCodeEntry {
    code: 5,
    name: "AlreadyReversed",
    description: "تراکنش برگشت خورده میباشد",
    scope: ResultScope::Verify,
};

pub const RESULT_TERMINAL_NOT_FOUND: ResultCodeEntry = ResultCodeEntry {
    code: -105,
    name: "TerminalNotFound",
    description: "ترمینال ارسالی در سیستم موجود نمیباشد",
    scope: ResultScope::Both,
};

pub const TERMINAL_INACTIVE: ResultCodeEntry = ResultCodeEntry {
    code: -104,
    name: "TerminalInactive",
    description: "ترمینال ارسالی غیرفعال میباشد",
    scope: ResultScope::Both,
};

pub const IP_NOT_ALLOWED: ResultCodeEntry = ResultCodeEntry {
    code: -106,
    name: "IpNotAllowed",
    description: "آدرس آی پی درخواستی غیرمجاز میباشد",
    scope: ResultScope::Both,
};

/// All documented verify/reverse result codes.
pub static RESULT_CODES: &[ResultCodeEntry] = &[
    TRANSACTION_NOT_FOUND,
    TRANSACTION_EXPIRED,
    SUCCESS,
    DUPLICATE_REQUEST,
    ALREADY_REVERSED,
    RESULT_TERMINAL_NOT_FOUND,
    TERMINAL_INACTIVE,
    IP_NOT_ALLOWED,
];

/// Exact match on the wire code; `" 5"` and `"05"` do not resolve.
pub fn lookup_error_code(code: &str) -> Option<&'static ErrorCodeEntry> {
    ERROR_CODES.iter().find(|entry| entry.code == code)
}

/// Exact, case-sensitive match on the entry name (e.g. "CanceledByUser").
pub fn lookup_error_name(name: &str) -> Option<&'static ErrorCodeEntry> {
    ERROR_CODES.iter().find(|entry| entry.name == name)
}

/// Exact match on the numeric result code.
pub fn lookup_result_code(code: i32) -> Option<&'static ResultCodeEntry> {
    RESULT_CODES.iter().find(|entry| entry.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_code() {
        assert_eq!(lookup_error_code("5"), Some(&INVALID_PARAMETERS));
        assert_eq!(lookup_error_code("-"), Some(&CANCELED_BY_USER));
        assert_eq!(lookup_error_code("21"), Some(&MULTISETTLE_POLICY_ERRORS));
    }

    #[test]
    fn test_lookup_error_code_is_exact() {
        assert_eq!(lookup_error_code(""), None);
        assert_eq!(lookup_error_code(" 5"), None);
        assert_eq!(lookup_error_code("05"), None);
        assert_eq!(lookup_error_code("ok"), None);
        assert_eq!(lookup_error_code("999"), None);
    }

    #[test]
    fn test_lookup_error_name() {
        assert_eq!(lookup_error_name("CanceledByUser"), Some(&CANCELED_BY_USER));
        assert_eq!(lookup_error_name("OK"), Some(&OK));
        assert_eq!(lookup_error_name("canceledbyuser"), None);
        assert_eq!(lookup_error_name("-"), None);
    }

    #[test]
    fn test_lookup_result_code() {
        let success = lookup_result_code(0).unwrap();
        assert_eq!(success, &SUCCESS);
        assert!(success.is_success());

        assert_eq!(lookup_result_code(-2), Some(&TRANSACTION_NOT_FOUND));
        assert_eq!(lookup_result_code(-106), Some(&IP_NOT_ALLOWED));
        assert_eq!(lookup_result_code(1), None);
        assert_eq!(lookup_result_code(i32::MIN), None);
    }

    #[test]
    fn test_result_scope() {
        assert!(ALREADY_REVERSED.applies_to(SettlementOperation::Verify));
        assert!(!ALREADY_REVERSED.applies_to(SettlementOperation::Reverse));
        assert!(DUPLICATE_REQUEST.applies_to(SettlementOperation::Reverse));
        assert!(!TRANSACTION_EXPIRED.applies_to(SettlementOperation::Reverse));
        assert!(!DUPLICATE_REQUEST.is_success());
    }

    #[test]
    fn test_catalog_codes_are_unique() {
        for (i, a) in ERROR_CODES.iter().enumerate() {
            assert!(ERROR_CODES[i + 1..].iter().all(|b| a.code != b.code));
        }
        for (i, a) in RESULT_CODES.iter().enumerate() {
            assert!(RESULT_CODES[i + 1..].iter().all(|b| a.code != b.code));
        }
    }
}
