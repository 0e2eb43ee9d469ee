/// 주소 키 파싱 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("invalid port '{port}': {reason}")]
    InvalidPort {
        port: String,
        reason: String,
    },

    #[error("port {0} is out of range")]
    PortOutOfRange(i64),

    #[error("invalid port range '{0}': start is greater than end")]
    InvalidPortRange(String),

    #[error("missing ']' in address '{0}'")]
    UnclosedBracket(String),
}

/// 기간 문자열 파싱 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("invalid duration '{0}'")]
    Invalid(String),

    #[error("missing unit in duration '{0}'")]
    MissingUnit(String),

    #[error("unknown unit '{unit}' in duration '{input}'")]
    UnknownUnit {
        unit: String,
        input: String,
    },

    #[error("negative duration '{0}' is not allowed")]
    Negative(String),

    #[error("duration '{0}' is out of range")]
    Overflow(String),
}
