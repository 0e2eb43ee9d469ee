use crate::caddyfile::{CaddyfileError, Location};
use crate::layer4::AddressError;

/// Caddyfile을 설정 트리로 컴파일하는 동안 발생하는 에러
///
/// 모든 에러는 컴파일 전체를 중단시키며, 소스 순서상 처음 만난 에러만 보고됩니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// 토큰화, 블록 구조, 인자 개수 에러
    #[error(transparent)]
    Caddyfile(#[from] CaddyfileError),

    /// 서버 블록 키(주소) 파싱 실패. 주소 파서의 메시지를 그대로 사용
    #[error(transparent)]
    Address(#[from] AddressError),

    /// 기간, 정수 등 값 형식 에러. `what`은 값을 받은 디렉티브 또는 옵션 이름
    #[error("{location} - Error during parsing: invalid {what} value '{value}': {reason}")]
    InvalidValue {
        location: Location,
        what: String,
        value: String,
        reason: String,
    },

    #[error("{location} - Error during parsing: getting module named '{module}': module not registered")]
    ModuleNotFound {
        location: Location,
        module: String,
    },

    /// 한 번만 지정할 수 있는 디렉티브가 반복됨
    #[error("{location} - Error during parsing: {message}")]
    DuplicateDirective {
        location: Location,
        directive: String,
        message: String,
    },

    /// 엄격한 블록에서 알 수 없는 키 또는 남는 인자
    #[error("{location} - Error during parsing: unrecognized {directive} option '{key}'")]
    UnknownKey {
        location: Location,
        directive: String,
        key: String,
    },
}

impl CompileError {
    /// 소스 위치가 있는 에러면 그 위치
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Caddyfile(err) => Some(err.location()),
            Self::Address(_) => None,
            Self::InvalidValue { location, .. }
            | Self::ModuleNotFound { location, .. }
            | Self::DuplicateDirective { location, .. }
            | Self::UnknownKey { location, .. } => Some(location),
        }
    }
}
