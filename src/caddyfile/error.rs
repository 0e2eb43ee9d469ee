use super::token::Location;

/// Caddyfile 토큰화, 블록 구조 분석, 인자 소비 과정에서 발생하는 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaddyfileError {
    #[error("{location} - Error during lexing: {message}")]
    Lex {
        location: Location,
        message: String,
    },

    #[error("{location} - Error during parsing: {message}")]
    Syntax {
        location: Location,
        message: String,
    },

    /// 디렉티브에 필요한 인자 개수가 맞지 않음
    #[error("{location} - Error during parsing: wrong argument count or unexpected line ending after '{after}'")]
    Argument {
        location: Location,
        after: String,
    },
}

impl CaddyfileError {
    pub fn location(&self) -> &Location {
        match self {
            Self::Lex { location, .. }
            | Self::Syntax { location, .. }
            | Self::Argument { location, .. } => location,
        }
    }
}
