use std::fmt;

/// Caddyfile 토큰 하나를 나타냅니다.
///
/// 토큰은 공백으로 구분되며, 원본 파일 내 위치(줄/열)를 함께 보관합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub text: String,
    /// 따옴표로 감싸져 있던 토큰인지 여부
    pub quoted: bool,
}

impl Token {
    pub fn new(file: impl Into<String>, line: usize, column: usize, text: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            text: text.into(),
            quoted: false,
        }
    }

    /// 토큰 본문에 포함된 줄바꿈 개수 (여러 줄에 걸친 따옴표 토큰)
    pub fn num_line_breaks(&self) -> usize {
        self.text.matches('\n').count()
    }

    pub fn is_open_brace(&self) -> bool {
        !self.quoted && self.text == "{"
    }

    pub fn is_close_brace(&self) -> bool {
        !self.quoted && self.text == "}"
    }

    pub fn location(&self) -> Location {
        Location {
            file: self.file.clone(),
            line: self.line,
            column: self.column,
        }
    }
}

/// `next` 토큰이 `curr` 토큰과 다른 줄에서 시작하는지 확인
pub fn is_next_on_new_line(curr: &Token, next: &Token) -> bool {
    curr.file != next.file || curr.line + curr.num_line_breaks() < next.line
}

/// 에러 메시지에 붙는 소스 위치
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
