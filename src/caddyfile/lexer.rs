use std::env;

use super::error::CaddyfileError;
use super::token::{Location, Token};

/// Caddyfile 소스를 토큰 목록으로 분리합니다.
///
/// 토큰화 전에 `{$NAME}` / `{$NAME:default}` 형태의 환경 변수 치환을 먼저 수행합니다.
///
/// # 예제
///
/// ```
/// use caddy_l4_adapter::caddyfile::tokenize;
///
/// let tokens = tokenize("Caddyfile", ":8080 {\n\techo\n}\n").unwrap();
/// let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
/// assert_eq!(texts, vec![":8080", "{", "echo", "}"]);
/// assert_eq!(tokens[2].line, 2);
/// ```
pub fn tokenize(file: &str, input: &str) -> Result<Vec<Token>, CaddyfileError> {
    let input = replace_env_vars(input);
    Lexer::new(file).run(&input)
}

/// `{$NAME}` 플레이스홀더를 환경 변수 값으로 치환
///
/// 변수가 없으면 `:` 뒤의 기본값을, 기본값도 없으면 빈 문자열을 사용합니다.
pub fn replace_env_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("{$") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };

        let key = &after[..end];
        if key.is_empty() || key.contains(char::is_whitespace) {
            // 플레이스홀더가 아님
            out.push_str(&rest[..start + 2]);
            rest = after;
            continue;
        }

        let (name, default) = match key.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (key, None),
        };

        out.push_str(&rest[..start]);
        match env::var(name) {
            Ok(value) => out.push_str(&value),
            Err(_) => out.push_str(default.unwrap_or_default()),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

struct Lexer<'a> {
    file: &'a str,
    tokens: Vec<Token>,
    buf: String,
    start: (usize, usize),
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(file: &'a str) -> Self {
        Self {
            file,
            tokens: Vec::new(),
            buf: String::new(),
            start: (1, 1),
            line: 1,
            column: 1,
        }
    }

    fn run(mut self, input: &str) -> Result<Vec<Token>, CaddyfileError> {
        let mut quote: Option<char> = None;
        let mut escaped = false;
        let mut comment = false;

        for ch in input.chars() {
            let (line, column) = (self.line, self.column);
            self.advance(ch);

            if let Some(q) = quote {
                if escaped {
                    if ch != q && ch != '\\' {
                        self.buf.push('\\');
                    }
                    self.buf.push(ch);
                    escaped = false;
                } else if ch == '\\' && q == '"' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                    self.flush(true);
                } else {
                    self.buf.push(ch);
                }
                continue;
            }

            if comment {
                if ch == '\n' {
                    comment = false;
                }
                continue;
            }

            if ch.is_whitespace() {
                self.flush(false);
                continue;
            }

            // 토큰 시작 위치에서만 주석/따옴표로 인식
            if self.buf.is_empty() {
                self.start = (line, column);
                match ch {
                    '#' => {
                        comment = true;
                        continue;
                    }
                    '"' | '`' => {
                        quote = Some(ch);
                        continue;
                    }
                    _ => {}
                }
            }

            self.buf.push(ch);
        }

        if quote.is_some() {
            return Err(CaddyfileError::Lex {
                location: Location {
                    file: self.file.to_string(),
                    line: self.start.0,
                    column: self.start.1,
                },
                message: "unterminated quoted token".to_string(),
            });
        }

        self.flush(false);
        Ok(self.tokens)
    }

    fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    fn flush(&mut self, quoted: bool) {
        // 빈 따옴표 토큰("")은 유효한 토큰
        if self.buf.is_empty() && !quoted {
            return;
        }

        let (line, column) = self.start;
        self.tokens.push(Token {
            file: self.file.to_string(),
            line,
            column,
            text: std::mem::take(&mut self.buf),
            quoted,
        });
    }
}
