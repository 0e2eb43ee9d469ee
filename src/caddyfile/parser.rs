use tracing::debug;

use super::error::CaddyfileError;
use super::lexer::tokenize;
use super::token::{is_next_on_new_line, Location, Token};

/// 디렉티브 하나에 해당하는 토큰 묶음 (디렉티브 줄 + 중첩 블록)
pub type Segment = Vec<Token>;

/// 주소 키 목록과 디렉티브 세그먼트로 구성된 서버 블록
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerBlock {
    pub keys: Vec<Token>,
    pub segments: Vec<Segment>,
}

impl ServerBlock {
    /// 키 문자열 목록
    pub fn key_values(&self) -> Vec<&str> {
        self.keys.iter().map(|k| k.text.as_str()).collect()
    }

    /// 세그먼트의 첫 토큰(디렉티브 이름) 목록
    pub fn directive_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| s.first())
            .map(|t| t.text.as_str())
            .collect()
    }
}

/// Caddyfile 소스를 서버 블록 목록으로 파싱합니다.
pub fn parse(file: &str, input: &str) -> Result<Vec<ServerBlock>, CaddyfileError> {
    let tokens = tokenize(file, input)?;
    parse_tokens(&tokens)
}

/// 이미 토큰화된 입력을 서버 블록 목록으로 파싱합니다.
pub fn parse_tokens(tokens: &[Token]) -> Result<Vec<ServerBlock>, CaddyfileError> {
    let mut parser = Parser { tokens, pos: 0 };
    let mut blocks = Vec::new();

    while parser.pos < tokens.len() {
        let block = parser.server_block(blocks.is_empty())?;
        debug!(
            keys = ?block.key_values(),
            directives = ?block.directive_names(),
            "서버 블록 파싱"
        );
        blocks.push(block);
    }

    Ok(blocks)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn server_block(&mut self, first: bool) -> Result<ServerBlock, CaddyfileError> {
        let keys = self.keys()?;

        let segments = match self.peek() {
            Some(tok) if tok.is_open_brace() => {
                let last_key = &self.tokens[self.pos - 1];
                if is_next_on_new_line(last_key, tok) {
                    return Err(syntax(
                        tok.location(),
                        "unexpected '{' on a new line; did you mean to place the '{' on the previous line?",
                    ));
                }
                self.pos += 1;
                self.directives(Some(tok))?
            }
            // 블록이 하나뿐이면 중괄호 없이 파일 끝까지가 본문
            _ if first => self.directives(None)?,
            Some(tok) => {
                return Err(syntax(tok.location(), format!("unexpected token '{}', expecting '{{'", tok.text)))
            }
            None => {
                let last = &self.tokens[self.pos - 1];
                return Err(syntax(last.location(), "unexpected EOF, expecting '{'"));
            }
        };

        Ok(ServerBlock { keys, segments })
    }

    fn keys(&mut self) -> Result<Vec<Token>, CaddyfileError> {
        let mut keys = Vec::new();
        let mut expecting_another = false;

        while let Some(tok) = self.peek() {
            if tok.is_open_brace() {
                if keys.is_empty() {
                    return Err(syntax(tok.location(), "server block without any key"));
                }
                if expecting_another {
                    return Err(syntax(tok.location(), "expected another address after ','"));
                }
                break;
            }
            if tok.is_close_brace() {
                return Err(syntax(tok.location(), "unexpected '}'"));
            }

            // "a, b" 또는 "a,b" 형태의 키 목록
            expecting_another = tok.text.ends_with(',');
            for part in tok.text.split(',').filter(|p| !p.is_empty()) {
                keys.push(Token {
                    text: part.to_string(),
                    ..tok.clone()
                });
            }
            self.pos += 1;

            match self.peek() {
                Some(next) if !expecting_another && is_next_on_new_line(tok, next) => break,
                _ => {}
            }
        }

        Ok(keys)
    }

    /// 블록 본문을 디렉티브 세그먼트로 분리
    ///
    /// `open`이 있으면 대응하는 `}`에서 멈추고, 없으면 입력 끝까지 읽습니다.
    fn directives(&mut self, open: Option<&Token>) -> Result<Vec<Segment>, CaddyfileError> {
        let mut segments = Vec::new();

        loop {
            let Some(tok) = self.peek() else {
                if let Some(open) = open {
                    return Err(syntax(open.location(), "unexpected EOF, unclosed '{'"));
                }
                break;
            };

            if tok.is_close_brace() {
                if open.is_none() {
                    return Err(syntax(tok.location(), "unexpected '}'"));
                }
                self.pos += 1;
                break;
            }

            segments.push(self.segment()?);
        }

        Ok(segments)
    }

    fn segment(&mut self) -> Result<Segment, CaddyfileError> {
        let mut segment = Vec::new();
        let mut depth = 0usize;

        while let Some(tok) = self.peek() {
            // 같은 줄의 닫는 괄호는 바깥 블록의 것
            if depth == 0 && tok.is_close_brace() {
                break;
            }

            segment.push(tok.clone());
            self.pos += 1;

            if tok.is_open_brace() {
                depth += 1;
            } else if tok.is_close_brace() {
                depth -= 1;
            }

            match self.peek() {
                None if depth > 0 => {
                    return Err(syntax(tok.location(), "unexpected EOF, unclosed '{'"));
                }
                Some(next) if depth == 0 && is_next_on_new_line(tok, next) => break,
                _ => {}
            }
        }

        Ok(segment)
    }
}

fn syntax(location: Location, message: impl Into<String>) -> CaddyfileError {
    CaddyfileError::Syntax {
        location,
        message: message.into(),
    }
}
