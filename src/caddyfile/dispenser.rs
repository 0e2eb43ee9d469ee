use super::error::CaddyfileError;
use super::token::{is_next_on_new_line, Location, Token};

/// 토큰 목록 위를 순차적으로 이동하는 커서
///
/// 디렉티브 컴파일러는 이 커서로 인자를 소비하고 중첩 블록을 순회합니다.
/// 커서는 생성 직후 첫 토큰 "앞"에 위치하므로 `next()`를 먼저 호출해야 합니다.
#[derive(Debug, Clone)]
pub struct Dispenser {
    tokens: Vec<Token>,
    cursor: isize,
    nesting: usize,
}

impl Dispenser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: -1,
            nesting: 0,
        }
    }

    /// 다음 토큰으로 이동 (줄 구분 없음)
    pub fn next(&mut self) -> bool {
        if self.cursor < self.tokens.len() as isize - 1 {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// 이전 토큰으로 이동
    pub fn prev(&mut self) -> bool {
        if self.cursor > -1 {
            self.cursor -= 1;
            self.cursor > -1
        } else {
            false
        }
    }

    /// 같은 줄에 다음 토큰이 있으면 그 토큰으로 이동
    pub fn next_arg(&mut self) -> bool {
        if !self.next_on_same_line() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// 현재 줄의 남은 인자를 모두 소비합니다. 블록을 여는 `{` 앞에서 멈춥니다.
    pub fn remaining_args(&mut self) -> Vec<String> {
        let mut args = Vec::new();
        while self.next_arg() {
            if self.current_is_open_brace() {
                self.cursor -= 1;
                break;
            }
            args.push(self.val().to_string());
        }
        args
    }

    /// 현재 블록 안의 다음 토큰으로 이동합니다.
    ///
    /// 현재 줄 끝의 `{`로 블록에 진입하고, 대응하는 `}`에서 `false`를 반환합니다.
    /// 블록 안의 모든 토큰을 돌려주므로 같은 줄의 남은 인자도 키로 보일 수 있습니다.
    pub fn next_block(&mut self, initial_nesting: usize) -> bool {
        if self.nesting > initial_nesting {
            if !self.next() {
                return false;
            }
            if self.current_is_close_brace() && !self.next_on_same_line() {
                self.nesting -= 1;
            } else if self.current_is_open_brace() && !self.next_on_same_line() {
                self.nesting += 1;
            }
            return self.nesting > initial_nesting;
        }

        // 블록은 반드시 같은 줄에서 열려야 함
        if !self.next_arg() {
            return false;
        }
        if !self.current_is_open_brace() {
            self.cursor -= 1;
            return false;
        }
        self.next();
        if self.current_is_close_brace() {
            // 열리자마자 닫힌 빈 블록
            return false;
        }
        self.nesting += 1;
        true
    }

    pub fn nesting(&self) -> usize {
        self.nesting
    }

    /// 현재 토큰 문자열. 커서가 범위 밖이면 빈 문자열
    pub fn val(&self) -> &str {
        self.token().map(|t| t.text.as_str()).unwrap_or("")
    }

    pub fn token(&self) -> Option<&Token> {
        if self.cursor < 0 {
            return None;
        }
        self.tokens.get(self.cursor as usize)
    }

    /// 현재 토큰부터 줄 끝까지, 그리고 줄 끝에서 열리는 블록 전체를 복사합니다.
    ///
    /// 부모 커서는 세그먼트의 마지막 토큰(블록이 있으면 닫는 `}`)으로 이동하고,
    /// 중첩 깊이는 세그먼트 시작 시점으로 돌아옵니다.
    pub fn next_segment(&mut self) -> Vec<Token> {
        let mut tokens: Vec<Token> = self.token().cloned().into_iter().collect();

        while self.next_arg() {
            if self.current_is_open_brace() {
                self.cursor -= 1;
                break;
            }
            tokens.extend(self.token().cloned());
        }

        let mut opened_block = false;
        let nesting = self.nesting;
        while self.next_block(nesting) {
            if !opened_block {
                // next_block이 여는 괄호를 이미 소비했으므로 되돌아가서 포함시킴
                self.prev();
                tokens.extend(self.token().cloned());
                self.next();
                opened_block = true;
            }
            tokens.extend(self.token().cloned());
        }
        if opened_block {
            tokens.extend(self.token().cloned());
        }

        tokens
    }

    /// `next_segment`의 토큰으로 독립된 하위 커서를 만듭니다.
    pub fn new_from_next_segment(&mut self) -> Dispenser {
        Dispenser::new(self.next_segment())
    }

    /// 현재 토큰 위치. 커서가 범위 밖이면 가장 가까운 토큰 위치를 사용
    pub fn location(&self) -> Location {
        self.token()
            .or_else(|| if self.cursor < 0 { self.tokens.first() } else { self.tokens.last() })
            .map(Token::location)
            .unwrap_or_default()
    }

    /// 인자 개수 오류
    pub fn arg_err(&self) -> CaddyfileError {
        CaddyfileError::Argument {
            location: self.location(),
            after: self.val().to_string(),
        }
    }

    fn next_on_same_line(&self) -> bool {
        if self.cursor < 0 {
            return !self.tokens.is_empty();
        }
        let current = self.cursor as usize;
        match (self.tokens.get(current), self.tokens.get(current + 1)) {
            (Some(curr), Some(next)) => !is_next_on_new_line(curr, next),
            _ => false,
        }
    }

    fn current_is_open_brace(&self) -> bool {
        self.token().is_some_and(Token::is_open_brace)
    }

    fn current_is_close_brace(&self) -> bool {
        self.token().is_some_and(Token::is_close_brace)
    }
}
