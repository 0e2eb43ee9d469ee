//! Caddyfile 토큰화와 블록 구조 분석을 담당하는 모듈입니다.
//!
//! 어댑터는 여기서 만든 [`ServerBlock`]의 세그먼트마다 [`Dispenser`]를 열어
//! 디렉티브를 컴파일합니다.

mod dispenser;
mod error;
mod lexer;
mod parser;
mod token;

pub use dispenser::Dispenser;
pub use error::CaddyfileError;
pub use lexer::{replace_env_vars, tokenize};
pub use parser::{parse, parse_tokens, Segment, ServerBlock};
pub use token::{Location, Token};
