use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::error::CompileError;
use super::registry::ModuleRegistry;
use super::{echo, proxy, proxy_protocol, tls};
use crate::caddyfile::Dispenser;
use crate::layer4::Handler;

/// 디렉티브 하나를 핸들러로 컴파일하는 함수
///
/// 커서는 디렉티브 키워드 위에 놓인 상태로 전달됩니다.
pub type CompileFn = fn(&mut Dispenser, &BlockContext<'_>) -> Result<Handler, CompileError>;

/// 블록 안의 알 수 없는 키 처리 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKeys {
    Ignore,
    Reject,
}

#[derive(Clone, Copy)]
pub struct DirectiveSpec {
    pub compile: CompileFn,
    pub unknown_keys: UnknownKeys,
    /// 이 디렉티브가 있는 서버 블록의 호스트 이름을 인증서 자동화 목록에 추가할지 여부
    pub automates_certificates: bool,
}

impl DirectiveSpec {
    pub fn new(compile: CompileFn) -> Self {
        Self {
            compile,
            unknown_keys: UnknownKeys::Ignore,
            automates_certificates: false,
        }
    }

    pub fn strict(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Reject;
        self
    }

    pub fn automating_certificates(mut self) -> Self {
        self.automates_certificates = true;
        self
    }
}

impl fmt::Debug for DirectiveSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveSpec")
            .field("unknown_keys", &self.unknown_keys)
            .field("automates_certificates", &self.automates_certificates)
            .finish_non_exhaustive()
    }
}

/// 디렉티브 컴파일러에 전달되는 실행 문맥
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    pub directive: &'a str,
    pub unknown_keys: UnknownKeys,
    pub modules: &'a ModuleRegistry,
}

impl BlockContext<'_> {
    /// 커서의 현재 토큰을 알 수 없는 키로 처리
    pub fn unknown_key(&self, d: &Dispenser) -> Result<(), CompileError> {
        match self.unknown_keys {
            UnknownKeys::Ignore => {
                debug!(directive = self.directive, key = d.val(), "알 수 없는 키 무시");
                Ok(())
            }
            UnknownKeys::Reject => Err(CompileError::UnknownKey {
                location: d.location(),
                directive: self.directive.to_string(),
                key: d.val().to_string(),
            }),
        }
    }
}

/// 디렉티브 이름 → 컴파일러 매핑
#[derive(Debug, Clone, Default)]
pub struct DirectiveRegistry {
    entries: HashMap<String, DirectiveSpec>,
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("echo", DirectiveSpec::new(echo::compile));
        registry.register(
            "tls",
            DirectiveSpec::new(tls::compile).automating_certificates(),
        );
        registry.register("proxy", DirectiveSpec::new(proxy::compile));
        registry.register(
            "proxy_protocol",
            DirectiveSpec::new(proxy_protocol::compile).strict(),
        );
        registry
    }

    /// 디렉티브 등록. 같은 이름이 있으면 교체하고 이전 항목을 반환
    pub fn register(&mut self, name: impl Into<String>, entry: DirectiveSpec) -> Option<DirectiveSpec> {
        self.entries.insert(name.into(), entry)
    }

    pub fn get(&self, name: &str) -> Option<&DirectiveSpec> {
        self.entries.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
