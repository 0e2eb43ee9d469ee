//! Caddyfile 서버 블록을 레이어4 설정 트리로 컴파일하는 어댑터입니다.
//!
//! 서버 블록마다 `srv{index}` 서버를 하나 만들고, 블록 안의 디렉티브 세그먼트마다
//! 라우트를 하나씩 추가합니다. 디렉티브는 [`DirectiveRegistry`]로,
//! 로드밸런싱 선택 정책은 [`ModuleRegistry`]로 찾습니다.
//!
//! # 예제
//!
//! ```
//! use caddy_l4_adapter::adapter::Adapter;
//!
//! let input = "\
//! example.com:443 {
//!     tls
//!     proxy 10.0.0.1:8080
//! }
//! ";
//!
//! let adapted = Adapter::with_defaults().adapt("Caddyfile", input).unwrap();
//! let server = &adapted.config.layer4().unwrap().servers["srv0"];
//! assert_eq!(server.listen, vec!["example.com:443"]);
//! assert_eq!(server.routes.len(), 2);
//! assert_eq!(adapted.config.tls().unwrap().automate(), ["example.com".to_string()]);
//! ```

mod args;
mod directive;
mod echo;
mod error;
mod proxy;
mod proxy_protocol;
mod registry;
mod selection;
mod tls;

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

pub use directive::{BlockContext, CompileFn, DirectiveRegistry, DirectiveSpec, UnknownKeys};
pub use error::CompileError;
pub use registry::{ModuleRegistry, PolicyConstructor, RegistryError, SELECTION_NAMESPACE};

use crate::caddyfile::{self, Dispenser, Location, ServerBlock};
use crate::layer4::{Address, Config, Layer4App, Route, Server, TlsApp};

/// 컴파일 결과에 함께 반환되는 경고. 설정 트리에는 영향을 주지 않음
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub file: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<String>,
    pub message: String,
}

impl Warning {
    fn at(location: &Location, directive: &str, message: impl Into<String>) -> Self {
        Self {
            file: location.file.clone(),
            line: location.line,
            directive: Some(directive.to_string()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if let Some(directive) = &self.directive {
            write!(f, " ({})", directive)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// 컴파일된 설정 트리와 경고 목록
#[derive(Debug, Clone, PartialEq)]
pub struct Adapted {
    pub config: Config,
    pub warnings: Vec<Warning>,
}

impl Adapted {
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(&self.config)
        } else {
            serde_json::to_string(&self.config)
        }
    }
}

// 인증서 자동화 후보 호스트와 그 키의 위치
struct Hostname {
    host: String,
    is_ip: bool,
    location: Location,
}

struct CompiledBlock {
    server: Server,
    hostnames: Vec<Hostname>,
    automates_certificates: bool,
}

/// Caddyfile → 레이어4 설정 컴파일러
#[derive(Debug, Clone)]
pub struct Adapter {
    directives: DirectiveRegistry,
    modules: ModuleRegistry,
}

impl Default for Adapter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Adapter {
    pub fn new(directives: DirectiveRegistry, modules: ModuleRegistry) -> Self {
        Self { directives, modules }
    }

    /// 기본 디렉티브 4종과 선택 정책 6종을 등록한 어댑터
    pub fn with_defaults() -> Self {
        Self::new(DirectiveRegistry::with_defaults(), ModuleRegistry::with_defaults())
    }

    pub fn directives_mut(&mut self) -> &mut DirectiveRegistry {
        &mut self.directives
    }

    pub fn modules_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.modules
    }

    /// Caddyfile 원문을 파싱하고 컴파일
    pub fn adapt(&self, filename: &str, source: &str) -> Result<Adapted, CompileError> {
        let blocks = caddyfile::parse(filename, source)?;
        self.setup(&blocks)
    }

    /// 파싱된 서버 블록을 설정 트리로 컴파일합니다.
    ///
    /// 처음 만난 에러에서 중단하며 일부만 만들어진 트리는 반환하지 않습니다.
    pub fn setup(&self, blocks: &[ServerBlock]) -> Result<Adapted, CompileError> {
        let mut servers = IndexMap::new();
        let mut automate = Vec::new();
        let mut warnings = Vec::new();

        for (index, block) in blocks.iter().enumerate() {
            let compiled = self.compile_block(block)?;

            if compiled.automates_certificates {
                for hostname in compiled.hostnames {
                    if let Some(warning) = automation_warning(&hostname) {
                        warnings.push(warning);
                    }
                    automate.push(hostname.host);
                }
            }

            let key = format!("srv{}", index);
            debug!(
                server = %key,
                listen = ?compiled.server.listen,
                routes = compiled.server.routes.len(),
                "서버 컴파일 완료"
            );
            servers.insert(key, compiled.server);
        }

        let mut config = Config::default();
        let server_count = servers.len();
        if !servers.is_empty() {
            config.apps.layer4 = Some(Layer4App { servers });
        }

        let mut tls = TlsApp::default();
        if !automate.is_empty() {
            tls.certificates.automate = Some(automate);
        }
        if !tls.is_empty() {
            config.apps.tls = Some(tls);
        }

        info!(
            servers = server_count,
            apps = ?config.app_names(),
            warnings = warnings.len(),
            "Caddyfile 변환 완료"
        );

        Ok(Adapted { config, warnings })
    }

    fn compile_block(&self, block: &ServerBlock) -> Result<CompiledBlock, CompileError> {
        let mut server = Server::default();
        let mut hostnames = Vec::with_capacity(block.keys.len());

        for key in &block.keys {
            let address = Address::parse(&key.text)?;
            hostnames.push(Hostname {
                is_ip: address.host_is_ip(),
                host: address.host,
                location: key.location(),
            });
            server.listen.push(key.text.clone());
        }

        let mut automates_certificates = false;

        for segment in &block.segments {
            let mut d = Dispenser::new(segment.clone());
            if !d.next() {
                continue;
            }

            let name = d.val().to_string();
            let Some(entry) = self.directives.get(&name) else {
                debug!(directive = %name, location = %d.location(), "등록되지 않은 디렉티브 건너뜀");
                continue;
            };

            let ctx = BlockContext {
                directive: &name,
                unknown_keys: entry.unknown_keys,
                modules: &self.modules,
            };
            let handler = (entry.compile)(&mut d, &ctx)?;

            automates_certificates |= entry.automates_certificates;
            server.routes.push(Route::new(handler));
        }

        Ok(CompiledBlock {
            server,
            hostnames,
            automates_certificates,
        })
    }
}

// 자동화 목록은 그대로 두고, 인증서를 받을 수 없는 호스트만 경고
fn automation_warning(hostname: &Hostname) -> Option<Warning> {
    if hostname.host.is_empty() {
        return Some(Warning::at(
            &hostname.location,
            "tls",
            "address has no hostname; an empty name was added to the certificate automation list",
        ));
    }
    if hostname.is_ip {
        return Some(Warning::at(
            &hostname.location,
            "tls",
            format!(
                "'{}' is an IP address; public certificate authorities may not issue certificates for it",
                hostname.host
            ),
        ));
    }
    None
}
