//! Caddy L4 Adapter는 Caddyfile 형식의 설정을 레이어4(TCP/UDP) 프록시 런타임이
//! 읽는 JSON 설정 트리로 변환합니다.
//!
//! # 주요 기능
//!
//! - Caddyfile 토큰화와 서버 블록 파싱
//! - `echo`, `tls`, `proxy`, `proxy_protocol` 디렉티브 컴파일
//! - 로드밸런싱 선택 정책과 헬스체크 설정
//! - TLS 호스트 이름의 인증서 자동화 목록 수집
//!
//! # 예제
//!
//! ```
//! use caddy_l4_adapter::adapter::Adapter;
//!
//! let input = r#"
//! :5000 {
//!     proxy {
//!         to 10.0.0.1:5000 10.0.0.2:5000
//!         lb_policy random_choice 2
//!         health_interval 10s
//!     }
//! }
//!
//! :7 {
//!     echo
//! }
//! "#;
//!
//! let adapted = Adapter::with_defaults().adapt("Caddyfile", input).unwrap();
//! let servers = &adapted.config.layer4().unwrap().servers;
//! assert_eq!(servers.keys().collect::<Vec<_>>(), ["srv0", "srv1"]);
//! assert!(adapted.config.tls().is_none());
//!
//! let json = adapted.to_json(false).unwrap();
//! assert!(json.contains(r#""selection_policy":{"policy":"random_choice","choose":2}"#));
//! ```
//!
//! # 디렉티브 확장
//!
//! ```
//! use caddy_l4_adapter::adapter::{Adapter, BlockContext, CompileError, DirectiveSpec};
//! use caddy_l4_adapter::caddyfile::Dispenser;
//! use caddy_l4_adapter::layer4::{EchoHandler, Handler};
//!
//! fn loopback(_: &mut Dispenser, _: &BlockContext<'_>) -> Result<Handler, CompileError> {
//!     Ok(Handler::Echo(EchoHandler::default()))
//! }
//!
//! let mut adapter = Adapter::with_defaults();
//! adapter.directives_mut().register("loopback", DirectiveSpec::new(loopback));
//!
//! let adapted = adapter.adapt("Caddyfile", ":9 {\n\tloopback\n}").unwrap();
//! assert_eq!(adapted.config.layer4().unwrap().servers["srv0"].routes.len(), 1);
//! ```

pub mod adapter;
pub mod caddyfile;
pub mod layer4;
pub mod logging;
pub mod settings;
