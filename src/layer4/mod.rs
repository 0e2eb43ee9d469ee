//! 레이어4 프록시 런타임이 소비하는 설정 트리 모델입니다.
//!
//! 서버, 라우트, 핸들러, 선택 정책과 인증서 자동화 목록을 표현하며
//! `serde`로 런타임의 JSON 형식에 맞춰 직렬화됩니다.

mod address;
mod app;
mod duration;
mod error;
mod handler;
mod selection;

pub use address::{Address, PortRange};
pub use app::{Apps, CertificateLoaders, Config, Layer4App, Route, Server, TlsApp};
pub use duration::Duration;
pub use error::{AddressError, DurationError};
pub use handler::{
    ActiveHealthChecks, ConnectionPolicy, EchoHandler, Handler, HealthChecks, LoadBalancing,
    ProxyHandler, ProxyProtocolHandler, TlsHandler, Upstream,
};
pub use selection::{Candidate, RoundRobinSelection, SelectionPolicy, Selector};
