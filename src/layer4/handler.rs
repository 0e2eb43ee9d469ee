use serde::{Deserialize, Serialize};

use super::duration::Duration;
use super::selection::SelectionPolicy;

/// 라우트에 연결되는 핸들러
///
/// JSON에는 핸들러를 만든 디렉티브 이름이 `"handler"` 필드로 태그됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "handler", rename_all = "snake_case")]
pub enum Handler {
    Echo(EchoHandler),
    Tls(TlsHandler),
    Proxy(ProxyHandler),
    ProxyProtocol(ProxyProtocolHandler),
}

impl Handler {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Echo(_) => "echo",
            Self::Tls(_) => "tls",
            Self::Proxy(_) => "proxy",
            Self::ProxyProtocol(_) => "proxy_protocol",
        }
    }
}

/// 받은 바이트를 그대로 돌려보내는 핸들러
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoHandler {}

/// TLS 종료 핸들러
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsHandler {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connection_policies: Vec<ConnectionPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpn: Option<Vec<String>>,
}

/// 업스트림으로 연결을 중계하는 핸들러
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyHandler {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upstreams: Vec<Upstream>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancing: Option<LoadBalancing>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_checks: Option<HealthChecks>,

    /// 업스트림 연결 시 보낼 PROXY protocol 버전 (`v1`, `v2`). 값 검증은 런타임 몫
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_protocol: Option<String>,
}

impl ProxyHandler {
    /// 주소마다 업스트림 하나씩 추가
    pub fn push_upstreams<I, S>(&mut self, addresses: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.upstreams
            .extend(addresses.into_iter().map(|addr| Upstream::new(addr)));
    }

    /// 로드밸런싱 설정. 없으면 기본값으로 생성
    pub fn load_balancing_mut(&mut self) -> &mut LoadBalancing {
        self.load_balancing.get_or_insert_with(LoadBalancing::default)
    }

    /// 능동 헬스체크 설정. 상위 컨테이너까지 없으면 생성
    pub fn active_health_checks_mut(&mut self) -> &mut ActiveHealthChecks {
        self.health_checks
            .get_or_insert_with(HealthChecks::default)
            .active
            .get_or_insert_with(ActiveHealthChecks::default)
    }

    pub fn selection_policy(&self) -> Option<&SelectionPolicy> {
        self.load_balancing
            .as_ref()
            .and_then(|lb| lb.selection_policy.as_ref())
    }

    pub fn active_health_checks(&self) -> Option<&ActiveHealthChecks> {
        self.health_checks.as_ref().and_then(|hc| hc.active.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upstream {
    pub dial: Vec<String>,
}

impl Upstream {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            dial: vec![address.into()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_policy: Option<SelectionPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub try_duration: Option<Duration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub try_interval: Option<Duration>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthChecks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<ActiveHealthChecks>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveHealthChecks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<Duration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

/// PROXY protocol 헤더를 벗겨내는 핸들러
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyProtocolHandler {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,

    /// 헤더를 보낼 수 있는 CIDR 목록
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow: Vec<String>,
}
