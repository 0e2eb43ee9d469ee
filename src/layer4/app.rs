use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::handler::Handler;

/// 런타임에 전달되는 최상위 설정 트리
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub apps: Apps,
}

/// 앱 이름별 설정. 비어 있는 앱은 JSON에서 생략됨
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Apps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer4: Option<Layer4App>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsApp>,
}

impl Config {
    pub fn layer4(&self) -> Option<&Layer4App> {
        self.apps.layer4.as_ref()
    }

    pub fn tls(&self) -> Option<&TlsApp> {
        self.apps.tls.as_ref()
    }

    /// 등록된 앱 이름 목록
    pub fn app_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.apps.layer4.is_some() {
            names.push("layer4");
        }
        if self.apps.tls.is_some() {
            names.push("tls");
        }
        names
    }
}

/// 라우팅 앱. 서버는 등록 순서(소스 순서)를 유지
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer4App {
    #[serde(default)]
    pub servers: IndexMap<String, Server>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Server {
    #[serde(default)]
    pub listen: Vec<String>,

    /// 런타임은 첫 번째로 매칭되는 라우트를 실행
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default, rename = "handle")]
    pub handlers: Vec<Handler>,
}

impl Route {
    pub fn new(handler: Handler) -> Self {
        Self {
            handlers: vec![handler],
        }
    }
}

/// 인증서 관리 앱
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsApp {
    #[serde(default)]
    pub certificates: CertificateLoaders,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateLoaders {
    /// 자동 발급/갱신 대상 호스트 이름 (중복 허용, 순서 유지)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automate: Option<Vec<String>>,
}

impl TlsApp {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn automate(&self) -> &[String] {
        self.certificates.automate.as_deref().unwrap_or_default()
    }
}
