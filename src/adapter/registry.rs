use std::collections::HashMap;

use crate::layer4::SelectionPolicy;

/// 선택 정책 모듈 ID 네임스페이스
pub const SELECTION_NAMESPACE: &str = "layer4.proxy.selection_policies";

/// 선택 정책 인스턴스를 새로 만드는 생성자
pub type PolicyConstructor = fn() -> SelectionPolicy;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("모듈 ID '{0}'는 선택 정책 네임스페이스에 속하지 않습니다")]
    OutsideNamespace(String),

    #[error("모듈 '{0}'가 이미 등록되어 있습니다")]
    Duplicate(String),
}

/// 모듈 ID로 선택 정책 생성자를 찾는 레지스트리
///
/// 생성자의 반환 타입이 `SelectionPolicy`로 고정되어 있으므로,
/// 여기서 찾은 모듈은 항상 `Selector`를 구현합니다.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    constructors: HashMap<String, PolicyConstructor>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 선택 정책 여섯 가지를 등록한 레지스트리
    pub fn with_defaults() -> Self {
        let defaults: [(&str, PolicyConstructor); 6] = [
            ("random", || SelectionPolicy::Random),
            ("least_conn", || SelectionPolicy::LeastConn),
            ("round_robin", || SelectionPolicy::RoundRobin(Default::default())),
            ("first", || SelectionPolicy::First),
            ("ip_hash", || SelectionPolicy::IpHash),
            ("random_choice", || SelectionPolicy::RandomChoice { choose: 0 }),
        ];

        let constructors = defaults
            .into_iter()
            .map(|(name, ctor)| (Self::selection_id(name), ctor))
            .collect();
        Self { constructors }
    }

    /// 정책 이름을 모듈 ID로 변환 (`round_robin` → `layer4.proxy.selection_policies.round_robin`)
    pub fn selection_id(name: &str) -> String {
        format!("{}.{}", SELECTION_NAMESPACE, name)
    }

    pub fn register(&mut self, id: &str, ctor: PolicyConstructor) -> Result<(), RegistryError> {
        let name = id
            .strip_prefix(SELECTION_NAMESPACE)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or_default();
        if name.is_empty() || name.contains('.') {
            return Err(RegistryError::OutsideNamespace(id.to_string()));
        }
        if self.constructors.contains_key(id) {
            return Err(RegistryError::Duplicate(id.to_string()));
        }

        self.constructors.insert(id.to_string(), ctor);
        Ok(())
    }

    pub fn resolve(&self, id: &str) -> Option<PolicyConstructor> {
        self.constructors.get(id).copied()
    }

    /// 등록된 모듈 ID 목록 (정렬됨)
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
