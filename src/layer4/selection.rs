use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// 업스트림 선택 정책
///
/// JSON에는 `"policy"` 필드로 태그됩니다. (예: `{"policy": "random_choice", "choose": 2}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SelectionPolicy {
    Random,
    LeastConn,
    RoundRobin(RoundRobinSelection),
    First,
    IpHash,
    RandomChoice {
        #[serde(default)]
        choose: usize,
    },
}

impl SelectionPolicy {
    /// 정책 모듈 이름 (`layer4.proxy.selection_policies.<name>`의 마지막 부분)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::LeastConn => "least_conn",
            Self::RoundRobin(_) => "round_robin",
            Self::First => "first",
            Self::IpHash => "ip_hash",
            Self::RandomChoice { .. } => "random_choice",
        }
    }
}

/// 라운드 로빈 정책. 커서는 실행 상태이므로 직렬화하지 않음
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RoundRobinSelection {
    #[serde(skip)]
    robin: AtomicUsize,
}

impl Clone for RoundRobinSelection {
    fn clone(&self) -> Self {
        Self {
            robin: AtomicUsize::new(self.robin.load(Ordering::Relaxed)),
        }
    }
}

impl PartialEq for RoundRobinSelection {
    fn eq(&self, _other: &Self) -> bool {
        // 설정상으로는 모든 라운드 로빈 정책이 동일
        true
    }
}

/// 선택 대상 업스트림의 현재 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub dial: &'a str,
    pub active_conns: usize,
    pub available: bool,
}

impl<'a> Candidate<'a> {
    pub fn new(dial: &'a str) -> Self {
        Self {
            dial,
            active_conns: 0,
            available: true,
        }
    }
}

/// 후보 목록에서 업스트림 하나를 고르는 기능
pub trait Selector {
    /// 선택된 후보의 인덱스. 사용 가능한 후보가 없으면 `None`
    fn select(&self, pool: &[Candidate<'_>], client: IpAddr) -> Option<usize>;
}

impl Selector for SelectionPolicy {
    fn select(&self, pool: &[Candidate<'_>], client: IpAddr) -> Option<usize> {
        match self {
            Self::Random => available(pool).choose(&mut rand::thread_rng()).copied(),
            Self::LeastConn => least_conn(pool, &available(pool)),
            Self::RoundRobin(selection) => selection.select(pool),
            Self::First => pool.iter().position(|c| c.available),
            Self::IpHash => ip_hash(pool, client),
            Self::RandomChoice { choose } => {
                let sample: Vec<usize> = available(pool)
                    .choose_multiple(&mut rand::thread_rng(), (*choose).max(1))
                    .copied()
                    .collect();
                least_conn(pool, &sample)
            }
        }
    }
}

impl RoundRobinSelection {
    fn select(&self, pool: &[Candidate<'_>]) -> Option<usize> {
        let n = pool.len();
        for _ in 0..n {
            let index = self.robin.fetch_add(1, Ordering::Relaxed) % n;
            if pool[index].available {
                return Some(index);
            }
        }
        None
    }
}

fn available(pool: &[Candidate<'_>]) -> Vec<usize> {
    pool.iter()
        .enumerate()
        .filter(|(_, c)| c.available)
        .map(|(i, _)| i)
        .collect()
}

/// 연결 수가 가장 적은 후보. 동률이면 무작위로 고름
fn least_conn(pool: &[Candidate<'_>], indices: &[usize]) -> Option<usize> {
    let min = indices.iter().map(|&i| pool[i].active_conns).min()?;
    let ties: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|&i| pool[i].active_conns == min)
        .collect();
    ties.choose(&mut rand::thread_rng()).copied()
}

/// 클라이언트 IP 해시로 시작 위치를 정하고 사용 가능한 후보를 찾을 때까지 순회
fn ip_hash(pool: &[Candidate<'_>], client: IpAddr) -> Option<usize> {
    let n = pool.len();
    if n == 0 {
        return None;
    }
    let start = fnv1a(client.to_string().as_bytes()) as usize % n;
    (0..n).map(|i| (start + i) % n).find(|&i| pool[i].available)
}

fn fnv1a(bytes: &[u8]) -> u32 {
    const OFFSET: u32 = 2_166_136_261;
    const PRIME: u32 = 16_777_619;
    bytes
        .iter()
        .fold(OFFSET, |hash, &b| (hash ^ b as u32).wrapping_mul(PRIME))
}
