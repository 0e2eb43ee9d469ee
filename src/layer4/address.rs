use std::fmt;

use super::error::AddressError;

/// 서버 블록 키에서 파싱한 주소
///
/// 형식: `[scheme://]host[:port[-port]][/path]`
///
/// # 예제
///
/// ```
/// use caddy_l4_adapter::layer4::Address;
///
/// let addr = Address::parse("tcp://example.com:8000-8010").unwrap();
/// assert_eq!(addr.scheme.as_deref(), Some("tcp"));
/// assert_eq!(addr.host, "example.com");
/// assert_eq!(addr.port.unwrap().to_string(), "8000-8010");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub original: String,
    pub scheme: Option<String>,
    pub host: String,
    pub port: Option<PortRange>,
    pub path: Option<String>,
}

/// 단일 포트 또는 포트 범위 (양 끝 포함)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl PortRange {
    pub fn single(port: u16) -> Self {
        Self { start: port, end: port }
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl Address {
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let original = input.to_string();
        let remaining = input.trim();

        let (scheme, remaining) = match remaining.split_once("://") {
            Some((scheme, rest)) => (Some(scheme.to_string()), rest),
            None => (None, remaining),
        };

        let (host_port, path) = match remaining.split_once('/') {
            Some((host_port, rest)) => (host_port, Some(format!("/{}", rest))),
            None => (remaining, None),
        };

        let (host, port) = split_host_port(host_port)?;
        let port = match port {
            Some(port) if !port.is_empty() => Some(parse_port_range(port)?),
            _ => None,
        };

        Ok(Self {
            original,
            scheme,
            host: host.to_string(),
            port,
            path,
        })
    }

    /// 호스트가 IP 주소 리터럴인지 여부
    pub fn host_is_ip(&self) -> bool {
        self.host.parse::<std::net::IpAddr>().is_ok()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{}://", scheme)?;
        }
        if self.host.contains(':') {
            write!(f, "[{}]", self.host)?;
        } else {
            write!(f, "{}", self.host)?;
        }
        if let Some(port) = &self.port {
            write!(f, ":{}", port)?;
        }
        if let Some(path) = &self.path {
            write!(f, "{}", path)?;
        }
        Ok(())
    }
}

/// 호스트와 포트 분리
///
/// 대괄호로 감싼 IPv6 주소를 지원합니다. 콜론이 여러 개인 비괄호 입력은
/// 포트가 없는 호스트로 취급합니다.
fn split_host_port(input: &str) -> Result<(&str, Option<&str>), AddressError> {
    if let Some(rest) = input.strip_prefix('[') {
        let end = rest
            .find(']')
            .ok_or_else(|| AddressError::UnclosedBracket(input.to_string()))?;
        let host = &rest[..end];
        let after = &rest[end + 1..];
        return match after.strip_prefix(':') {
            Some(port) => Ok((host, Some(port))),
            None if after.is_empty() => Ok((host, None)),
            None => Ok((input, None)),
        };
    }

    if input.matches(':').count() != 1 {
        return Ok((input, None));
    }
    Ok(match input.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (input, None),
    })
}

fn parse_port_range(port: &str) -> Result<PortRange, AddressError> {
    match port.split_once('-') {
        Some((start, end)) => {
            let range = PortRange {
                start: parse_port(start)?,
                end: parse_port(end)?,
            };
            if range.start > range.end {
                return Err(AddressError::InvalidPortRange(port.to_string()));
            }
            Ok(range)
        }
        None => parse_port(port).map(PortRange::single),
    }
}

fn parse_port(port: &str) -> Result<u16, AddressError> {
    let number: i64 = port.parse().map_err(|e: std::num::ParseIntError| AddressError::InvalidPort {
        port: port.to_string(),
        reason: e.to_string(),
    })?;

    u16::try_from(number).map_err(|_| AddressError::PortOutOfRange(number))
}
