use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use super::error::DurationError;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// 설정 트리에 기록되는 기간 값
///
/// `300ms`, `1.5h`, `1h30m`, `2d` 같은 문자열에서 파싱하며,
/// JSON에는 나노초 정수로 기록됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(StdDuration);

impl Duration {
    pub const ZERO: Duration = Duration(StdDuration::ZERO);

    pub fn from_secs(secs: u64) -> Self {
        Self(StdDuration::from_secs(secs))
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(StdDuration::from_millis(millis))
    }

    pub fn as_nanos(&self) -> u128 {
        self.0.as_nanos()
    }

    /// 기간 문자열 파싱
    ///
    /// # 예제
    ///
    /// ```
    /// use caddy_l4_adapter::layer4::Duration;
    ///
    /// assert_eq!(Duration::parse("1m30s").unwrap(), Duration::from_secs(90));
    /// assert_eq!(Duration::parse("1.5s").unwrap(), Duration::from_millis(1500));
    /// assert!(Duration::parse("10").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, DurationError> {
        let s = input.strip_prefix('+').unwrap_or(input);
        if s.starts_with('-') {
            return Err(DurationError::Negative(input.to_string()));
        }
        if s == "0" {
            return Ok(Self::ZERO);
        }
        if s.is_empty() {
            return Err(DurationError::Invalid(input.to_string()));
        }

        let mut total: u128 = 0;
        let mut rest = s;

        while !rest.is_empty() {
            let int_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            let (int_part, after) = rest.split_at(int_end);

            let (frac_part, after) = match after.strip_prefix('.') {
                Some(frac) => {
                    let frac_end = frac.find(|c: char| !c.is_ascii_digit()).unwrap_or(frac.len());
                    frac.split_at(frac_end)
                }
                None => ("", after),
            };

            if int_part.is_empty() && frac_part.is_empty() {
                return Err(DurationError::Invalid(input.to_string()));
            }

            let unit_end = after
                .find(|c: char| c.is_ascii_digit() || c == '.')
                .unwrap_or(after.len());
            let (unit, after) = after.split_at(unit_end);
            if unit.is_empty() {
                return Err(DurationError::MissingUnit(input.to_string()));
            }

            let scale = unit_scale(unit).ok_or_else(|| DurationError::UnknownUnit {
                unit: unit.to_string(),
                input: input.to_string(),
            })?;

            let overflow = || DurationError::Overflow(input.to_string());

            let whole: u128 = if int_part.is_empty() {
                0
            } else {
                int_part.parse().map_err(|_| overflow())?
            };
            let mut value = whole.checked_mul(scale).ok_or_else(overflow)?;

            if !frac_part.is_empty() {
                // 나노초 정밀도 이상의 자릿수는 버림
                let digits = &frac_part[..frac_part.len().min(18)];
                let frac: u128 = digits.parse().map_err(|_| overflow())?;
                let frac_nanos = frac * scale / 10u128.pow(digits.len() as u32);
                value = value.checked_add(frac_nanos).ok_or_else(overflow)?;
            }

            total = total.checked_add(value).ok_or_else(overflow)?;
            rest = after;
        }

        if total > i64::MAX as u128 {
            return Err(DurationError::Overflow(input.to_string()));
        }

        let secs = (total / NANOS_PER_SECOND) as u64;
        let nanos = (total % NANOS_PER_SECOND) as u32;
        Ok(Self(StdDuration::new(secs, nanos)))
    }
}

fn unit_scale(unit: &str) -> Option<u128> {
    let scale = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SECOND,
        "m" => 60 * NANOS_PER_SECOND,
        "h" => 3_600 * NANOS_PER_SECOND,
        "d" => 86_400 * NANOS_PER_SECOND,
        _ => return None,
    };
    Some(scale)
}

impl FromStr for Duration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl serde::Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // i64 범위는 파싱 시점에 보장됨
        serializer.serialize_u64(self.0.as_nanos() as u64)
    }
}

// 나노초 정수 또는 기간 문자열을 받는 방문자
struct DurationVisitor;

impl<'de> serde::de::Visitor<'de> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("nanoseconds as an integer or a duration string")
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Duration(StdDuration::from_nanos(value)))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        u64::try_from(value)
            .map(|nanos| Duration(StdDuration::from_nanos(nanos)))
            .map_err(|_| E::custom(format!("negative duration: {}", value)))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Duration::parse(value).map_err(E::custom)
    }
}

impl<'de> serde::Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(DurationVisitor)
    }
}
