use std::fmt::Display;
use std::str::FromStr;

use super::error::CompileError;
use crate::caddyfile::Dispenser;
use crate::layer4::Duration;

/// 같은 줄의 인자 하나를 소비합니다. 없으면 인자 개수 에러
pub(crate) fn single_arg(d: &mut Dispenser) -> Result<String, CompileError> {
    if !d.next_arg() {
        return Err(d.arg_err().into());
    }
    Ok(d.val().to_string())
}

/// 같은 줄의 인자를 하나 이상 소비합니다.
pub(crate) fn one_or_more_args(d: &mut Dispenser) -> Result<Vec<String>, CompileError> {
    let args = d.remaining_args();
    if args.is_empty() {
        return Err(d.arg_err().into());
    }
    Ok(args)
}

pub(crate) fn duration_arg(d: &mut Dispenser, what: &str) -> Result<Duration, CompileError> {
    let value = single_arg(d)?;
    parse_value(d, what, &value)
}

/// 현재 위치에 고정된 값 파싱. 실패하면 값과 이름을 담은 에러
pub(crate) fn parse_value<T>(d: &Dispenser, what: &str, value: &str) -> Result<T, CompileError>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| CompileError::InvalidValue {
        location: d.location(),
        what: what.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}
