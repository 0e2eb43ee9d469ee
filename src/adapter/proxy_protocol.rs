use super::args::{duration_arg, one_or_more_args};
use super::directive::BlockContext;
use super::error::CompileError;
use crate::caddyfile::Dispenser;
use crate::layer4::{Handler, ProxyProtocolHandler};

/// `proxy_protocol` 디렉티브. 같은 줄 인자는 받지 않음
///
/// ```text
/// proxy_protocol {
///     timeout <duration>
///     allow <cidrs...>
/// }
/// ```
pub(crate) fn compile(d: &mut Dispenser, ctx: &BlockContext<'_>) -> Result<Handler, CompileError> {
    let mut handler = ProxyProtocolHandler::default();

    if !d.remaining_args().is_empty() {
        return Err(d.arg_err().into());
    }

    let nesting = d.nesting();
    while d.next_block(nesting) {
        match d.val() {
            "timeout" => handler.timeout = Some(duration_arg(d, "timeout")?),
            "allow" => handler.allow.extend(one_or_more_args(d)?),
            _ => ctx.unknown_key(d)?,
        }
    }

    Ok(Handler::ProxyProtocol(handler))
}
