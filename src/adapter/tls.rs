use super::args::one_or_more_args;
use super::directive::BlockContext;
use super::error::CompileError;
use crate::caddyfile::Dispenser;
use crate::layer4::{ConnectionPolicy, Handler, TlsHandler};

/// `tls` 디렉티브
///
/// ```text
/// tls {
///     alpn h2 http/1.1
/// }
/// ```
///
/// 연결 정책은 항상 하나만 만들어집니다.
pub(crate) fn compile(d: &mut Dispenser, ctx: &BlockContext<'_>) -> Result<Handler, CompileError> {
    let mut policy = ConnectionPolicy::default();

    while d.next_block(0) {
        match d.val() {
            "alpn" => policy.alpn = Some(one_or_more_args(d)?),
            _ => ctx.unknown_key(d)?,
        }
    }

    Ok(Handler::Tls(TlsHandler {
        connection_policies: vec![policy],
    }))
}
