use super::directive::BlockContext;
use super::error::CompileError;
use crate::caddyfile::Dispenser;
use crate::layer4::{EchoHandler, Handler};

/// `echo`: 인자도 블록도 받지 않음
pub(crate) fn compile(_d: &mut Dispenser, _ctx: &BlockContext<'_>) -> Result<Handler, CompileError> {
    Ok(Handler::Echo(EchoHandler::default()))
}
