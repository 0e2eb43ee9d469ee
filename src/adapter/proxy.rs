use super::args::{duration_arg, one_or_more_args, parse_value, single_arg};
use super::directive::BlockContext;
use super::error::CompileError;
use super::selection;
use crate::caddyfile::Dispenser;
use crate::layer4::{Handler, ProxyHandler};

/// `proxy` 디렉티브
///
/// ```text
/// proxy [<upstreams...>] {
///     to <upstreams...>
///     lb_policy <name> [<options...>]
///     lb_try_duration <duration>
///     lb_try_interval <interval>
///     health_port <port>
///     health_interval <interval>
///     health_timeout <duration>
///     proxy_protocol <v1|v2>
/// }
/// ```
pub(crate) fn compile(d: &mut Dispenser, ctx: &BlockContext<'_>) -> Result<Handler, CompileError> {
    let mut handler = ProxyHandler::default();
    handler.push_upstreams(d.remaining_args());

    let nesting = d.nesting();
    while d.next_block(nesting) {
        let key = d.val().to_string();
        match key.as_str() {
            "to" => handler.push_upstreams(one_or_more_args(d)?),

            "lb_policy" => {
                let name = single_arg(d)?;
                if handler.selection_policy().is_some() {
                    return Err(CompileError::DuplicateDirective {
                        location: d.location(),
                        directive: key,
                        message: "load balancing selection policy already specified".to_string(),
                    });
                }
                let policy = selection::resolve(d, &name, ctx.modules)?;
                handler.load_balancing_mut().selection_policy = Some(policy);
            }

            "lb_try_duration" => {
                handler.load_balancing_mut().try_duration = Some(duration_arg(d, &key)?);
            }
            "lb_try_interval" => {
                handler.load_balancing_mut().try_interval = Some(duration_arg(d, &key)?);
            }

            "health_port" => {
                let value = single_arg(d)?;
                let port: u16 = parse_value(d, &key, &value)?;
                handler.active_health_checks_mut().port = Some(port);
            }
            "health_interval" => {
                handler.active_health_checks_mut().interval = Some(duration_arg(d, &key)?);
            }
            "health_timeout" => {
                handler.active_health_checks_mut().timeout = Some(duration_arg(d, &key)?);
            }

            // 버전 값 검증은 런타임이 담당
            "proxy_protocol" => handler.proxy_protocol = Some(single_arg(d)?),

            _ => ctx.unknown_key(d)?,
        }
    }

    Ok(Handler::Proxy(handler))
}
