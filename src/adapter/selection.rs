use super::args::parse_value;
use super::error::CompileError;
use super::registry::ModuleRegistry;
use crate::caddyfile::Dispenser;
use crate::layer4::SelectionPolicy;

/// `lb_policy <name> [<options...>]`의 선택 정책을 찾아 옵션까지 채웁니다.
///
/// 커서는 정책 이름 위에 있어야 하며, 정책 옵션은 독립된 하위 커서로 읽습니다.
pub(crate) fn resolve(
    d: &mut Dispenser,
    name: &str,
    modules: &ModuleRegistry,
) -> Result<SelectionPolicy, CompileError> {
    let id = ModuleRegistry::selection_id(name);
    let construct = modules.resolve(&id).ok_or_else(|| CompileError::ModuleNotFound {
        location: d.location(),
        module: id,
    })?;

    let mut policy = construct();
    unmarshal(&mut policy, &mut d.new_from_next_segment())?;
    Ok(policy)
}

fn unmarshal(policy: &mut SelectionPolicy, d: &mut Dispenser) -> Result<(), CompileError> {
    match policy {
        SelectionPolicy::RandomChoice { choose } => {
            while d.next() {
                if !d.next_arg() {
                    return Err(d.arg_err().into());
                }
                *choose = parse_value(d, "choice", d.val())?;
            }
        }
        // 나머지 정책은 옵션이 없음
        _ => {
            while d.next() {
                if d.next_arg() {
                    return Err(d.arg_err().into());
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caddyfile::tokenize;

    fn resolve_str(input: &str) -> Result<SelectionPolicy, CompileError> {
        let modules = ModuleRegistry::with_defaults();
        let mut d = Dispenser::new(tokenize("Caddyfile", input).unwrap());
        d.next();
        d.next();
        let name = d.val().to_string();
        resolve(&mut d, &name, &modules)
    }

    #[test]
    fn test_policies_without_options() {
        for (input, expected) in [
            ("lb_policy random", SelectionPolicy::Random),
            ("lb_policy least_conn", SelectionPolicy::LeastConn),
            ("lb_policy first", SelectionPolicy::First),
            ("lb_policy ip_hash", SelectionPolicy::IpHash),
            ("lb_policy round_robin", SelectionPolicy::RoundRobin(Default::default())),
        ] {
            assert_eq!(resolve_str(input).unwrap(), expected);
        }
    }

    #[test]
    fn test_random_choice() {
        assert_eq!(
            resolve_str("lb_policy random_choice 3").unwrap(),
            SelectionPolicy::RandomChoice { choose: 3 }
        );

        match resolve_str("lb_policy random_choice abc") {
            Err(CompileError::InvalidValue { what, value, .. }) => {
                assert_eq!(what, "choice");
                assert_eq!(value, "abc");
            }
            other => panic!("예상치 못한 결과: {:?}", other),
        }

        assert!(matches!(
            resolve_str("lb_policy random_choice"),
            Err(CompileError::Caddyfile(_))
        ));
    }

    #[test]
    fn test_unexpected_option() {
        let err = resolve_str("lb_policy round_robin 1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Caddyfile:1 - Error during parsing: wrong argument count or unexpected line ending after '1'"
        );
    }

    #[test]
    fn test_unknown_policy() {
        match resolve_str("lb_policy weighted") {
            Err(CompileError::ModuleNotFound { module, .. }) => {
                assert_eq!(module, "layer4.proxy.selection_policies.weighted");
            }
            other => panic!("예상치 못한 결과: {:?}", other),
        }
    }

    #[test]
    fn test_parent_cursor_moves_past_options() {
        let modules = ModuleRegistry::with_defaults();
        let mut d = Dispenser::new(tokenize("Caddyfile", "lb_policy random_choice 2\nto a:1").unwrap());
        d.next();
        d.next();
        resolve(&mut d, "random_choice", &modules).unwrap();

        assert_eq!(d.val(), "2");
        assert!(d.next());
        assert_eq!(d.val(), "to");
    }
}
