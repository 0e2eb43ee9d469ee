use caddy_l4_adapter::adapter::{Adapted, Adapter, CompileError};
use caddy_l4_adapter::layer4::{
    Duration, Handler, ProxyHandler, ProxyProtocolHandler, SelectionPolicy, Server,
};
use serde_json::json;

fn adapt(input: &str) -> Result<Adapted, CompileError> {
    Adapter::with_defaults().adapt("Caddyfile", input)
}

fn server<'a>(adapted: &'a Adapted, key: &str) -> &'a Server {
    &adapted.config.layer4().expect("layer4 앱이 없음").servers[key]
}

fn handler_names(server: &Server) -> Vec<&'static str> {
    server
        .routes
        .iter()
        .map(|route| {
            assert_eq!(route.handlers.len(), 1);
            route.handlers[0].name()
        })
        .collect()
}

fn first_proxy(adapted: &Adapted) -> &ProxyHandler {
    let server = server(adapted, "srv0");
    server
        .routes
        .iter()
        .find_map(|route| match &route.handlers[0] {
            Handler::Proxy(proxy) => Some(proxy),
            _ => None,
        })
        .expect("proxy 핸들러가 없음")
}

fn first_proxy_protocol(adapted: &Adapted) -> &ProxyProtocolHandler {
    match &server(adapted, "srv0").routes[0].handlers[0] {
        Handler::ProxyProtocol(handler) => handler,
        other => panic!("예상치 못한 핸들러: {:?}", other),
    }
}

#[test]
fn test_route_order_follows_segments() {
    let adapted = adapt(
        r#"
        :8443 {
            proxy_protocol {
                allow 10.0.0.0/8
            }
            tls
            unknown_directive foo
            proxy 10.0.0.1:443
            echo
        }
        "#,
    )
    .unwrap();

    assert_eq!(
        handler_names(server(&adapted, "srv0")),
        vec!["proxy_protocol", "tls", "proxy", "echo"]
    );
}

#[test]
fn test_server_order_follows_blocks() {
    let mut input = String::new();
    for port in 9000..9012 {
        input.push_str(&format!(":{} {{\n\techo\n}}\n", port));
    }

    let adapted = adapt(&input).unwrap();
    let servers = &adapted.config.layer4().unwrap().servers;

    let keys: Vec<&str> = servers.keys().map(String::as_str).collect();
    let expected: Vec<String> = (0..12).map(|i| format!("srv{}", i)).collect();
    assert_eq!(keys, expected);

    for (i, server) in servers.values().enumerate() {
        assert_eq!(server.listen, vec![format!(":{}", 9000 + i)]);
    }

    // 직렬화된 JSON에서도 순서 유지
    let json = adapted.to_json(false).unwrap();
    assert!(json.find("\"srv2\"").unwrap() < json.find("\"srv10\"").unwrap());
}

#[test]
fn test_listen_keys_are_verbatim() {
    let adapted = adapt("tcp/:5000, udp://[::1]:5353, example.com {\n\techo\n}").unwrap();
    assert_eq!(
        server(&adapted, "srv0").listen,
        vec!["tcp/:5000", "udp://[::1]:5353", "example.com"]
    );
}

#[test]
fn test_proxy_without_upstreams() {
    let adapted = adapt(":5000 {\n\tproxy\n}").unwrap();
    let proxy = first_proxy(&adapted);
    assert!(proxy.upstreams.is_empty());

    let adapted = adapt(":5000 {\n\tproxy {\n\t\tlb_try_duration 1s\n\t}\n}").unwrap();
    assert!(first_proxy(&adapted).upstreams.is_empty());
}

#[test]
fn test_duplicate_lb_policy_always_fails() {
    let names = ["random", "least_conn", "round_robin", "first", "ip_hash", "random_choice 2"];

    for a in names {
        for b in names {
            let input = format!(
                ":5000 {{\n\tproxy a:1 {{\n\t\tlb_policy {}\n\t\tlb_policy {}\n\t}}\n}}",
                a, b
            );
            match adapt(&input) {
                Err(CompileError::DuplicateDirective { directive, message, .. }) => {
                    assert_eq!(directive, "lb_policy");
                    assert_eq!(message, "load balancing selection policy already specified");
                }
                other => panic!("{} / {}: 예상치 못한 결과: {:?}", a, b, other),
            }
        }
    }
}

#[test]
fn test_random_choice_policy() {
    let adapted = adapt(":5000 {\n\tproxy a:1 b:1 c:1 {\n\t\tlb_policy random_choice 3\n\t}\n}").unwrap();
    assert_eq!(
        first_proxy(&adapted).selection_policy(),
        Some(&SelectionPolicy::RandomChoice { choose: 3 })
    );

    let err = adapt(":5000 {\n\tproxy {\n\t\tlb_policy random_choice abc\n\t}\n}").unwrap_err();
    assert!(matches!(err, CompileError::InvalidValue { .. }));
    assert!(err.to_string().contains("invalid choice value 'abc'"));
}

#[test]
fn test_round_robin_takes_no_arguments() {
    let err = adapt(":5000 {\n\tproxy {\n\t\tlb_policy round_robin 1\n\t}\n}").unwrap_err();
    match &err {
        CompileError::Caddyfile(inner) => assert_eq!(inner.location().line, 3),
        other => panic!("예상치 못한 에러: {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "Caddyfile:3 - Error during parsing: wrong argument count or unexpected line ending after '1'"
    );
}

#[test]
fn test_unknown_selection_policy() {
    let err = adapt(":5000 {\n\tproxy {\n\t\tlb_policy weighted_round_robin\n\t}\n}").unwrap_err();
    match err {
        CompileError::ModuleNotFound { module, location } => {
            assert_eq!(module, "layer4.proxy.selection_policies.weighted_round_robin");
            assert_eq!(location.line, 3);
        }
        other => panic!("예상치 못한 에러: {:?}", other),
    }
}

#[test]
fn test_health_checks_are_merged() {
    let adapted = adapt(
        ":5000 {\n\tproxy a:1 {\n\t\thealth_port 9000\n\t\tlb_policy first\n\t\thealth_interval 10s\n\t}\n}",
    )
    .unwrap();

    let proxy = first_proxy(&adapted);
    let active = proxy.active_health_checks().unwrap();
    assert_eq!(active.port, Some(9000));
    assert_eq!(active.interval, Some(Duration::from_secs(10)));
    assert_eq!(active.timeout, None);
    assert_eq!(proxy.selection_policy(), Some(&SelectionPolicy::First));
}

#[test]
fn test_certificate_automation_list() {
    let with_tls = r#"
        :9000 {
            echo
        }

        a.example:443, b.example:443 {
            tls {
                alpn h2
            }
            proxy 10.0.0.1:443
        }
    "#;
    let adapted = adapt(with_tls).unwrap();
    let tls = adapted.config.tls().expect("tls 앱이 없음");
    assert_eq!(tls.automate(), ["a.example".to_string(), "b.example".to_string()]);
    assert!(adapted.warnings.is_empty());

    let without_tls = with_tls.replace("tls {\n                alpn h2\n            }", "echo");
    assert_ne!(without_tls, with_tls);
    let adapted = adapt(&without_tls).unwrap();
    assert!(adapted.config.tls().is_none());
    assert_eq!(adapted.config.app_names(), vec!["layer4"]);
}

#[test]
fn test_automation_keeps_duplicates_in_order() {
    let adapted = adapt(
        "b.example {\n\ttls\n}\na.example, b.example {\n\ttls\n\ttls\n}",
    )
    .unwrap();
    // 블록마다 한 번씩만 추가
    assert_eq!(
        adapted.config.tls().unwrap().automate(),
        ["b.example".to_string(), "a.example".to_string(), "b.example".to_string()]
    );
}

#[test]
fn test_proxy_protocol_rejects_same_line_args() {
    let err = adapt(":5000 {\n\tproxy_protocol v1\n}").unwrap_err();
    assert!(matches!(err, CompileError::Caddyfile(_)));

    let err = adapt(":5000 {\n\tproxy_protocol v2 {\n\t\ttimeout 5s\n\t}\n}").unwrap_err();
    assert!(matches!(err, CompileError::Caddyfile(_)));
}

#[test]
fn test_proxy_protocol_allow_accumulates() {
    let adapted = adapt(
        ":5000 {\n\tproxy_protocol {\n\t\tallow 10.0.0.0/8\n\t\tallow 192.168.0.0/16\n\t}\n}",
    )
    .unwrap();
    assert_eq!(
        first_proxy_protocol(&adapted).allow,
        vec!["10.0.0.0/8", "192.168.0.0/16"]
    );
}

#[test]
fn test_proxy_protocol_is_strict() {
    let err = adapt(":5000 {\n\tproxy_protocol {\n\t\tdeny 10.0.0.0/8\n\t}\n}").unwrap_err();
    assert!(matches!(err, CompileError::UnknownKey { .. }));
    assert_eq!(
        err.to_string(),
        "Caddyfile:3 - Error during parsing: unrecognized proxy_protocol option 'deny'"
    );
}

#[test]
fn test_permissive_blocks_ignore_unknown_keys() {
    let adapted = adapt(
        ":5000 {\n\ttls {\n\t\tcurves x25519\n\t\talpn h2\n\t}\n\tproxy {\n\t\tto a:1\n\t\tfail_duration 10s\n\t}\n}",
    )
    .unwrap();
    assert_eq!(handler_names(server(&adapted, "srv0")), vec!["tls", "proxy"]);
}

#[test]
fn test_compile_is_idempotent() {
    let input = r#"
        example.com:443 {
            tls
            proxy {
                to 10.0.0.1:443 10.0.0.2:443
                lb_policy round_robin
                health_timeout 3s
            }
        }
    "#;

    let adapter = Adapter::with_defaults();
    let first = adapter.adapt("Caddyfile", input).unwrap();
    let second = adapter.adapt("Caddyfile", input).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_json(true).unwrap(), second.to_json(true).unwrap());
}

#[test]
fn test_first_error_wins() {
    let err = adapt(
        ":1 {\n\tproxy {\n\t\thealth_port nope\n\t}\n}\n:2 {\n\tproxy_protocol v1\n}",
    )
    .unwrap_err();
    match err {
        CompileError::InvalidValue { what, location, .. } => {
            assert_eq!(what, "health_port");
            assert_eq!(location.line, 3);
        }
        other => panic!("예상치 못한 에러: {:?}", other),
    }
}

#[test]
fn test_huge_duration_is_an_error() {
    let value = "340282366920938463463374607431768211.999us";
    let err = adapt(&format!(":1 {{\n\tproxy {{\n\t\thealth_interval {}\n\t}}\n}}", value))
        .unwrap_err();
    match err {
        CompileError::InvalidValue { what, value: got, location, .. } => {
            assert_eq!(what, "health_interval");
            assert_eq!(got, value);
            assert_eq!(location.line, 3);
        }
        other => panic!("예상치 못한 에러: {:?}", other),
    }
}

#[test]
fn test_bad_address_aborts() {
    let err = adapt(":1 {\n\techo\n}\nexample.com:http {\n\techo\n}").unwrap_err();
    assert!(matches!(err, CompileError::Address(_)));
    assert!(err.to_string().starts_with("invalid port 'http'"));

    let err = adapt(":99999 {\n\techo\n}").unwrap_err();
    assert_eq!(err.to_string(), "port 99999 is out of range");
}

#[test]
fn test_full_json_output() {
    let input = r#"
        a.example:443 {
            tls {
                alpn h2 http/1.1
            }
            proxy 10.0.0.1:443 {
                to 10.0.0.2:443
                lb_policy random_choice 2
                lb_try_duration 5s
                lb_try_interval 250ms
                health_port 8080
                health_interval 10s
                health_timeout 2s
                proxy_protocol v2
            }
        }

        :7 {
            proxy_protocol {
                timeout 3s
                allow 10.0.0.0/8
            }
            echo
        }
    "#;

    let adapted = adapt(input).unwrap();
    let value: serde_json::Value = serde_json::from_str(&adapted.to_json(false).unwrap()).unwrap();

    let expected = json!({
        "apps": {
            "layer4": {
                "servers": {
                    "srv0": {
                        "listen": ["a.example:443"],
                        "routes": [
                            {"handle": [{
                                "handler": "tls",
                                "connection_policies": [{"alpn": ["h2", "http/1.1"]}]
                            }]},
                            {"handle": [{
                                "handler": "proxy",
                                "upstreams": [
                                    {"dial": ["10.0.0.1:443"]},
                                    {"dial": ["10.0.0.2:443"]}
                                ],
                                "load_balancing": {
                                    "selection_policy": {"policy": "random_choice", "choose": 2},
                                    "try_duration": 5_000_000_000u64,
                                    "try_interval": 250_000_000u64
                                },
                                "health_checks": {
                                    "active": {
                                        "port": 8080,
                                        "interval": 10_000_000_000u64,
                                        "timeout": 2_000_000_000u64
                                    }
                                },
                                "proxy_protocol": "v2"
                            }]}
                        ]
                    },
                    "srv1": {
                        "listen": [":7"],
                        "routes": [
                            {"handle": [{
                                "handler": "proxy_protocol",
                                "timeout": 3_000_000_000u64,
                                "allow": ["10.0.0.0/8"]
                            }]},
                            {"handle": [{"handler": "echo"}]}
                        ]
                    }
                }
            },
            "tls": {
                "certificates": {"automate": ["a.example"]}
            }
        }
    });

    assert_eq!(value, expected);
}
