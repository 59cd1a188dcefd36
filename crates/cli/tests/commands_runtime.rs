use std::env;
use std::sync::{Mutex, OnceLock};

use clientes_cli::commands::{check_id, config, doctor, seed, smoke};
use serde_json::Value;

#[test]
fn check_id_accepts_valid_number() {
    let result = check_id::run("11144477735", false);
    assert_eq!(result.exit_code, 0, "expected valid national id");

    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "check-id");
    assert_eq!(payload["status"], "ok");
    assert!(payload["error_class"].is_null());
}

#[test]
fn check_id_rejects_bad_checksum_with_exit_one() {
    let result = check_id::run("11144477736", false);
    assert_eq!(result.exit_code, 1, "expected checksum failure code");

    let payload = parse_payload(&result.output);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_class"], "invalid_checksum");
}

#[test]
fn check_id_flags_malformed_input() {
    for value in ["1114447773", "111.444.777-35", "abcdefghijk"] {
        let result = check_id::run(value, false);
        assert_eq!(result.exit_code, 2, "`{value}` should be reported as malformed");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "malformed_id");
    }
}

#[test]
fn check_id_rejects_surrounding_whitespace() {
    for value in [" 11144477735", "11144477735 ", "\t11144477735"] {
        let result = check_id::run(value, false);
        assert_eq!(result.exit_code, 2, "`{value}` should not validate");
        assert_eq!(parse_payload(&result.output)["error_class"], "malformed_id");
    }

    let padded_base = check_id::run(" 529982247", true);
    assert_eq!(padded_base.exit_code, 2);
}

#[test]
fn check_id_completes_nine_digit_base() {
    let result = check_id::run("529982247", true);
    assert_eq!(result.exit_code, 0, "expected completion success");

    let payload = parse_payload(&result.output);
    assert_eq!(payload["message"], "52998224725");

    let malformed = check_id::run("52998224", true);
    assert_eq!(malformed.exit_code, 2);
    assert_eq!(parse_payload(&malformed.output)["error_class"], "malformed_base");
}

#[test]
fn seed_reports_assigned_ids_with_default_env() {
    with_env(&[], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 0, "expected deterministic seed success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");

        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.starts_with("4 demo customer(s) loaded"));
        assert!(message.contains("  - 1: Ana Souza (11144477735)"));
        assert!(message.contains("  - 2: Bruno Lima (52998224725)"));
        assert!(message.contains("  - 4: Davi Rocha"));
    });
}

#[test]
fn seed_is_deterministic_across_runs() {
    with_env(&[], || {
        let first = parse_payload(&seed::run().output);
        let second = parse_payload(&seed::run().output);

        assert_eq!(first["status"], "ok");
        assert_eq!(first["message"], second["message"]);
    });
}

#[test]
fn seed_returns_config_failure_for_invalid_log_level() {
    with_env(&[("CLIENTES_LOGGING_LEVEL", "verbose")], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn smoke_passes_every_lifecycle_step() {
    with_env(&[], || {
        let result = smoke::run();
        assert_eq!(result.exit_code, 0, "expected successful smoke report: {}", result.output);

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["command"], "smoke");
        assert_eq!(payload["status"], "pass");

        let names: Vec<&str> = payload["checks"]
            .as_array()
            .map(|checks| checks.iter().filter_map(|check| check["name"].as_str()).collect())
            .unwrap_or_default();
        assert_eq!(
            names,
            vec![
                "config_validation",
                "reject_invalid_identity",
                "create_sequential_ids",
                "update_contact_fields",
                "update_missing_not_found",
                "delete_then_lookup",
                "delete_missing_not_found",
            ]
        );
    });
}

#[test]
fn smoke_passes_under_max_plus_one_strategy() {
    with_env(&[("CLIENTES_REPOSITORY_ID_STRATEGY", "max-plus-one")], || {
        let result = smoke::run();
        assert_eq!(result.exit_code, 0, "expected successful smoke report: {}", result.output);
    });
}

#[test]
fn smoke_returns_failure_when_config_invalid() {
    with_env(&[("CLIENTES_SERVER_PORT", "not-a-port")], || {
        let result = smoke::run();
        assert_eq!(result.exit_code, 6, "expected smoke failure code");

        let payload = parse_payload(last_line(&result.output));
        assert_eq!(payload["command"], "smoke");
        assert_eq!(payload["status"], "fail");
        assert_eq!(payload["checks"][0]["status"], "fail");
        assert_eq!(payload["checks"][1]["status"], "skipped");
    });
}

#[test]
fn doctor_json_reports_pass_with_defaults() {
    with_env(&[], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0, "expected doctor success: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "pass");
        assert_eq!(payload["checks"][2]["name"], "national_id_validator");
    });
}

#[test]
fn doctor_skips_listen_check_when_config_fails() {
    with_env(&[("CLIENTES_SERVER_BIND_ADDRESS", "not an address")], || {
        let result = doctor::run(false);
        assert_eq!(result.exit_code, 1);
        assert!(result.output.starts_with("doctor: one or more readiness checks failed"));
        assert!(result.output.contains("- [fail] config_validation"));
        assert!(result.output.contains("- [skip] listen_address"));
        assert!(result.output.contains("- [ok] national_id_validator"));
    });
}

#[test]
fn config_attributes_env_sources() {
    with_env(&[("CLIENTES_SERVER_PORT", "9191"), ("CLIENTES_LOG_LEVEL", "debug")], || {
        let output = config::run();

        assert!(output.contains("- server.port = 9191 (source: env (CLIENTES_SERVER_PORT))"));
        assert!(output.contains("- logging.level = debug (source: env (CLIENTES_LOG_LEVEL))"));
        assert!(output.contains("- server.bind_address = 127.0.0.1 (source: default)"));
        assert!(output.contains("- listen address: 127.0.0.1:9191"));
    });
}

#[test]
fn config_ignores_blank_env_values() {
    with_env(&[("CLIENTES_SERVER_PORT", ""), ("CLIENTES_LOGGING_LEVEL", "   ")], || {
        let output = config::run();

        assert!(output.contains("- server.port = 8080 (source: default)"), "{output}");
        assert!(output.contains("- logging.level = info (source: default)"), "{output}");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn last_line(output: &str) -> &str {
    output.lines().last().unwrap_or_default()
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "CLIENTES_SERVER_BIND_ADDRESS",
        "CLIENTES_SERVER_PORT",
        "CLIENTES_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "CLIENTES_REPOSITORY_ID_STRATEGY",
        "CLIENTES_REPOSITORY_SEED_DEMO_DATA",
        "CLIENTES_LOGGING_LEVEL",
        "CLIENTES_LOGGING_FORMAT",
        "CLIENTES_LOG_LEVEL",
        "CLIENTES_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
