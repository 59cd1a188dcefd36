use std::net::ToSocketAddrs;

use clientes_core::config::{AppConfig, LoadOptions};
use clientes_core::national_id::{complete_national_id, is_valid_national_id};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_listen_address(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "listen_address",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }
    checks.push(check_national_id_validator());

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_listen_address(config: &AppConfig) -> DoctorCheck {
    let address = config.listen_address();
    match address.to_socket_addrs() {
        Ok(mut resolved) => match resolved.next() {
            Some(socket) => DoctorCheck {
                name: "listen_address",
                status: CheckStatus::Pass,
                details: format!("`{address}` resolves to {socket}"),
            },
            None => DoctorCheck {
                name: "listen_address",
                status: CheckStatus::Fail,
                details: format!("`{address}` did not resolve to any socket address"),
            },
        },
        Err(error) => DoctorCheck {
            name: "listen_address",
            status: CheckStatus::Fail,
            details: format!("`{address}` is not a usable listen address: {error}"),
        },
    }
}

fn check_national_id_validator() -> DoctorCheck {
    let completes = complete_national_id("111444777").as_deref() == Some("11144477735");
    let accepts = is_valid_national_id("52998224725");
    let rejects = !is_valid_national_id("11144477736") && !is_valid_national_id("1114447773");

    if completes && accepts && rejects {
        DoctorCheck {
            name: "national_id_validator",
            status: CheckStatus::Pass,
            details: "reference numbers validate as expected".to_string(),
        }
    } else {
        DoctorCheck {
            name: "national_id_validator",
            status: CheckStatus::Fail,
            details: format!(
                "reference check mismatch (completes={completes}, accepts={accepts}, rejects={rejects})"
            ),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
