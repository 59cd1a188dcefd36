use std::future::Future;
use std::time::Instant;

use clientes_core::config::{AppConfig, LoadOptions};
use clientes_core::domain::customer::{CustomerChanges, CustomerDraft, CustomerId};
use clientes_core::errors::DomainError;
use clientes_core::national_id::complete_national_id;
use clientes_db::{CustomerRepository, InMemoryCustomerRepository, RepositoryError};
use serde::Serialize;
use tokio::runtime::Runtime;

use crate::commands::CommandResult;

const LIFECYCLE_STEPS: [&str; 6] = [
    "reject_invalid_identity",
    "create_sequential_ids",
    "update_contact_fields",
    "update_missing_not_found",
    "delete_then_lookup",
    "delete_missing_not_found",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SmokeStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: SmokeStatus,
    elapsed_ms: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    command: &'static str,
    status: SmokeStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<SmokeCheck>,
}

/// Runs checks in order; the first failure turns every later check into a skip.
struct StepRunner<'a> {
    runtime: &'a Runtime,
    checks: Vec<SmokeCheck>,
    halted: bool,
}

impl StepRunner<'_> {
    fn step(
        &mut self,
        name: &'static str,
        check: impl Future<Output = Result<String, String>>,
    ) {
        if self.halted {
            self.checks.push(skipped(name));
            return;
        }

        let started = Instant::now();
        let outcome = self.runtime.block_on(check);
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let (status, message) = match outcome {
            Ok(message) => (SmokeStatus::Pass, message),
            Err(message) => {
                self.halted = true;
                (SmokeStatus::Fail, message)
            }
        };
        self.checks.push(SmokeCheck { name, status, elapsed_ms, message });
    }
}

pub fn run() -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    let config = match timed_check(|| AppConfig::load(LoadOptions::default())) {
        Ok((elapsed_ms, config)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Pass,
                elapsed_ms,
                message: "configuration loaded and validated".to_string(),
            });
            config
        }
        Err((elapsed_ms, error)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Fail,
                elapsed_ms,
                message: error.to_string(),
            });
            checks.extend(LIFECYCLE_STEPS.into_iter().map(skipped));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            checks.push(SmokeCheck {
                name: "runtime_init",
                status: SmokeStatus::Fail,
                elapsed_ms: 0,
                message: format!("failed to initialize async runtime: {error}"),
            });
            checks.extend(LIFECYCLE_STEPS.into_iter().map(skipped));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let repo = InMemoryCustomerRepository::new(config.repository.id_strategy);
    let mut runner = StepRunner { runtime: &runtime, checks, halted: false };
    run_lifecycle(&mut runner, &repo);

    finalize_report(runner.checks, started.elapsed().as_millis() as u64)
}

fn run_lifecycle(runner: &mut StepRunner<'_>, repo: &InMemoryCustomerRepository) {
    let [first_id, second_id] = match (national_id("111444777"), national_id("529982247")) {
        (Ok(first), Ok(second)) => [first, second],
        (Err(message), _) | (_, Err(message)) => {
            runner.halted = true;
            runner.checks.push(SmokeCheck {
                name: "fixture_identity",
                status: SmokeStatus::Fail,
                elapsed_ms: 0,
                message,
            });
            runner.checks.extend(LIFECYCLE_STEPS.into_iter().map(skipped));
            return;
        }
    };

    runner.step("reject_invalid_identity", async {
        let mut tampered = first_id.clone();
        tampered.pop();
        tampered.push(if first_id.ends_with('9') { '0' } else { '9' });

        match repo.create(draft("Smoke Invalid", &tampered)).await {
            Err(RepositoryError::Domain(DomainError::InvalidIdentity { .. })) => {}
            other => return Err(format!("expected InvalidIdentity, got {other:?}")),
        }
        if !repo.is_empty().await {
            return Err("rejected create left a record behind".to_string());
        }
        Ok(format!("`{tampered}` rejected, repository still empty"))
    });

    runner.step("create_sequential_ids", async {
        let first = repo.create(draft("Smoke First", &first_id)).await.map_err(describe)?;
        let second = repo.create(draft("Smoke Second", &second_id)).await.map_err(describe)?;
        if (first.id, second.id) != (CustomerId(1), CustomerId(2)) {
            return Err(format!("expected ids 1 and 2, got {} and {}", first.id, second.id));
        }
        Ok("created ids 1 and 2".to_string())
    });

    runner.step("update_contact_fields", async {
        let before = repo
            .get_by_id(CustomerId(1))
            .await
            .ok_or_else(|| "customer 1 vanished".to_string())?;
        let updated = repo
            .update(CustomerChanges {
                id: CustomerId(1),
                name: "Smoke First Updated".to_string(),
                email: "smoke.updated@example.com".to_string(),
                phone: Some("+55 11 3333-4444".to_string()),
                national_id: second_id.clone(),
            })
            .await
            .map_err(describe)?;

        if updated.name != "Smoke First Updated" || updated.email != "smoke.updated@example.com" {
            return Err("contact fields were not overwritten".to_string());
        }
        if updated.national_id != before.national_id || updated.created_at != before.created_at {
            return Err("identity fields changed on update".to_string());
        }
        match updated.updated_at {
            Some(updated_at) if updated_at >= updated.created_at => {
                Ok(format!("customer 1 updated at {}", updated_at.to_rfc3339()))
            }
            other => Err(format!("unexpected updatedAt {other:?}")),
        }
    });

    runner.step("update_missing_not_found", async {
        let before = repo.get_all().await;
        let result = repo
            .update(CustomerChanges {
                id: CustomerId(99),
                name: "Nobody".to_string(),
                email: "nobody@example.com".to_string(),
                phone: None,
                national_id: first_id.clone(),
            })
            .await;
        expect_not_found(result, CustomerId(99))?;
        if repo.get_all().await != before {
            return Err("failed update changed the collection".to_string());
        }
        Ok("customer 99 reported as not found".to_string())
    });

    runner.step("delete_then_lookup", async {
        repo.delete(CustomerId(1)).await.map_err(describe)?;
        if repo.get_by_id(CustomerId(1)).await.is_some() {
            return Err("deleted customer is still visible".to_string());
        }
        let remaining: Vec<CustomerId> =
            repo.get_all().await.into_iter().map(|customer| customer.id).collect();
        if remaining != [CustomerId(2)] {
            return Err(format!("expected only customer 2 to remain, got {remaining:?}"));
        }
        Ok(format!("customer 1 removed, {} record(s) left", repo.len().await))
    });

    runner.step("delete_missing_not_found", async {
        expect_not_found(repo.delete(CustomerId(1)).await, CustomerId(1))?;
        Ok("second delete of customer 1 reported as not found".to_string())
    });
}

fn national_id(base: &str) -> Result<String, String> {
    complete_national_id(base).ok_or_else(|| format!("`{base}` is not a nine digit base"))
}

fn draft(name: &str, national_id: &str) -> CustomerDraft {
    CustomerDraft {
        name: name.to_string(),
        email: "smoke@example.com".to_string(),
        phone: None,
        national_id: national_id.to_string(),
        active: true,
    }
}

fn expect_not_found<T: std::fmt::Debug>(
    result: Result<T, RepositoryError>,
    id: CustomerId,
) -> Result<(), String> {
    match result {
        Err(RepositoryError::Domain(DomainError::NotFound { id: missing })) if missing == id => {
            Ok(())
        }
        other => Err(format!("expected NotFound for customer {id}, got {other:?}")),
    }
}

fn describe(error: RepositoryError) -> String {
    error.to_string()
}

fn timed_check<T, E>(check: impl FnOnce() -> Result<T, E>) -> Result<(u64, T), (u64, E)> {
    let started = Instant::now();
    match check() {
        Ok(value) => Ok((started.elapsed().as_millis() as u64, value)),
        Err(error) => Err((started.elapsed().as_millis() as u64, error)),
    }
}

fn skipped(name: &'static str) -> SmokeCheck {
    SmokeCheck {
        name,
        status: SmokeStatus::Skipped,
        elapsed_ms: 0,
        message: "skipped due previous failure".to_string(),
    }
}

fn finalize_report(checks: Vec<SmokeCheck>, total_elapsed_ms: u64) -> CommandResult {
    let passed = checks.iter().filter(|check| check.status == SmokeStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status == SmokeStatus::Fail);

    let report = SmokeReport {
        command: "smoke",
        status: if failed { SmokeStatus::Fail } else { SmokeStatus::Pass },
        summary: format!("smoke: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"smoke\",\"status\":\"fail\",\"summary\":\"serialization failed\",\"error\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    });

    CommandResult { exit_code: if failed { 6 } else { 0 }, output: format!("{human}\n{machine}") }
}
