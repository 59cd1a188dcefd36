pub mod check_id;
pub mod config;
pub mod doctor;
pub mod seed;
pub mod smoke;

use serde::Serialize;

/// What a subcommand hands back to `main`: the process exit code and the text
/// written to stdout.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Ok,
    Error,
}

/// Single-line JSON envelope shared by `check-id` and `seed`.
/// `error_class` is always present and `null` on success.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    command: &'a str,
    status: Status,
    error_class: Option<&'a str>,
    message: &'a str,
}

impl Envelope<'_> {
    fn render(&self) -> String {
        serde_json::to_value(self).map(|value| value.to_string()).unwrap_or_else(|error| {
            serde_json::json!({
                "command": self.command,
                "status": "error",
                "error_class": "serialization",
                "message": error.to_string(),
            })
            .to_string()
        })
    }
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let envelope =
            Envelope { command, status: Status::Ok, error_class: None, message: &message };
        Self { exit_code: 0, output: envelope.render() }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let message = message.into();
        let envelope = Envelope {
            command,
            status: Status::Error,
            error_class: Some(error_class),
            message: &message,
        };
        Self { exit_code, output: envelope.render() }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::CommandResult;

    fn parse(result: &CommandResult) -> Value {
        serde_json::from_str(&result.output).expect("envelope is JSON")
    }

    #[test]
    fn success_envelope_keeps_null_error_class() {
        let result = CommandResult::success("seed", "4 demo customer(s) loaded");
        let payload = parse(&result);

        assert_eq!(result.exit_code, 0);
        assert_eq!(payload["status"], "ok");
        assert!(payload.get("error_class").is_some_and(Value::is_null));
        assert!(!result.output.contains('\n'));
    }

    #[test]
    fn failure_envelope_escapes_message_text() {
        let result = CommandResult::failure("check-id", "malformed_id", "`\"x\"\n` is bad", 2);
        let payload = parse(&result);

        assert_eq!(result.exit_code, 2);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "malformed_id");
        assert_eq!(payload["message"], "`\"x\"\n` is bad");
    }
}
