use clientes_core::national_id::{
    complete_national_id, is_valid_national_id, NATIONAL_ID_LENGTH,
};

use crate::commands::CommandResult;

/// Exit 0 when the id validates (or the base completes), 1 when the checksum
/// fails, 2 when the input does not have the expected shape.
pub fn run(value: &str, complete: bool) -> CommandResult {
    if complete {
        return match complete_national_id(value) {
            Some(full) => CommandResult::success("check-id", full),
            None => CommandResult::failure(
                "check-id",
                "malformed_base",
                format!("`{value}` is not a nine digit base"),
                2,
            ),
        };
    }

    if is_valid_national_id(value) {
        return CommandResult::success("check-id", format!("`{value}` is a valid national id"));
    }

    let well_formed = value.len() == NATIONAL_ID_LENGTH
        && value.bytes().all(|byte| byte.is_ascii_digit());
    if well_formed {
        CommandResult::failure(
            "check-id",
            "invalid_checksum",
            format!("`{value}` failed checksum validation"),
            1,
        )
    } else {
        CommandResult::failure(
            "check-id",
            "malformed_id",
            format!("`{value}` is not an eleven digit national id"),
            2,
        )
    }
}
