use ledger_core::{AppError, AppResult};

/// Returns the trimmed value of a required caller field.
pub(crate) fn required_field(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Validation(format!("missing required field '{field}'")))
}
