use std::path::PathBuf;

use thiserror::Error;

/// Exit code for unusable input (missing file, schema, malformed values).
pub const EXIT_INPUT: u8 = 2;
/// Exit code for terminal/UI failures.
pub const EXIT_RUNTIME: u8 = 4;

/// Errors raised while loading the source table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open CSV '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// One or more required columns are absent from the header row.
    #[error("missing required column(s): {}", format_columns(missing))]
    Schema { missing: Vec<String> },

    /// A cases cell that is not a finite number.
    #[error("line {line}: invalid `{column}` value '{value}' (expected a number)")]
    MalformedValue {
        line: u64,
        column: String,
        value: String,
    },
}

fn format_columns(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("`{c}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::new(EXIT_INPUT, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_every_missing_column() {
        let err = LoadError::Schema {
            missing: vec!["Day".to_string(), "Biweekly cases".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing required column(s): `Day`, `Biweekly cases`"
        );
    }

    #[test]
    fn load_errors_map_to_input_exit_code() {
        let err: AppError = LoadError::MalformedValue {
            line: 3,
            column: "Biweekly cases".to_string(),
            value: "abc".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert!(err.to_string().contains("line 3"));
    }
}
