use serde::Serialize;

/// Broad failure classes surfaced at the query boundary.
///
/// Each kind maps to a stable process exit code so scripts can tell a missing
/// data file apart from a typo in `--unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A source file is missing, unreadable, or not a sales dataset.
    DataUnavailable,
    /// A query parameter (unit, metric, date bound) was rejected.
    InvalidParameter,
    /// A value inside the dataset could not be interpreted (e.g. a malformed date).
    Parse,
    /// Configuration (env / `.env` / flags) is invalid.
    Config,
    /// Writing an export or report failed.
    Io,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Config | ErrorKind::InvalidParameter => 2,
            ErrorKind::DataUnavailable => 3,
            ErrorKind::Parse => 4,
            ErrorKind::Io => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::DataUnavailable => "data_unavailable",
            ErrorKind::InvalidParameter => "invalid_parameter",
            ErrorKind::Parse => "parse",
            ErrorKind::Config => "config",
            ErrorKind::Io => "io",
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DataUnavailable, message)
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParameter, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }

    /// Structured body for JSON consumers.
    pub fn body(&self) -> ErrorBody<'_> {
        ErrorBody {
            error: &self.message,
            kind: self.kind,
        }
    }
}

/// `{ "error": "...", "kind": "..." }`
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub kind: ErrorKind,
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_distinguish_kinds() {
        assert_eq!(AppError::invalid_parameter("x").exit_code(), 2);
        assert_eq!(AppError::data_unavailable("x").exit_code(), 3);
        assert_eq!(AppError::parse("x").exit_code(), 4);
    }

    #[test]
    fn body_serializes_kind_and_message() {
        let err = AppError::data_unavailable("Failed to open 'a.csv'");
        let json = serde_json::to_string(&err.body()).unwrap();
        assert_eq!(json, r#"{"error":"Failed to open 'a.csv'","kind":"data_unavailable"}"#);
    }
}
