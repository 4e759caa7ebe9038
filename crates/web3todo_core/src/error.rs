use std::fmt;

/// Failure surface of the board: rejected command input (blank creation
/// fields, bad overrides, unparseable lines), data that cannot be rendered
/// (date formatting, config JSON), and I/O on the config file or the
/// interactive stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorKind {
    InvalidInput,
    InvalidData,
    Io,
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self {
            kind: ErrorKind::InvalidInput,
            message: message.into(),
        }
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self {
            kind: ErrorKind::InvalidData,
            message: message.into(),
        }
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self {
            kind: ErrorKind::Io,
            message: message.into(),
        }
    }

    /// Stable code used in session output and test assertions.
    pub fn code(&self) -> &'static str {
        match self.kind {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::InvalidData => "invalid_data",
            ErrorKind::Io => "io_error",
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}
