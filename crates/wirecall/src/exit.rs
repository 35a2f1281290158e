use std::fmt;
use std::io;

use wirecall_channel::{CallError, DispatchError};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::PermissionDenied
        | io::ErrorKind::ConnectionRefused
        | io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn call_error(context: &str, err: CallError) -> CliError {
    match err {
        CallError::Transmit(source) => io_error(context, source),
        CallError::Timeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        CallError::ReplyMismatch { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        CallError::Decode(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

pub fn dispatch_error(context: &str, err: DispatchError) -> CliError {
    match err {
        DispatchError::Io(source) => io_error(context, source),
        DispatchError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        DispatchError::UnknownCommand { .. } => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        DispatchError::Decode(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}
