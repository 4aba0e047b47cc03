//! Process exit codes for the `ey` binary.
//!
//! Codes 64-78 follow sysexits.h; 100 and up are specific to `ey`, so that
//! scripts can tell a rejected login apart from a server outage.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EyExitCode {
    /// Bad arguments, an ambiguous name or a failed prompt
    UsageError = 64,
    /// Response body could not be decoded
    DataError = 65,
    /// Public key file missing or unreadable
    NoInput = 66,
    /// Application, environment or key not found
    NotFound = 67,
    /// Token file could not be written
    IoError = 74,
    /// Bad endpoint or unreadable ey.yml
    ConfigError = 78,
    /// No token, or credentials rejected
    AuthError = 100,
    /// 5xx responses and network failures
    ServerError = 101,
    /// Any other 4xx response
    ApiError = 102,
}

impl EyExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<EyExitCode> for i32 {
    fn from(code: EyExitCode) -> Self {
        code.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_sysexits() {
        assert_eq!(EyExitCode::UsageError.code(), 64);
        assert_eq!(EyExitCode::ConfigError.code(), 78);
        assert_eq!(i32::from(EyExitCode::AuthError), 100);
    }
}
