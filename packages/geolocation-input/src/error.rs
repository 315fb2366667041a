use thiserror::Error;

/// The numeric reason a location provider gives for a failed fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionErrorCode {
    /// The user or the page's permissions policy refused access.
    PermissionDenied,
    /// No positioning source could produce a fix.
    PositionUnavailable,
    /// No fix arrived before the configured timeout.
    Timeout,
    /// A code the platform defines that we don't know about.
    Other(u16),
}

impl PositionErrorCode {
    /// The platform's numeric value for this code.
    pub fn code(self) -> u16 {
        match self {
            Self::PermissionDenied => 1,
            Self::PositionUnavailable => 2,
            Self::Timeout => 3,
            Self::Other(code) => code,
        }
    }
}

impl From<u16> for PositionErrorCode {
    fn from(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            other => Self::Other(other),
        }
    }
}

/// A failure reported by the location provider.
///
/// Only the message travels to the input channel; the code is kept for logging and for callers
/// that drive a [`LocationRequest`](crate::LocationRequest) directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PositionError {
    pub code: PositionErrorCode,
    pub message: String,
}

impl PositionError {
    pub fn new(code: impl Into<PositionErrorCode>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Why a request ended without producing a message for the input channel, or failed to get one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("Geolocation is not supported by this browser.")]
    Unavailable,

    #[error("Error obtaining location: {0}")]
    FixFailed(#[from] PositionError),

    #[error("the location provider dropped the request without answering it")]
    Abandoned,
}

/// The input channel refused a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to send input `{input}`: {reason}")]
pub struct SinkError {
    pub input: String,
    pub reason: String,
}

impl SinkError {
    pub fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_platform_values() {
        for code in 1..=4u16 {
            assert_eq!(PositionErrorCode::from(code).code(), code);
        }
        assert_eq!(PositionErrorCode::from(1), PositionErrorCode::PermissionDenied);
        assert_eq!(PositionErrorCode::from(3), PositionErrorCode::Timeout);
        assert_eq!(PositionErrorCode::from(9), PositionErrorCode::Other(9));
    }

    #[test]
    fn messages() {
        let denied = PositionError::new(1, "User denied Geolocation");
        assert_eq!(denied.to_string(), "User denied Geolocation");
        assert_eq!(
            LocateError::from(denied).to_string(),
            "Error obtaining location: User denied Geolocation"
        );
        assert_eq!(
            LocateError::Unavailable.to_string(),
            "Geolocation is not supported by this browser."
        );
    }
}
