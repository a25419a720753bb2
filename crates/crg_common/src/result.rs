//! Common result and error types for planning internals.

/// The standard result type for operations that can only fail on a bug.
///
/// `Err` indicates a broken internal invariant (a bug in crg), not a user
/// configuration problem. Configuration problems have their own error types
/// in the crates that detect them.
pub type CrgResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in the planner, not a user input problem.
///
/// These errors should never occur during normal operation. If one does occur,
/// a planning pass produced a topology that violates its own invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal planning error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("registry lost the system domain");
        assert_eq!(
            format!("{err}"),
            "internal planning error: registry lost the system domain"
        );
    }

    #[test]
    fn err_path() {
        let r: CrgResult<i32> = Err(InternalError::new("test error"));
        let err = r.err().unwrap();
        assert_eq!(err.message, "test error");
    }

    #[test]
    fn from_string() {
        let err: InternalError = "from string".to_string().into();
        assert_eq!(err.message, "from string");
    }
}
