//! Error types for board selection and pin requests.

/// Errors raised by board lookup and pin requests.
///
/// All of these indicate a board description or selection problem; the
/// planner reports them as configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The board name is not in the catalogue.
    #[error("unknown board '{name}' (supported: i5, i9)")]
    UnknownBoard {
        /// The requested board name.
        name: String,
    },

    /// The board exists but not in the requested revision.
    #[error("board '{board}' has no revision '{revision}' (supported: {supported})")]
    UnsupportedRevision {
        /// The board name.
        board: String,
        /// The requested revision.
        revision: String,
        /// Comma-separated list of known revisions.
        supported: String,
    },

    /// The named pin does not exist on the selected board.
    #[error("pin '{pin}' is not available on board '{board}'")]
    PinUnavailable {
        /// The requested pin name.
        pin: String,
        /// The board name and revision.
        board: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pin_unavailable() {
        let err = BoardError::PinUnavailable {
            pin: "clk100".to_string(),
            board: "i5 rev 7.0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "pin 'clk100' is not available on board 'i5 rev 7.0'"
        );
    }
}
