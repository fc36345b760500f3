//! Error types for SFEN parsing and position validation.

/// Errors produced while parsing an SFEN string into a [`crate::position::Position`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SfenError {
    /// The underlying `shogi_usi_parser` crate rejected the SFEN text.
    #[error("invalid SFEN: {detail}")]
    Malformed {
        /// Human-readable detail forwarded from the parser.
        detail: String,
    },
    /// The board portion does not contain exactly one king per side.
    #[error("expected exactly one king per side, found {black} black king(s) and {white} white king(s)")]
    WrongKingCount {
        /// Number of black kings found.
        black: u32,
        /// Number of white kings found.
        white: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sfen_error_display() {
        let err = SfenError::WrongKingCount { black: 0, white: 1 };
        assert_eq!(
            format!("{err}"),
            "expected exactly one king per side, found 0 black king(s) and 1 white king(s)"
        );
    }
}
