//! Command-line parse errors.

/// Error returned by [`parse`](super::parse) for a malformed command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A token looks like a switch but no parameter owns it.
    #[error("Unrecognized parameter: {0}.")]
    UnknownSwitch(String),

    /// A value-taking switch is the last token.
    #[error("Invalid value for parameter: {0}.")]
    MissingValue(String),

    /// The token after a switch could not be converted to the parameter's type.
    #[error("Invalid value \"{raw}\" for parameter {switch}: {reason}.")]
    InvalidValue {
        switch: String,
        raw: String,
        reason: String,
    },
}
