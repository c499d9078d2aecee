//! Error taxonomy shared by value construction, mutation and evaluation.

use crate::lexical::LexicalError;

/// Discriminant of a [`CssError`], for callers that classify failures
/// without caring about the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed textual input.
    Syntax,
    /// Content violates the character set allowed by the value kind.
    InvalidCharacter,
    /// The new content belongs to a different value kind.
    InvalidModification,
    /// The operation is meaningless in the current state.
    InvalidAccess,
    /// A unit-aware expression combines incompatible units.
    Evaluation,
}

/// Errors raised by the value engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CssError {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("invalid character: {0}")]
    InvalidCharacter(String),
    #[error("invalid modification: {0}")]
    InvalidModification(String),
    #[error("invalid access: {0}")]
    InvalidAccess(String),
    #[error("evaluation error: {0}")]
    Evaluation(String),
}

impl CssError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CssError::Syntax(_) => ErrorKind::Syntax,
            CssError::InvalidCharacter(_) => ErrorKind::InvalidCharacter,
            CssError::InvalidModification(_) => ErrorKind::InvalidModification,
            CssError::InvalidAccess(_) => ErrorKind::InvalidAccess,
            CssError::Evaluation(_) => ErrorKind::Evaluation,
        }
    }

    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        CssError::Syntax(message.into())
    }

    pub(crate) fn evaluation(message: impl Into<String>) -> Self {
        CssError::Evaluation(message.into())
    }
}

impl From<LexicalError> for CssError {
    fn from(err: LexicalError) -> Self {
        CssError::Syntax(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = CssError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(CssError::syntax("x").kind(), ErrorKind::Syntax);
        assert_eq!(
            CssError::InvalidCharacter("x".into()).kind(),
            ErrorKind::InvalidCharacter
        );
        assert_eq!(
            CssError::InvalidModification("x".into()).kind(),
            ErrorKind::InvalidModification
        );
        assert_eq!(
            CssError::InvalidAccess("x".into()).kind(),
            ErrorKind::InvalidAccess
        );
        assert_eq!(CssError::evaluation("x").kind(), ErrorKind::Evaluation);
    }

    #[test]
    fn test_lexical_error_becomes_syntax() {
        let err: CssError = LexicalError::UnexpectedEof("expected ')'".into()).into();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert!(err.to_string().contains("expected ')'"));
    }
}
