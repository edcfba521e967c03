//! Fatal transform errors.
//!
//! Every error carries the location of the node being processed and aborts
//! the traversal of the current file.

use thiserror::Error;

use crate::core::SourceLocation;
use crate::core::message_format::MessageSyntaxError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("{location}: message descriptor is missing an `id`")]
    MissingId { location: SourceLocation },

    #[error("{location}: message `{id}` is missing a `defaultMessage`")]
    MissingDefaultMessage { id: String, location: SourceLocation },

    #[error("{location}: message `{id}` must have a `description`")]
    DescriptionRequired { id: String, location: SourceLocation },

    #[error(
        "{location}: duplicate message id `{id}` with a different description or defaultMessage"
    )]
    DuplicateIdConflict { id: String, location: SourceLocation },

    #[error("{location}: `{name}` must be statically evaluable")]
    StaticEvaluation { name: String, location: SourceLocation },

    #[error("{location}: message failed to parse: {source}")]
    MessageSyntax {
        source: MessageSyntaxError,
        location: SourceLocation,
    },

    #[error("{location}: `{callee}` expects an object, an array or a string literal")]
    InvalidArgumentShape {
        callee: String,
        location: SourceLocation,
    },

    #[error("{location}: `{callee}` takes at most {max} arguments and none may be spread")]
    InvalidArity {
        callee: String,
        max: usize,
        location: SourceLocation,
    },
}

impl TransformError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            TransformError::MissingId { location }
            | TransformError::MissingDefaultMessage { location, .. }
            | TransformError::DescriptionRequired { location, .. }
            | TransformError::DuplicateIdConflict { location, .. }
            | TransformError::StaticEvaluation { location, .. }
            | TransformError::MessageSyntax { location, .. }
            | TransformError::InvalidArgumentShape { location, .. }
            | TransformError::InvalidArity { location, .. } => location,
        }
    }

    /// The message without its `file:line:col: ` prefix.
    pub fn message(&self) -> String {
        let full = self.to_string();
        let prefix = format!("{}: ", self.location());
        match full.strip_prefix(&prefix) {
            Some(rest) => rest.to_string(),
            None => full,
        }
    }

    /// Remediation hint, if the error has one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            TransformError::MessageSyntax { source, .. } => source.hint,
            TransformError::DescriptionRequired { .. } => {
                Some("add a `description` or disable `enforceDescriptions`")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_includes_location() {
        let err = TransformError::DuplicateIdConflict {
            id: "greeting".to_string(),
            location: SourceLocation::new("src/app.tsx", 4, 12),
        };
        assert_eq!(
            err.to_string(),
            "src/app.tsx:4:12: duplicate message id `greeting` with a different description or defaultMessage"
        );
        assert_eq!(err.location().line, 4);
        assert_eq!(
            err.message(),
            "duplicate message id `greeting` with a different description or defaultMessage"
        );
    }
}
