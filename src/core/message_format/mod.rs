//! ICU message-format validation and normalization.
//!
//! Messages are parsed into a small element tree and printed back in a
//! canonical form: argument whitespace is collapsed, options are separated
//! by single spaces and literal syntax characters are re-quoted.
//!
//! Supported syntax:
//! - `{name}` simple arguments
//! - `{name, number|date|time[, style]}` formatted arguments
//! - `{name, plural|selectordinal, [offset:N] sel {..} ... other {..}}`
//! - `{name, select, key {..} ... other {..}}`
//! - `#` inside plural options
//! - apostrophe quoting (`''`, `'{literal}'`)

mod parser;
mod printer;

use std::fmt;

use thiserror::Error;

pub use parser::parse_message;
pub use printer::print_message;

/// One element of a parsed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageElement {
    Literal(String),
    /// `{name}`
    Argument(String),
    /// `{name, number}`, `{name, date, short}`, ...
    Formatted {
        name: String,
        format: FormatKind,
        style: Option<String>,
    },
    Plural {
        name: String,
        ordinal: bool,
        offset: i64,
        options: Vec<MessageOption>,
    },
    Select {
        name: String,
        options: Vec<MessageOption>,
    },
    /// `#` inside a plural option.
    Pound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Number,
    Date,
    Time,
}

impl FormatKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FormatKind::Number => "number",
            FormatKind::Date => "date",
            FormatKind::Time => "time",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOption {
    pub selector: String,
    pub value: Vec<MessageElement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    EmptyArgument,
    MalformedArgument,
    UnclosedArgument,
    UnmatchedClosingBrace,
    ExpectedArgumentType,
    InvalidArgumentType(String),
    ExpectedArgumentStyle,
    InvalidOffset,
    ExpectedSelector,
    InvalidPluralSelector(String),
    DuplicateSelector(String),
    ExpectedOptionBody,
    MissingOtherClause,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::EmptyArgument => write!(f, "empty argument"),
            SyntaxErrorKind::MalformedArgument => write!(f, "malformed argument"),
            SyntaxErrorKind::UnclosedArgument => write!(f, "expected a closing `}}`"),
            SyntaxErrorKind::UnmatchedClosingBrace => write!(f, "unmatched `}}`"),
            SyntaxErrorKind::ExpectedArgumentType => write!(f, "expected an argument type"),
            SyntaxErrorKind::InvalidArgumentType(ty) => write!(f, "invalid argument type `{ty}`"),
            SyntaxErrorKind::ExpectedArgumentStyle => write!(f, "expected an argument style"),
            SyntaxErrorKind::InvalidOffset => write!(f, "invalid plural offset"),
            SyntaxErrorKind::ExpectedSelector => write!(f, "expected an option selector"),
            SyntaxErrorKind::InvalidPluralSelector(s) => {
                write!(f, "invalid plural selector `{s}`")
            }
            SyntaxErrorKind::DuplicateSelector(s) => write!(f, "duplicate selector `{s}`"),
            SyntaxErrorKind::ExpectedOptionBody => write!(f, "expected `{{` after a selector"),
            SyntaxErrorKind::MissingOtherClause => write!(f, "missing `other` option"),
        }
    }
}

pub const MARKUP_ESCAPE_HINT: &str = "it looks like `\\` was used for escaping, which does not work in JSX string attributes; wrap the message in `{}` instead";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct MessageSyntaxError {
    pub kind: SyntaxErrorKind,
    /// Byte offset into the message text.
    pub offset: usize,
    pub hint: Option<&'static str>,
}

impl MessageSyntaxError {
    pub fn new(kind: SyntaxErrorKind, offset: usize) -> Self {
        Self {
            kind,
            offset,
            hint: None,
        }
    }
}

/// Where the message text was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOrigin {
    /// A JS string or template literal.
    Script,
    /// A JSX string attribute (`defaultMessage="..."`).
    MarkupLiteral,
}

/// Validate `text` and return its normalized form.
pub fn validate(text: &str, origin: TextOrigin) -> Result<String, MessageSyntaxError> {
    match parse_message(text) {
        Ok(elements) => Ok(print_message(&elements)),
        Err(mut err) => {
            if origin == TextOrigin::MarkupLiteral && text.contains('\\') {
                err.hint = Some(MARKUP_ESCAPE_HINT);
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_plain_text() {
        assert_eq!(
            validate("Hello, world", TextOrigin::Script).unwrap(),
            "Hello, world"
        );
    }

    #[test]
    fn test_validate_normalizes_whitespace() {
        assert_eq!(
            validate("Hi { name }!", TextOrigin::Script).unwrap(),
            "Hi {name}!"
        );
        assert_eq!(
            validate(
                "{ count ,plural , one {# item}   other {# items} }",
                TextOrigin::Script
            )
            .unwrap(),
            "{count, plural, one {# item} other {# items}}"
        );
    }

    #[test]
    fn test_validate_is_idempotent() {
        let inputs = [
            "It's {n, number} o''clock",
            "'{'literal'}' and {x}",
            "{g, select, male {He} female {She} other {They}} said l'",
            "{n, plural, offset:1 =0 {nobody} one {# '#' one} other {#}}",
        ];
        for input in inputs {
            let once = validate(input, TextOrigin::Script).unwrap();
            let twice = validate(&once, TextOrigin::Script).unwrap();
            assert_eq!(once, twice, "input: {input}");
        }
    }

    #[test]
    fn test_validate_reports_error() {
        let err = validate("Hello {name", TextOrigin::Script).unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnclosedArgument);
        assert_eq!(err.hint, None);
    }

    #[test]
    fn test_markup_escape_hint() {
        let err = validate(r"Hello \{name\", TextOrigin::MarkupLiteral).unwrap_err();
        assert_eq!(err.hint, Some(MARKUP_ESCAPE_HINT));

        let err = validate(r"Hello \{name\", TextOrigin::Script).unwrap_err();
        assert_eq!(err.hint, None);
    }
}
