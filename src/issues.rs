//! Issue types reported by `intlx extract`.
//!
//! Each issue is self-contained: the reporter needs nothing beyond the issue
//! itself to print it cargo-style.

use enum_dispatch::enum_dispatch;

use crate::core::{SourceContext, TransformError, TransformWarning};

// ============================================================
// Severity and Rule
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    DeprecatedComponent,
    MissingId,
    MissingDefaultMessage,
    DescriptionRequired,
    DuplicateId,
    StaticEvaluation,
    MessageSyntax,
    InvalidArgument,
    ParseError,
}

impl Rule {
    pub fn for_error(error: &TransformError) -> Self {
        match error {
            TransformError::MissingId { .. } => Rule::MissingId,
            TransformError::MissingDefaultMessage { .. } => Rule::MissingDefaultMessage,
            TransformError::DescriptionRequired { .. } => Rule::DescriptionRequired,
            TransformError::DuplicateIdConflict { .. } => Rule::DuplicateId,
            TransformError::StaticEvaluation { .. } => Rule::StaticEvaluation,
            TransformError::MessageSyntax { .. } => Rule::MessageSyntax,
            TransformError::InvalidArgumentShape { .. } | TransformError::InvalidArity { .. } => {
                Rule::InvalidArgument
            }
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::DeprecatedComponent => write!(f, "deprecated-component"),
            Rule::MissingId => write!(f, "missing-id"),
            Rule::MissingDefaultMessage => write!(f, "missing-default-message"),
            Rule::DescriptionRequired => write!(f, "description-required"),
            Rule::DuplicateId => write!(f, "duplicate-id"),
            Rule::StaticEvaluation => write!(f, "static-evaluation"),
            Rule::MessageSyntax => write!(f, "message-syntax"),
            Rule::InvalidArgument => write!(f, "invalid-argument"),
            Rule::ParseError => write!(f, "parse-error"),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// A deprecated markup component was found; its message is not extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecatedComponentIssue {
    pub context: SourceContext,
    pub message: String,
}

impl DeprecatedComponentIssue {
    pub fn from_warning(warning: &TransformWarning, source: &str) -> Self {
        Self {
            context: SourceContext::from_source(warning.location.clone(), source),
            message: warning.message.clone(),
        }
    }
}

/// The transform of a file stopped at this error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformIssue {
    pub context: SourceContext,
    pub error: TransformError,
}

impl TransformIssue {
    pub fn new(error: TransformError, source: &str) -> Self {
        Self {
            context: SourceContext::from_source(error.location().clone(), source),
            error,
        }
    }
}

/// File could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

// ============================================================
// Issue Enum
// ============================================================

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    DeprecatedComponent(DeprecatedComponentIssue),
    Transform(TransformIssue),
    ParseError(ParseErrorIssue),
}

impl Issue {
    pub fn is_error(&self) -> bool {
        self.report_severity() == Severity::Error
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

pub enum ReportLocation<'a> {
    /// Source position with the line it points into.
    Source(&'a SourceContext),
    /// File-level only (parse errors, synthesized nodes).
    File { path: &'a str },
}

#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    fn hint(&self) -> Option<&str> {
        None
    }
}

/// Line 0 marks a synthesized node with no source line to show.
fn source_location(context: &SourceContext) -> ReportLocation<'_> {
    if context.line() == 0 {
        ReportLocation::File {
            path: context.file_path(),
        }
    } else {
        ReportLocation::Source(context)
    }
}

impl Report for DeprecatedComponentIssue {
    fn location(&self) -> ReportLocation<'_> {
        source_location(&self.context)
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule {
        Rule::DeprecatedComponent
    }
}

impl Report for TransformIssue {
    fn location(&self) -> ReportLocation<'_> {
        source_location(&self.context)
    }

    fn message(&self) -> String {
        self.error.message()
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        Rule::for_error(&self.error)
    }

    fn hint(&self) -> Option<&str> {
        self.error.hint()
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Severity::Error
    }

    fn report_rule(&self) -> Rule {
        Rule::ParseError
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Issue {
    fn sort_key(&self) -> (&str, usize, usize) {
        match self.location() {
            ReportLocation::Source(ctx) => (ctx.file_path(), ctx.line(), ctx.col()),
            ReportLocation::File { path } => (path, 0, 0),
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.report_rule().cmp(&other.report_rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
