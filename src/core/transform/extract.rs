use swc_common::Span;
use swc_ecma_ast::Expr;

use super::{FileContext, TransformWarning, session::TraversalSession};
use crate::config::{Config, MessageField};
use crate::core::SourceLocation;
use crate::core::data::{DescriptorFields, FieldValue, MessageDescriptor};
use crate::core::error::TransformError;
use crate::core::evaluate::{StaticEvaluator, StaticValue};
use crate::core::imports::ImportResolver;
use crate::core::message_format::{self, TextOrigin};
use crate::core::registry::RegistrationPolicy;

/// Everything a strategy needs while handling one node.
pub struct ExtractCx<'a> {
    pub config: &'a Config,
    pub file: &'a FileContext,
    pub evaluator: &'a dyn StaticEvaluator,
    pub resolver: ImportResolver<'a>,
    pub session: &'a mut TraversalSession,
}

impl ExtractCx<'_> {
    pub fn location(&self, span: Span) -> SourceLocation {
        self.file.location(span)
    }

    pub fn evaluate(&self, expr: &Expr) -> Option<StaticValue> {
        self.evaluator.evaluate(expr)
    }

    /// Text of a confident primitive. `null` and `undefined` read as absent.
    pub fn evaluate_text(
        &self,
        expr: &Expr,
        name: &str,
        span: Span,
    ) -> Result<Option<String>, TransformError> {
        let not_static = || TransformError::StaticEvaluation {
            name: name.to_string(),
            location: self.location(span),
        };
        match self.evaluate(expr) {
            Some(value) if value.is_nullish() => Ok(None),
            Some(value) => value.to_text().map(Some).ok_or_else(not_static),
            None => Err(not_static()),
        }
    }

    pub fn policy(&self, require_default_message: bool) -> RegistrationPolicy {
        RegistrationPolicy {
            require_description: self.config.enforce_descriptions,
            require_default_message,
        }
    }

    pub fn register(
        &mut self,
        descriptor: MessageDescriptor,
        policy: RegistrationPolicy,
        span: Span,
    ) -> Result<(), TransformError> {
        let location = self.location(span);
        self.session
            .registry
            .register(descriptor, policy)
            .map_err(|err| err.at(location))
    }

    /// Validate and normalize the configured message field.
    ///
    /// In `defaultMessage` mode the text is `defaultMessage`, falling back to
    /// `id`. Returns `None` when that field is absent (unresolved).
    pub fn canonicalize(
        &self,
        fields: DescriptorFields,
        span: Span,
    ) -> Result<Option<MessageDescriptor>, TransformError> {
        let DescriptorFields {
            id,
            description,
            default_message,
        } = fields;
        let description = description.map(|field| field.text);

        match self.config.message_field {
            MessageField::DefaultMessage => {
                let Some(source) = default_message.as_ref().or(id.as_ref()) else {
                    return Ok(None);
                };
                let text = self.validate_field(source, span)?;
                Ok(Some(MessageDescriptor {
                    id: id.map(|field| field.text).unwrap_or_default(),
                    description,
                    default_message: Some(text),
                }))
            }
            MessageField::Id => {
                let Some(id) = id else {
                    return Ok(None);
                };
                Ok(Some(MessageDescriptor {
                    id: self.validate_field(&id, span)?,
                    description,
                    default_message: default_message.map(|field| field.text),
                }))
            }
        }
    }

    fn validate_field(&self, field: &FieldValue, span: Span) -> Result<String, TransformError> {
        let origin = if field.markup_literal {
            TextOrigin::MarkupLiteral
        } else {
            TextOrigin::Script
        };
        message_format::validate(&field.text, origin).map_err(|source| {
            TransformError::MessageSyntax {
                source,
                location: self.location(span),
            }
        })
    }

    pub fn warn(&mut self, span: Span, message: String) {
        let location = self.location(span);
        self.session
            .warnings
            .push(TransformWarning { location, message });
    }
}
