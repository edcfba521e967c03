//! Descriptor extraction from localizable markup components.
//!
//! `<FormattedMessage id="..." />` style tags are handled by one of two
//! strategies, picked once per file from `markupMode`.

use enum_dispatch::enum_dispatch;
use swc_ecma_ast::{
    Expr, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElementName, JSXExpr,
    JSXMemberExpr, JSXObject, JSXOpeningElement, Lit,
};

use super::builders::jsx_str_attr;
use super::extract::ExtractCx;
use crate::config::MarkupMode;
use crate::core::data::{DescriptorFields, FieldValue, MessageDescriptor};
use crate::core::error::TransformError;
use crate::core::evaluate::unwrap_ts_expr;
use crate::core::imports::AcceptedNames;

#[enum_dispatch]
pub trait MarkupExtractor {
    fn extract(
        &self,
        cx: &mut ExtractCx<'_>,
        element: &mut JSXOpeningElement,
    ) -> Result<(), TransformError>;
}

#[enum_dispatch(MarkupExtractor)]
#[derive(Debug, Clone, Copy)]
pub enum MarkupStrategy {
    AttributeStrategy,
    DescriptorStrategy,
}

impl MarkupStrategy {
    pub fn for_mode(mode: MarkupMode) -> Self {
        match mode {
            MarkupMode::Attribute => AttributeStrategy.into(),
            MarkupMode::Descriptor => DescriptorStrategy.into(),
        }
    }
}

/// Reads literal `id` / `description` attributes and synthesizes
/// `defaultMessage="<id>"` when it is missing.
#[derive(Debug, Clone, Copy)]
pub struct AttributeStrategy;

impl MarkupExtractor for AttributeStrategy {
    fn extract(
        &self,
        cx: &mut ExtractCx<'_>,
        element: &mut JSXOpeningElement,
    ) -> Result<(), TransformError> {
        let mut id = None;
        let mut description = None;
        let mut has_default_message = false;

        for attr in named_attrs(element) {
            match attr_name(attr) {
                Some("id") => id = literal_value(attr),
                Some("description") => description = literal_value(attr),
                Some("defaultMessage") => has_default_message = true,
                _ => {}
            }
        }

        let Some(id) = id else {
            return Ok(());
        };

        if !has_default_message {
            element.attrs.push(jsx_str_attr("defaultMessage", &id));
        }

        let descriptor = MessageDescriptor {
            id,
            description,
            default_message: None,
        };
        let policy = cx.policy(false);
        cx.register(descriptor, policy, element.span)
    }
}

/// Reads every descriptor attribute; each must be statically evaluable.
///
/// Tags without descriptor attributes (e.g. `<FormattedMessage {...msg} />`)
/// are skipped: their descriptor is registered where it was defined.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorStrategy;

impl MarkupExtractor for DescriptorStrategy {
    fn extract(
        &self,
        cx: &mut ExtractCx<'_>,
        element: &mut JSXOpeningElement,
    ) -> Result<(), TransformError> {
        let mut fields = DescriptorFields::default();

        for attr in named_attrs(element) {
            let Some(key) = attr_name(attr) else {
                continue;
            };
            if !DescriptorFields::is_descriptor_key(key) {
                continue;
            }

            let value = match &attr.value {
                Some(JSXAttrValue::Str(s)) => s.value.as_str().map(|text| FieldValue::markup(text)),
                Some(JSXAttrValue::JSXExprContainer(container)) => match &container.expr {
                    JSXExpr::Expr(expr) => cx
                        .evaluate_text(expr, key, attr.span)?
                        .map(|text| FieldValue::script(text)),
                    JSXExpr::JSXEmptyExpr(_) => return Err(not_static(cx, key, attr)),
                },
                _ => return Err(not_static(cx, key, attr)),
            };
            if let Some(value) = value {
                fields.set(key, value);
            }
        }

        if fields.is_empty() {
            return Ok(());
        }

        let Some(descriptor) = cx.canonicalize(fields, element.span)? else {
            return Ok(());
        };
        let policy = cx.policy(false);
        cx.register(descriptor, policy, element.span)
    }
}

/// How a tag name resolved against the configured imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMatch {
    Localizable,
    Deprecated(String),
    Other,
}

pub fn resolve_tag(cx: &ExtractCx<'_>, name: &JSXElementName) -> TagMatch {
    let module = cx.config.module_source();
    let deprecated = &cx.config.deprecated_component_names;
    let components = &cx.config.component_names;

    match name {
        JSXElementName::Ident(ident) => {
            if cx
                .resolver
                .references_import(ident, module, AcceptedNames::Names(deprecated))
            {
                TagMatch::Deprecated(ident.sym.to_string())
            } else if cx
                .resolver
                .references_import(ident, module, AcceptedNames::Names(components))
            {
                TagMatch::Localizable
            } else {
                TagMatch::Other
            }
        }
        JSXElementName::JSXMemberExpr(JSXMemberExpr {
            obj: JSXObject::Ident(namespace),
            prop,
            ..
        }) => {
            let member = prop.sym.as_str();
            if cx
                .resolver
                .references_namespace_member(namespace, member, module, deprecated)
            {
                TagMatch::Deprecated(format!("{}.{}", namespace.sym, member))
            } else if cx
                .resolver
                .references_namespace_member(namespace, member, module, components)
            {
                TagMatch::Localizable
            } else {
                TagMatch::Other
            }
        }
        _ => TagMatch::Other,
    }
}

fn named_attrs(element: &JSXOpeningElement) -> impl Iterator<Item = &JSXAttr> {
    element.attrs.iter().filter_map(|attr| match attr {
        JSXAttrOrSpread::JSXAttr(attr) => Some(attr),
        JSXAttrOrSpread::SpreadElement(_) => None,
    })
}

fn attr_name(attr: &JSXAttr) -> Option<&str> {
    match &attr.name {
        JSXAttrName::Ident(ident) => Some(ident.sym.as_str()),
        JSXAttrName::JSXNamespacedName(_) => None,
    }
}

/// `attr="text"` or `attr={"text"}`.
fn literal_value(attr: &JSXAttr) -> Option<String> {
    match &attr.value {
        Some(JSXAttrValue::Str(s)) => s.value.as_str().map(str::to_string),
        Some(JSXAttrValue::JSXExprContainer(container)) => match &container.expr {
            JSXExpr::Expr(expr) => match unwrap_ts_expr(expr) {
                Expr::Lit(Lit::Str(s)) => s.value.as_str().map(str::to_string),
                _ => None,
            },
            JSXExpr::JSXEmptyExpr(_) => None,
        },
        _ => None,
    }
}

fn not_static(cx: &ExtractCx<'_>, key: &str, attr: &JSXAttr) -> TransformError {
    TransformError::StaticEvaluation {
        name: key.to_string(),
        location: cx.location(attr.span),
    }
}
