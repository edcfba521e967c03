//! Call-site canonicalization for the configured helper functions.
//!
//! - single-message helpers (`translate(id, options, description, props)`)
//!   are back-filled to four arguments and invoked through `.bind(this)`;
//! - bulk helpers (`defineMessages({...})`) register every descriptor, and
//!   the array form is collapsed into the keyed object form.

use swc_common::{DUMMY_SP, Span, Spanned};
use swc_ecma_ast::{
    CallExpr, Callee, Expr, Invalid, Lit, MemberExpr, MemberProp, ObjectLit, Prop, PropOrSpread,
};

use super::builders::{arg, bind_this, empty_object, null, props_ref};
use super::extract::ExtractCx;
use crate::core::data::{DescriptorFields, FieldValue, MessageDescriptor};
use crate::core::error::TransformError;
use crate::core::evaluate::{StaticValue, static_prop_name, unwrap_ts_expr};
use crate::core::imports::AcceptedNames;

const CANONICAL_ARITY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    SingleMessage,
    BulkDescriptors,
}

/// Which helper, if any, the callee refers to, with its display name.
pub fn resolve_callee(cx: &ExtractCx<'_>, callee: &Callee) -> Option<(CallKind, String)> {
    let Callee::Expr(expr) = callee else {
        return None;
    };
    let module = cx.config.module_source();
    let single = &cx.config.translate_functions;
    let bulk = &cx.config.define_messages_functions;

    match &**expr {
        Expr::Ident(ident) => {
            let name = ident.sym.to_string();
            if cx
                .resolver
                .references_import(ident, module, AcceptedNames::Names(single))
            {
                Some((CallKind::SingleMessage, name))
            } else if cx
                .resolver
                .references_import(ident, module, AcceptedNames::Names(bulk))
            {
                Some((CallKind::BulkDescriptors, name))
            } else {
                None
            }
        }
        Expr::Member(MemberExpr {
            obj,
            prop: MemberProp::Ident(prop),
            ..
        }) => {
            let Expr::Ident(namespace) = &**obj else {
                return None;
            };
            let member = prop.sym.as_str();
            let name = format!("{}.{}", namespace.sym, member);
            if cx
                .resolver
                .references_namespace_member(namespace, member, module, single)
            {
                Some((CallKind::SingleMessage, name))
            } else if cx
                .resolver
                .references_namespace_member(namespace, member, module, bulk)
            {
                Some((CallKind::BulkDescriptors, name))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// `translate(id[, options[, description[, props]]])` becomes
/// `translate.bind(this)(id, options, description, props)`.
pub fn rewrite_single_call(
    cx: &mut ExtractCx<'_>,
    call: &mut CallExpr,
    callee: &str,
) -> Result<(), TransformError> {
    let span = call.span;
    if call.args.len() > CANONICAL_ARITY || call.args.iter().skip(1).any(|a| a.spread.is_some()) {
        return Err(TransformError::InvalidArity {
            callee: callee.to_string(),
            max: CANONICAL_ARITY,
            location: cx.location(span),
        });
    }
    let Some(first) = call.args.first() else {
        return Err(TransformError::MissingId {
            location: cx.location(span),
        });
    };
    if first.spread.is_some() {
        return Err(static_error(cx, "id", span));
    }
    let Some(id) = cx.evaluate_text(&first.expr, "id", span)? else {
        return Err(TransformError::MissingId {
            location: cx.location(span),
        });
    };

    let description = match call.args.get(2) {
        Some(arg) => cx.evaluate_text(&arg.expr, "description", span)?,
        None => None,
    };

    let policy = cx.policy(false);
    cx.register(
        MessageDescriptor {
            id,
            description,
            default_message: None,
        },
        policy,
        span,
    )?;

    // Back-fill missing trailing arguments.
    while call.args.len() < CANONICAL_ARITY {
        let filler = match call.args.len() {
            1 => empty_object(),
            2 => null(),
            _ => props_ref(cx.session.component_kind, &cx.config.props_identifier),
        };
        call.args.push(arg(filler));
    }

    if let Callee::Expr(callee) = &mut call.callee {
        let helper = std::mem::replace(&mut **callee, Expr::Invalid(Invalid { span: DUMMY_SP }));
        **callee = bind_this(helper);
    }
    Ok(())
}

/// Register every descriptor passed to a bulk helper.
pub fn normalize_bulk_call(
    cx: &mut ExtractCx<'_>,
    call: &mut CallExpr,
    callee: &str,
) -> Result<(), TransformError> {
    let span = call.span;
    let Some(first) = call.args.first_mut() else {
        return Err(shape_error(cx, callee, span));
    };
    if first.spread.is_some() {
        return Err(shape_error(cx, callee, span));
    }

    match unwrap_ts_expr(&first.expr) {
        Expr::Lit(Lit::Str(_)) => return Ok(()),
        Expr::Array(_) => {
            let merged = merge_array_form(cx, &first.expr, callee, span)?;
            *first.expr = merged.to_expr();
        }
        Expr::Object(_) => {}
        _ => return Err(shape_error(cx, callee, span)),
    }

    let Expr::Object(object) = unwrap_ts_expr(&first.expr) else {
        return Err(shape_error(cx, callee, span));
    };
    register_object_form(cx, object, callee, span)
}

/// `[{ id: 'a', .. }, { id: 'b', .. }]` to `{ a: { id: 'a', .. }, b: { .. } }`.
fn merge_array_form(
    cx: &ExtractCx<'_>,
    expr: &Expr,
    callee: &str,
    span: Span,
) -> Result<StaticValue, TransformError> {
    let Expr::Array(array) = unwrap_ts_expr(expr) else {
        return Err(shape_error(cx, callee, span));
    };

    let mut merged: Vec<(String, StaticValue)> = Vec::with_capacity(array.elems.len());
    for elem in &array.elems {
        let Some(elem) = elem else {
            return Err(shape_error(cx, callee, span));
        };
        if elem.spread.is_some() {
            return Err(static_error(cx, callee, span));
        }
        let value = cx
            .evaluate(&elem.expr)
            .ok_or_else(|| static_error(cx, callee, elem.expr.span()))?;
        if !matches!(value, StaticValue::Object(_)) {
            return Err(shape_error(cx, callee, elem.expr.span()));
        }
        let Some(id) = field_text(&value, "id") else {
            return Err(TransformError::MissingId {
                location: cx.location(elem.expr.span()),
            });
        };

        match merged.iter().find(|(key, _)| *key == id) {
            Some((_, existing)) if *existing != value => {
                return Err(TransformError::DuplicateIdConflict {
                    id,
                    location: cx.location(elem.expr.span()),
                });
            }
            Some(_) => {}
            None => merged.push((id, value)),
        }
    }
    Ok(StaticValue::Object(merged))
}

fn register_object_form(
    cx: &mut ExtractCx<'_>,
    object: &ObjectLit,
    callee: &str,
    call_span: Span,
) -> Result<(), TransformError> {
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            return Err(static_error(cx, callee, call_span));
        };
        let kv = match &**prop {
            Prop::KeyValue(kv) => kv,
            Prop::Shorthand(ident) => {
                return Err(static_error(cx, ident.sym.as_str(), ident.span));
            }
            _ => return Err(shape_error(cx, callee, prop.span())),
        };
        let span = or_call_span(kv.value.span(), call_span);
        let Some(key) = static_prop_name(&kv.key) else {
            return Err(static_error(cx, callee, span));
        };
        let value = cx
            .evaluate(&kv.value)
            .ok_or_else(|| static_error(cx, &key, span))?;
        if !matches!(value, StaticValue::Object(_)) {
            return Err(shape_error(cx, callee, span));
        }

        let mut fields = DescriptorFields::default();
        for name in ["id", "description", "defaultMessage"] {
            if let Some(text) = field_text(&value, name) {
                fields.set(name, FieldValue::script(text));
            }
        }
        if fields.id.is_none() {
            return Err(TransformError::MissingId {
                location: cx.location(span),
            });
        }

        let Some(descriptor) = cx.canonicalize(fields, span)? else {
            continue;
        };
        let policy = cx.policy(true);
        cx.register(descriptor, policy, span)?;
    }
    Ok(())
}

fn field_text(value: &StaticValue, name: &str) -> Option<String> {
    value
        .get(name)
        .filter(|v| !v.is_nullish())
        .and_then(StaticValue::to_text)
}

fn or_call_span(span: Span, call_span: Span) -> Span {
    if span.is_dummy() { call_span } else { span }
}

fn static_error(cx: &ExtractCx<'_>, name: &str, span: Span) -> TransformError {
    TransformError::StaticEvaluation {
        name: name.to_string(),
        location: cx.location(span),
    }
}

fn shape_error(cx: &ExtractCx<'_>, callee: &str, span: Span) -> TransformError {
    TransformError::InvalidArgumentShape {
        callee: callee.to_string(),
        location: cx.location(span),
    }
}
