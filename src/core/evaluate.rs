//! Confident static evaluation of expressions.
//!
//! Only expressions whose value is fully known at build time evaluate; any
//! reference to a runtime value makes the whole expression "not evaluable".

use swc_common::DUMMY_SP;
use swc_ecma_ast::{
    ArrayLit, BinaryOp, Bool, Expr, ExprOrSpread, Ident, IdentName, KeyValueProp, Lit, Null,
    Number, ObjectLit, Prop, PropName, PropOrSpread, Str, UnaryOp,
};

use crate::utils::is_identifier_name;

/// A value known at build time.
#[derive(Debug, Clone, PartialEq)]
pub enum StaticValue {
    Undefined,
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    Array(Vec<StaticValue>),
    /// Properties in source order.
    Object(Vec<(String, StaticValue)>),
}

impl StaticValue {
    /// String form of a primitive value, as JS would concatenate it.
    pub fn to_text(&self) -> Option<String> {
        match self {
            StaticValue::Str(s) => Some(s.clone()),
            StaticValue::Num(n) => Some(number_to_string(*n)),
            StaticValue::Bool(b) => Some(b.to_string()),
            StaticValue::Null => Some("null".to_string()),
            StaticValue::Undefined => Some("undefined".to_string()),
            StaticValue::Array(_) | StaticValue::Object(_) => None,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, StaticValue::Null | StaticValue::Undefined)
    }

    /// Property lookup on an object value (last definition wins, as in JS).
    pub fn get(&self, key: &str) -> Option<&StaticValue> {
        match self {
            StaticValue::Object(props) => props.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Render the value back into an expression.
    pub fn to_expr(&self) -> Expr {
        match self {
            StaticValue::Undefined => Expr::Ident(Ident::new_no_ctxt("undefined".into(), DUMMY_SP)),
            StaticValue::Null => Expr::Lit(Lit::Null(Null { span: DUMMY_SP })),
            StaticValue::Bool(value) => Expr::Lit(Lit::Bool(Bool {
                span: DUMMY_SP,
                value: *value,
            })),
            StaticValue::Num(value) => Expr::Lit(Lit::Num(Number {
                span: DUMMY_SP,
                value: *value,
                raw: None,
            })),
            StaticValue::Str(value) => Expr::Lit(Lit::Str(str_lit(value))),
            StaticValue::Array(items) => Expr::Array(ArrayLit {
                span: DUMMY_SP,
                elems: items
                    .iter()
                    .map(|item| {
                        Some(ExprOrSpread {
                            spread: None,
                            expr: Box::new(item.to_expr()),
                        })
                    })
                    .collect(),
            }),
            StaticValue::Object(props) => Expr::Object(ObjectLit {
                span: DUMMY_SP,
                props: props
                    .iter()
                    .map(|(key, value)| {
                        PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
                            key: prop_name(key),
                            value: Box::new(value.to_expr()),
                        })))
                    })
                    .collect(),
            }),
        }
    }
}

/// Evaluation capability supplied by the host.
pub trait StaticEvaluator {
    /// The confident value of `expr`, or `None` if it is not evaluable.
    fn evaluate(&self, expr: &Expr) -> Option<StaticValue>;
}

/// Evaluates literals and compositions of literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidentEvaluator;

impl StaticEvaluator for ConfidentEvaluator {
    fn evaluate(&self, expr: &Expr) -> Option<StaticValue> {
        match unwrap_ts_expr(expr) {
            Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|s| StaticValue::Str(s.to_string())),
            Expr::Lit(Lit::Num(n)) => Some(StaticValue::Num(n.value)),
            Expr::Lit(Lit::Bool(b)) => Some(StaticValue::Bool(b.value)),
            Expr::Lit(Lit::Null(_)) => Some(StaticValue::Null),
            Expr::Ident(ident) if ident.sym == "undefined" => Some(StaticValue::Undefined),
            Expr::Tpl(tpl) => {
                let mut text = String::new();
                for (i, quasi) in tpl.quasis.iter().enumerate() {
                    text.push_str(quasi.cooked.as_ref()?.as_str()?);
                    if let Some(inner) = tpl.exprs.get(i) {
                        text.push_str(&self.evaluate(inner)?.to_text()?);
                    }
                }
                Some(StaticValue::Str(text))
            }
            Expr::Bin(bin) if bin.op == BinaryOp::Add => {
                let left = self.evaluate(&bin.left)?;
                let right = self.evaluate(&bin.right)?;
                match (&left, &right) {
                    (StaticValue::Num(a), StaticValue::Num(b)) => Some(StaticValue::Num(a + b)),
                    (StaticValue::Str(_), _) | (_, StaticValue::Str(_)) => Some(StaticValue::Str(
                        format!("{}{}", left.to_text()?, right.to_text()?),
                    )),
                    _ => None,
                }
            }
            Expr::Unary(unary) if unary.op == UnaryOp::Minus => match self.evaluate(&unary.arg)? {
                StaticValue::Num(n) => Some(StaticValue::Num(-n)),
                _ => None,
            },
            Expr::Array(array) => {
                let mut items = Vec::with_capacity(array.elems.len());
                for elem in &array.elems {
                    let elem = elem.as_ref()?;
                    if elem.spread.is_some() {
                        return None;
                    }
                    items.push(self.evaluate(&elem.expr)?);
                }
                Some(StaticValue::Array(items))
            }
            Expr::Object(object) => {
                let mut props = Vec::with_capacity(object.props.len());
                for prop in &object.props {
                    let PropOrSpread::Prop(prop) = prop else {
                        return None;
                    };
                    let Prop::KeyValue(kv) = &**prop else {
                        return None;
                    };
                    let key = static_prop_name(&kv.key)?;
                    props.push((key, self.evaluate(&kv.value)?));
                }
                Some(StaticValue::Object(props))
            }
            _ => None,
        }
    }
}

/// Unwrap TypeScript-specific expression wrappers to get the inner expression.
pub fn unwrap_ts_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::TsAs(ts_as) => unwrap_ts_expr(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_ts_expr(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_ts_expr(&ts_sat.expr),
        Expr::Paren(paren) => unwrap_ts_expr(&paren.expr),
        _ => expr,
    }
}

/// Key of a non-computed property.
pub fn static_prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(|s| s.to_string()),
        PropName::Num(n) => Some(number_to_string(n.value)),
        _ => None,
    }
}

pub fn str_lit(value: &str) -> Str {
    Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    }
}

pub fn prop_name(key: &str) -> PropName {
    if is_identifier_name(key) {
        PropName::Ident(IdentName::new(key.into(), DUMMY_SP))
    } else {
        PropName::Str(str_lit(key))
    }
}

/// Number to text the way string concatenation would print it.
fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        // Also covers -0.
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_common::{FileName, SourceMap};
    use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

    fn parse_expr(code: &str) -> Box<Expr> {
        let source_map = SourceMap::default();
        let source_file =
            source_map.new_source_file(FileName::Anon.into(), code.to_string());
        let syntax = Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        });
        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);
        parser.parse_expr().unwrap()
    }

    fn eval(code: &str) -> Option<StaticValue> {
        ConfidentEvaluator.evaluate(&parse_expr(code))
    }

    #[test]
    fn test_evaluate_literals() {
        assert_eq!(eval("'hi'"), Some(StaticValue::Str("hi".to_string())));
        assert_eq!(eval("42"), Some(StaticValue::Num(42.0)));
        assert_eq!(eval("true"), Some(StaticValue::Bool(true)));
        assert_eq!(eval("null"), Some(StaticValue::Null));
        assert_eq!(eval("undefined"), Some(StaticValue::Undefined));
    }

    #[test]
    fn test_evaluate_compositions() {
        assert_eq!(eval("'a' + 'b'"), Some(StaticValue::Str("ab".to_string())));
        assert_eq!(eval("'n' + 1"), Some(StaticValue::Str("n1".to_string())));
        assert_eq!(eval("1 + 2"), Some(StaticValue::Num(3.0)));
        assert_eq!(eval("-3"), Some(StaticValue::Num(-3.0)));
        assert_eq!(
            eval("`x${'y'}z`"),
            Some(StaticValue::Str("xyz".to_string()))
        );
        assert_eq!(eval("('a' as const)"), Some(StaticValue::Str("a".to_string())));
    }

    #[test]
    fn test_evaluate_object_and_array() {
        let value = eval("{ id: 'a', 'default-key': ['x', 2] }").unwrap();
        assert_eq!(value.get("id"), Some(&StaticValue::Str("a".to_string())));
        assert_eq!(
            value.get("default-key"),
            Some(&StaticValue::Array(vec![
                StaticValue::Str("x".to_string()),
                StaticValue::Num(2.0)
            ]))
        );
    }

    #[test]
    fn test_not_evaluable() {
        assert_eq!(eval("name"), None);
        assert_eq!(eval("`hi ${name}`"), None);
        assert_eq!(eval("{ ...base, id: 'a' }"), None);
        assert_eq!(eval("{ [key]: 'a' }"), None);
        assert_eq!(eval("{ id }"), None);
        assert_eq!(eval("[...items]"), None);
        assert_eq!(eval("f()"), None);
    }

    #[test]
    fn test_to_expr_roundtrip() {
        let value = eval("{ id: 'a', 'not-ident': [1, null, false] }").unwrap();
        let expr = value.to_expr();
        assert_eq!(ConfidentEvaluator.evaluate(&expr), Some(value));
    }

    #[test]
    fn test_large_and_non_finite_numbers_as_text() {
        assert_eq!(number_to_string(1e20), "100000000000000000000");
        assert_eq!(number_to_string(-9007199254740993.0), "-9007199254740992");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.5), "0.5");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::INFINITY), "Infinity");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");

        assert_eq!(
            eval("`n${1e20}`"),
            Some(StaticValue::Str("n100000000000000000000".to_string()))
        );
    }
}
