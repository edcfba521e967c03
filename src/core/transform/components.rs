//! Exported UI component detection and the rename pass used when wrapping.
//!
//! Detection is a shape heuristic, not a type check:
//! - class components must extend one of the configured base names, bare
//!   (`Component`) or qualified (`React.Component`);
//! - function components must be a single uppercase `const` bound to a
//!   function whose block body ends in `return <Jsx/>`. Earlier returns and
//!   concise arrow bodies are not recognized.
//!
//! Names carrying [`INTERNAL_PREFIX`] are the renamed originals of wrapped
//! components and never classify as components, so re-running the pass over
//! its own output leaves them alone.

use std::collections::HashMap;

use swc_ecma_ast::{
    BlockStmt, BlockStmtOrExpr, Class, Decl, ExportNamedSpecifier, Expr, Id, Ident, IdentName,
    KeyValueProp, MemberProp, ModuleDecl, ModuleItem, Prop, PropName, Stmt,
};
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::config::Config;
use crate::core::evaluate::unwrap_ts_expr;

/// Prefix of the internal name a wrapped component is renamed to.
pub const INTERNAL_PREFIX: &str = "_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Class,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    ClassComponent { name: Ident },
    FunctionComponent { name: Ident },
    NotAComponent,
}

impl Classification {
    pub fn kind(&self) -> Option<ComponentKind> {
        match self {
            Classification::ClassComponent { .. } => Some(ComponentKind::Class),
            Classification::FunctionComponent { .. } => Some(ComponentKind::Function),
            Classification::NotAComponent => None,
        }
    }

    pub fn name(&self) -> Option<&Ident> {
        match self {
            Classification::ClassComponent { name } | Classification::FunctionComponent { name } => {
                Some(name)
            }
            Classification::NotAComponent => None,
        }
    }
}

pub fn classify(item: &ModuleItem, config: &Config) -> Classification {
    let ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) = item else {
        return Classification::NotAComponent;
    };

    match &export.decl {
        Decl::Class(class_decl) => {
            if is_class_component(&class_decl.ident, &class_decl.class, config) {
                Classification::ClassComponent {
                    name: class_decl.ident.clone(),
                }
            } else {
                Classification::NotAComponent
            }
        }
        Decl::Var(var) => {
            let [declarator] = var.decls.as_slice() else {
                return Classification::NotAComponent;
            };
            let Some(binding) = declarator.name.as_ident() else {
                return Classification::NotAComponent;
            };
            let starts_upper = binding
                .id
                .sym
                .chars()
                .next()
                .is_some_and(|c| c.is_uppercase());
            let returns_markup = declarator
                .init
                .as_deref()
                .and_then(function_body)
                .is_some_and(ends_with_markup_return);

            if starts_upper && !is_internal_name(&binding.id) && returns_markup {
                Classification::FunctionComponent {
                    name: binding.id.clone(),
                }
            } else {
                Classification::NotAComponent
            }
        }
        _ => Classification::NotAComponent,
    }
}

fn is_class_component(name: &Ident, class: &Class, config: &Config) -> bool {
    if is_internal_name(name) || name.sym.as_str() == config.excluded_base_class {
        return false;
    }
    let Some(super_class) = class.super_class.as_deref() else {
        return false;
    };
    let base = match unwrap_ts_expr(super_class) {
        Expr::Ident(ident) => ident.sym.as_str(),
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(prop) => prop.sym.as_str(),
            _ => return false,
        },
        _ => return false,
    };
    base != config.excluded_base_class && config.base_component_names.iter().any(|b| b == base)
}

fn is_internal_name(name: &Ident) -> bool {
    name.sym.as_str().starts_with(INTERNAL_PREFIX)
}

fn function_body(init: &Expr) -> Option<&BlockStmt> {
    match unwrap_ts_expr(init) {
        Expr::Arrow(arrow) => match &*arrow.body {
            BlockStmtOrExpr::BlockStmt(block) => Some(block),
            BlockStmtOrExpr::Expr(_) => None,
        },
        Expr::Fn(func) => func.function.body.as_ref(),
        _ => None,
    }
}

fn ends_with_markup_return(body: &BlockStmt) -> bool {
    let Some(Stmt::Return(ret)) = body.stmts.last() else {
        return false;
    };
    ret.arg.as_deref().is_some_and(|arg| {
        matches!(
            unwrap_ts_expr(arg),
            Expr::JSXElement(_) | Expr::JSXFragment(_)
        )
    })
}

/// Renames every reference to the given bindings.
///
/// Shorthand object properties are expanded so their key is kept, and
/// `export { X }` specifiers are left untouched.
pub struct Renamer<'a> {
    pub renames: &'a HashMap<Id, String>,
}

impl VisitMut for Renamer<'_> {
    fn visit_mut_ident(&mut self, ident: &mut Ident) {
        if let Some(new_name) = self.renames.get(&ident.to_id()) {
            ident.sym = new_name.as_str().into();
        }
    }

    fn visit_mut_prop(&mut self, prop: &mut Prop) {
        if let Prop::Shorthand(ident) = prop
            && let Some(new_name) = self.renames.get(&ident.to_id())
        {
            let key = PropName::Ident(IdentName::new(ident.sym.clone(), ident.span));
            let mut value = ident.clone();
            value.sym = new_name.as_str().into();
            *prop = Prop::KeyValue(KeyValueProp {
                key,
                value: Box::new(Expr::Ident(value)),
            });
            return;
        }
        prop.visit_mut_children_with(self);
    }

    fn visit_mut_export_named_specifier(&mut self, _: &mut ExportNamedSpecifier) {}
}
