//! Constructors for synthesized nodes. All of them carry dummy spans.

use swc_common::{DUMMY_SP, SyntaxContext};
use swc_ecma_ast::{
    BindingIdent, CallExpr, Callee, Decl, ExportDecl, Expr, ExprOrSpread, Ident, IdentName, ImportDecl,
    ImportNamedSpecifier, ImportPhase, ImportSpecifier, JSXAttr, JSXAttrName, JSXAttrOrSpread,
    JSXAttrValue, Lit, MemberExpr, MemberProp, ModuleDecl, ModuleItem, Null, ObjectLit, Pat, ThisExpr,
    VarDecl, VarDeclKind, VarDeclarator,
};

use super::components::ComponentKind;
use crate::core::evaluate::str_lit;

pub fn ident(name: &str) -> Ident {
    Ident::new(name.into(), DUMMY_SP, SyntaxContext::empty())
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        callee: Callee::Expr(Box::new(callee)),
        args: args.into_iter().map(arg).collect(),
        type_args: None,
    })
}

pub fn arg(expr: Expr) -> ExprOrSpread {
    ExprOrSpread {
        spread: None,
        expr: Box::new(expr),
    }
}

pub fn member(obj: Expr, prop: &str) -> Expr {
    Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(obj),
        prop: MemberProp::Ident(IdentName::new(prop.into(), DUMMY_SP)),
    })
}

pub fn this() -> Expr {
    Expr::This(ThisExpr { span: DUMMY_SP })
}

/// `callee.bind(this)`
pub fn bind_this(callee: Expr) -> Expr {
    call(member(callee, "bind"), vec![this()])
}

pub fn empty_object() -> Expr {
    Expr::Object(ObjectLit {
        span: DUMMY_SP,
        props: Vec::new(),
    })
}

pub fn null() -> Expr {
    Expr::Lit(Lit::Null(Null { span: DUMMY_SP }))
}

/// Props reference for the enclosing component: `this.props` inside class
/// components, the bare props identifier otherwise.
pub fn props_ref(kind: Option<ComponentKind>, props_identifier: &str) -> Expr {
    match kind {
        Some(ComponentKind::Class) => member(this(), "props"),
        Some(ComponentKind::Function) | None => Expr::Ident(ident(props_identifier)),
    }
}

/// `name="value"`
pub fn jsx_str_attr(name: &str, value: &str) -> JSXAttrOrSpread {
    JSXAttrOrSpread::JSXAttr(JSXAttr {
        span: DUMMY_SP,
        name: JSXAttrName::Ident(IdentName::new(name.into(), DUMMY_SP)),
        value: Some(JSXAttrValue::Str(str_lit(value))),
    })
}

/// `export const Public = wrapper(Internal);`
pub fn wrapped_export(public: &str, internal: &str, wrapper: &Ident) -> ModuleItem {
    let init = call(
        Expr::Ident(wrapper.clone()),
        vec![Expr::Ident(ident(internal))],
    );
    ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
        span: DUMMY_SP,
        decl: Decl::Var(Box::new(VarDecl {
            span: DUMMY_SP,
            ctxt: SyntaxContext::empty(),
            kind: VarDeclKind::Const,
            declare: false,
            decls: vec![VarDeclarator {
                span: DUMMY_SP,
                name: Pat::Ident(BindingIdent::from(ident(public))),
                init: Some(Box::new(init)),
                definite: false,
            }],
        })),
    }))
}

/// `import { name } from "module";`
pub fn named_import(name: &Ident, module: &str) -> ModuleItem {
    ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl {
        span: DUMMY_SP,
        specifiers: vec![ImportSpecifier::Named(ImportNamedSpecifier {
            span: DUMMY_SP,
            local: name.clone(),
            imported: None,
            is_type_only: false,
        })],
        src: Box::new(str_lit(module)),
        type_only: false,
        with: None,
        phase: ImportPhase::Evaluation,
    }))
}
