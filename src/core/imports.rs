//! Import provenance: is this identifier really the configured import?
//!
//! Resolution fails closed. An identifier that is not bound by an `import`
//! declaration never matches, whatever its name. References to parameters or
//! locals that reuse an imported name are found by a scope scan over the
//! module, so the parser output can be used as is.

use std::collections::{HashMap, HashSet};

use swc_common::BytePos;
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, CatchClause, ClassExpr, Constructor, Decl, FnExpr,
    ForHead, ForInStmt, ForOfStmt, ForStmt, Function, Id, Ident, ImportDecl, ImportSpecifier,
    Module, ModuleDecl, ModuleExportName, ModuleItem, ObjectPatProp, ParamOrTsParamProp, Pat,
    Stmt, TsParamPropParam, VarDecl, VarDeclKind, VarDeclOrExpr,
};
use swc_ecma_visit::{Visit, VisitWith};

/// What an import specifier pulls out of its module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportedName {
    /// `import X from '..'`
    Default,
    /// `import * as X from '..'`
    Namespace,
    /// `import { x } from '..'` / `import { x as y } from '..'`
    Named(String),
}

impl ImportedName {
    /// The name as written in an accepted-names list (`"default"`, `"*"` or the export name).
    pub fn as_str(&self) -> &str {
        match self {
            ImportedName::Default => "default",
            ImportedName::Namespace => "*",
            ImportedName::Named(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub local: Ident,
    /// Source path exactly as written in the import declaration.
    pub module_path: String,
    pub imported: ImportedName,
}

/// Host capability: which import, if any, declares a binding.
pub trait BindingLookup {
    fn import_binding(&self, ident: &Ident) -> Option<&ImportBinding>;

    /// First import of `imported` from `module_path` (compared verbatim).
    fn find_import(&self, module_path: &str, imported: &ImportedName) -> Option<&ImportBinding>;
}

/// Import bindings of one module, keyed by `Id`.
///
/// `shadowed` holds the start positions of references whose name belongs to
/// an import but which resolve to an inner declaration instead.
#[derive(Debug, Default)]
pub struct ModuleImports {
    bindings: Vec<ImportBinding>,
    by_id: HashMap<Id, usize>,
    shadowed: HashSet<BytePos>,
}

impl ModuleImports {
    pub fn collect(module: &Module) -> Self {
        let mut imports = Self::default();
        for item in &module.body {
            if let ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) = item {
                imports.add_decl(decl);
            }
        }
        if !imports.is_empty() {
            let mut scan = ScopeScan {
                imported: imports.bindings.iter().map(|b| b.local.sym.to_string()).collect(),
                scopes: Vec::new(),
                shadowed: HashSet::new(),
            };
            module.visit_with(&mut scan);
            imports.shadowed = scan.shadowed;
        }
        imports
    }

    fn add_decl(&mut self, decl: &ImportDecl) {
        if decl.type_only {
            return;
        }
        let Some(module_path) = decl.src.value.as_str() else {
            return;
        };

        for specifier in &decl.specifiers {
            let (local, imported) = match specifier {
                ImportSpecifier::Named(named) => {
                    if named.is_type_only {
                        continue;
                    }
                    let imported = match &named.imported {
                        Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                        Some(ModuleExportName::Str(s)) => match s.value.as_str() {
                            Some(name) => name.to_string(),
                            None => continue,
                        },
                        None => named.local.sym.to_string(),
                    };
                    (&named.local, ImportedName::Named(imported))
                }
                ImportSpecifier::Default(default) => (&default.local, ImportedName::Default),
                ImportSpecifier::Namespace(namespace) => {
                    (&namespace.local, ImportedName::Namespace)
                }
            };
            self.insert(ImportBinding {
                local: local.clone(),
                module_path: module_path.to_string(),
                imported,
            });
        }
    }

    fn insert(&mut self, binding: ImportBinding) {
        self.by_id.insert(binding.local.to_id(), self.bindings.len());
        self.bindings.push(binding);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl BindingLookup for ModuleImports {
    fn import_binding(&self, ident: &Ident) -> Option<&ImportBinding> {
        if self.shadowed.contains(&ident.span.lo) {
            return None;
        }
        self.by_id
            .get(&ident.to_id())
            .map(|&idx| &self.bindings[idx])
    }

    fn find_import(&self, module_path: &str, imported: &ImportedName) -> Option<&ImportBinding> {
        self.bindings
            .iter()
            .find(|b| b.module_path == module_path && &b.imported == imported)
    }
}

/// Walks the module with a stack of scopes holding the imported names that
/// are redeclared locally, and records every identifier seen while such a
/// declaration is in scope.
///
/// Declarations count for their whole scope: `var` for the enclosing
/// function, `let`/`const`/`class`/`function` for the enclosing block.
struct ScopeScan {
    imported: HashSet<String>,
    scopes: Vec<HashSet<String>>,
    shadowed: HashSet<BytePos>,
}

impl ScopeScan {
    fn with_scope(&mut self, mut names: HashSet<String>, visit: impl FnOnce(&mut Self)) {
        names.retain(|name| self.imported.contains(name));
        if names.is_empty() {
            visit(self);
            return;
        }
        self.scopes.push(names);
        visit(self);
        self.scopes.pop();
    }
}

impl Visit for ScopeScan {
    fn visit_ident(&mut self, ident: &Ident) {
        let name = ident.sym.as_str();
        if self.scopes.iter().any(|scope| scope.contains(name)) {
            self.shadowed.insert(ident.span.lo);
        }
    }

    fn visit_function(&mut self, function: &Function) {
        let mut names = HashSet::new();
        for param in &function.params {
            pat_names(&param.pat, &mut names);
        }
        if let Some(body) = &function.body {
            hoisted_vars(&body.stmts, &mut names);
        }
        self.with_scope(names, |this| function.visit_children_with(this));
    }

    fn visit_constructor(&mut self, constructor: &Constructor) {
        let mut names = HashSet::new();
        for param in &constructor.params {
            match param {
                ParamOrTsParamProp::Param(param) => pat_names(&param.pat, &mut names),
                ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                    TsParamPropParam::Ident(binding) => {
                        names.insert(binding.id.sym.to_string());
                    }
                    TsParamPropParam::Assign(assign) => pat_names(&assign.left, &mut names),
                },
            }
        }
        if let Some(body) = &constructor.body {
            hoisted_vars(&body.stmts, &mut names);
        }
        self.with_scope(names, |this| constructor.visit_children_with(this));
    }

    fn visit_arrow_expr(&mut self, arrow: &ArrowExpr) {
        let mut names = HashSet::new();
        for param in &arrow.params {
            pat_names(param, &mut names);
        }
        if let BlockStmtOrExpr::BlockStmt(body) = &*arrow.body {
            hoisted_vars(&body.stmts, &mut names);
        }
        self.with_scope(names, |this| arrow.visit_children_with(this));
    }

    fn visit_fn_expr(&mut self, expr: &FnExpr) {
        let names = expr.ident.iter().map(|i| i.sym.to_string()).collect();
        self.with_scope(names, |this| expr.visit_children_with(this));
    }

    fn visit_class_expr(&mut self, expr: &ClassExpr) {
        let names = expr.ident.iter().map(|i| i.sym.to_string()).collect();
        self.with_scope(names, |this| expr.visit_children_with(this));
    }

    fn visit_block_stmt(&mut self, block: &BlockStmt) {
        let mut names = HashSet::new();
        for stmt in &block.stmts {
            if let Stmt::Decl(decl) = stmt {
                lexical_names(decl, &mut names);
            }
        }
        self.with_scope(names, |this| block.visit_children_with(this));
    }

    fn visit_catch_clause(&mut self, clause: &CatchClause) {
        let mut names = HashSet::new();
        if let Some(param) = &clause.param {
            pat_names(param, &mut names);
        }
        self.with_scope(names, |this| clause.visit_children_with(this));
    }

    fn visit_for_stmt(&mut self, stmt: &ForStmt) {
        let mut names = HashSet::new();
        if let Some(VarDeclOrExpr::VarDecl(decl)) = &stmt.init {
            block_scoped_names(decl, &mut names);
        }
        self.with_scope(names, |this| stmt.visit_children_with(this));
    }

    fn visit_for_in_stmt(&mut self, stmt: &ForInStmt) {
        let names = for_head_names(&stmt.left);
        self.with_scope(names, |this| stmt.visit_children_with(this));
    }

    fn visit_for_of_stmt(&mut self, stmt: &ForOfStmt) {
        let names = for_head_names(&stmt.left);
        self.with_scope(names, |this| stmt.visit_children_with(this));
    }
}

fn for_head_names(head: &ForHead) -> HashSet<String> {
    let mut names = HashSet::new();
    if let ForHead::VarDecl(decl) = head {
        block_scoped_names(decl, &mut names);
    }
    names
}

fn lexical_names(decl: &Decl, names: &mut HashSet<String>) {
    match decl {
        Decl::Var(var) => block_scoped_names(var, names),
        Decl::Fn(function) => {
            names.insert(function.ident.sym.to_string());
        }
        Decl::Class(class) => {
            names.insert(class.ident.sym.to_string());
        }
        _ => {}
    }
}

fn block_scoped_names(decl: &VarDecl, names: &mut HashSet<String>) {
    if decl.kind != VarDeclKind::Var {
        for declarator in &decl.decls {
            pat_names(&declarator.name, names);
        }
    }
}

/// `var` declarations anywhere in a function body, not crossing into nested
/// functions.
fn hoisted_vars(stmts: &[Stmt], names: &mut HashSet<String>) {
    for stmt in stmts {
        hoisted_vars_in(stmt, names);
    }
}

fn hoisted_vars_in(stmt: &Stmt, names: &mut HashSet<String>) {
    let var_names = |decl: &VarDecl, names: &mut HashSet<String>| {
        if decl.kind == VarDeclKind::Var {
            for declarator in &decl.decls {
                pat_names(&declarator.name, names);
            }
        }
    };
    match stmt {
        Stmt::Decl(Decl::Var(decl)) => var_names(decl, names),
        Stmt::Block(block) => hoisted_vars(&block.stmts, names),
        Stmt::If(stmt) => {
            hoisted_vars_in(&stmt.cons, names);
            if let Some(alt) = &stmt.alt {
                hoisted_vars_in(alt, names);
            }
        }
        Stmt::For(stmt) => {
            if let Some(VarDeclOrExpr::VarDecl(decl)) = &stmt.init {
                var_names(decl, names);
            }
            hoisted_vars_in(&stmt.body, names);
        }
        Stmt::ForIn(ForInStmt { left, body, .. }) | Stmt::ForOf(ForOfStmt { left, body, .. }) => {
            if let ForHead::VarDecl(decl) = left {
                var_names(decl, names);
            }
            hoisted_vars_in(body, names);
        }
        Stmt::While(stmt) => hoisted_vars_in(&stmt.body, names),
        Stmt::DoWhile(stmt) => hoisted_vars_in(&stmt.body, names),
        Stmt::Labeled(stmt) => hoisted_vars_in(&stmt.body, names),
        Stmt::Try(stmt) => {
            hoisted_vars(&stmt.block.stmts, names);
            if let Some(handler) = &stmt.handler {
                hoisted_vars(&handler.body.stmts, names);
            }
            if let Some(finalizer) = &stmt.finalizer {
                hoisted_vars(&finalizer.stmts, names);
            }
        }
        Stmt::Switch(stmt) => {
            for case in &stmt.cases {
                hoisted_vars(&case.cons, names);
            }
        }
        _ => {}
    }
}

fn pat_names(pat: &Pat, names: &mut HashSet<String>) {
    match pat {
        Pat::Ident(binding) => {
            names.insert(binding.id.sym.to_string());
        }
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                pat_names(elem, names);
            }
        }
        Pat::Rest(rest) => pat_names(&rest.arg, names),
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => pat_names(&kv.value, names),
                    ObjectPatProp::Assign(assign) => {
                        names.insert(assign.key.id.sym.to_string());
                    }
                    ObjectPatProp::Rest(rest) => pat_names(&rest.arg, names),
                }
            }
        }
        Pat::Assign(assign) => pat_names(&assign.left, names),
        _ => {}
    }
}

/// Which imported names count as a hit.
#[derive(Debug, Clone, Copy)]
pub enum AcceptedNames<'a> {
    Any,
    /// Export names, plus the sentinels `"default"` and `"*"`.
    Names(&'a [String]),
}

impl AcceptedNames<'_> {
    fn accepts(&self, imported: &ImportedName) -> bool {
        match self {
            AcceptedNames::Any => true,
            AcceptedNames::Names(names) => names.iter().any(|n| n == imported.as_str()),
        }
    }
}

/// Strip everything before the first segment that is an internal path
/// marker, so `../../i18n` and `./i18n` both normalize to `i18n`.
pub fn normalize_module_path<'p>(path: &'p str, markers: &[String]) -> &'p str {
    let mut offset = 0;
    for segment in path.split('/') {
        if markers.iter().any(|m| m == segment) {
            return &path[offset..];
        }
        offset += segment.len() + 1;
    }
    path
}

pub struct ImportResolver<'a> {
    lookup: &'a dyn BindingLookup,
    markers: &'a [String],
}

impl<'a> ImportResolver<'a> {
    pub fn new(lookup: &'a dyn BindingLookup, markers: &'a [String]) -> Self {
        Self { lookup, markers }
    }

    /// True if `ident` is bound by an import from `module` of an accepted name.
    pub fn references_import(&self, ident: &Ident, module: &str, accepted: AcceptedNames) -> bool {
        let Some(binding) = self.lookup.import_binding(ident) else {
            return false;
        };
        self.same_module(&binding.module_path, module) && accepted.accepts(&binding.imported)
    }

    /// True for `ns.member` where `ns` is a namespace import of `module` and
    /// `member` is one of `names`.
    pub fn references_namespace_member(
        &self,
        object: &Ident,
        member: &str,
        module: &str,
        names: &[String],
    ) -> bool {
        let Some(binding) = self.lookup.import_binding(object) else {
            return false;
        };
        binding.imported == ImportedName::Namespace
            && self.same_module(&binding.module_path, module)
            && names.iter().any(|n| n == member)
    }

    fn same_module(&self, import_path: &str, target: &str) -> bool {
        normalize_module_path(import_path, self.markers)
            == normalize_module_path(target, self.markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parsers::jsx::parse_jsx_source;
    use std::sync::Arc;
    use swc_common::SourceMap;

    fn imports_of(code: &str) -> ModuleImports {
        let parsed =
            parse_jsx_source(code.to_string(), "test.tsx", Arc::new(SourceMap::default())).unwrap();
        ModuleImports::collect(&parsed.module)
    }

    fn ident(name: &str) -> Ident {
        Ident::new_no_ctxt(name.into(), swc_common::DUMMY_SP)
    }

    fn markers() -> Vec<String> {
        vec!["i18n".to_string()]
    }

    #[test]
    fn test_normalize_module_path() {
        let markers = markers();
        assert_eq!(normalize_module_path("../../i18n", &markers), "i18n");
        assert_eq!(normalize_module_path("./i18n/messages", &markers), "i18n/messages");
        assert_eq!(normalize_module_path("i18n", &markers), "i18n");
        assert_eq!(normalize_module_path("../my-i18n", &markers), "../my-i18n");
        assert_eq!(normalize_module_path("react-intl", &markers), "react-intl");
    }

    #[test]
    fn test_collect_import_kinds() {
        let imports = imports_of(
            r#"
import Intl, { FormattedMessage, translate as t } from "react-intl";
import * as ns from "../i18n";
import type { Props } from "./types";
"#,
        );
        assert_eq!(imports.len(), 4);

        let t = imports.import_binding(&ident("t")).unwrap();
        assert_eq!(t.imported, ImportedName::Named("translate".to_string()));
        assert_eq!(t.module_path, "react-intl");

        let intl = imports.import_binding(&ident("Intl")).unwrap();
        assert_eq!(intl.imported, ImportedName::Default);

        let ns = imports.import_binding(&ident("ns")).unwrap();
        assert_eq!(ns.imported, ImportedName::Namespace);

        assert!(imports.import_binding(&ident("Props")).is_none());
    }

    #[test]
    fn test_references_import_named_and_aliased() {
        let imports = imports_of(r#"import { translate as t, other } from "../../i18n";"#);
        let markers = markers();
        let resolver = ImportResolver::new(&imports, &markers);
        let names = vec!["translate".to_string()];

        assert!(resolver.references_import(&ident("t"), "i18n", AcceptedNames::Names(&names)));
        assert!(!resolver.references_import(&ident("other"), "i18n", AcceptedNames::Names(&names)));
        assert!(resolver.references_import(&ident("other"), "i18n", AcceptedNames::Any));
        assert!(!resolver.references_import(&ident("t"), "react-intl", AcceptedNames::Any));
    }

    #[test]
    fn test_local_binding_fails_closed() {
        let imports = imports_of("const translate = (x: string) => x;");
        let markers = markers();
        let resolver = ImportResolver::new(&imports, &markers);
        assert!(!resolver.references_import(&ident("translate"), "i18n", AcceptedNames::Any));
    }

    #[test]
    fn test_default_and_namespace_sentinels() {
        let imports = imports_of(
            r#"
import translate from "i18n";
import * as i18n from "i18n";
"#,
        );
        let markers = markers();
        let resolver = ImportResolver::new(&imports, &markers);
        let named = vec!["translate".to_string()];
        let with_default = vec!["default".to_string()];

        assert!(!resolver.references_import(&ident("translate"), "i18n", AcceptedNames::Names(&named)));
        assert!(resolver.references_import(
            &ident("translate"),
            "i18n",
            AcceptedNames::Names(&with_default)
        ));
        assert!(resolver.references_namespace_member(&ident("i18n"), "translate", "i18n", &named));
        assert!(!resolver.references_namespace_member(&ident("i18n"), "other", "i18n", &named));
        assert!(!resolver.references_namespace_member(
            &ident("translate"),
            "translate",
            "i18n",
            &named
        ));
    }

    /// `(callee name, resolves to an import)` for every plain call.
    fn callee_bindings(code: &str) -> Vec<(String, bool)> {
        struct Callees<'a> {
            imports: &'a ModuleImports,
            found: Vec<(String, bool)>,
        }
        impl Visit for Callees<'_> {
            fn visit_call_expr(&mut self, call: &swc_ecma_ast::CallExpr) {
                if let swc_ecma_ast::Callee::Expr(expr) = &call.callee
                    && let swc_ecma_ast::Expr::Ident(ident) = &**expr
                {
                    let hit = self.imports.import_binding(ident).is_some();
                    self.found.push((ident.sym.to_string(), hit));
                }
                call.visit_children_with(self);
            }
        }

        let parsed =
            parse_jsx_source(code.to_string(), "test.tsx", Arc::new(SourceMap::default())).unwrap();
        let imports = ModuleImports::collect(&parsed.module);
        let mut callees = Callees {
            imports: &imports,
            found: Vec::new(),
        };
        parsed.module.visit_with(&mut callees);
        callees.found
    }

    fn hit(name: &str, resolved: bool) -> (String, bool) {
        (name.to_string(), resolved)
    }

    #[test]
    fn test_parameter_shadows_import() {
        let found = callee_bindings(
            r#"
import { translate } from "react-intl";
export function label(translate) {
  return translate("shadowed");
}
export const arrow = ({ translate }) => translate("destructured");
export const title = translate("imported");
"#,
        );
        assert_eq!(
            found,
            vec![
                hit("translate", false),
                hit("translate", false),
                hit("translate", true),
            ]
        );
    }

    #[test]
    fn test_block_declarations_shadow_only_their_scope() {
        let found = callee_bindings(
            r#"
import { translate } from "react-intl";
function render(flag) {
  if (flag) {
    const translate = (id) => id;
    translate("inner");
  }
  translate("outer");
  try {
    run();
  } catch (translate) {
    translate("caught");
  }
  for (const translate of list) {
    translate("loop");
  }
}
function hoisted() {
  translate("before");
  if (x) {
    var translate = other;
  }
}
"#,
        );
        assert_eq!(
            found,
            vec![
                hit("translate", false),
                hit("translate", true),
                hit("run", false),
                hit("translate", false),
                hit("translate", false),
                hit("translate", false),
            ]
        );
    }

    #[test]
    fn test_find_import() {
        let imports = imports_of(r#"import { injectIntl as wrap } from "react-intl";"#);
        let found = imports
            .find_import("react-intl", &ImportedName::Named("injectIntl".to_string()))
            .unwrap();
        assert_eq!(found.local.sym.as_str(), "wrap");
        assert!(imports.find_import("react-intl", &ImportedName::Default).is_none());
    }
}
