//! The i18n transform pass.
//!
//! `I18nTransform` is a `VisitMut` over one file's `Module`:
//! `visit_mut_module` starts a fresh [`TraversalSession`], node visits route
//! to the markup, call-site and component handlers, and [`I18nTransform::finish_file`]
//! hands the registry to the catalog emitter.
//!
//! ## Module Structure
//!
//! - `session`: per-file mutable state
//! - `extract`: shared helpers for reading, validating and registering descriptors
//! - `markup`: `<FormattedMessage>` strategies (attribute / descriptor)
//! - `calls`: single-message and bulk helper call rewriting
//! - `components`: component classification and renaming
//! - `builders`: synthesized AST nodes

mod builders;
mod calls;
mod components;
mod extract;
mod markup;
mod session;


use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use swc_common::{SourceMap, Span};
use swc_ecma_ast::{CallExpr, Id, Ident, JSXOpeningElement, Module, ModuleItem, TsModuleBlock};
use swc_ecma_visit::{VisitMut, VisitMutWith};

pub use calls::CallKind;
pub use components::{Classification, ComponentKind, INTERNAL_PREFIX, classify};
pub use markup::{AttributeStrategy, DescriptorStrategy, MarkupExtractor, MarkupStrategy};
pub use session::TraversalSession;

use crate::config::Config;
use crate::core::SourceLocation;
use crate::core::data::MessageDescriptor;
use crate::core::emit::CatalogEmitter;
use crate::core::evaluate::{ConfidentEvaluator, StaticEvaluator};
use crate::core::imports::{BindingLookup, ImportResolver, ImportedName, ModuleImports};
use components::Renamer;
use extract::ExtractCx;
use markup::TagMatch;

/// Identity of the file being transformed.
#[derive(Clone)]
pub struct FileContext {
    pub path: PathBuf,
    /// Directory that catalog paths are mirrored relative to.
    pub cwd: PathBuf,
    pub source_map: Arc<SourceMap>,
}

impl FileContext {
    pub fn new(path: impl Into<PathBuf>, cwd: impl Into<PathBuf>, source_map: Arc<SourceMap>) -> Self {
        Self {
            path: path.into(),
            cwd: cwd.into(),
            source_map,
        }
    }

    /// 1-based `file:line:col`. Synthesized nodes report line 0.
    pub fn location(&self, span: Span) -> SourceLocation {
        let file_path = self.path.to_string_lossy();
        if span.is_dummy() {
            return SourceLocation::new(file_path, 0, 0);
        }
        let loc = self.source_map.lookup_char_pos(span.lo);
        SourceLocation::new(file_path, loc.line, loc.col_display + 1)
    }
}

/// Non-fatal diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformWarning {
    pub location: SourceLocation,
    pub message: String,
}

/// Metadata attached to a transformed file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileResult {
    /// Registered descriptors, in registration order.
    pub messages: Vec<MessageDescriptor>,
    pub warnings: Vec<TransformWarning>,
    /// Catalog written for this file, if any.
    pub catalog_path: Option<PathBuf>,
}

/// One component scheduled for wrapping.
struct Conversion {
    /// Index of the declaration in the module body.
    index: usize,
    id: Id,
    public: String,
    internal: String,
}

pub struct I18nTransform<'a> {
    config: &'a Config,
    file: &'a FileContext,
    lookup: &'a dyn BindingLookup,
    evaluator: &'a dyn StaticEvaluator,
    markup: MarkupStrategy,
    session: TraversalSession,
}

impl<'a> I18nTransform<'a> {
    pub fn new(
        config: &'a Config,
        file: &'a FileContext,
        lookup: &'a dyn BindingLookup,
        evaluator: &'a dyn StaticEvaluator,
    ) -> Self {
        Self {
            config,
            file,
            lookup,
            evaluator,
            markup: MarkupStrategy::for_mode(config.markup_mode),
            session: TraversalSession::new(),
        }
    }

    pub fn session(&self) -> &TraversalSession {
        &self.session
    }

    /// File-end event: surface the first error or emit the catalog.
    ///
    /// The session is cleared either way.
    pub fn finish_file(&mut self) -> Result<FileResult> {
        let session = std::mem::take(&mut self.session);
        if let Some(error) = session.failure {
            return Err(error.into());
        }

        let messages = session.registry.snapshot();
        let emitter = CatalogEmitter::new(self.config.messages_dir.as_deref());
        let catalog_path = emitter.emit(self.file, &messages)?;

        Ok(FileResult {
            messages,
            warnings: session.warnings,
            catalog_path,
        })
    }

    fn cx(&mut self) -> ExtractCx<'_> {
        ExtractCx {
            config: self.config,
            file: self.file,
            evaluator: self.evaluator,
            resolver: ImportResolver::new(self.lookup, &self.config.internal_path_markers),
            session: &mut self.session,
        }
    }

    fn process_call(&mut self, call: &mut CallExpr) {
        let mut cx = self.cx();
        let Some((kind, callee)) = calls::resolve_callee(&cx, &call.callee) else {
            return;
        };
        let result = match kind {
            CallKind::SingleMessage => calls::rewrite_single_call(&mut cx, call, &callee),
            CallKind::BulkDescriptors => calls::normalize_bulk_call(&mut cx, call, &callee),
        };
        if let Err(error) = result {
            self.session.fail(error);
        }
    }

    fn process_opening_element(&mut self, element: &mut JSXOpeningElement) {
        let strategy = self.markup;
        let mut cx = self.cx();
        let result = match markup::resolve_tag(&cx, &element.name) {
            TagMatch::Deprecated(name) => {
                cx.warn(
                    element.span,
                    format!("`{name}` is deprecated and its message is not extracted"),
                );
                Ok(())
            }
            TagMatch::Localizable => strategy.extract(&mut cx, element),
            TagMatch::Other => Ok(()),
        };
        if let Err(error) = result {
            self.session.fail(error);
        }
    }

    fn plan_conversion(&mut self, index: usize, name: &Ident) -> Option<Conversion> {
        let public = name.sym.to_string();
        if self.session.is_converted(&public) {
            return None;
        }
        let internal = format!("{INTERNAL_PREFIX}{public}");
        self.session.converted.insert(public.clone());
        self.session.converted.insert(internal.clone());
        Some(Conversion {
            index,
            id: name.to_id(),
            public,
            internal,
        })
    }

    /// Rename, wrap and import, back to front so indices stay valid.
    fn apply_conversions(&mut self, items: &mut Vec<ModuleItem>, conversions: Vec<Conversion>) {
        if conversions.is_empty() {
            return;
        }

        let renames: HashMap<Id, String> = conversions
            .iter()
            .map(|c| (c.id.clone(), c.internal.clone()))
            .collect();
        items.visit_mut_with(&mut Renamer { renames: &renames });

        let (wrapper, needs_import) = self.wrapper_local();
        for conversion in conversions.iter().rev() {
            items.insert(
                conversion.index + 1,
                builders::wrapped_export(&conversion.public, &conversion.internal, &wrapper),
            );
        }
        if needs_import {
            items.insert(0, builders::named_import(&wrapper, &self.config.wrapper_module));
        }
    }

    /// Local name of the wrapping function, and whether its import still has
    /// to be inserted. An existing import is reused.
    fn wrapper_local(&mut self) -> (Ident, bool) {
        if let Some(local) = &self.session.wrapper_local {
            return (local.clone(), false);
        }

        let imported = ImportedName::Named(self.config.wrapper_function.clone());
        let (local, needs_import) = match self
            .lookup
            .find_import(&self.config.wrapper_module, &imported)
        {
            Some(binding) => (binding.local.clone(), false),
            None => (builders::ident(&self.config.wrapper_function), true),
        };

        self.session.wrapper_local = Some(local.clone());
        (local, needs_import)
    }
}

impl VisitMut for I18nTransform<'_> {
    /// File-start event.
    fn visit_mut_module(&mut self, module: &mut Module) {
        self.session = TraversalSession::new();
        module.visit_mut_children_with(self);
    }

    fn visit_mut_module_items(&mut self, items: &mut Vec<ModuleItem>) {
        if self.session.failed() {
            return;
        }

        let mut conversions = Vec::new();
        for (index, item) in items.iter_mut().enumerate() {
            let classification = classify(item, self.config);
            self.session.component_kind = classification.kind();
            item.visit_mut_with(self);
            self.session.component_kind = None;

            if self.session.failed() {
                return;
            }
            if let Some(name) = classification.name()
                && let Some(conversion) = self.plan_conversion(index, name)
            {
                conversions.push(conversion);
            }
        }

        self.apply_conversions(items, conversions);
    }

    // Nested `namespace` blocks are visited, but never get imports or wrappers.
    fn visit_mut_ts_module_block(&mut self, block: &mut TsModuleBlock) {
        for item in block.body.iter_mut() {
            item.visit_mut_with(self);
        }
    }

    fn visit_mut_call_expr(&mut self, call: &mut CallExpr) {
        if self.session.failed() {
            return;
        }
        self.process_call(call);
        call.visit_mut_children_with(self);
    }

    fn visit_mut_jsx_opening_element(&mut self, element: &mut JSXOpeningElement) {
        if self.session.failed() {
            return;
        }
        self.process_opening_element(element);
        element.visit_mut_children_with(self);
    }
}

/// Transform one module with the default capabilities: import bindings
/// collected from the module itself and literal-only static evaluation.
pub fn transform_module(module: &mut Module, file: &FileContext, config: &Config) -> Result<FileResult> {
    let imports = ModuleImports::collect(module);
    transform_module_with(module, file, config, &imports, &ConfidentEvaluator)
}

pub fn transform_module_with(
    module: &mut Module,
    file: &FileContext,
    config: &Config,
    lookup: &dyn BindingLookup,
    evaluator: &dyn StaticEvaluator,
) -> Result<FileResult> {
    let mut transform = I18nTransform::new(config, file, lookup, evaluator);
    module.visit_mut_with(&mut transform);
    transform.finish_file()
}
