use std::collections::HashSet;

use swc_ecma_ast::Ident;

use super::TransformWarning;
use super::components::ComponentKind;
use crate::core::error::TransformError;
use crate::core::registry::DescriptorRegistry;

/// All mutable state of one file's traversal.
///
/// Created at file start and dropped with the file; never shared between
/// files, so parallel traversals need no locking.
#[derive(Debug, Default)]
pub struct TraversalSession {
    pub registry: DescriptorRegistry,
    /// Public and internal names of components already wrapped.
    pub converted: HashSet<String>,
    /// Local name the wrapping function is reachable under, once known.
    pub wrapper_local: Option<Ident>,
    /// Classification of the exported declaration being visited.
    pub component_kind: Option<ComponentKind>,
    pub warnings: Vec<TransformWarning>,
    /// First fatal error; stops the walk.
    pub failure: Option<TransformError>,
}

impl TraversalSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn fail(&mut self, error: TransformError) {
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }

    pub fn is_converted(&self, name: &str) -> bool {
        self.converted.contains(name)
    }
}
