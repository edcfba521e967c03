//! Core extraction engine.
//!
//! ## Module Structure
//!
//! - `data`: Descriptor records and source locations
//! - `parsers`: swc-based JSX/TSX parsing
//! - `imports`: Import bindings and the import-aware resolver
//! - `evaluate`: Static evaluation of descriptor expressions
//! - `message_format`: ICU MessageFormat validation and canonical printing
//! - `registry`: Per-file descriptor registry with duplicate detection
//! - `transform`: The AST rewriting pass
//! - `emit`: Per-file JSON catalogs
//! - `file_scanner`: Source file discovery
//! - `context`: Parallel per-file pipeline used by the CLI

pub mod context;
pub mod data;
pub mod emit;
pub mod error;
pub mod evaluate;
pub mod file_scanner;
pub mod imports;
pub mod message_format;
pub mod parsers;
pub mod registry;
pub mod transform;

pub use data::{DescriptorFields, FieldValue, MessageDescriptor, SourceContext, SourceLocation};
pub use error::TransformError;
pub use registry::{DescriptorRegistry, RegistrationPolicy};
pub use transform::{FileContext, FileResult, TransformWarning, transform_module};
