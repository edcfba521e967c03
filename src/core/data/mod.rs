//! Core data types shared by the transform, the emitter and the CLI.
//!
//! ## Module Structure
//!
//! - `descriptor`: Message descriptor records (`{id, description?, defaultMessage?}`)
//! - `source`: Source code location types (SourceContext, SourceLocation)

pub mod descriptor;
pub mod source;

pub use descriptor::{DescriptorFields, FieldValue, MessageDescriptor};
pub use source::{SourceContext, SourceLocation};
