//! Per-file message descriptor registry.
//!
//! Descriptors are keyed by id. Re-registering an id is accepted only when
//! the description and defaultMessage match the stored entry exactly.

use std::collections::HashMap;

use thiserror::Error;

use crate::core::SourceLocation;
use crate::core::data::MessageDescriptor;
use crate::core::error::TransformError;

/// Which optional fields a registration must carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationPolicy {
    pub require_description: bool,
    pub require_default_message: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("message descriptor is missing an `id`")]
    MissingId,
    #[error("message `{0}` is missing a `defaultMessage`")]
    MissingDefaultMessage(String),
    #[error("message `{0}` must have a `description`")]
    DescriptionRequired(String),
    #[error("duplicate message id `{0}` with a different description or defaultMessage")]
    DuplicateIdConflict(String),
}

impl RegistryError {
    /// Attach the location of the node that caused the registration.
    pub fn at(self, location: SourceLocation) -> TransformError {
        match self {
            RegistryError::MissingId => TransformError::MissingId { location },
            RegistryError::MissingDefaultMessage(id) => {
                TransformError::MissingDefaultMessage { id, location }
            }
            RegistryError::DescriptionRequired(id) => {
                TransformError::DescriptionRequired { id, location }
            }
            RegistryError::DuplicateIdConflict(id) => {
                TransformError::DuplicateIdConflict { id, location }
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    /// Insertion order.
    entries: Vec<MessageDescriptor>,
    /// id -> index into `entries`.
    index: HashMap<String, usize>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        descriptor: MessageDescriptor,
        policy: RegistrationPolicy,
    ) -> Result<(), RegistryError> {
        if descriptor.id.is_empty() {
            return Err(RegistryError::MissingId);
        }
        if policy.require_default_message && descriptor.default_message.is_none() {
            return Err(RegistryError::MissingDefaultMessage(descriptor.id));
        }
        if policy.require_description && descriptor.description.is_none() {
            return Err(RegistryError::DescriptionRequired(descriptor.id));
        }

        if let Some(&idx) = self.index.get(&descriptor.id) {
            let existing = &self.entries[idx];
            if existing.description != descriptor.description
                || existing.default_message != descriptor.default_message
            {
                return Err(RegistryError::DuplicateIdConflict(descriptor.id));
            }
            return Ok(());
        }

        self.index.insert(descriptor.id.clone(), self.entries.len());
        self.entries.push(descriptor);
        Ok(())
    }

    /// All entries in insertion order.
    pub fn snapshot(&self) -> Vec<MessageDescriptor> {
        self.entries.clone()
    }
}
