use serde::{Deserialize, Serialize};

/// One localizable message: `{id, description?, defaultMessage?}`.
///
/// Field order is the serialized key order. Absent optional fields are
/// omitted, never written as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDescriptor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_message: Option<String>,
}

impl MessageDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            default_message: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default_message(mut self, default_message: impl Into<String>) -> Self {
        self.default_message = Some(default_message.into());
        self
    }
}

/// A descriptor field value as read from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub text: String,
    /// Read from a JSX string attribute (`id="..."`), where backslashes are
    /// not escape characters.
    pub markup_literal: bool,
}

impl FieldValue {
    pub fn script(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup_literal: false,
        }
    }

    pub fn markup(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup_literal: true,
        }
    }
}

/// Partially read descriptor, before canonicalization and registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorFields {
    pub id: Option<FieldValue>,
    pub description: Option<FieldValue>,
    pub default_message: Option<FieldValue>,
}

impl DescriptorFields {
    /// Store `value` under a recognized descriptor key. Returns false for
    /// keys that are not part of a descriptor.
    pub fn set(&mut self, key: &str, value: FieldValue) -> bool {
        let slot = match key {
            "id" => &mut self.id,
            "description" => &mut self.description,
            "defaultMessage" => &mut self.default_message,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    pub fn is_descriptor_key(key: &str) -> bool {
        matches!(key, "id" | "description" | "defaultMessage")
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.description.is_none() && self.default_message.is_none()
    }
}
