//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Extension field registry used by the binary reader.

use crate::error::{CodecError, Result};
use crate::schema::FieldDescriptor;
use std::collections::HashMap;

/// Maps `(extended message, field number)` to the descriptor of an extension
/// field declared outside the message itself.
///
/// The binary reader consults the registry for field numbers its message
/// descriptor does not declare, before recording them as unknown.
///
/// # Examples
///
/// ```rust
/// use fieldcodec::schema::{ExtensionRegistry, FieldDescriptor, ScalarKind};
///
/// let mut registry = ExtensionRegistry::new();
/// registry.register("example.Point", FieldDescriptor::scalar("label", 100, ScalarKind::String))?;
/// assert!(registry.find("example.Point", 100).is_some());
/// assert!(registry.find("example.Point", 101).is_none());
/// # Ok::<(), fieldcodec::CodecError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExtensionRegistry {
    extensions: HashMap<(String, u32), FieldDescriptor>,
}

impl ExtensionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extension of `extendee`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidStructure`] if the field number is already
    /// registered for `extendee`.
    pub fn register(
        &mut self,
        extendee: impl Into<String>,
        field: FieldDescriptor,
    ) -> Result<()> {
        let key = (extendee.into(), field.number());
        if self.extensions.contains_key(&key) {
            return Err(CodecError::structure(format!(
                "extension {} of {} is already registered",
                key.1, key.0
            )));
        }
        self.extensions.insert(key, field);
        Ok(())
    }

    /// Looks up an extension by extended message name and field number.
    #[must_use]
    pub fn find(&self, extendee: &str, number: u32) -> Option<&FieldDescriptor> {
        self.extensions.get(&(extendee.to_string(), number))
    }

    /// Number of registered extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ScalarKind;

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ExtensionRegistry::new();
        registry
            .register("a.B", FieldDescriptor::scalar("x", 10, ScalarKind::Int32))
            .unwrap();
        let again = registry.register("a.B", FieldDescriptor::scalar("y", 10, ScalarKind::Bool));
        assert!(again.is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_same_number_different_extendee() {
        let mut registry = ExtensionRegistry::new();
        registry
            .register("a.B", FieldDescriptor::scalar("x", 10, ScalarKind::Int32))
            .unwrap();
        registry
            .register("a.C", FieldDescriptor::scalar("x", 10, ScalarKind::Int32))
            .unwrap();
        assert_eq!(registry.find("a.C", 10).unwrap().name(), "x");
    }
}
