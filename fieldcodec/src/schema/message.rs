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

//! The field-walk contract between messages and codecs.

use crate::codec::{StructuredReader, StructuredWriter};
use crate::error::Result;
use crate::schema::{FieldDescriptor, MessageDescriptor, UnknownFieldSet};

/// A schema-described message that can drive a codec.
///
/// Writing is a field-walk: [`write_fields`](Self::write_fields) makes one
/// writer call per present field, in descriptor order. Codecs never inspect a
/// message beyond this contract, which is how nested messages compose: the
/// writer calls back into the nested message's own field-walk.
///
/// Reading is the mirror image: a reader yields field keys, the caller resolves
/// each key against [`descriptor`](Self::descriptor) and hands known fields to
/// [`merge_field`](Self::merge_field), while unknown ones go to
/// [`unknown_fields_mut`](Self::unknown_fields_mut).
///
/// Generated code implements this trait per schema type;
/// [`DynamicMessage`](crate::schema::DynamicMessage) implements it from a
/// descriptor at runtime.
pub trait Message {
    /// The descriptor of this message type.
    fn descriptor(&self) -> &MessageDescriptor;

    /// Writes every present known field, in descriptor order.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by the writer.
    fn write_fields(&self, writer: &mut dyn StructuredWriter) -> Result<()>;

    /// Reads the value of one known field from `reader` and merges it in.
    ///
    /// Repeated fields append, singular scalars replace, singular messages
    /// merge into the existing value.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by the reader.
    fn merge_field(
        &mut self,
        field: &FieldDescriptor,
        reader: &mut dyn StructuredReader,
    ) -> Result<()>;

    /// Fields seen while reading that the descriptor does not declare.
    fn unknown_fields(&self) -> &UnknownFieldSet;

    /// Mutable access to the unknown fields, used by readers.
    fn unknown_fields_mut(&mut self) -> &mut UnknownFieldSet;

    /// Writes all known fields followed by the unknown-field set.
    ///
    /// Codecs call this for nested messages; callers writing a top-level
    /// message call it between `write_message_start` and `write_message_end`.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by the writer.
    fn write_to(&self, writer: &mut dyn StructuredWriter) -> Result<()> {
        self.write_fields(writer)?;
        writer.write_unknown_fields(self.unknown_fields())
    }
}
