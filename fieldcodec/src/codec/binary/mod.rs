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

//! Binary wire-format codec.
//!
//! A message is a flat run of tagged values with no header or terminator of
//! its own. Each value starts with a varint tag holding the field number and
//! a [`WireType`]; nested messages are groups. See [`BinaryWriter`] for the
//! value encodings.
//!
//! Since a bare message does not know its own length, [`write_delimited`]
//! and [`merge_delimited`] frame one message with a varint length prefix so
//! several can share a stream:
//!
//! ```text
//! +------------------+------------------------+
//! | length (varint)  | message (length bytes) |
//! +------------------+------------------------+
//! ```
//!
//! # Examples
//!
//! ```rust
//! use fieldcodec::codec::binary;
//! use fieldcodec::schema::{DynamicMessage, FieldDescriptor, MessageDescriptor, ScalarKind};
//! use std::sync::Arc;
//!
//! let descriptor = Arc::new(MessageDescriptor::new(
//!     "demo.Sample",
//!     vec![FieldDescriptor::scalar("value", 1, ScalarKind::Double)],
//! )?);
//!
//! let mut stream = Vec::new();
//! for value in [1.5, f64::NAN] {
//!     let mut sample = DynamicMessage::new(Arc::clone(&descriptor));
//!     sample.set("value", value)?;
//!     binary::write_delimited(&mut stream, &sample)?;
//! }
//!
//! let mut source = stream.as_slice();
//! let mut first = DynamicMessage::new(Arc::clone(&descriptor));
//! binary::merge_delimited(&mut source, &mut first, None)?;
//! let mut second = DynamicMessage::new(descriptor);
//! binary::merge_delimited(&mut source, &mut second, None)?;
//! assert!(source.is_empty());
//! # Ok::<(), fieldcodec::CodecError>(())
//! ```

mod reader;
mod wire;
mod writer;

pub use reader::BinaryReader;
pub use wire::{WireType, make_tag, split_tag};
pub use writer::BinaryWriter;

use crate::codec::{StructuredReader, StructuredWriter, merge_fields};
use crate::error::{CodecError, Result};
use crate::schema::{ExtensionRegistry, Message};
use std::io::{ErrorKind, Read, Write};
use std::sync::Arc;

/// Largest message [`merge_delimited`] accepts (16 MB).
pub const MAX_DELIMITED_SIZE: u64 = 16 * 1024 * 1024;

/// Longest varint: ten 7-bit groups cover 64 bits.
const MAX_VARINT_LEN: usize = 10;

/// Encodes `message` in the binary format.
///
/// # Errors
///
/// Propagates errors from the message's field-walk.
pub fn to_vec(message: &dyn Message) -> Result<Vec<u8>> {
    let mut writer = BinaryWriter::new(Vec::new());
    writer.write_message_start()?;
    message.write_to(&mut writer)?;
    writer.write_message_end()?;
    writer.into_inner()
}

/// Merges one complete binary message into `message`.
///
/// # Errors
///
/// Returns a structural error for truncated or malformed input.
pub fn merge_from_slice(
    bytes: &[u8],
    message: &mut dyn Message,
    registry: Option<Arc<ExtensionRegistry>>,
) -> Result<()> {
    let mut reader = BinaryReader::new(bytes);
    if let Some(registry) = registry {
        reader.set_extension_registry(registry);
    }
    reader.read_message_start()?;
    merge_fields(&mut reader, message)?;
    reader.read_message_end()
}

/// Writes `message` prefixed with its encoded length.
///
/// # Errors
///
/// Propagates field-walk errors and sink failures.
pub fn write_delimited<W: Write>(mut sink: W, message: &dyn Message) -> Result<()> {
    let body = to_vec(message)?;
    postcard::to_io(&(body.len() as u64), &mut sink)?;
    sink.write_all(&body)?;
    sink.flush()?;
    Ok(())
}

/// Reads exactly one length-prefixed message from `source` and merges it
/// into `message`, leaving `source` positioned after it.
///
/// # Errors
///
/// Returns [`CodecError::UnexpectedEof`] if the stream ends inside the
/// frame, and [`CodecError::InvalidStructure`] if the length exceeds
/// [`MAX_DELIMITED_SIZE`].
pub fn merge_delimited<R: Read>(
    mut source: R,
    message: &mut dyn Message,
    registry: Option<Arc<ExtensionRegistry>>,
) -> Result<()> {
    let len = read_length(&mut source)?;
    if len > MAX_DELIMITED_SIZE {
        return Err(CodecError::structure(format!(
            "delimited message of {len} bytes exceeds the {MAX_DELIMITED_SIZE} byte limit"
        )));
    }
    let mut body = Vec::new();
    source.take(len).read_to_end(&mut body)?;
    if (body.len() as u64) < len {
        return Err(CodecError::UnexpectedEof {
            context: "delimited message",
        });
    }
    merge_from_slice(&body, message, registry)
}

/// Reads a varint length one byte at a time so nothing past it is consumed.
fn read_length<R: Read>(source: &mut R) -> Result<u64> {
    let mut raw = Vec::with_capacity(MAX_VARINT_LEN);
    loop {
        let mut byte = [0u8; 1];
        if let Err(err) = source.read_exact(&mut byte) {
            return Err(if err.kind() == ErrorKind::UnexpectedEof {
                CodecError::UnexpectedEof {
                    context: "delimited length",
                }
            } else {
                err.into()
            });
        }
        raw.push(byte[0]);
        if byte[0] & 0x80 == 0 || raw.len() == MAX_VARINT_LEN {
            break;
        }
    }
    let (len, _) = postcard::take_from_bytes::<u64>(&raw)?;
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DynamicMessage, FieldDescriptor, MessageDescriptor, ScalarKind};

    fn sample(value: &str) -> DynamicMessage {
        let descriptor = Arc::new(
            MessageDescriptor::new(
                "test.Text",
                vec![FieldDescriptor::scalar("value", 1, ScalarKind::String)],
            )
            .unwrap(),
        );
        let mut message = DynamicMessage::new(descriptor);
        message.set("value", value).unwrap();
        message
    }

    #[test]
    fn test_delimited_frame_layout() {
        let mut stream = Vec::new();
        write_delimited(&mut stream, &sample("ok")).unwrap();
        assert_eq!(stream, [0x04, 0x0a, 0x02, b'o', b'k']);
    }

    #[test]
    fn test_frames_read_back_in_order() {
        let mut stream = Vec::new();
        write_delimited(&mut stream, &sample("one")).unwrap();
        write_delimited(&mut stream, &sample("two")).unwrap();

        let mut source = stream.as_slice();
        for expected in ["one", "two"] {
            let mut message = DynamicMessage::new(Arc::clone(sample("").descriptor_arc()));
            merge_delimited(&mut source, &mut message, None).unwrap();
            assert_eq!(message, sample(expected));
        }
        let mut extra = sample("");
        assert!(matches!(
            merge_delimited(&mut source, &mut extra, None).unwrap_err(),
            CodecError::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn test_truncated_frame() {
        let mut message = sample("");
        let err = merge_delimited(&[0x05, 0x0a][..], &mut message, None).unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let mut prefix = Vec::new();
        postcard::to_io(&(MAX_DELIMITED_SIZE + 1), &mut prefix).unwrap();
        let mut message = sample("");
        assert!(merge_delimited(prefix.as_slice(), &mut message, None).is_err());
    }
}
