//! `BinaryDecoder` — reads the framed big-endian llsd binary form.

use std::collections::HashMap;

use llsd_buffers::Reader;

use super::HEADER;
use crate::value::date_from_secs;
use crate::{LlsdError, Value};

#[derive(Default)]
pub struct BinaryDecoder;

impl BinaryDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Validates the header and reads one root value. Bytes after the
    /// root are ignored; a truncated payload or a declared length past
    /// the end of the buffer is an error.
    pub fn decode(&self, input: &[u8]) -> Result<Value, LlsdError> {
        if input.len() < HEADER.len() || &input[..HEADER.len()] != HEADER {
            return Err(LlsdError::InvalidHeader);
        }
        let mut reader = Reader::new(&input[HEADER.len()..]);
        self.read_any(&mut reader)
    }

    fn read_any(&self, reader: &mut Reader) -> Result<Value, LlsdError> {
        let tag = reader.try_u8()?;
        match tag {
            b'!' => Ok(Value::Undefined),
            b'1' => Ok(Value::Boolean(true)),
            b'0' => Ok(Value::Boolean(false)),
            b'i' => Ok(Value::Integer(reader.try_i32()?)),
            b'r' => Ok(Value::Real(reader.try_f64()?)),
            b'u' => {
                let mut bytes = [0u8; 16];
                bytes.copy_from_slice(reader.try_buf(16)?);
                Ok(Value::Uuid(uuid::Uuid::from_bytes(bytes)))
            }
            b's' => Ok(Value::String(self.read_sized_utf8(reader)?)),
            b'l' => Ok(Value::Uri(self.read_sized_utf8(reader)?)),
            b'd' => Ok(Value::Date(date_from_secs(reader.try_f64()?))),
            b'b' => {
                let size = reader.try_u32()? as usize;
                Ok(Value::Binary(reader.try_buf(size)?.to_vec()))
            }
            b'[' => self.read_array(reader),
            b'{' => self.read_map(reader),
            other => Err(LlsdError::UnknownTag(other, reader.x - 1)),
        }
    }

    fn read_sized_utf8(&self, reader: &mut Reader) -> Result<String, LlsdError> {
        let size = reader.try_u32()? as usize;
        Ok(reader.try_utf8(size)?.to_owned())
    }

    fn read_array(&self, reader: &mut Reader) -> Result<Value, LlsdError> {
        let count = reader.try_u32()? as usize;
        let mut items = Vec::with_capacity(count.min(4096));
        for _ in 0..count {
            items.push(self.read_any(reader)?);
        }
        self.expect(reader, b']')?;
        Ok(Value::Array(items))
    }

    fn read_map(&self, reader: &mut Reader) -> Result<Value, LlsdError> {
        let count = reader.try_u32()? as usize;
        let mut entries = HashMap::with_capacity(count.min(4096));
        for _ in 0..count {
            self.expect(reader, b'k')?;
            let key = self.read_sized_utf8(reader)?;
            let value = self.read_any(reader)?;
            entries.insert(key, value);
        }
        self.expect(reader, b'}')?;
        Ok(Value::Map(entries))
    }

    fn expect(&self, reader: &mut Reader, tag: u8) -> Result<(), LlsdError> {
        let byte = reader.try_u8()?;
        if byte != tag {
            return Err(LlsdError::UnknownTag(byte, reader.x - 1));
        }
        Ok(())
    }
}
