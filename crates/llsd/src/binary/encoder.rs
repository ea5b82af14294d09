//! `BinaryEncoder` — writes the framed big-endian llsd binary form.

use llsd_buffers::Writer;

use super::HEADER;
use crate::value::date_to_secs;
use crate::Value;

pub struct BinaryEncoder {
    pub writer: Writer,
}

impl Default for BinaryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    /// Encodes one root value, header included.
    pub fn encode(&mut self, value: &Value) -> Vec<u8> {
        self.writer.reset();
        self.writer.buf(HEADER);
        self.write_any(value);
        self.writer.flush()
    }

    pub fn write_any(&mut self, value: &Value) {
        match value {
            Value::Undefined => self.writer.u8(b'!'),
            Value::Boolean(true) => self.writer.u8(b'1'),
            Value::Boolean(false) => self.writer.u8(b'0'),
            Value::Integer(i) => self.write_integer(*i),
            Value::Real(r) => self.write_real(*r),
            Value::Uuid(u) => self.write_uuid(u),
            Value::String(s) => self.write_sized(b's', s.as_bytes()),
            Value::Uri(u) => self.write_sized(b'l', u.as_bytes()),
            Value::Date(d) => self.write_date(date_to_secs(d)),
            Value::Binary(b) => self.write_sized(b'b', b),
            Value::Array(items) => self.write_array(items),
            Value::Map(entries) => self.write_map(entries),
        }
    }

    pub fn write_integer(&mut self, int: i32) {
        self.writer.u8(b'i');
        self.writer.i32(int);
    }

    pub fn write_real(&mut self, real: f64) {
        self.writer.u8(b'r');
        self.writer.f64(real);
    }

    pub fn write_uuid(&mut self, uuid: &uuid::Uuid) {
        self.writer.u8(b'u');
        self.writer.buf(uuid.as_bytes());
    }

    /// Seconds since epoch as a big-endian double.
    pub fn write_date(&mut self, secs: f64) {
        self.writer.u8(b'd');
        self.writer.f64(secs);
    }

    /// Tag, 4-byte big-endian byte count, raw bytes. Used for string,
    /// uri, and binary payloads — the count is always a byte count.
    fn write_sized(&mut self, tag: u8, payload: &[u8]) {
        self.writer.u8(tag);
        self.writer.u32(payload.len() as u32);
        self.writer.buf(payload);
    }

    fn write_array(&mut self, items: &[Value]) {
        self.writer.u8(b'[');
        self.writer.u32(items.len() as u32);
        for item in items {
            self.write_any(item);
        }
        self.writer.u8(b']');
    }

    fn write_map(&mut self, entries: &std::collections::HashMap<String, Value>) {
        self.writer.u8(b'{');
        self.writer.u32(entries.len() as u32);
        for (key, value) in entries {
            self.writer.u8(b'k');
            self.writer.u32(key.len() as u32);
            self.writer.buf(key.as_bytes());
            self.write_any(value);
        }
        self.writer.u8(b'}');
    }
}
