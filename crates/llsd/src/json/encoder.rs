//! `JsonEncoder` — writes UTF-8 JSON text for a [`Value`] tree.

use llsd_buffers::Writer;

use crate::value::format_date;
use crate::Value;

pub struct JsonEncoder {
    pub writer: Writer,
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    pub fn encode(&mut self, value: &Value) -> Vec<u8> {
        self.writer.reset();
        self.write_any(value);
        self.writer.flush()
    }

    pub fn write_any(&mut self, value: &Value) {
        match value {
            Value::Undefined => self.writer.ascii("null"),
            Value::Boolean(true) => self.writer.ascii("true"),
            Value::Boolean(false) => self.writer.ascii("false"),
            Value::Integer(i) => self.writer.ascii(&i.to_string()),
            Value::Real(r) => self.write_real(*r),
            Value::String(s) => self.write_str(s),
            Value::Uuid(u) => self.write_str(&u.to_string()),
            Value::Date(d) => self.write_str(&format_date(d)),
            Value::Uri(u) => self.write_str(u),
            Value::Binary(b) => self.write_bin(b),
            Value::Array(items) => self.write_arr(items),
            Value::Map(entries) => self.write_obj(entries),
        }
    }

    /// Finite reals keep a fraction marker so they re-classify as Real
    /// on decode; non-finite reals use the bare extension tokens the
    /// reference parser accepts.
    fn write_real(&mut self, real: f64) {
        if real.is_nan() {
            self.writer.ascii("NaN");
        } else if real == f64::INFINITY {
            self.writer.ascii("Infinity");
        } else if real == f64::NEG_INFINITY {
            self.writer.ascii("-Infinity");
        } else {
            let text = real.to_string();
            let has_marker = text.contains(['.', 'e', 'E']);
            self.writer.ascii(&text);
            if !has_marker {
                self.writer.ascii(".0");
            }
        }
    }

    /// Binary has no JSON form; emit one integer per byte.
    fn write_bin(&mut self, bytes: &[u8]) {
        self.writer.u8(b'[');
        for (i, byte) in bytes.iter().enumerate() {
            if i > 0 {
                self.writer.u8(b',');
            }
            self.writer.ascii(&byte.to_string());
        }
        self.writer.u8(b']');
    }

    fn write_arr(&mut self, items: &[Value]) {
        self.writer.u8(b'[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.writer.u8(b',');
            }
            self.write_any(item);
        }
        self.writer.u8(b']');
    }

    fn write_obj(&mut self, entries: &std::collections::HashMap<String, Value>) {
        self.writer.u8(b'{');
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                self.writer.u8(b',');
            }
            self.write_str(key);
            self.writer.u8(b':');
            self.write_any(value);
        }
        self.writer.u8(b'}');
    }

    /// Escapes `"`, `\`, and control bytes; multi-byte UTF-8 passes
    /// through verbatim.
    pub fn write_str(&mut self, s: &str) {
        self.writer.u8(b'"');
        for &byte in s.as_bytes() {
            match byte {
                b'"' => self.writer.ascii("\\\""),
                b'\\' => self.writer.ascii("\\\\"),
                b'\n' => self.writer.ascii("\\n"),
                b'\r' => self.writer.ascii("\\r"),
                b'\t' => self.writer.ascii("\\t"),
                0x08 => self.writer.ascii("\\b"),
                0x0c => self.writer.ascii("\\f"),
                b if b < 0x20 => self.writer.ascii(&format!("\\u{:04x}", b)),
                b => self.writer.u8(b),
            }
        }
        self.writer.u8(b'"');
    }
}
