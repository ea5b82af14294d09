//! `NotationEncoder` — writes the ASCII token form.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use llsd_buffers::Writer;

use crate::value::format_date;
use crate::Value;

pub struct NotationEncoder {
    pub writer: Writer,
}

impl Default for NotationEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl NotationEncoder {
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
            Value::Undefined => self.writer.u8(b'!'),
            Value::Boolean(true) => self.writer.u8(b'1'),
            Value::Boolean(false) => self.writer.u8(b'0'),
            Value::Integer(i) => {
                self.writer.u8(b'i');
                self.writer.ascii(&i.to_string());
            }
            Value::Real(r) => self.write_real(*r),
            Value::Uuid(u) => {
                self.writer.u8(b'u');
                self.writer.ascii(&u.to_string());
            }
            Value::String(s) => self.write_quoted(b'\'', s),
            Value::Uri(u) => {
                self.writer.u8(b'l');
                self.write_quoted(b'"', u);
            }
            Value::Date(d) => {
                self.writer.u8(b'd');
                self.write_quoted(b'"', &format_date(d));
            }
            Value::Binary(b) => {
                self.writer.ascii("b64\"");
                self.writer.ascii(&STANDARD.encode(b));
                self.writer.u8(b'"');
            }
            Value::Array(items) => {
                self.writer.u8(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.writer.u8(b',');
                    }
                    self.write_any(item);
                }
                self.writer.u8(b']');
            }
            Value::Map(entries) => {
                self.writer.u8(b'{');
                for (i, (key, val)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.writer.u8(b',');
                    }
                    self.write_quoted(b'\'', key);
                    self.writer.u8(b':');
                    self.write_any(val);
                }
                self.writer.u8(b'}');
            }
        }
    }

    fn write_real(&mut self, real: f64) {
        self.writer.u8(b'r');
        if real.is_nan() {
            self.writer.ascii("nan");
        } else if real == f64::INFINITY {
            self.writer.ascii("inf");
        } else if real == f64::NEG_INFINITY {
            self.writer.ascii("-inf");
        } else {
            self.writer.ascii(&real.to_string());
        }
    }

    /// Quoted text; the quote character and backslash are escaped, all
    /// other bytes (including multi-byte UTF-8) pass through verbatim.
    fn write_quoted(&mut self, quote: u8, text: &str) {
        self.writer.u8(quote);
        for &byte in text.as_bytes() {
            if byte == quote || byte == b'\\' {
                self.writer.u8(b'\\');
            }
            self.writer.u8(byte);
        }
        self.writer.u8(quote);
    }
}
