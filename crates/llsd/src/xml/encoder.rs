//! `XmlEncoder` — writes the `<llsd>`-rooted XML form.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use llsd_buffers::Writer;
use quick_xml::escape::escape;

use crate::value::format_date;
use crate::Value;

pub struct XmlEncoder {
    pub writer: Writer,
}

impl Default for XmlEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    pub fn encode(&mut self, value: &Value) -> Vec<u8> {
        self.writer.reset();
        self.writer
            .ascii("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        self.writer.ascii("<llsd>");
        self.write_any(value);
        self.writer.ascii("</llsd>");
        self.writer.flush()
    }

    pub fn write_any(&mut self, value: &Value) {
        match value {
            Value::Undefined => self.writer.ascii("<undef/>"),
            Value::Boolean(b) => self.write_element("boolean", if *b { "1" } else { "0" }),
            Value::Integer(i) => self.write_element("integer", &i.to_string()),
            Value::Real(r) => {
                let text = if r.is_nan() { "nan".to_owned() } else { r.to_string() };
                self.write_element("real", &text);
            }
            Value::Uuid(u) => self.write_element("uuid", &u.to_string()),
            Value::String(s) => self.write_element("string", &escape(s.as_str())),
            Value::Date(d) => self.write_element("date", &format_date(d)),
            Value::Uri(u) => self.write_element("uri", &escape(u.as_str())),
            Value::Binary(b) => {
                self.writer.ascii("<binary encoding=\"base64\">");
                self.writer.ascii(&STANDARD.encode(b));
                self.writer.ascii("</binary>");
            }
            Value::Array(items) => {
                self.writer.ascii("<array>");
                for item in items {
                    self.write_any(item);
                }
                self.writer.ascii("</array>");
            }
            Value::Map(entries) => {
                self.writer.ascii("<map>");
                for (key, val) in entries {
                    self.write_element("key", &escape(key.as_str()));
                    self.write_any(val);
                }
                self.writer.ascii("</map>");
            }
        }
    }

    fn write_element(&mut self, tag: &str, text: &str) {
        self.writer.u8(b'<');
        self.writer.ascii(tag);
        self.writer.u8(b'>');
        self.writer.utf8(text);
        self.writer.ascii("</");
        self.writer.ascii(tag);
        self.writer.u8(b'>');
    }
}
