//! `XmlDecoder` — recursive-descent walk over quick-xml events.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::value::{epoch, parse_date};
use crate::{LlsdError, Value};

#[derive(Default)]
pub struct XmlDecoder;

impl XmlDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decodes a document: optional XML declaration, a root `<llsd>`
    /// element, and exactly one value element inside it.
    pub fn decode(&self, input: &[u8]) -> Result<Value, LlsdError> {
        let text = std::str::from_utf8(input).map_err(|_| LlsdError::InvalidUtf8)?;
        let mut reader = Reader::from_str(text);

        loop {
            match reader.read_event()? {
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Text(t) if t.iter().all(|b| b.is_ascii_whitespace()) => {}
                Event::Start(e) if e.name().as_ref() == b"llsd" => break,
                Event::Start(e) | Event::Empty(e) => {
                    return Err(LlsdError::UnexpectedElement(name_of(&e)))
                }
                Event::Eof => return Err(LlsdError::EndOfInput),
                _ => return Err(LlsdError::Xml("content outside <llsd> root".into())),
            }
        }

        let value = self.read_value(&mut reader)?;

        loop {
            match reader.read_event()? {
                Event::Comment(_) => {}
                Event::Text(t) if t.iter().all(|b| b.is_ascii_whitespace()) => {}
                Event::End(e) if e.name().as_ref() == b"llsd" => break,
                Event::Eof => return Err(LlsdError::EndOfInput),
                _ => return Err(LlsdError::Xml("multiple values in <llsd> root".into())),
            }
        }
        Ok(value)
    }

    /// Skips to the next element and decodes it.
    fn read_value(&self, reader: &mut Reader<&[u8]>) -> Result<Value, LlsdError> {
        loop {
            match reader.read_event()? {
                Event::Comment(_) | Event::PI(_) => {}
                Event::Text(t) if t.iter().all(|b| b.is_ascii_whitespace()) => {}
                Event::Start(e) => {
                    let name = e.name().as_ref().to_vec();
                    let encoding = encoding_attr(&e)?;
                    return self.read_element(reader, &name, false, encoding);
                }
                Event::Empty(e) => {
                    let name = e.name().as_ref().to_vec();
                    let encoding = encoding_attr(&e)?;
                    return self.read_element(reader, &name, true, encoding);
                }
                Event::Eof => return Err(LlsdError::EndOfInput),
                _ => return Err(LlsdError::Xml("expected a value element".into())),
            }
        }
    }

    fn read_element(
        &self,
        reader: &mut Reader<&[u8]>,
        name: &[u8],
        empty: bool,
        encoding: Option<String>,
    ) -> Result<Value, LlsdError> {
        match name {
            b"array" => self.read_array(reader, empty),
            b"map" => self.read_map(reader, empty),
            _ => {
                let text = if empty {
                    String::new()
                } else {
                    self.read_text(reader, name)?
                };
                self.scalar_from_text(name, &text, encoding)
            }
        }
    }

    /// Empty tags produce each kind's canonical default; malformed
    /// scalar text falls back to the same default, matching the
    /// permissive coercion rules of the value model. Binary is the
    /// exception: an undecodable payload or a non-base64 encoding
    /// attribute is an error.
    fn scalar_from_text(
        &self,
        name: &[u8],
        text: &str,
        encoding: Option<String>,
    ) -> Result<Value, LlsdError> {
        match name {
            b"undef" => Ok(Value::Undefined),
            b"boolean" => {
                let t = text.trim();
                Ok(Value::Boolean(t == "1" || t.eq_ignore_ascii_case("true")))
            }
            b"integer" => Ok(Value::Integer(text.trim().parse().unwrap_or(0))),
            b"real" => Ok(Value::Real(text.trim().parse().unwrap_or(0.0))),
            b"uuid" => Ok(Value::Uuid(
                uuid::Uuid::parse_str(text.trim()).unwrap_or(uuid::Uuid::nil()),
            )),
            b"string" => Ok(Value::String(text.to_owned())),
            b"date" => Ok(Value::Date(parse_date(text).unwrap_or(epoch()))),
            b"uri" => Ok(Value::Uri(text.to_owned())),
            b"binary" => {
                if let Some(enc) = encoding {
                    if enc != "base64" {
                        return Err(LlsdError::UnsupportedEncoding(enc));
                    }
                }
                let cleaned: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
                let bytes = STANDARD
                    .decode(cleaned)
                    .map_err(|_| LlsdError::Xml("invalid base64 in <binary>".into()))?;
                Ok(Value::Binary(bytes))
            }
            other => Err(LlsdError::UnexpectedElement(
                String::from_utf8_lossy(other).into_owned(),
            )),
        }
    }

    fn read_array(&self, reader: &mut Reader<&[u8]>, empty: bool) -> Result<Value, LlsdError> {
        let mut items = Vec::new();
        if empty {
            return Ok(Value::Array(items));
        }
        loop {
            match reader.read_event()? {
                Event::Comment(_) | Event::PI(_) => {}
                Event::Text(t) if t.iter().all(|b| b.is_ascii_whitespace()) => {}
                Event::Start(e) => {
                    let name = e.name().as_ref().to_vec();
                    let encoding = encoding_attr(&e)?;
                    items.push(self.read_element(reader, &name, false, encoding)?);
                }
                Event::Empty(e) => {
                    let name = e.name().as_ref().to_vec();
                    let encoding = encoding_attr(&e)?;
                    items.push(self.read_element(reader, &name, true, encoding)?);
                }
                Event::End(e) if e.name().as_ref() == b"array" => break,
                Event::Eof => return Err(LlsdError::EndOfInput),
                _ => return Err(LlsdError::Xml("unexpected content in <array>".into())),
            }
        }
        Ok(Value::Array(items))
    }

    fn read_map(&self, reader: &mut Reader<&[u8]>, empty: bool) -> Result<Value, LlsdError> {
        let mut entries = HashMap::new();
        if empty {
            return Ok(Value::Map(entries));
        }
        loop {
            match reader.read_event()? {
                Event::Comment(_) | Event::PI(_) => {}
                Event::Text(t) if t.iter().all(|b| b.is_ascii_whitespace()) => {}
                Event::Start(e) if e.name().as_ref() == b"key" => {
                    let key = self.read_text(reader, b"key")?;
                    let value = self.read_value(reader)?;
                    // A repeated key overwrites the previous entry
                    entries.insert(key, value);
                }
                Event::Empty(e) if e.name().as_ref() == b"key" => {
                    let value = self.read_value(reader)?;
                    entries.insert(String::new(), value);
                }
                Event::Start(e) | Event::Empty(e) => {
                    return Err(LlsdError::UnexpectedElement(name_of(&e)))
                }
                Event::End(e) if e.name().as_ref() == b"map" => break,
                Event::Eof => return Err(LlsdError::EndOfInput),
                _ => return Err(LlsdError::Xml("unexpected content in <map>".into())),
            }
        }
        Ok(Value::Map(entries))
    }

    /// Accumulates the character data of a scalar element up to its end
    /// tag. A nested element inside a scalar is an error.
    fn read_text(&self, reader: &mut Reader<&[u8]>, end: &[u8]) -> Result<String, LlsdError> {
        let mut out = String::new();
        loop {
            match reader.read_event()? {
                Event::Text(t) => {
                    let piece = t
                        .unescape()
                        .map_err(|e| LlsdError::Xml(e.to_string()))?;
                    out.push_str(&piece);
                }
                Event::CData(c) => {
                    let piece = std::str::from_utf8(&c).map_err(|_| LlsdError::InvalidUtf8)?;
                    out.push_str(piece);
                }
                Event::Comment(_) => {}
                Event::End(e) if e.name().as_ref() == end => break,
                Event::Start(e) | Event::Empty(e) => {
                    return Err(LlsdError::UnexpectedElement(name_of(&e)))
                }
                Event::Eof => return Err(LlsdError::EndOfInput),
                _ => return Err(LlsdError::Xml("unexpected content in scalar element".into())),
            }
        }
        Ok(out)
    }
}

fn name_of(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn encoding_attr(e: &BytesStart) -> Result<Option<String>, LlsdError> {
    match e.try_get_attribute("encoding") {
        Ok(Some(attr)) => {
            let value = attr
                .unescape_value()
                .map_err(|err| LlsdError::Xml(err.to_string()))?;
            Ok(Some(value.into_owned()))
        }
        Ok(None) => Ok(None),
        Err(err) => Err(LlsdError::Xml(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kind;

    fn decode(text: &str) -> Result<Value, LlsdError> {
        XmlDecoder::new().decode(text.as_bytes())
    }

    fn doc(body: &str) -> String {
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?><llsd>{body}</llsd>")
    }

    #[test]
    fn scalar_elements() {
        assert_eq!(decode(&doc("<undef/>")), Ok(Value::Undefined));
        assert_eq!(decode(&doc("<boolean>1</boolean>")), Ok(Value::Boolean(true)));
        assert_eq!(
            decode(&doc("<boolean>true</boolean>")),
            Ok(Value::Boolean(true))
        );
        assert_eq!(decode(&doc("<boolean/>")), Ok(Value::Boolean(false)));
        assert_eq!(decode(&doc("<integer>0012</integer>")), Ok(Value::Integer(12)));
        assert_eq!(decode(&doc("<integer/>")), Ok(Value::Integer(0)));
    }

    #[test]
    fn real_nan_and_empty() {
        assert!(matches!(
            decode(&doc("<real>nan</real>")),
            Ok(Value::Real(r)) if r.is_nan()
        ));
        assert_eq!(decode(&doc("<real/>")), Ok(Value::Real(0.0)));
        assert_eq!(decode(&doc("<real>-1.5e3</real>")), Ok(Value::Real(-1500.0)));
    }

    #[test]
    fn string_entities_and_whitespace() {
        assert_eq!(
            decode(&doc("<string>a&lt;b&amp;c</string>")),
            Ok(Value::from("a<b&c"))
        );
        // Inner whitespace is preserved for strings
        assert_eq!(decode(&doc("<string> a </string>")), Ok(Value::from(" a ")));
        assert_eq!(decode(&doc("<string/>")), Ok(Value::from("")));
    }

    #[test]
    fn binary_encodings() {
        assert_eq!(
            decode(&doc("<binary encoding=\"base64\">AQID</binary>")),
            Ok(Value::Binary(vec![1, 2, 3]))
        );
        // Attribute is optional; base64 is assumed
        assert_eq!(
            decode(&doc("<binary>AQID</binary>")),
            Ok(Value::Binary(vec![1, 2, 3]))
        );
        assert_eq!(decode(&doc("<binary/>")), Ok(Value::Binary(vec![])));
        assert_eq!(
            decode(&doc("<binary encoding=\"base16\">00</binary>")),
            Err(LlsdError::UnsupportedEncoding("base16".into()))
        );
    }

    #[test]
    fn nested_containers_with_whitespace() {
        let body = "
            <map>
                <key>list</key>
                <array>
                    <integer>1</integer>
                    <map><key>deep</key><string>x</string></map>
                </array>
            </map>";
        let v = decode(&doc(body)).unwrap();
        assert_eq!(v.get("list").index(0), &Value::Integer(1));
        assert_eq!(v.get("list").index(1).get("deep"), &Value::from("x"));
    }

    #[test]
    fn repeated_map_key_overwrites() {
        let body = "<map><key>k</key><integer>1</integer><key>k</key><integer>2</integer></map>";
        let v = decode(&doc(body)).unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v.get("k"), &Value::Integer(2));
    }

    #[test]
    fn unknown_elements_fail() {
        assert_eq!(
            decode(&doc("<bogus>1</bogus>")),
            Err(LlsdError::UnexpectedElement("bogus".into()))
        );
        assert!(decode("<notllsd/>").is_err());
    }

    #[test]
    fn truncated_documents_fail() {
        assert!(decode("<llsd>").is_err());
        assert!(decode("<llsd><array><integer>1</integer>").is_err());
    }

    #[test]
    fn date_elements() {
        let v = decode(&doc("<date>2006-02-01T14:29:53Z</date>")).unwrap();
        assert_eq!(v.kind(), Kind::Date);
        assert_eq!(v.as_integer(), 1_138_804_193);
        assert_eq!(decode(&doc("<date/>")), Ok(Value::Date(epoch())));
    }
}
