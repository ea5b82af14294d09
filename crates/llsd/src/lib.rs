//! LLSD structured-data codecs.
//!
//! One dynamically-typed [`Value`] model and four interchangeable wire
//! formats: a framed big-endian binary form, a compact ASCII notation
//! form, JSON with llsd type-detection rules, and a tag-per-kind XML
//! dialect. [`decode`] sniffs the format from a byte prefix;
//! [`decode_with`] and [`encode`] take an explicit [`Format`].
//!
//! ```
//! use llsd::{decode, encode, Format, Value};
//!
//! let value = Value::from(1_234_843);
//! let bytes = encode(&value, Format::Binary);
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```

mod error;
mod format;
mod interop;
pub mod value;

pub mod binary;
pub mod json;
pub mod notation;
pub mod xml;

pub use error::LlsdError;
pub use format::{decode, decode_with, detect, encode, Format};
pub use value::{Kind, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn map(entries: &[(&str, Value)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|(k, v)| ((*k).to_owned(), v.clone()))
                .collect::<HashMap<_, _>>(),
        )
    }

    /// Structural equality that treats NaN as equal to NaN.
    fn assert_value_eq(actual: &Value, expected: &Value) {
        match (actual, expected) {
            (Value::Real(a), Value::Real(b)) if a.is_nan() && b.is_nan() => {}
            (Value::Array(a), Value::Array(b)) => {
                assert_eq!(a.len(), b.len(), "array length mismatch");
                for (left, right) in a.iter().zip(b.iter()) {
                    assert_value_eq(left, right);
                }
            }
            (Value::Map(a), Value::Map(b)) => {
                assert_eq!(a.len(), b.len(), "map entry count mismatch");
                for (key, left) in a {
                    let right = b.get(key).unwrap_or_else(|| panic!("missing key {key}"));
                    assert_value_eq(left, right);
                }
            }
            _ => assert_eq!(actual, expected),
        }
    }

    fn sample_values() -> Vec<Value> {
        vec![
            Value::Undefined,
            Value::Boolean(true),
            Value::Boolean(false),
            Value::Integer(0),
            Value::Integer(i32::MIN),
            Value::Integer(i32::MAX),
            Value::Real(0.0),
            Value::Real(-123.123),
            Value::Real(f64::NAN),
            Value::from(""),
            Value::from("ascii"),
            Value::from("snowman ☃ and 😀"),
            Value::Uuid(uuid::Uuid::nil()),
            Value::from("97f4aeca-88a1-42a1-b385-b97b18abb255").as_uuid().into(),
            Value::Date(value::epoch()),
            Value::uri("http://example.com/path?q=1"),
            Value::Binary(vec![]),
            Value::Binary(vec![0, 1, 2, 255]),
            Value::Array(vec![]),
            Value::Array(vec![Value::Integer(1), Value::from("two"), Value::Undefined]),
            map(&[]),
            map(&[("nested", Value::Array(vec![map(&[("deep", Value::Boolean(true))])]))]),
        ]
    }

    #[test]
    fn binary_round_trip_matrix() {
        for value in sample_values() {
            let bytes = encode(&value, Format::Binary);
            let back = decode_with(&bytes, Format::Binary).expect("binary decode");
            assert_value_eq(&back, &value);
        }
    }

    #[test]
    fn notation_round_trip_matrix() {
        for value in sample_values() {
            let bytes = encode(&value, Format::Notation);
            let back = decode_with(&bytes, Format::Notation)
                .unwrap_or_else(|e| panic!("notation decode failed for {value:?}: {e}"));
            assert_value_eq(&back, &value);
        }
    }

    #[test]
    fn xml_round_trip_matrix() {
        for value in sample_values() {
            let bytes = encode(&value, Format::Xml);
            let back = decode_with(&bytes, Format::Xml)
                .unwrap_or_else(|e| panic!("xml decode failed for {value:?}: {e}"));
            assert_value_eq(&back, &value);
        }
    }

    #[test]
    fn numeric_fidelity_across_formats() {
        for real in [f64::MAX, f64::MIN_POSITIVE, -1.1123123e50] {
            for format in [Format::Binary, Format::Json, Format::Notation] {
                let bytes = encode(&Value::Real(real), format);
                let back = decode_with(&bytes, format).expect("decode");
                assert_eq!(back, Value::Real(real), "{format:?} lost {real:e}");
            }
        }
    }

    #[test]
    fn json_binary_round_trip_is_lossy_but_recoverable() {
        let original: Vec<u8> = (0..=255).collect();
        let bytes = encode(&Value::Binary(original.clone()), Format::Json);
        let back = decode_with(&bytes, Format::Json).expect("json decode");
        assert_eq!(back.kind(), Kind::Array);
        assert_eq!(back.as_binary(), original);
    }

    #[test]
    fn json_undefined_round_trip() {
        assert_eq!(encode(&Value::Undefined, Format::Json), b"null");
        assert_eq!(decode(b"null"), Ok(Value::Undefined));
    }

    #[test]
    fn four_byte_utf8_survives_length_prefixed_formats() {
        let value = Value::from("😀");
        for format in [Format::Binary, Format::Json, Format::Notation, Format::Xml] {
            let bytes = encode(&value, format);
            assert_eq!(decode_with(&bytes, format), Ok(value.clone()), "{format:?}");
        }
    }

    #[test]
    fn date_survives_binary_with_subsecond_precision() {
        let date = value::date_from_secs(1_138_804_193.5);
        let bytes = encode(&Value::Date(date), Format::Binary);
        assert_eq!(decode(&bytes), Ok(Value::Date(date)));
    }

    #[test]
    fn auto_detection_examples() {
        let uuid = decode(b"\"97f4aeca-88a1-42a1-b385-b97b18abb255\"").unwrap();
        assert_eq!(uuid.kind(), Kind::Uuid);
        let uri = decode(b"\"http://example.com/\"").unwrap();
        assert_eq!(uri.kind(), Kind::String);
    }

    #[test]
    fn every_format_survives_its_own_detection() {
        let value = map(&[("id", Value::Integer(9))]);
        for format in [Format::Binary, Format::Xml, Format::Json] {
            let bytes = encode(&value, format);
            assert_eq!(detect(&bytes), Some(format), "detect {format:?}");
            assert_value_eq(&decode(&bytes).expect("decode"), &value);
        }
        // Notation containers share JSON's lead bytes, so they are only
        // reachable through the explicit entry point.
        let bytes = encode(&value, Format::Notation);
        assert_value_eq(
            &decode_with(&bytes, Format::Notation).expect("decode"),
            &value,
        );
    }
}
