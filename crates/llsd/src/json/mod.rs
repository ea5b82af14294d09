//! LLSD JSON codec.
//!
//! JSON has no native syntax for UUID, Date, URI, Binary, or an
//! Integer/Real split, so decoding applies detection rules: strings in
//! the canonical UUID or ISO-8601 shapes become UUID/Date values, and a
//! number without fraction or exponent becomes Integer. URI is never
//! auto-detected. Binary encodes as an array of byte integers, which is
//! lossy at the type level (it decodes back as Array).

pub mod decoder;
pub mod encoder;

pub use decoder::JsonDecoder;
pub use encoder::JsonEncoder;

use crate::{LlsdError, Value};

pub fn encode(value: &Value) -> Vec<u8> {
    JsonEncoder::new().encode(value)
}

pub fn decode(input: &[u8]) -> Result<Value, LlsdError> {
    JsonDecoder::new().decode(input)
}
