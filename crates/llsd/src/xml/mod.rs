//! LLSD XML codec.
//!
//! A tag-per-kind dialect wrapped in a root `<llsd>` element. Decoding
//! is a recursive descent over quick-xml events; unknown elements are a
//! decode failure, and `<binary>` supports only the base64 transfer
//! encoding.

pub mod decoder;
pub mod encoder;

pub use decoder::XmlDecoder;
pub use encoder::XmlEncoder;

use crate::{LlsdError, Value};

pub fn encode(value: &Value) -> Vec<u8> {
    XmlEncoder::new().encode(value)
}

pub fn decode(input: &[u8]) -> Result<Value, LlsdError> {
    XmlDecoder::new().decode(input)
}
