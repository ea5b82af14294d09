//! LLSD binary codec.
//!
//! A 16-byte literal header followed by one recursively-encoded root
//! value. Every multi-byte integer and double is big-endian (network
//! byte order) — note this is the opposite convention from the simulator
//! packet layer.

pub mod decoder;
pub mod encoder;

pub use decoder::BinaryDecoder;
pub use encoder::BinaryEncoder;

use crate::{LlsdError, Value};

/// Mandatory header preceding every binary-encoded value.
pub const HEADER: &[u8] = b"<?llsd/binary?>\n";

pub fn encode(value: &Value) -> Vec<u8> {
    BinaryEncoder::new().encode(value)
}

pub fn decode(input: &[u8]) -> Result<Value, LlsdError> {
    BinaryDecoder::new().decode(input)
}
