//! LLSD notation codec.
//!
//! A compact ASCII token grammar: every kind is introduced by an
//! unambiguous lead character, whitespace is tolerated between tokens,
//! and parsing is a single left-to-right scan with one byte of
//! lookahead.

pub mod decoder;
pub mod encoder;

pub use decoder::NotationDecoder;
pub use encoder::NotationEncoder;

use crate::{LlsdError, Value};

pub fn encode(value: &Value) -> Vec<u8> {
    NotationEncoder::new().encode(value)
}

pub fn decode(input: &[u8]) -> Result<Value, LlsdError> {
    NotationDecoder::new().decode(input)
}
