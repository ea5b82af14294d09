use llsd_buffers::BufferError;
use thiserror::Error;

/// Decode failure shared by every llsd codec.
///
/// All variants describe input that does not match the grammar of the
/// target (or auto-detected) wire format, except
/// [`LlsdError::UnsupportedEncoding`], which reports a well-formed
/// `<binary>` element whose `encoding` attribute names a transfer
/// encoding this implementation does not handle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LlsdError {
    #[error("unexpected end of input")]
    EndOfInput,
    #[error("invalid llsd binary header")]
    InvalidHeader,
    #[error("unknown tag byte 0x{0:02x} at offset {1}")]
    UnknownTag(u8, usize),
    #[error("invalid utf-8 in input")]
    InvalidUtf8,
    #[error("syntax error at offset {0}")]
    Syntax(usize),
    #[error("unexpected element <{0}>")]
    UnexpectedElement(String),
    #[error("malformed xml: {0}")]
    Xml(String),
    #[error("unsupported binary encoding {0:?}")]
    UnsupportedEncoding(String),
    #[error("unrecognized payload format")]
    UnknownFormat,
}

impl From<BufferError> for LlsdError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => LlsdError::EndOfInput,
            BufferError::InvalidUtf8 => LlsdError::InvalidUtf8,
        }
    }
}

impl From<quick_xml::Error> for LlsdError {
    fn from(err: quick_xml::Error) -> Self {
        LlsdError::Xml(err.to_string())
    }
}
