use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("unexpected end of record data")]
    UnexpectedEof,

    #[error("unknown record version: {0}")]
    UnknownVersion(u8),

    #[error("duplicate CANONICAL record")]
    DuplicateCanonical,

    #[error("duplicate DELEGATE record")]
    DuplicateDelegate,

    #[error("string exceeds {max} bytes: {len}")]
    StringTooLong { len: usize, max: usize },

    #[error("{field} exceeds {max} bytes: {len}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("symbol table reference out of range: {0}")]
    BadSymbolReference(u8),

    #[error("string data is not valid UTF-8")]
    InvalidString,

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid record JSON: {0}")]
    InvalidJson(String),
}
