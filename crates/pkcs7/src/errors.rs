use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asn1Error {
    #[error("unexpected end of DER buffer")]
    UnexpectedEof,

    #[error("length encoding uses more than 4 follow-on bytes")]
    InvalidLength,

    #[error("unexpected tag: expected {expected:#04x}, got {got:#04x}")]
    UnexpectedTag { expected: u8, got: u8 },

    #[error("PKCS#7 SignedData has no certificates field")]
    NoCertificates,

    #[error("element '{0}' not found")]
    ElementNotFound(&'static str),
}
