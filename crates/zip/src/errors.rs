use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZipError {
    /// Basic sanity check
    #[error("provided file is not a zip archive")]
    InvalidHeader,

    /// Got error while decompressing object
    #[error("got error while decompressing object: {0}")]
    DecompressionError(#[from] apkguard_inflate::InflateError),

    /// Got EOF while reading data
    #[error("got EOF while parsing zip")]
    EOF,

    /// Provided file not found in zip
    #[error("file not exist in zip")]
    FileNotFound,

    /// Can't operate without EOCD
    #[error("can't find EOCD in zip")]
    NotFoundEOCD,

    /// Generic parsing error
    #[error("got error while parsing zip archive")]
    ParseError,

    /// APK Signing Block magic not present
    #[error("no APK signing block found")]
    NoSigningBlock,

    /// Signing block size field mismatch (leading/trailing size disagree)
    #[error("signing block size mismatch: leading {0}, trailing {1}")]
    SigningBlockSizeMismatch(u64, u64),

    /// Signing block declared a size past any sane bound
    #[error("signing block size {0} exceeds maximum of {1}")]
    SigningBlockTooLarge(u64, u64),

    /// No v2/v3 scheme pair found inside an otherwise valid signing block
    #[error("no v2/v3 signature scheme block found")]
    NoV2V3Scheme,
}
