use thiserror::Error;

/// Error kinds the verifier distinguishes internally (§7).
///
/// Collapsed to a single `bool` at the public boundary ([`crate::verify_path`],
/// [`crate::verify_package`]); kept granular here so tests and the `log`
/// call at the public edge can tell locator failures from format errors
/// from a plain hash mismatch.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// Package locator or raw-syscall file I/O failure.
    #[error("locator/io error: {0}")]
    Sys(#[from] apkguard_sys::SysError),

    /// ZIP container or APK Signing Block structural error.
    #[error("zip/signing-block format error: {0}")]
    Zip(#[from] apkguard_zip::ZipError),

    /// The extracted certificate is larger than [`crate::MAX_CERT_SIZE`].
    #[error("certificate of {0} bytes exceeds the {1}-byte buffer")]
    CertificateTooLarge(usize, usize),

    /// PKCS#7/ASN.1 DER walk failed to produce a certificate.
    #[error("pkcs7/asn.1 extraction failed: {0}")]
    Certificate(#[from] apkguard_pkcs7::Asn1Error),

    /// Neither the v2/v3 signing block nor a `META-INF/*.RSA|DSA` entry
    /// was present.
    #[error("no signing information found in archive")]
    NoSigningInformation,
}

/// Internal, detailed result of a verification attempt, collapsed to
/// `bool` at the public boundary (§7/§8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Match,
    Mismatch,
}
