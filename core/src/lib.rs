//! Certificate pinning verifier for APK/JAR signing archives.
//!
//! Answers a single question at runtime: does the signing certificate
//! embedded in the currently installed package archive hash to a known,
//! expected value? Used as an anti-tampering check — embed the SHA-256
//! digest of the legitimate publisher's certificate at build time, then
//! call [`verify_package`] or [`verify_path`] at startup.
//!
//! The core does **not** validate signatures cryptographically: it trusts
//! the archive's self-declared certificate and only checks that *this*
//! certificate's fingerprint matches what the caller expects. It does not
//! parse v4 signing, and only the first signer's first certificate is ever
//! considered (see DESIGN.md for both decisions).

mod errors;
mod verifier;

pub use errors::{VerifyError, VerifyOutcome};

use std::path::Path;

/// Maximum size, in bytes, of an extracted certificate. A real X.509 leaf
/// certificate is a few KiB; this bound exists so a hostile archive can't
/// make the verifier hash an unbounded blob (design notes §9).
pub const MAX_CERT_SIZE: usize = 8192;

/// Verifies the archive at `apk_path` against `expected_hash`, the SHA-256
/// digest of the legitimate publisher's signing certificate.
///
/// Returns `true` only on a confirmed match. Any error — I/O failure,
/// malformed archive, missing signing information, or a real mismatch — is
/// logged at `warn` level and collapsed to `false`, matching §7's "the
/// caller cannot distinguish" contract.
pub fn verify_path(apk_path: &Path, expected_hash: &[u8; 32]) -> bool {
    match verifier::verify_inner(apk_path, expected_hash) {
        Ok(VerifyOutcome::Match) => true,
        Ok(VerifyOutcome::Mismatch) => {
            log::warn!(
                "certificate hash mismatch for {}: expected {}",
                apk_path.display(),
                apkguard_sys::strutil::to_hex(expected_hash)
            );
            false
        }
        Err(err) => {
            log::warn!("verification failed for {}: {err}", apk_path.display());
            false
        }
    }
}

/// Resolves `package_name` to an installed archive path via
/// `/proc/self/maps` (C2), then behaves exactly like [`verify_path`].
pub fn verify_package(package_name: &str, expected_hash: &[u8; 32]) -> bool {
    let path = match apkguard_sys::locate_apk(package_name) {
        Ok(path) => path,
        Err(err) => {
            log::warn!("could not locate package '{package_name}': {err}");
            return false;
        }
    };
    verify_path(Path::new(&path), expected_hash)
}

/// Internal, detailed entry point kept `pub(crate)`-visible-in-spirit via
/// re-export for integration tests that want to assert on the specific
/// [`VerifyError`]/[`VerifyOutcome`] rather than the collapsed `bool`.
#[doc(hidden)]
pub fn verify_inner(
    apk_path: &Path,
    expected_hash: &[u8; 32],
) -> Result<VerifyOutcome, VerifyError> {
    verifier::verify_inner(apk_path, expected_hash)
}
