//! The orchestrator (C8): glues the package locator, ZIP/signing-block
//! reader, DEFLATE inflater, and PKCS#7 extractor together, then hashes
//! whatever certificate falls out and compares it against the caller's
//! expected fingerprint.

use std::path::Path;

use apkguard_sys::RawFile;
use apkguard_zip::ZipArchive;

use crate::errors::{VerifyError, VerifyOutcome};
use crate::MAX_CERT_SIZE;

/// Runs the full pipeline described in spec §4.8 against an already-resolved
/// archive path, returning the detailed outcome rather than a bare `bool` —
/// the public entry points collapse this down at the edge.
pub fn verify_inner(path: &Path, expected_hash: &[u8; 32]) -> Result<VerifyOutcome, VerifyError> {
    let path_str = path.to_string_lossy();
    let file = RawFile::open(&path_str)?;
    let data = file.read_to_vec()?;
    drop(file); // RawFile's Drop issues the close syscall; explicit for readability.

    let archive = ZipArchive::open(&data)?;

    let cert = match extract_v2_v3_certificate(&archive) {
        Ok(cert) => cert,
        Err(reason) => {
            log::debug!("v2/v3 signing block unavailable ({reason}), falling back to v1/JAR");
            extract_v1_certificate(&archive)?
        }
    };

    if cert.len() > MAX_CERT_SIZE {
        return Err(VerifyError::CertificateTooLarge(cert.len(), MAX_CERT_SIZE));
    }

    let digest = apkguard_sha256::sha256(&cert);
    if digest == *expected_hash {
        Ok(VerifyOutcome::Match)
    } else {
        Ok(VerifyOutcome::Mismatch)
    }
}

/// Attempts the v2/v3 signing-block path (C6). Any failure — the block is
/// absent, its size fields are inconsistent, or it carries no v2 scheme
/// pair (e.g. a v3-only block) — is treated as "cannot locate or parse a
/// signing block" per spec §2's control-flow description, triggering the
/// v1/JAR fallback rather than a hard error.
fn extract_v2_v3_certificate(archive: &ZipArchive) -> Result<Vec<u8>, apkguard_zip::ZipError> {
    let payload = archive.locate_signing_block()?;
    let v2_value = apkguard_zip::find_v2_scheme(&payload)?;
    apkguard_zip::extract_v2_certificate(v2_value)
}

/// Attempts the legacy v1/JAR path (C5 central-directory walk + C4 inflate
/// + C7 extraction), used only once the v2/v3 path has failed.
fn extract_v1_certificate(archive: &ZipArchive) -> Result<Vec<u8>, VerifyError> {
    let entry = archive
        .find_cert_entry()
        .ok_or(VerifyError::NoSigningInformation)?;
    let raw = archive.extract(entry)?;
    let cert = apkguard_pkcs7::extract_certificate(&raw)?;
    Ok(cert.to_vec())
}
