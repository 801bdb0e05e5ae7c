//! APK Signing Block v2 scheme payload parsing (C6).
//!
//! The block handed in here is the payload already isolated by
//! [`crate::entry::ZipArchive::locate_signing_block`]: a sequence of
//! length-prefixed `(id, value)` pairs, each value itself prefixed by an
//! 8-byte `u64` length. Layout and field counts are grounded in
//! DroidGrity's `extractCertificateFromSignatureV2SchemeBlock` (see
//! DESIGN.md) rather than the fuller six-field layout some real-world
//! verifiers carry — this block only needs the first certificate's DER
//! bytes, not a full signer/digest/attribute model.

use crate::errors::ZipError;

pub const APK_SIG_BLOCK_MAGIC: &[u8] = b"APK Sig Block 42";

pub const SIGNATURE_SCHEME_V2_ID: u32 = 0x7109871a;
pub const SIGNATURE_SCHEME_V3_ID: u32 = 0xf05368c0;

/// Unknown-purpose id observed by real-world verifiers; recognized so the
/// pair walk can skip it without treating it as a parse failure.
/// <https://android.googlesource.com/platform/tools/apksig/+/refs/heads/master/src/main/java/com/android/apksig/internal/apk/ApkSigningBlockUtils.java#100>
pub const VERITY_PADDING_BLOCK_ID: u32 = 0x42726577;
pub const SOURCE_STAMP_BLOCK_ID: u32 = 0x6dff800d;
pub const DEPENDENCY_INFO_BLOCK_ID: u32 = 0x504b4453;
pub const STRIPPING_PROTECTION_ATTR_ID: u32 = 0xbeeff00d;

/// Walks the length-id-value triples in `payload` looking for the v2
/// scheme id, and returns its value slice. Unrecognized ids (including the
/// known-but-uninteresting ones above, and the v3 id) are skipped, not
/// treated as errors — a v3-only block falls through to `NoV2V3Scheme`.
fn find_pair<'a>(payload: &'a [u8], target_id: u32) -> Option<&'a [u8]> {
    let mut pos = 0usize;
    while pos + 12 <= payload.len() {
        let entry_len = u64::from_le_bytes(payload[pos..pos + 8].try_into().ok()?) as usize;
        let id_offset = pos + 8;
        if id_offset + 4 > payload.len() {
            return None;
        }
        let id = u32::from_le_bytes(payload[id_offset..id_offset + 4].try_into().ok()?);

        let value_offset = id_offset + 4;
        let value_len = entry_len.checked_sub(4)?;
        let value_end = value_offset.checked_add(value_len)?;
        if value_end > payload.len() {
            return None;
        }

        if id == target_id {
            return Some(&payload[value_offset..value_end]);
        }

        pos = value_end;
    }
    None
}

/// Finds the v2 scheme block's value slice within a signing block payload.
pub fn find_v2_scheme(payload: &[u8]) -> Result<&[u8], ZipError> {
    find_pair(payload, SIGNATURE_SCHEME_V2_ID).ok_or(ZipError::NoV2V3Scheme)
}

fn read_u32(data: &[u8], pos: usize) -> Result<(u32, usize), ZipError> {
    let bytes: [u8; 4] = data
        .get(pos..pos + 4)
        .ok_or(ZipError::ParseError)?
        .try_into()
        .map_err(|_| ZipError::ParseError)?;
    Ok((u32::from_le_bytes(bytes), pos + 4))
}

fn take_len<'a>(data: &'a [u8], pos: usize, len: usize) -> Result<(&'a [u8], usize), ZipError> {
    let slice = data.get(pos..pos + len).ok_or(ZipError::ParseError)?;
    Ok((slice, pos + len))
}

/// Extracts the first signer's first certificate, in raw DER bytes, from a
/// v2 scheme value slice.
///
/// Layout (all lengths `u32`, little-endian), matching the reference
/// `extractCertificateFromSignatureV2SchemeBlock`:
/// `signers_seq_len | signed_data_len | digests_len | <skip digests_len bytes> | certs_len | cert_len | <cert_len bytes of DER> ...`
///
/// Only the first signer and first certificate are read — multiple
/// signers/certificates are not walked, matching the legacy first-signer-
/// only behavior this crate preserves (see DESIGN.md).
pub fn extract_v2_certificate(value: &[u8]) -> Result<Vec<u8>, ZipError> {
    let mut pos = 0usize;

    let (_signers_seq_len, p) = read_u32(value, pos)?;
    pos = p;
    let (_signed_data_len, p) = read_u32(value, pos)?;
    pos = p;

    let (digests_len, p) = read_u32(value, pos)?;
    pos = p;
    let (_digests, p) = take_len(value, pos, digests_len as usize)?;
    pos = p;

    let (_certs_len, p) = read_u32(value, pos)?;
    pos = p;

    let (cert_len, p) = read_u32(value, pos)?;
    pos = p;
    let (cert, _) = take_len(value, pos, cert_len as usize)?;

    Ok(cert.to_vec())
}
