//! Synthetic ZIP / signing-block / PKCS#7 builders shared by the
//! end-to-end tests in `verify.rs`. Kept separate from the test module so
//! each helper reads as a small, named builder rather than boilerplate
//! mixed in with assertions.
#![allow(dead_code)]

use apkguard_pkcs7::encode_length;

const TAG_SEQUENCE: u8 = 0x30;
const TAG_SET: u8 = 0x31;
const TAG_INTEGER: u8 = 0x02;
const TAG_OID: u8 = 0x06;
const TAG_BIT_STRING: u8 = 0x03;
const TAG_CONTEXT_0: u8 = 0xA0;

fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(encode_length(content.len() as u64));
    out.extend_from_slice(content);
    out
}

/// A minimal but structurally complete X.509 certificate TLV: a
/// `tbsCertificate` with empty placeholder fields for signature/issuer/
/// validity/subject/subjectPublicKeyInfo, plus a signatureAlgorithm and a
/// one-byte signatureValue. `serial` varies the bytes so distinct "signers"
/// hash to distinct fingerprints in the tests.
pub fn build_certificate(serial: u8) -> Vec<u8> {
    let tbs = tlv(
        TAG_SEQUENCE,
        &[
            tlv(TAG_INTEGER, &[serial]),
            tlv(TAG_SEQUENCE, &[]), // signature AlgorithmIdentifier
            tlv(TAG_SEQUENCE, &[]), // issuer
            tlv(TAG_SEQUENCE, &[]), // validity
            tlv(TAG_SEQUENCE, &[]), // subject
            tlv(TAG_SEQUENCE, &[]), // subjectPublicKeyInfo
        ]
        .concat(),
    );
    tlv(
        TAG_SEQUENCE,
        &[
            tbs,
            tlv(TAG_SEQUENCE, &[]),       // signatureAlgorithm
            tlv(TAG_BIT_STRING, &[0x00]), // signatureValue
        ]
        .concat(),
    )
}

/// Wraps one or more certificate TLVs (first one wins, per spec) in a
/// minimal `ContentInfo { SignedData { ... certificates } }` shape — just
/// enough structure for [`apkguard_pkcs7::extract_certificate`] to walk.
pub fn build_pkcs7(certs: &[Vec<u8>]) -> Vec<u8> {
    let certs_concat: Vec<u8> = certs.iter().flat_map(|c| c.clone()).collect();
    let signed_data = tlv(
        TAG_SEQUENCE,
        &[
            tlv(TAG_INTEGER, &[0x01]),
            tlv(TAG_SET, &[]),      // digestAlgorithms
            tlv(TAG_SEQUENCE, &[]), // encapContentInfo
            tlv(TAG_CONTEXT_0, &certs_concat),
        ]
        .concat(),
    );
    let content = tlv(TAG_CONTEXT_0, &signed_data);
    tlv(
        TAG_SEQUENCE,
        &[
            tlv(
                TAG_OID,
                &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x02],
            ),
            content,
        ]
        .concat(),
    )
}

fn le32(v: u32) -> [u8; 4] {
    v.to_le_bytes()
}

/// Builds a stored-method (0) local-file-header + central-directory-entry
/// pair for `name`/`payload`. The central-directory entry's local-header
/// offset field is left zeroed; [`build_archive`] patches it once the
/// entry's actual position in the output buffer is known.
fn build_stored_entry(name: &str, payload: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut lfh = vec![];
    lfh.extend_from_slice(&0x04034b50u32.to_le_bytes());
    lfh.extend_from_slice(&20u16.to_le_bytes());
    lfh.extend_from_slice(&0u16.to_le_bytes());
    lfh.extend_from_slice(&0u16.to_le_bytes()); // compression method: stored
    lfh.extend_from_slice(&0u16.to_le_bytes());
    lfh.extend_from_slice(&0u16.to_le_bytes());
    lfh.extend_from_slice(&0u32.to_le_bytes());
    lfh.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    lfh.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    lfh.extend_from_slice(&(name.len() as u16).to_le_bytes());
    lfh.extend_from_slice(&0u16.to_le_bytes());
    lfh.extend_from_slice(name.as_bytes());
    lfh.extend_from_slice(payload);

    let mut cde = vec![];
    cde.extend_from_slice(&0x02014b50u32.to_le_bytes());
    cde.extend_from_slice(&0u16.to_le_bytes());
    cde.extend_from_slice(&20u16.to_le_bytes());
    cde.extend_from_slice(&0u16.to_le_bytes());
    cde.extend_from_slice(&0u16.to_le_bytes());
    cde.extend_from_slice(&0u16.to_le_bytes());
    cde.extend_from_slice(&0u16.to_le_bytes());
    cde.extend_from_slice(&0u32.to_le_bytes());
    cde.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    cde.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    cde.extend_from_slice(&(name.len() as u16).to_le_bytes());
    cde.extend_from_slice(&0u16.to_le_bytes());
    cde.extend_from_slice(&0u16.to_le_bytes());
    cde.extend_from_slice(&0u16.to_le_bytes());
    cde.extend_from_slice(&0u16.to_le_bytes());
    cde.extend_from_slice(&0u32.to_le_bytes());
    cde.extend_from_slice(&0u32.to_le_bytes()); // local header offset, patched below
    cde.extend_from_slice(name.as_bytes());

    (lfh, cde)
}

/// Assembles a full, valid ZIP archive: local entries, an optional APK
/// Signing Block payload wedged between the last entry and the central
/// directory, the central directory itself, and an EOCD record.
pub fn build_archive(entries: &[(&str, &[u8])], signing_block: Option<&[u8]>) -> Vec<u8> {
    let mut data = vec![];
    let mut cd_entries = vec![];

    for (name, payload) in entries {
        let local_offset = data.len() as u32;
        let (lfh, mut cde) = build_stored_entry(name, payload);
        data.extend_from_slice(&lfh);
        cde[42..46].copy_from_slice(&le32(local_offset));
        cd_entries.push(cde);
    }

    if let Some(block) = signing_block {
        data.extend_from_slice(block);
    }

    let central_dir_offset = data.len() as u32;
    for cde in &cd_entries {
        data.extend_from_slice(cde);
    }
    let central_dir_size = data.len() as u32 - central_dir_offset;

    data.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    data.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    data.extend_from_slice(&central_dir_size.to_le_bytes());
    data.extend_from_slice(&central_dir_offset.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());

    data
}

pub fn build_plain_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    build_archive(entries, None)
}

pub fn build_v1_signed_archive(name: &str, pkcs7_der: &[u8]) -> Vec<u8> {
    build_archive(&[(name, pkcs7_der)], None)
}

/// One `(pair_len, id, value)` record of an APK Signing Block payload.
pub fn build_pair(id: u32, value: &[u8]) -> Vec<u8> {
    let mut out = vec![];
    let entry_len = (value.len() + 4) as u64;
    out.extend_from_slice(&entry_len.to_le_bytes());
    out.extend_from_slice(&id.to_le_bytes());
    out.extend_from_slice(value);
    out
}

/// A v2 scheme value slice carrying exactly one signer and one certificate,
/// matching the layout [`apkguard_zip::extract_v2_certificate`] reads.
pub fn build_v2_value(cert_der: &[u8]) -> Vec<u8> {
    let mut v = vec![];
    v.extend_from_slice(&0u32.to_le_bytes()); // signers_seq_len (unused)
    v.extend_from_slice(&0u32.to_le_bytes()); // signed_data_len (unused)
    v.extend_from_slice(&0u32.to_le_bytes()); // digests_len (empty)
    v.extend_from_slice(&0u32.to_le_bytes()); // certs_len (unused)
    v.extend_from_slice(&(cert_der.len() as u32).to_le_bytes());
    v.extend_from_slice(cert_der);
    v
}

/// Wraps a signing-block payload (a sequence of [`build_pair`] records)
/// with the leading/trailing size fields and the 16-byte magic, exactly as
/// `ZipArchive::locate_signing_block` expects to find it immediately
/// before the central directory.
pub fn build_signing_block(payload: &[u8]) -> Vec<u8> {
    let mut out = vec![];
    let size = (payload.len() + 8) as u64;
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(b"APK Sig Block 42");
    out
}

/// An archive signed only with scheme v2, carrying `cert` as the first
/// signer's sole certificate. No `META-INF/*.RSA|DSA` entry is present, so
/// a v1 fallback (if ever triggered) would find nothing.
pub fn build_v2_signed_archive(cert: &[u8]) -> Vec<u8> {
    let v2_pair = build_pair(
        apkguard_zip::SIGNATURE_SCHEME_V2_ID,
        &build_v2_value(cert),
    );
    build_archive(&[], Some(&build_signing_block(&v2_pair)))
}

/// An archive carrying both a v1 `META-INF/*.RSA` entry and a v2 signing
/// block, signed by the same certificate — scenario 6's cross-scheme
/// agreement fixture.
pub fn build_v1_and_v2_signed_archive(name: &str, pkcs7_der: &[u8], cert: &[u8]) -> Vec<u8> {
    let v2_pair = build_pair(
        apkguard_zip::SIGNATURE_SCHEME_V2_ID,
        &build_v2_value(cert),
    );
    build_archive(&[(name, pkcs7_der)], Some(&build_signing_block(&v2_pair)))
}
