use crate::der::{
    expect_tag, read_header, TAG_BIT_STRING, TAG_CONTEXT_0, TAG_CONTEXT_1, TAG_CONTEXT_2,
    TAG_CONTEXT_3, TAG_INTEGER, TAG_OID, TAG_SEQUENCE, TAG_SET,
};
use crate::errors::Asn1Error;

/// One named node of the flat, forward-order walk of a DER buffer.
///
/// `begin`/`length` describe the element's *content*, not its tag+length
/// header; `header_len` (the spec's `tag_offset`) is how many bytes precede
/// `begin` for the tag and length octets, so the full TLV is
/// `data[begin - header_len .. begin + length]`.
#[derive(Debug, Clone, Copy)]
pub struct Asn1Element {
    pub tag: u8,
    pub name: &'static str,
    pub begin: usize,
    pub length: usize,
    pub header_len: usize,
    pub level: u32,
}

/// Owns the flat element list produced by a single forward parse.
///
/// Built fresh by [`parse`] for every call — this is the REDESIGN FLAG from
/// the original design notes applied: no module-level parse state, so
/// nothing can bleed between concurrent or repeated invocations the way a
/// `static` position cursor and linked-list head/tail would.
pub struct ParseContext {
    elements: Vec<Asn1Element>,
}

impl ParseContext {
    fn new() -> Self {
        ParseContext {
            elements: Vec::new(),
        }
    }

    fn push(&mut self, tag: u8, name: &'static str, begin: usize, length: usize, header_len: usize, level: u32) {
        self.elements.push(Asn1Element {
            tag,
            name,
            begin,
            length,
            header_len,
            level,
        });
    }

    pub fn elements(&self) -> &[Asn1Element] {
        &self.elements
    }

    /// Looks up the first element whose name starts with `prefix`, matching
    /// the spec's "lookups are by name prefix over the list" contract.
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&Asn1Element> {
        self.elements.iter().find(|e| e.name.starts_with(prefix))
    }

    fn find_exact(&self, name: &str) -> Option<&Asn1Element> {
        self.elements.iter().find(|e| e.name == name)
    }
}

/// Parses the ContentInfo/SignedData prefix of a PKCS#7 blob, recording a
/// flat, named element list, and locating (without fully validating) the
/// first X.509 certificate's `tbsCertificate`-bearing sequence.
///
/// Mirrors §4.7 of the design: `contentType` OID, explicit `[0] content`,
/// `version`/`digestAlgorithms`/`contentInfo` inside SignedData, then an
/// optional `[0] IMPLICIT` certificates set whose first element is treated
/// as the named `certificates` element.
pub fn parse(data: &[u8]) -> Result<ParseContext, Asn1Error> {
    let mut ctx = ParseContext::new();

    // Outer ContentInfo SEQUENCE.
    let (outer_header, outer_len) = expect_tag(data, 0, TAG_SEQUENCE)?;
    let outer_begin = outer_header;
    ctx.push(TAG_SEQUENCE, "contentInfo", outer_begin, outer_len, outer_header, 0);
    let mut pos = outer_begin;

    // contentType OBJECT IDENTIFIER.
    let (header_len, len) = expect_tag(data, pos, TAG_OID)?;
    ctx.push(TAG_OID, "contentType", pos + header_len, len, header_len, 1);
    pos += header_len + len;

    // content [0] EXPLICIT, wrapping the SignedData SEQUENCE.
    let (header_len, len) = expect_tag(data, pos, TAG_CONTEXT_0)?;
    let content_begin = pos + header_len;
    ctx.push(TAG_CONTEXT_0, "content", content_begin, len, header_len, 1);

    let (sd_header, sd_len) = expect_tag(data, content_begin, TAG_SEQUENCE)?;
    let signed_data_begin = content_begin + sd_header;
    ctx.push(TAG_SEQUENCE, "signedData", signed_data_begin, sd_len, sd_header, 2);
    let signed_data_end = signed_data_begin + sd_len;
    pos = signed_data_begin;

    // version INTEGER.
    let (header_len, len) = expect_tag(data, pos, TAG_INTEGER)?;
    ctx.push(TAG_INTEGER, "version", pos + header_len, len, header_len, 3);
    pos += header_len + len;

    // digestAlgorithms SET.
    let (header_len, len) = expect_tag(data, pos, TAG_SET)?;
    ctx.push(TAG_SET, "digestAlgorithms", pos + header_len, len, header_len, 3);
    pos += header_len + len;

    // encapContentInfo SEQUENCE (the inner ContentInfo carrying the signed
    // payload's identity — distinct from the outer ContentInfo above).
    let (header_len, len) = expect_tag(data, pos, TAG_SEQUENCE)?;
    ctx.push(TAG_SEQUENCE, "encapContentInfo", pos + header_len, len, header_len, 3);
    pos += header_len + len;

    // Optional certificates [0] IMPLICIT SET OF Certificate.
    if pos >= signed_data_end {
        return Err(Asn1Error::NoCertificates);
    }
    let (cert_set_tag, set_header_len, _set_len) = read_header(data, pos)?;
    if cert_set_tag != TAG_CONTEXT_0 {
        return Err(Asn1Error::NoCertificates);
    }
    let certs_content_begin = pos + set_header_len;

    // The descended element is itself the first certificate's outer
    // SEQUENCE; it is recorded under the name the extraction step looks up.
    let (cert_header_len, cert_len) = expect_tag(data, certs_content_begin, TAG_SEQUENCE)?;
    let cert_begin = certs_content_begin + cert_header_len;
    ctx.push(TAG_SEQUENCE, "certificates", cert_begin, cert_len, cert_header_len, 3);

    // Best-effort walk of tbsCertificate's fixed shape; failures here don't
    // block extraction since the certificate TLV is already located.
    let _ = parse_tbs_certificate(data, &mut ctx, cert_begin, cert_len);

    Ok(ctx)
}

fn parse_tbs_certificate(
    data: &[u8],
    ctx: &mut ParseContext,
    cert_begin: usize,
    cert_len: usize,
) -> Result<(), Asn1Error> {
    let cert_end = cert_begin + cert_len;

    let (tbs_header, tbs_len) = expect_tag(data, cert_begin, TAG_SEQUENCE)?;
    let tbs_begin = cert_begin + tbs_header;
    ctx.push(TAG_SEQUENCE, "certificates.tbsCertificate", tbs_begin, tbs_len, tbs_header, 4);
    let tbs_end = tbs_begin + tbs_len;
    let mut pos = tbs_begin;

    // version [0] EXPLICIT INTEGER, optional (absence implies v1).
    let (tag, _, _) = read_header(data, pos)?;
    if tag == TAG_CONTEXT_0 {
        let (header_len, len) = expect_tag(data, pos, TAG_CONTEXT_0)?;
        ctx.push(TAG_CONTEXT_0, "certificates.tbsCertificate.version", pos + header_len, len, header_len, 5);
        pos += header_len + len;
    }

    // serialNumber INTEGER.
    let (header_len, len) = expect_tag(data, pos, TAG_INTEGER)?;
    ctx.push(TAG_INTEGER, "certificates.tbsCertificate.serialNumber", pos + header_len, len, header_len, 5);
    pos += header_len + len;

    // signature AlgorithmIdentifier SEQUENCE.
    let (header_len, len) = expect_tag(data, pos, TAG_SEQUENCE)?;
    ctx.push(TAG_SEQUENCE, "certificates.tbsCertificate.signature", pos + header_len, len, header_len, 5);
    pos += header_len + len;

    // issuer Name SEQUENCE.
    let (header_len, len) = expect_tag(data, pos, TAG_SEQUENCE)?;
    ctx.push(TAG_SEQUENCE, "certificates.tbsCertificate.issuer", pos + header_len, len, header_len, 5);
    pos += header_len + len;

    // validity SEQUENCE.
    let (header_len, len) = expect_tag(data, pos, TAG_SEQUENCE)?;
    ctx.push(TAG_SEQUENCE, "certificates.tbsCertificate.validity", pos + header_len, len, header_len, 5);
    pos += header_len + len;

    // subject Name SEQUENCE.
    let (header_len, len) = expect_tag(data, pos, TAG_SEQUENCE)?;
    ctx.push(TAG_SEQUENCE, "certificates.tbsCertificate.subject", pos + header_len, len, header_len, 5);
    pos += header_len + len;

    // subjectPublicKeyInfo SEQUENCE.
    let (header_len, len) = expect_tag(data, pos, TAG_SEQUENCE)?;
    ctx.push(TAG_SEQUENCE, "certificates.tbsCertificate.subjectPublicKeyInfo", pos + header_len, len, header_len, 5);
    pos += header_len + len;

    // Optional [1] issuerUniqueID, [2] subjectUniqueID, [3] extensions.
    while pos < tbs_end {
        let (tag, header_len, len) = read_header(data, pos)?;
        let name = match tag {
            TAG_CONTEXT_1 => "certificates.tbsCertificate.issuerUniqueID",
            TAG_CONTEXT_2 => "certificates.tbsCertificate.subjectUniqueID",
            TAG_CONTEXT_3 => "certificates.tbsCertificate.extensions",
            _ => break,
        };
        ctx.push(tag, name, pos + header_len, len, header_len, 5);
        pos += header_len + len;
    }

    // signatureAlgorithm SEQUENCE (Certificate level, sibling of tbsCertificate).
    let mut cert_pos = tbs_end;
    let (header_len, len) = expect_tag(data, cert_pos, TAG_SEQUENCE)?;
    ctx.push(TAG_SEQUENCE, "certificates.signatureAlgorithm", cert_pos + header_len, len, header_len, 4);
    cert_pos += header_len + len;

    // signatureValue BIT STRING.
    let (header_len, len) = expect_tag(data, cert_pos, TAG_BIT_STRING)?;
    ctx.push(TAG_BIT_STRING, "certificates.signatureValue", cert_pos + header_len, len, header_len, 4);
    cert_pos += header_len + len;

    debug_assert!(cert_pos <= cert_end);
    Ok(())
}

/// Extracts the first X.509 certificate's DER bytes (tag through content,
/// i.e. the whole `Certificate ::= SEQUENCE { ... }` TLV) from a PKCS#7
/// SignedData blob.
pub fn extract_certificate(data: &[u8]) -> Result<&[u8], Asn1Error> {
    let ctx = parse(data)?;
    let cert = ctx
        .find_exact("certificates")
        .ok_or(Asn1Error::ElementNotFound("certificates"))?;
    let begin = cert.begin - cert.header_len;
    let end = cert.begin + cert.length;
    data.get(begin..end).ok_or(Asn1Error::UnexpectedEof)
}
