//! PKCS#7 SignedData / ASN.1 DER certificate extraction.
//!
//! Walks just enough of a `ContentInfo { SignedData { ... certificates } }`
//! structure, forward-only, to recover the first signer's first X.509
//! certificate — a narrow, hand-rolled DER walk rather than a pull on a
//! general-purpose ASN.1 crate, matching the original's hand-rolled parser
//! (see DESIGN.md).
//!
//! The parse state lives in a [`ParseContext`] built fresh by [`parse`] for
//! every call, rather than the process-wide static cursor/list the original
//! used — the REDESIGN FLAG from the design notes, applied so the extractor
//! is safely reentrant without any documentation-only non-reentrancy
//! contract.

mod der;
mod errors;
mod parser;

pub use der::{decode_length, encode_length};
pub use errors::Asn1Error;
pub use parser::{extract_certificate, parse, Asn1Element, ParseContext};
