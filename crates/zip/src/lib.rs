pub mod entry;
pub mod errors;
pub mod signing_block;

mod structs;
pub use entry::*;
pub use errors::*;
pub use signing_block::{
    extract_v2_certificate, find_v2_scheme, SIGNATURE_SCHEME_V2_ID, SIGNATURE_SCHEME_V3_ID,
};
