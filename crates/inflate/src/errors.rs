use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflateError {
    #[error("malformed deflate stream")]
    Malformed,

    #[error("output buffer exhausted before end of stream")]
    Overflow,
}
