use thiserror::Error;

#[derive(Error, Debug)]
pub enum SysError {
    #[error("syscall {0} failed with errno {1}")]
    Syscall(&'static str, i32),

    #[error("short read: wanted {wanted} bytes, got {got}")]
    ShortRead { wanted: usize, got: usize },

    #[error("path contains an interior NUL byte")]
    InteriorNul,

    #[error("package '{0}' not found in /proc/self/maps")]
    PackageNotFound(String),
}
