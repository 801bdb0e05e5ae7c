pub mod errors;
pub mod file;
pub mod locator;
pub mod strutil;

pub use errors::SysError;
pub use file::{RawFile, Whence};
pub use locator::locate_apk;
