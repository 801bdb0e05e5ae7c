use std::ffi::CString;
use std::os::fd::RawFd;

use crate::errors::SysError;

/// Seek origin, mirroring the `whence` argument of `lseek`.
#[derive(Debug, Clone, Copy)]
pub enum Whence {
    Set,
    Cur,
    End,
}

impl Whence {
    fn as_raw(self) -> i32 {
        match self {
            Whence::Set => libc::SEEK_SET,
            Whence::Cur => libc::SEEK_CUR,
            Whence::End => libc::SEEK_END,
        }
    }
}

fn check(name: &'static str, ret: i64) -> Result<i64, SysError> {
    if ret < 0 {
        Err(SysError::Syscall(name, -ret as i32))
    } else {
        Ok(ret)
    }
}

/// A read-only file handle backed directly by raw system calls.
///
/// Never routes through `std::fs` or the ergonomic wrappers in `libc`
/// (`libc::open`, `libc::read`, ...) — only `libc::syscall` with an
/// explicit `SYS_*` number, so nothing in the open/read/seek/close path
/// can be intercepted by interposing on the regular libc symbols.
pub struct RawFile {
    fd: RawFd,
}

impl RawFile {
    /// Opens `path` read-only relative to the current working directory.
    pub fn open(path: &str) -> Result<Self, SysError> {
        Self::openat(libc::AT_FDCWD, path)
    }

    /// Opens `name` read-only relative to an already-open directory fd.
    pub fn openat(dir_fd: RawFd, name: &str) -> Result<Self, SysError> {
        let c_name = CString::new(name).map_err(|_| SysError::InteriorNul)?;
        let ret = unsafe {
            libc::syscall(
                libc::SYS_openat,
                dir_fd,
                c_name.as_ptr(),
                libc::O_RDONLY,
                0i32,
            )
        };
        let fd = check("openat", ret)? as RawFd;
        Ok(RawFile { fd })
    }

    /// Opens a directory read-only, for use as a base fd with [`Self::openat`].
    pub fn open_dir(path: &str) -> Result<Self, SysError> {
        let c_path = CString::new(path).map_err(|_| SysError::InteriorNul)?;
        let ret = unsafe {
            libc::syscall(
                libc::SYS_openat,
                libc::AT_FDCWD,
                c_path.as_ptr(),
                libc::O_RDONLY | libc::O_DIRECTORY,
                0i32,
            )
        };
        let fd = check("openat(dir)", ret)? as RawFd;
        Ok(RawFile { fd })
    }

    pub fn raw_fd(&self) -> RawFd {
        self.fd
    }

    /// Reads up to `buf.len()` bytes. Returns the number of bytes actually read
    /// (may be short, including zero at EOF).
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, SysError> {
        let ret = unsafe {
            libc::syscall(
                libc::SYS_read,
                self.fd,
                buf.as_mut_ptr(),
                buf.len(),
            )
        };
        Ok(check("read", ret)? as usize)
    }

    /// Reads exactly `buf.len()` bytes, looping over short reads, failing on EOF.
    pub fn read_exact(&self, buf: &mut [u8]) -> Result<(), SysError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read(&mut buf[filled..])?;
            if n == 0 {
                return Err(SysError::ShortRead {
                    wanted: buf.len(),
                    got: filled,
                });
            }
            filled += n;
        }
        Ok(())
    }

    pub fn seek(&self, offset: i64, whence: Whence) -> Result<u64, SysError> {
        let ret = unsafe { libc::syscall(libc::SYS_lseek, self.fd, offset, whence.as_raw()) };
        Ok(check("lseek", ret)? as u64)
    }

    pub fn size(&self) -> Result<u64, SysError> {
        let cur = self.seek(0, Whence::Cur)?;
        let end = self.seek(0, Whence::End)?;
        self.seek(cur as i64, Whence::Set)?;
        Ok(end)
    }

    /// Reads the entire file into a freshly allocated buffer.
    pub fn read_to_vec(&self) -> Result<Vec<u8>, SysError> {
        let size = self.size()? as usize;
        let mut buf = vec![0u8; size];
        self.seek(0, Whence::Set)?;
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads `len` bytes starting at `offset`, without disturbing the
    /// handle's notion of "current position" for unrelated callers since
    /// every caller in this crate treats offsets as absolute.
    pub fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>, SysError> {
        self.seek(offset as i64, Whence::Set)?;
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }
}

impl Drop for RawFile {
    fn drop(&mut self) {
        unsafe {
            libc::syscall(libc::SYS_close, self.fd);
        }
    }
}
