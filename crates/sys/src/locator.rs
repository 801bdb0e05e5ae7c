use crate::errors::SysError;
use crate::file::RawFile;
use crate::strutil::{contains_ignore_case, split_fields};

const CHUNK_SIZE: usize = 8192;

/// Finds the on-disk path of the package's archive by scanning
/// `/proc/self/maps` for a mapped pathname that both contains
/// `package_name` and has a `.apk` extension (case-insensitive).
///
/// Opens `/proc/self` as a directory and `openat`s `maps` from it, rather
/// than opening `/proc/self/maps` directly, mirroring the two-step
/// open/openat the original performs.
pub fn locate_apk(package_name: &str) -> Result<String, SysError> {
    let dir = RawFile::open_dir("/proc/self")?;
    let maps = RawFile::openat(dir.raw_fd(), "maps")?;
    drop(dir);

    let mut carry = String::new();
    let mut chunk = [0u8; CHUNK_SIZE];

    loop {
        let n = maps.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        carry.push_str(&String::from_utf8_lossy(&chunk[..n]));

        while let Some(pos) = carry.find('\n') {
            let line = carry[..pos].to_string();
            if let Some(found) = match_line(&line, package_name) {
                return Ok(found);
            }
            carry.drain(..=pos);
        }
    }

    // Trailing partial line with no terminating newline.
    if !carry.is_empty() {
        if let Some(found) = match_line(&carry, package_name) {
            return Ok(found);
        }
    }

    Err(SysError::PackageNotFound(package_name.to_string()))
}

fn match_line(line: &str, package_name: &str) -> Option<String> {
    let fields: Vec<&str> = split_fields(line).collect();
    let path = *fields.get(5)?;
    if !contains_ignore_case(path, package_name) {
        return None;
    }
    let ext = path.rsplit('.').next()?;
    if ext.eq_ignore_ascii_case("apk") {
        Some(path.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_line_requires_apk_extension_and_package_substring() {
        let line = "7f0000 r--p 00000000 08:01 1 /data/app/com.example.app-1/base.apk";
        assert_eq!(
            match_line(line, "com.example.app"),
            Some("/data/app/com.example.app-1/base.apk".to_string())
        );
        assert_eq!(match_line(line, "com.other.app"), None);

        let non_apk = "7f0000 r--p 00000000 08:01 1 /lib/x86_64-linux-gnu/libc.so.6";
        assert_eq!(match_line(non_apk, "libc"), None);
    }

    #[test]
    fn match_line_ignores_rows_without_a_path_column() {
        let anon = "7f0000 r--p 00000000 00:00 0";
        assert_eq!(match_line(anon, "anything"), None);
    }
}
