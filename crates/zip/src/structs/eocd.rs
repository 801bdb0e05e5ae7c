use memchr::memmem;

use crate::errors::ZipError;

/// End-of-central-directory signature, `PK\x05\x06` read little-endian.
const EOCD_SIGNATURE: [u8; 4] = 0x0605_4b50u32.to_le_bytes();

/// Fixed-size EOCD record length (no ZIP64, no trailing comment scanned).
const EOCD_MIN_SIZE: usize = 22;

/// No archive comment scanning beyond this trailing window — acceptable
/// because signed archives don't carry trailing comments in practice.
const MAX_TAIL_WINDOW: usize = 8192;

#[derive(Debug, Clone, Copy)]
pub struct EndOfCentralDirectory {
    /// Byte offset of the EOCD signature within the archive.
    pub offset: usize,
    pub central_dir_offset: u32,
}

impl EndOfCentralDirectory {
    /// Reverse-scans the last `MAX_TAIL_WINDOW` bytes of `data` for the EOCD
    /// signature. The match closest to the end of the file wins.
    pub fn locate(data: &[u8]) -> Result<EndOfCentralDirectory, ZipError> {
        if data.len() < EOCD_MIN_SIZE {
            return Err(ZipError::NotFoundEOCD);
        }

        // The signature's 4 bytes must fit entirely within the last
        // MAX_TAIL_WINDOW bytes, so the scan region itself is bounded by
        // the tail window rather than `data.len()`.
        let window_start = data.len().saturating_sub(MAX_TAIL_WINDOW);
        let scan_region = &data[window_start..];

        let offset = memmem::rfind(scan_region, &EOCD_SIGNATURE)
            .map(|pos| window_start + pos)
            .ok_or(ZipError::NotFoundEOCD)?;

        if offset + EOCD_MIN_SIZE > data.len() {
            return Err(ZipError::NotFoundEOCD);
        }
        let central_dir_offset =
            u32::from_le_bytes(data[offset + 16..offset + 20].try_into().unwrap());

        Ok(EndOfCentralDirectory {
            offset,
            central_dir_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_archive_with_eocd_at(total_len: usize, eocd_offset: usize, central_dir_offset: u32) -> Vec<u8> {
        let mut data = vec![0u8; total_len];
        data[eocd_offset..eocd_offset + 4].copy_from_slice(&EOCD_SIGNATURE);
        data[eocd_offset + 16..eocd_offset + 20].copy_from_slice(&central_dir_offset.to_le_bytes());
        data
    }

    #[test]
    fn finds_eocd_at_exact_tail_position() {
        let data = build_archive_with_eocd_at(1000, 1000 - EOCD_MIN_SIZE, 42);
        let eocd = EndOfCentralDirectory::locate(&data).expect("should find EOCD");
        assert_eq!(eocd.offset, 1000 - EOCD_MIN_SIZE);
        assert_eq!(eocd.central_dir_offset, 42);
    }

    #[test]
    fn rejects_eocd_outside_tail_window() {
        let total_len = MAX_TAIL_WINDOW + 1000;
        let eocd_offset = total_len - MAX_TAIL_WINDOW - 1;
        let data = build_archive_with_eocd_at(total_len, eocd_offset, 7);
        assert!(matches!(
            EndOfCentralDirectory::locate(&data),
            Err(ZipError::NotFoundEOCD)
        ));
    }

    #[test]
    fn finds_last_match_when_multiple_candidates_present() {
        let mut data = build_archive_with_eocd_at(1000, 500, 1);
        // Plant a second, real record closer to the tail.
        data[1000 - EOCD_MIN_SIZE..1000 - EOCD_MIN_SIZE + 4].copy_from_slice(&EOCD_SIGNATURE);
        data[1000 - EOCD_MIN_SIZE + 16..1000 - EOCD_MIN_SIZE + 20]
            .copy_from_slice(&99u32.to_le_bytes());

        let eocd = EndOfCentralDirectory::locate(&data).expect("should find EOCD");
        assert_eq!(eocd.central_dir_offset, 99);
    }
}
