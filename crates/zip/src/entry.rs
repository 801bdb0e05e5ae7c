//! ZIP central-directory lookup and payload extraction.
//!
//! Operates on an already-buffered archive (`&[u8]`, read in full by the
//! caller through `apkguard_sys::RawFile`) rather than re-issuing its own
//! positioned reads — the hardened raw-syscall story lives in
//! `apkguard-sys`; once the bytes are resident in memory, parsing them is
//! no different from parsing any other in-memory buffer.

use crate::errors::ZipError;
use crate::signing_block;
use crate::structs::central_directory::{CentralDirectory, CentralDirectoryEntry};
use crate::structs::eocd::EndOfCentralDirectory;
use crate::structs::local_file_header::LocalFileHeader;

/// The window, ending at the central directory offset, scanned backward
/// for the APK Signing Block magic — matches the 8 KiB EOCD tail window.
const SIGNING_BLOCK_WINDOW: usize = 8192;

/// Upper bound on a signing block's declared size, enforced before trusting
/// it for a slice: the size field comes straight off the archive and is
/// otherwise untrusted.
pub const MAX_SIGNING_BLOCK_SIZE: u64 = 64 * 1024 * 1024;

/// A ZIP archive's EOCD and central directory, parsed once over a buffer
/// the caller owns.
pub struct ZipArchive<'a> {
    data: &'a [u8],
    pub eocd: EndOfCentralDirectory,
    pub central_directory: CentralDirectory,
}

impl<'a> ZipArchive<'a> {
    /// Locates the EOCD and walks the central directory. Does not touch
    /// any entry's payload — that happens lazily via [`Self::extract`].
    pub fn open(data: &'a [u8]) -> Result<ZipArchive<'a>, ZipError> {
        let eocd = EndOfCentralDirectory::locate(data)?;
        let central_directory =
            CentralDirectory::parse(data, &eocd).map_err(|_| ZipError::ParseError)?;
        Ok(ZipArchive {
            data,
            eocd,
            central_directory,
        })
    }

    /// First central-directory entry whose name contains `META-INF/` and
    /// contains `.RSA` or `.DSA`, in encounter order. `.EC` is deliberately
    /// not matched (see DESIGN.md).
    pub fn find_cert_entry(&self) -> Option<&CentralDirectoryEntry> {
        self.central_directory.find_by(|name| {
            name.contains("META-INF/") && (name.contains(".RSA") || name.contains(".DSA"))
        })
    }

    /// Extracts and, if necessary, inflates an entry's payload.
    ///
    /// Only `STORED` (0) and `DEFLATE` (8) are understood; any other
    /// compression method is reported as a parse error.
    pub fn extract(&self, entry: &CentralDirectoryEntry) -> Result<Vec<u8>, ZipError> {
        let lfh = LocalFileHeader::parse(self.data, entry.local_header_offset as usize)
            .map_err(|_| ZipError::ParseError)?;
        let payload_offset = entry.local_header_offset as usize + lfh.size();
        let compressed_size = entry.compressed_size as usize;
        let uncompressed_size = entry.uncompressed_size as usize;
        let compressed = self
            .data
            .get(payload_offset..payload_offset + compressed_size)
            .ok_or(ZipError::EOF)?;

        match entry.compression_method {
            0 => Ok(compressed.to_vec()),
            8 => {
                let mut out = vec![0u8; uncompressed_size];
                let written = apkguard_inflate::inflate(&mut out, compressed)?;
                if written != uncompressed_size {
                    return Err(ZipError::ParseError);
                }
                Ok(out)
            }
            _ => Err(ZipError::ParseError),
        }
    }

    /// Locates the APK Signing Block immediately preceding the central
    /// directory and returns its payload bytes — the key/value pair
    /// sequence, excluding the leading/trailing 8-byte size fields and the
    /// 16-byte magic.
    ///
    /// Ground truth for the size-field arithmetic is DroidGrity's
    /// `locateAPKSigningBlock`/`parseAPKSigningBlock` (see DESIGN.md): the
    /// trailing `u64` at `magic_offset - 8` gives the block's size
    /// excluding the leading size field, so the payload spans
    /// `[magic_offset - size, magic_offset - 8)` and the leading size
    /// field at `magic_offset - size - 8` must repeat the same value.
    pub fn locate_signing_block(&self) -> Result<Vec<u8>, ZipError> {
        let central_dir_offset = self.eocd.central_dir_offset as usize;
        let window_start = central_dir_offset.saturating_sub(SIGNING_BLOCK_WINDOW);
        let window = self
            .data
            .get(window_start..central_dir_offset)
            .ok_or(ZipError::NoSigningBlock)?;

        let magic_pos = memchr::memmem::rfind(window, signing_block::APK_SIG_BLOCK_MAGIC)
            .ok_or(ZipError::NoSigningBlock)?;
        let magic_offset = window_start + magic_pos;

        let trailing_size_offset = magic_offset
            .checked_sub(8)
            .ok_or(ZipError::NoSigningBlock)?;
        let trailing_size =
            read_le_u64(self.data, trailing_size_offset).ok_or(ZipError::NoSigningBlock)?;

        if trailing_size > MAX_SIGNING_BLOCK_SIZE {
            return Err(ZipError::SigningBlockTooLarge(
                trailing_size,
                MAX_SIGNING_BLOCK_SIZE,
            ));
        }

        let payload_len = trailing_size
            .checked_sub(8)
            .ok_or(ZipError::NoSigningBlock)? as usize;
        let payload_start = trailing_size_offset
            .checked_sub(payload_len)
            .ok_or(ZipError::NoSigningBlock)?;
        let leading_size_offset = payload_start
            .checked_sub(8)
            .ok_or(ZipError::NoSigningBlock)?;
        let leading_size =
            read_le_u64(self.data, leading_size_offset).ok_or(ZipError::NoSigningBlock)?;

        if leading_size != trailing_size {
            return Err(ZipError::SigningBlockSizeMismatch(
                leading_size,
                trailing_size,
            ));
        }

        Ok(self.data[payload_start..trailing_size_offset].to_vec())
    }
}

fn read_le_u64(data: &[u8], offset: usize) -> Option<u64> {
    let bytes: [u8; 8] = data.get(offset..offset + 8)?.try_into().ok()?;
    Some(u64::from_le_bytes(bytes))
}
