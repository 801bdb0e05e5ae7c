use winnow::binary::{le_u16, le_u32};
use winnow::combinator::repeat;
use winnow::error::{ErrMode, Needed};
use winnow::prelude::*;
use winnow::token::take;

use crate::structs::eocd::EndOfCentralDirectory;

/// One parsed 46-byte-prefix central-directory record.
///
/// Fields are `pub` (not `pub(crate)`) because [`crate::entry::ZipArchive`]
/// hands references to these out across the crate boundary to `core` —
/// the verifier needs the local header offset and sizes to extract an
/// entry's payload.
#[derive(Debug)]
pub struct CentralDirectoryEntry {
    pub version_made_by: u16,
    pub version_needed: u16,
    pub general_purpose: u16,
    pub compression_method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_length: u16,
    pub extra_field_length: u16,
    pub file_comment_length: u16,
    pub disk_number_start: u16,
    pub internal_attrs: u16,
    pub external_attrs: u32,
    pub local_header_offset: u32,

    pub file_name: String,
    pub extra_field: Vec<u8>,
    pub file_comment: Vec<u8>,
}

impl CentralDirectoryEntry {
    const MAGIC: u32 = 0x02014b50;

    #[inline(always)]
    fn parse(input: &mut &[u8]) -> ModalResult<CentralDirectoryEntry> {
        let (
            _,
            version_made_by,
            version_needed,
            general_purpose,
            compression_method,
            last_mod_time,
            last_mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            file_name_length,
            extra_field_length,
            file_comment_length,
            disk_number_start,
            internal_attrs,
            external_attrs,
            local_header_offset,
        ) = (
            le_u32.verify(|magic| *magic == Self::MAGIC), // magic
            le_u16,                                       // version_made_by
            le_u16,                                       // version_needed
            le_u16,                                       // general_purpose
            le_u16,                                       // compression_method
            le_u16,                                       // last_mod_time
            le_u16,                                       // last_mod_date
            le_u32,                                       // crc32
            le_u32,                                       // compressed_size
            le_u32,                                       // uncompressed_size
            le_u16,                                       // file_name_length
            le_u16,                                       // extra_field_length
            le_u16,                                       // file_comment_length
            le_u16,                                       // disk_number_start
            le_u16,                                       // internal_attrs
            le_u32,                                       // external_attrs
            le_u32,                                       // local_header_offset
        )
            .parse_next(input)?;

        let (file_name, extra_field, file_comment) = (
            take(file_name_length),
            take(extra_field_length),
            take(file_comment_length),
        )
            .parse_next(input)?;

        Ok(CentralDirectoryEntry {
            version_made_by,
            version_needed,
            general_purpose,
            compression_method,
            last_mod_time,
            last_mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            file_name_length,
            extra_field_length,
            file_comment_length,
            disk_number_start,
            internal_attrs,
            external_attrs,
            local_header_offset,
            file_name: String::from_utf8_lossy(file_name).to_string(),
            extra_field: extra_field.to_vec(),
            file_comment: file_comment.to_vec(),
        })
    }
}

/// Central directory entries in encounter order.
///
/// Kept as a `Vec` rather than a name-keyed map: when an archive carries two
/// entries with the same name (e.g. two `META-INF/*.RSA` files), the one
/// that appears first in the central directory is the one a real ZIP/JAR
/// reader honors, and that ordering has to survive the parse.
#[derive(Debug)]
pub struct CentralDirectory {
    pub entries: Vec<CentralDirectoryEntry>,
}

impl CentralDirectory {
    pub fn parse(input: &[u8], eocd: &EndOfCentralDirectory) -> ModalResult<CentralDirectory> {
        let mut input = input
            .get(eocd.central_dir_offset as usize..)
            .ok_or(ErrMode::Incomplete(Needed::Unknown))?;

        let entries: Vec<CentralDirectoryEntry> =
            repeat(0.., CentralDirectoryEntry::parse).parse_next(&mut input)?;

        Ok(CentralDirectory { entries })
    }

    /// First entry by name, in central-directory encounter order.
    pub fn find(&self, name: &str) -> Option<&CentralDirectoryEntry> {
        self.entries.iter().find(|entry| entry.file_name == name)
    }

    /// First entry whose name matches `pred`, in encounter order.
    pub fn find_by(&self, pred: impl Fn(&str) -> bool) -> Option<&CentralDirectoryEntry> {
        self.entries
            .iter()
            .find(|entry| pred(entry.file_name.as_str()))
    }
}
